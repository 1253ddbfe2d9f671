//! # Call Parser
//!
//! Turns one line of call syntax into a [`Call`], without consulting any schema.
//!
//! ```text
//! call    := IDENT "(" (assign ("," assign)*)? ")"
//! assign  := IDENT "=" value
//! value   := STRING | IDENT? "{" (assign ("," assign)*)? "}" | ("+" | "-")? DIGIT+
//! ```
//!
//! Whitespace may surround tokens but never splits one. Strings accept the escapes `\n`, `\t`,
//! `\\` and `\"`.

use std::collections::BTreeMap;

use ctpack::Scanner;
use ctpack::scanner::is_ident_start;

use crate::error::ParseError;
use crate::value::Call;
use crate::value::NamedArg;
use crate::value::StructValue;
use crate::value::Value;

/// Magnitude of `i64::MIN`, the one negative literal whose magnitude exceeds `i64::MAX`.
const I64_MIN_MAGNITUDE: u64 = i64::MAX as u64 + 1;

/// Parses one call line.
pub fn parse_call(line: &str) -> Result<Call, ParseError> {
    let mut parser = CallParser {
        scan: Scanner::new(line),
    };
    parser.call()
}

struct CallParser<'a> {
    scan: Scanner<'a>,
}

impl<'a> CallParser<'a> {
    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            pos: self.scan.pos(),
            message: message.into(),
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        self.scan.skip_ws();
        if self.scan.eat(c) {
            Ok(())
        } else {
            Err(self.syntax(format!("expected '{}'", c)))
        }
    }

    fn ident(&mut self, what: &str) -> Result<&'a str, ParseError> {
        self.scan.skip_ws();
        self.scan
            .ident()
            .ok_or_else(|| self.syntax(format!("expected {}", what)))
    }

    fn call(&mut self) -> Result<Call, ParseError> {
        let function = self.ident("function name")?;
        self.expect('(')?;

        let mut call = Call::new(function);
        self.scan.skip_ws();
        if !self.scan.eat(')') {
            loop {
                self.scan.skip_ws();
                let pos = self.scan.pos();
                let name = self.ident("argument name")?;
                self.expect('=')?;
                let value = self.value()?;
                if call.find_arg(name).is_some() {
                    return Err(ParseError::DuplicateArgument {
                        pos,
                        arg: name.to_string(),
                    });
                }
                call.args.push(NamedArg::new(name, value));

                self.scan.skip_ws();
                if self.scan.eat(')') {
                    break;
                }
                self.expect(',')?;
            }
        }

        self.scan.skip_ws();
        if !self.scan.is_eof() {
            return Err(ParseError::TrailingCharacters {
                pos: self.scan.pos(),
            });
        }
        Ok(call)
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.scan.skip_ws();
        match self.scan.peek() {
            Some('"') => self.string().map(Value::Str),
            Some(c) if c == '{' || is_ident_start(c) => self.struct_literal().map(Value::Struct),
            _ => self.integer(),
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let start = self.scan.pos();
        self.scan.bump();

        let mut out = String::new();
        loop {
            let pos = self.scan.pos();
            match self.scan.bump() {
                None => return Err(ParseError::UnterminatedString { pos: start }),
                Some('"') => return Ok(out),
                Some('\\') => match self.scan.bump() {
                    None => return Err(ParseError::UnterminatedString { pos: start }),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some(escape) => return Err(ParseError::UnknownEscape { pos, escape }),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn struct_literal(&mut self) -> Result<StructValue, ParseError> {
        let name = self.scan.ident().map(str::to_string);
        self.scan.skip_ws();
        if !self.scan.eat('{') {
            return Err(self.syntax("expected '{' to start struct literal"));
        }

        let mut fields = BTreeMap::new();
        self.scan.skip_ws();
        if !self.scan.eat('}') {
            loop {
                self.scan.skip_ws();
                let pos = self.scan.pos();
                let field = self.ident("field name")?;
                self.expect('=')?;
                let value = self.value()?;
                if fields.insert(field.to_string(), value).is_some() {
                    return Err(ParseError::DuplicateField {
                        pos,
                        field: field.to_string(),
                    });
                }

                self.scan.skip_ws();
                if self.scan.eat('}') {
                    break;
                }
                self.expect(',')?;
            }
        }
        Ok(StructValue { name, fields })
    }

    fn integer(&mut self) -> Result<Value, ParseError> {
        let start = self.scan.pos();
        let negative = match self.scan.peek() {
            Some('-') => {
                self.scan.bump();
                true
            }
            Some('+') => {
                self.scan.bump();
                false
            }
            _ => false,
        };

        let digits = self.scan.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.syntax("expected value"));
        }

        let mut acc: u64 = 0;
        for d in digits.bytes() {
            acc = acc
                .checked_mul(10)
                .and_then(|acc| acc.checked_add(u64::from(d - b'0')))
                .ok_or(ParseError::IntegerOverflow { pos: start })?;
        }

        if negative {
            return match acc {
                I64_MIN_MAGNITUDE => Ok(Value::Int(i64::MIN)),
                m if m > I64_MIN_MAGNITUDE => Err(ParseError::IntegerUnderflow { pos: start }),
                m => Ok(Value::Int(-(m as i64))),
            };
        }
        Ok(match i64::try_from(acc) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::UInt(acc),
        })
    }
}
