//! # Schema Parser
//!
//! Turns schema source text into a validated [`Schema`].
//!
//! ```text
//! schema   := item*
//! item     := "struct" IDENT "{" decl* "}"
//!           | "fn" IDENT "->" type "{" decl* "}"
//! decl     := type IDENT ";"
//! type     := "int32" | "int64" | "uint32" | "uint64" | "string" | IDENT
//! ```
//!
//! Declarations may appear in any order; user types are resolved only after the whole document
//! has been read, so forward references are legal. Keywords are reserved and cannot be used as
//! names.

use crate::scanner::Scanner;
use crate::schema::Builtin;
use crate::schema::Field;
use crate::schema::Function;
use crate::schema::Schema;
use crate::schema::SchemaError;
use crate::schema::Struct;
use crate::schema::Type;

const KW_STRUCT: &str = "struct";
const KW_FN: &str = "fn";

/// Parses a whole schema document.
pub fn parse_schema(text: &str) -> Result<Schema, SchemaError> {
    let mut parser = SchemaParser {
        scan: Scanner::new(text),
    };

    let mut structs = Vec::new();
    let mut functions = Vec::new();

    loop {
        parser.scan.skip_ws();
        if parser.scan.is_eof() {
            break;
        }
        let start = parser.scan.pos();
        match parser.scan.ident() {
            Some(KW_STRUCT) => structs.push(parser.struct_decl()?),
            Some(KW_FN) => functions.push(parser.fn_decl()?),
            _ => return Err(parser.error_at(start, "expected 'struct' or 'fn'")),
        }
    }

    Schema::new(structs, functions)
}

fn is_reserved(word: &str) -> bool {
    word == KW_STRUCT || word == KW_FN || Builtin::from_keyword(word).is_some()
}

struct SchemaParser<'a> {
    scan: Scanner<'a>,
}

impl<'a> SchemaParser<'a> {
    fn error_at(&self, pos: usize, message: impl Into<String>) -> SchemaError {
        let (line, column) = self.scan.line_col(pos);
        SchemaError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), SchemaError> {
        self.scan.skip_ws();
        if self.scan.eat_str(token) {
            Ok(())
        } else {
            Err(self.error_at(self.scan.pos(), format!("expected '{}'", token)))
        }
    }

    /// A declared name: an identifier that is not a keyword.
    fn name(&mut self, what: &str) -> Result<&'a str, SchemaError> {
        self.scan.skip_ws();
        let start = self.scan.pos();
        match self.scan.ident() {
            Some(word) if is_reserved(word) => Err(self.error_at(
                start,
                format!("keyword '{}' cannot be used as a {} name", word, what),
            )),
            Some(word) => Ok(word),
            None => Err(self.error_at(start, format!("expected {} name", what))),
        }
    }

    fn ty(&mut self) -> Result<Type, SchemaError> {
        self.scan.skip_ws();
        let start = self.scan.pos();
        match self.scan.ident() {
            Some(word) => match Builtin::from_keyword(word) {
                Some(builtin) => Ok(Type::Builtin(builtin)),
                None if is_reserved(word) => {
                    Err(self.error_at(start, format!("keyword '{}' is not a type", word)))
                }
                None => Ok(Type::user(word)),
            },
            None => Err(self.error_at(start, "expected type")),
        }
    }

    /// `{ (type IDENT ;)* }`
    fn body(&mut self, what: &str) -> Result<Vec<Field>, SchemaError> {
        self.expect("{")?;
        let mut decls = Vec::new();
        loop {
            self.scan.skip_ws();
            if self.scan.eat('}') {
                return Ok(decls);
            }
            if self.scan.is_eof() {
                return Err(self.error_at(self.scan.pos(), "expected '}'"));
            }
            let ty = self.ty()?;
            let name = self.name(what)?;
            self.expect(";")?;
            decls.push(Field::new(name, ty));
        }
    }

    fn struct_decl(&mut self) -> Result<Struct, SchemaError> {
        let name = self.name("struct")?;
        let fields = self.body("field")?;
        Ok(Struct::new(name, fields))
    }

    fn fn_decl(&mut self) -> Result<Function, SchemaError> {
        let name = self.name("function")?;
        self.expect("->")?;
        let return_type = self.ty()?;
        let args = self.body("argument")?;
        Ok(Function::new(name, return_type, args))
    }
}
