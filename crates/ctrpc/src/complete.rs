//! # Autocomplete
//!
//! Extends partially typed call syntax toward a complete call, using the schema for names and
//! structure. It inserts punctuation and unambiguous name suffixes only; it never invents values.
//!
//! ## Invariants
//! - The output always starts with the input: text is only ever appended at the end.
//! - A name token that runs to the end of the input is a prefix and must match exactly one
//!   remaining candidate. A token already followed by its delimiter must match exactly.
//! - When the input holds a character other than the one the grammar needs next, completion
//!   stops and whatever was appended so far is returned.

use ctpack::Builtin;
use ctpack::Field;
use ctpack::Scanner;
use ctpack::Schema;
use ctpack::Struct;
use ctpack::Type;

/// Whether the construct being completed was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Finished,
    Incomplete,
}

/// Outcome of looking for a required delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Present,
    Inserted,
    Missing,
}

/// Completes `input` against `schema`. Returns `input` unchanged when no single function matches.
pub fn autocomplete(input: &str, schema: &Schema) -> String {
    let mut completer = Completer {
        scan: Scanner::new(input),
        schema,
        out: String::new(),
        open: Vec::new(),
    };

    match completer.call() {
        Some(_) => {
            tracing::trace!(input, appended = %completer.out, "autocomplete");
            format!("{}{}", input, completer.out)
        }
        None => input.to_string(),
    }
}

struct Completer<'a, 's> {
    scan: Scanner<'a>,
    schema: &'s Schema,
    /// Text to append to the input.
    out: String,
    /// Structs being completed, with the input position each was entered at.
    open: Vec<(&'s str, usize)>,
}

impl<'a, 's> Completer<'a, 's> {
    /// Resolves the function name, then completes its argument list.
    fn call(&mut self) -> Option<Progress> {
        let schema = self.schema;
        let names: Vec<&'s str> = schema.functions().map(|f| f.name.as_str()).collect();
        let idx = self.resolve(&['('], &names)?;
        let func = schema.find_function(names[idx])?;

        if self.delimiter('(') == Delim::Missing {
            return Some(Progress::Incomplete);
        }
        Some(self.assignments(&func.args, ')'))
    }

    /// Reads a name token up to one of `stops` and matches it against `candidates`.
    ///
    /// Appends the missing suffix of a prefix match. Returns the index of the chosen candidate.
    fn resolve(&mut self, stops: &[char], candidates: &[&str]) -> Option<usize> {
        self.scan.skip_ws();
        let token = self.scan.take_until(stops);

        if !self.scan.is_eof() {
            let token = token.trim_end();
            return candidates.iter().position(|c| *c == token);
        }

        let mut matches = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(token));
        match (matches.next(), matches.next()) {
            (Some((idx, name)), None) => {
                self.out.push_str(&name[token.len()..]);
                Some(idx)
            }
            _ => None,
        }
    }

    /// Consumes `c`, or appends it when the input has run out.
    fn delimiter(&mut self, c: char) -> Delim {
        self.scan.skip_ws();
        if self.scan.eat(c) {
            Delim::Present
        } else if self.scan.is_eof() {
            self.out.push(c);
            Delim::Inserted
        } else {
            Delim::Missing
        }
    }

    fn close(&mut self, c: char) -> Progress {
        match self.delimiter(c) {
            Delim::Present | Delim::Inserted => Progress::Finished,
            Delim::Missing => Progress::Incomplete,
        }
    }

    /// Completes `name=value` pairs for `decls` (function arguments or struct fields) and the
    /// `close` delimiter once every one of them has a value.
    fn assignments(&mut self, decls: &'s [Field], close: char) -> Progress {
        let mut remaining: Vec<&'s Field> = decls.iter().collect();
        if remaining.is_empty() {
            return self.close(close);
        }

        loop {
            let names: Vec<&str> = remaining.iter().map(|f| f.name.as_str()).collect();
            let Some(idx) = self.resolve(&['='], &names) else {
                return Progress::Incomplete;
            };
            let decl = remaining.remove(idx);

            if self.delimiter('=') == Delim::Missing {
                return Progress::Incomplete;
            }
            if self.value(&decl.ty) == Progress::Incomplete {
                return Progress::Incomplete;
            }
            if remaining.is_empty() {
                return self.close(close);
            }

            self.scan.skip_ws();
            if self.scan.eat(',') {
                continue;
            }
            if !self.scan.is_eof() {
                return Progress::Incomplete;
            }
            self.out.push_str(", ");
        }
    }

    fn value(&mut self, ty: &Type) -> Progress {
        match ty {
            Type::Builtin(Builtin::String) => self.string(),
            Type::Builtin(_) => self.integer(),
            Type::User(name) => match self.schema.find_struct(name) {
                Some(st) => self.structure(st),
                None => Progress::Incomplete,
            },
        }
    }

    /// Opens a string when nothing was typed, closes one that runs to the end of the input.
    fn string(&mut self) -> Progress {
        self.scan.skip_ws();
        if self.scan.is_eof() {
            self.out.push('"');
            return Progress::Incomplete;
        }
        if !self.scan.eat('"') {
            return Progress::Incomplete;
        }
        loop {
            match self.scan.bump() {
                Some('"') => return Progress::Finished,
                Some('\\') => {
                    // a trailing backslash would escape an inserted quote
                    if self.scan.bump().is_none() {
                        return Progress::Incomplete;
                    }
                }
                Some(_) => {}
                None => {
                    self.out.push('"');
                    return Progress::Finished;
                }
            }
        }
    }

    /// Digits are never invented: a number is finished only once it is followed by a delimiter.
    fn integer(&mut self) -> Progress {
        let digits = self.scan.take_until(&['}', ')', ',']);
        if digits.trim().is_empty() || self.scan.is_eof() {
            Progress::Incomplete
        } else {
            Progress::Finished
        }
    }

    /// `Name{...}` or `{...}`; a partially typed name hint is completed.
    ///
    /// Re-entering a struct that is already open without having read any input in between
    /// would only ever append the same text again, so completion stops there.
    fn structure(&mut self, st: &'s Struct) -> Progress {
        self.scan.skip_ws();
        let pos = self.scan.pos();
        if self.open.iter().any(|&(name, at)| name == st.name && at == pos) {
            return Progress::Incomplete;
        }

        self.open.push((st.name.as_str(), pos));
        let progress = self.struct_literal(st);
        self.open.pop();
        progress
    }

    fn struct_literal(&mut self, st: &'s Struct) -> Progress {
        if !self.scan.eat('{') {
            let hint = self.scan.take_until(&['{']);
            if self.scan.is_eof() {
                if !hint.is_empty() {
                    if !st.name.starts_with(hint) {
                        return Progress::Incomplete;
                    }
                    self.out.push_str(&st.name[hint.len()..]);
                }
                self.out.push('{');
            } else {
                if hint.trim_end() != st.name {
                    return Progress::Incomplete;
                }
                self.scan.eat('{');
            }
        }
        self.assignments(&st.fields, '}')
    }
}
