//! # Scanner
//!
//! A position-tracking cursor over source text. The schema parser, the call parser and the
//! autocomplete engine all read their input through it.
//!
//! ## Invariants
//! - `pos` is always on a `char` boundary of `src`.
//! - No method ever moves backwards; every production is decided by one character of lookahead.

/// Returns true for characters that may start an identifier.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters that may continue an identifier.
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Byte offset of the next unread character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_is(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is the next character.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek_is(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `s` if the remaining input starts with it.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// Consumes characters while `pred` holds and returns them.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    /// Consumes characters up to (not including) the first one in `stops`, or to the end.
    pub fn take_until(&mut self, stops: &[char]) -> &'a str {
        self.take_while(|c| !stops.contains(&c))
    }

    /// Consumes an identifier (`[_A-Za-z][_A-Za-z0-9]*`), or nothing.
    pub fn ident(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(c) if is_ident_start(c) => Some(self.take_while(is_ident_continue)),
            _ => None,
        }
    }

    /// 1-based line and column of byte offset `pos`, for diagnostics.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let before = &self.src[..pos.min(self.src.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_idents_and_punct() {
        let mut s = Scanner::new("  foo_1(bar");
        s.skip_ws();
        assert_eq!(s.ident(), Some("foo_1"));
        assert!(s.eat('('));
        assert_eq!(s.ident(), Some("bar"));
        assert!(s.is_eof());
        assert_eq!(s.ident(), None);
    }

    #[test]
    fn scanner_rejects_leading_digit() {
        let mut s = Scanner::new("1abc");
        assert_eq!(s.ident(), None);
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn scanner_take_until() {
        let mut s = Scanner::new("12, x");
        assert_eq!(s.take_until(&['}', ')', ',']), "12");
        assert!(s.peek_is(','));
        assert_eq!(s.take_until(&['=']), ", x");
        assert!(s.is_eof());
    }

    #[test]
    fn scanner_multibyte() {
        let mut s = Scanner::new("é\"");
        assert_eq!(s.bump(), Some('é'));
        assert_eq!(s.pos(), 2);
        assert!(s.eat('"'));
    }

    #[test]
    fn scanner_line_col() {
        let s = Scanner::new("ab\ncd\nef");
        assert_eq!(s.line_col(0), (1, 1));
        assert_eq!(s.line_col(4), (2, 2));
        assert_eq!(s.line_col(6), (3, 1));
    }
}
