//! # Error Definitions
//!
//! One enum per stage of a round trip. Each stage raises only its own kind; [`Error`] is the
//! union a session hands back to the caller.

use std::fmt;

use ctpack::DecodeError;
use ctpack::EncodeError;

use crate::transport::TransportError;

/// Malformed call text. `pos` is a byte offset into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An unexpected character or a missing token.
    Syntax { pos: usize, message: String },
    UnterminatedString { pos: usize },
    UnknownEscape { pos: usize, escape: char },
    /// The digits do not fit in a `u64`.
    IntegerOverflow { pos: usize },
    /// A negative literal below `i64::MIN`.
    IntegerUnderflow { pos: usize },
    DuplicateField { pos: usize, field: String },
    DuplicateArgument { pos: usize, arg: String },
    TrailingCharacters { pos: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { pos, message } => write!(f, "{} at {}", message, pos),
            ParseError::UnterminatedString { pos } => {
                write!(f, "unterminated string starting at {}", pos)
            }
            ParseError::UnknownEscape { pos, escape } => {
                write!(f, "unknown escape '\\{}' at {}", escape, pos)
            }
            ParseError::IntegerOverflow { pos } => write!(f, "integer overflow at {}", pos),
            ParseError::IntegerUnderflow { pos } => write!(f, "integer underflow at {}", pos),
            ParseError::DuplicateField { pos, field } => {
                write!(f, "duplicate field '{}' in struct literal at {}", field, pos)
            }
            ParseError::DuplicateArgument { pos, arg } => {
                write!(f, "duplicate argument '{}' at {}", arg, pos)
            }
            ParseError::TrailingCharacters { pos } => {
                write!(f, "trailing characters after ')' at {}", pos)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A call that does not fit the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    UnknownFunction(String),
    /// The call names an argument the function does not declare.
    UnknownArgument { function: String, arg: String },
    MissingArgument { function: String, arg: String },
    UnknownStruct(String),
    StructNameMismatch { expected: String, found: String },
    MissingField { owner: String, field: String },
    TypeMismatch { expected: String, found: &'static str },
    OutOfRange { ty: &'static str, value: String },
    NegativeUnsigned { ty: &'static str, value: i64 },
    Encoding(EncodeError),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            SerializeError::UnknownArgument { function, arg } => {
                write!(f, "function '{}' has no argument '{}'", function, arg)
            }
            SerializeError::MissingArgument { function, arg } => {
                write!(f, "missing argument '{}' for '{}'", arg, function)
            }
            SerializeError::UnknownStruct(name) => write!(f, "unknown struct type '{}'", name),
            SerializeError::StructNameMismatch { expected, found } => write!(
                f,
                "struct literal name mismatch: expected '{}', found '{}'",
                expected, found
            ),
            SerializeError::MissingField { owner, field } => {
                write!(f, "missing struct field '{}' for '{}'", field, owner)
            }
            SerializeError::TypeMismatch { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            SerializeError::OutOfRange { ty, value } => {
                write!(f, "value {} out of range for {}", value, ty)
            }
            SerializeError::NegativeUnsigned { ty, value } => {
                write!(f, "negative value {} for {}", value, ty)
            }
            SerializeError::Encoding(e) => write!(f, "encoding failed: {}", e),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EncodeError> for SerializeError {
    fn from(e: EncodeError) -> Self {
        SerializeError::Encoding(e)
    }
}

/// A reply buffer that does not match the expected return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeserError {
    UnexpectedEnd { needed: usize, remaining: usize },
    /// Bytes left over after the whole value was read.
    TrailingBytes(usize),
    UnknownStruct(String),
    InvalidUtf8,
    /// The return type nests a struct inside itself, so no finite reply can match it.
    RecursiveStruct(String),
}

impl fmt::Display for DeserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeserError::UnexpectedEnd { needed, remaining } => write!(
                f,
                "unexpected end of reply: needed {} bytes, {} remaining",
                needed, remaining
            ),
            DeserError::TrailingBytes(n) => write!(f, "{} extra bytes after reply value", n),
            DeserError::UnknownStruct(name) => write!(f, "unknown struct type '{}'", name),
            DeserError::InvalidUtf8 => write!(f, "reply string is not valid UTF-8"),
            DeserError::RecursiveStruct(name) => {
                write!(f, "struct '{}' contains itself and cannot be decoded", name)
            }
        }
    }
}

impl std::error::Error for DeserError {}

impl From<DecodeError> for DeserError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnexpectedEnd { needed, remaining } => {
                DeserError::UnexpectedEnd { needed, remaining }
            }
            DecodeError::InvalidUtf8 => DeserError::InvalidUtf8,
        }
    }
}

/// Any failure of one session round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    Serialize(SerializeError),
    Transport(TransportError),
    Deser(DeserError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {}", e),
            Error::Serialize(e) => write!(f, "serialize error: {}", e),
            Error::Transport(e) => write!(f, "transport error: {}", e),
            Error::Deser(e) => write!(f, "deserialize error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Serialize(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Deser(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<SerializeError> for Error {
    fn from(e: SerializeError) -> Self {
        Error::Serialize(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<DeserError> for Error {
    fn from(e: DeserError) -> Self {
        Error::Deser(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
