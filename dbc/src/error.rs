//! Error types shared across every stage of the pipeline: lexing, parsing,
//! lowering, validation, and the JSON projection.

use std::fmt;

/// All errors `dbc-rs` can return.
///
/// Lexer and parser errors carry the offending token's 1-based line/column
/// so a caller can point a user at the exact source location. Everything
/// past the parser (lowering, validation) works over an in-memory model and
/// reports by entity name / message id instead.
#[derive(Debug)]
pub enum Error {
    /// The lexer could not produce a token (e.g. an unterminated string).
    LexError { line: u32, col: u32, msg: String },
    /// The parser encountered a token it did not expect.
    ParseError { line: u32, col: u32, msg: String },
    /// A name that must be unique within some scope was used twice.
    DuplicateName { kind: &'static str, name: String },
    /// A message id that must be unique within the network was reused.
    DuplicateId { id: u32 },
    /// A record referenced an entity that does not exist.
    UnknownReference {
        what: &'static str,
        name: String,
        context: String,
    },
    /// An attribute assignment's kind or type did not match its definition.
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A value fell outside the bounds its definition or signal type allows.
    OutOfRange {
        what: String,
        value: String,
        bounds: String,
    },
    /// Two signals in the same message claim the same bit in an
    /// incompatible way.
    BitOverlap {
        message_id: u32,
        first: String,
        second: String,
        bit: u32,
    },
    /// Wraps a filesystem error encountered by a caller-level I/O helper.
    Io(std::io::Error),
    /// Wraps a `serde_json` (de)serialization error.
    Json(serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LexError { line, col, msg } => {
                write!(f, "lex error at {}:{}: {}", line, col, msg)
            }
            Error::ParseError { line, col, msg } => {
                write!(f, "parse error at {}:{}: {}", line, col, msg)
            }
            Error::DuplicateName { kind, name } => {
                write!(f, "duplicate {} name: {}", kind, name)
            }
            Error::DuplicateId { id } => write!(f, "duplicate message id: {}", id),
            Error::UnknownReference { what, name, context } => {
                write!(f, "unknown {} '{}' referenced from {}", what, name, context)
            }
            Error::TypeMismatch { attribute, expected, found } => write!(
                f,
                "attribute '{}' type mismatch: expected {}, found {}",
                attribute, expected, found
            ),
            Error::OutOfRange { what, value, bounds } => {
                write!(f, "{} value {} out of range {}", what, value, bounds)
            }
            Error::BitOverlap { message_id, first, second, bit } => write!(
                f,
                "message {}: signals '{}' and '{}' both occupy bit {}",
                message_id, first, second, bit
            ),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// A non-fatal diagnostic raised while converting between the model and
/// JSON (spec §7: "Warnings ... are emitted to a side channel and are
/// never fatal").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning(pub String);

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
