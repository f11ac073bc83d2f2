//! Error types for XML mapping.
//!
//! Only malformed input is a hard failure for callers that feed well-behaved
//! types through the mapper. Shape mismatches between a document and a target
//! type degrade silently inside the [`Deserializer`](crate::de::Deserializer)
//! and never surface here.

use std::fmt::{self, Display};
use std::io;

/// Result type alias for xmlize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for XML encoding and decoding.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    position: Option<Position>,
}

/// Position information for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from start.
    pub offset: usize,
}

/// The kind of error that occurred.
#[derive(Debug)]
pub enum ErrorKind {
    /// An I/O error occurred while writing output.
    Io(io::Error),
    /// Unexpected end of input.
    UnexpectedEof,
    /// Invalid XML syntax.
    Syntax(String),
    /// Invalid XML name.
    InvalidName(String),
    /// Unclosed tag.
    UnclosedTag(String),
    /// Mismatched closing tag.
    MismatchedTag {
        /// The expected tag name.
        expected: String,
        /// The actual tag name found.
        found: String,
    },
    /// Invalid escape sequence.
    InvalidEscape(String),
    /// Invalid UTF-8.
    InvalidUtf8,
    /// A value's runtime view does not match its registered shape.
    UnsupportedShape(String),
    /// An object was reached again while it was still being written.
    Cycle(String),
    /// The value nests deeper than the configured limit.
    RecursionLimit(usize),
    /// Custom error message.
    Custom(String),
}

impl Error {
    /// Creates a new error with the given kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, position: None }
    }

    /// Creates a new error with position information.
    #[inline]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position where the error occurred.
    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns true when the input text was not well-formed XML or nests
    /// deeper than the configured limit.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnexpectedEof
                | ErrorKind::Syntax(_)
                | ErrorKind::InvalidName(_)
                | ErrorKind::UnclosedTag(_)
                | ErrorKind::MismatchedTag { .. }
                | ErrorKind::InvalidEscape(_)
                | ErrorKind::InvalidUtf8
                | ErrorKind::RecursionLimit(_)
        )
    }

    /// Creates an unexpected EOF error.
    #[inline]
    pub fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof)
    }

    /// Creates a syntax error.
    #[inline]
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::Syntax(msg.into()))
    }

    /// Creates an invalid name error.
    #[inline]
    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        Self::new(ErrorKind::InvalidName(name.into()))
    }

    /// Creates an unclosed tag error.
    #[inline]
    pub fn unclosed_tag<S: Into<String>>(tag: S) -> Self {
        Self::new(ErrorKind::UnclosedTag(tag.into()))
    }

    /// Creates a mismatched tag error.
    #[inline]
    pub fn mismatched_tag<S: Into<String>>(expected: S, found: S) -> Self {
        Self::new(ErrorKind::MismatchedTag {
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates an invalid escape error.
    #[inline]
    pub fn invalid_escape<S: Into<String>>(seq: S) -> Self {
        Self::new(ErrorKind::InvalidEscape(seq.into()))
    }

    /// Creates an unsupported shape error.
    #[inline]
    pub fn unsupported_shape<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::UnsupportedShape(msg.into()))
    }

    /// Creates a cycle error naming the type that was revisited.
    #[inline]
    pub fn cycle<S: Into<String>>(type_name: S) -> Self {
        Self::new(ErrorKind::Cycle(type_name.into()))
    }

    /// Creates a recursion limit error.
    #[inline]
    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(ErrorKind::RecursionLimit(limit))
    }

    /// Creates a custom error.
    #[inline]
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::Custom(msg.into()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Io(e) => write!(f, "I/O error: {}", e),
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::Syntax(msg) => write!(f, "syntax error: {}", msg),
            ErrorKind::InvalidName(name) => write!(f, "invalid XML name: {}", name),
            ErrorKind::UnclosedTag(tag) => write!(f, "unclosed tag: <{}>", tag),
            ErrorKind::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{}>, found </{}>", expected, found)
            }
            ErrorKind::InvalidEscape(seq) => write!(f, "invalid escape sequence: {}", seq),
            ErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
            ErrorKind::UnsupportedShape(msg) => write!(f, "unsupported shape: {}", msg),
            ErrorKind::Cycle(name) => write!(f, "cycle detected while writing {}", name),
            ErrorKind::RecursionLimit(limit) => {
                write!(f, "recursion limit of {} exceeded", limit)
            }
            ErrorKind::Custom(msg) => write!(f, "{}", msg),
        }?;

        if let Some(pos) = self.position {
            write!(f, " at line {}, column {} (offset {})", pos.line, pos.column, pos.offset)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::new(ErrorKind::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::syntax("expected '>'");
        assert_eq!(err.to_string(), "syntax error: expected '>'");
    }

    #[test]
    fn test_error_with_position() {
        let err = Error::syntax("expected '>'")
            .with_position(Position { line: 5, column: 10, offset: 42 });
        assert_eq!(
            err.to_string(),
            "syntax error: expected '>' at line 5, column 10 (offset 42)"
        );
        assert_eq!(err.position().map(|p| p.line), Some(5));
    }

    #[test]
    fn test_mismatched_tag_is_malformed() {
        let err = Error::mismatched_tag("Person", "Persons");
        assert_eq!(
            err.to_string(),
            "mismatched closing tag: expected </Person>, found </Persons>"
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_walk_errors_are_not_malformed() {
        assert!(!Error::cycle("Node").is_malformed());
        assert!(!Error::unsupported_shape("List").is_malformed());
        assert!(Error::recursion_limit(8).is_malformed());
        assert_eq!(
            Error::recursion_limit(8).to_string(),
            "recursion limit of 8 exceeded"
        );
    }

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::from(io_err);
        assert!(err.to_string().contains("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
