//! Support for reading semicolon-terminated tokens from byte streams.
//!
//! The input grammar is small:
//! a token is a run of ASCII letters, immediately followed by `;`.
//! Tokens are separated by whitespace and/or newlines (`\n`, `\r\n`, `\n\r` or a bare `\r`).
//! Any other byte is dropped without affecting the tokenizer's state.

mod token;

#[cfg(test)]
mod token_test;

pub use token::{parse, parse_file, Summary, TokenKind};

/// A 1-based line/column position in the input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Error type if a parse does not complete.
///
/// A parse stops at the first of these; no error is retried.
/// Structural errors carry the location of the byte that triggered them.
#[derive(Debug, thiserror::Error)]
pub enum ReadErr {
    /// The visitor asked to stop.
    #[error("canceled by callback at {0}")]
    Canceled(Location),
    /// A terminator with no token before it, or a newline inside a token.
    #[error("{message} at {location}")]
    InvalidToken {
        location: Location,
        message: &'static str,
    },
    /// Whitespace ended a token that had no terminator.
    #[error("missing ';' at {0}")]
    MissingTerminator(Location),
    /// The input could not be opened or read.
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadErr {
    /// Where in the input the parse stopped, if it stopped on a byte.
    pub fn location(&self) -> Option<Location> {
        match self {
            ReadErr::Canceled(location) | ReadErr::MissingTerminator(location) => Some(*location),
            ReadErr::InvalidToken { location, .. } => Some(*location),
            ReadErr::Io(_) => None,
        }
    }
}

/// The main result type for this module.
pub type ReadResult<T> = Result<T, ReadErr>;
