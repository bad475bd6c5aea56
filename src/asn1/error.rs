//! Errors when reading ASN.1 source.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};


//------------ ParseError ----------------------------------------------------

/// ASN.1 source text could not be read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    message: String,
    line: usize,
    column: usize,
}

impl ParseError {
    /// Creates an error for the given byte offset into the source.
    pub(super) fn at(
        source: &str, offset: usize, message: impl Into<String>
    ) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(pos) => before[pos + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        ParseError { message: message.into(), line, column }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the 1-based line of the error.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column of the error in characters.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl error::Error for ParseError { }
