//! Resolution errors.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use super::stack::TagStack;


//------------ ErrorKind -----------------------------------------------------

/// The category of a resolution error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// A value can’t be interpreted as what the schema says it is.
    SchemaResolution,

    /// The shape of the encoding contradicts the schema.
    EncodingStructure,

    /// The value nests deeper than supported.
    DecodeBounds,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::SchemaResolution => "schema resolution error",
            ErrorKind::EncodingStructure => "encoding structure error",
            ErrorKind::DecodeBounds => "decode bounds error",
        })
    }
}


//------------ ResolveError --------------------------------------------------

/// A record could not be resolved into a document.
///
/// The error aborts resolving the current record only. It carries the tag
/// path at which it happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolveError {
    kind: ErrorKind,
    path: String,
    message: String,
}

impl ResolveError {
    /// Creates a new error at the current position of a tag stack.
    pub fn new(
        kind: ErrorKind, stack: &TagStack, message: impl Into<String>
    ) -> Self {
        ResolveError {
            kind,
            path: stack.to_string(),
            message: message.into(),
        }
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the tag path at which the error happened.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.message)
    }
}

impl error::Error for ResolveError { }
