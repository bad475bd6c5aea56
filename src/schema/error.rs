//! Errors and warnings of the schema compiler.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};


//------------ SchemaError ---------------------------------------------------

/// A schema could not be compiled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaError {
    /// A referenced type is not defined in the module.
    UnknownType {
        name: String,
        field: Option<String>,
    },

    /// A type refers to itself.
    Recursive {
        name: String,
    },

    /// The schema nests deeper than supported.
    TooDeep {
        field: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SchemaError::UnknownType { ref name, field: Some(ref field) } => {
                write!(f, "unknown type '{}' referenced by '{}'", name, field)
            }
            SchemaError::UnknownType { ref name, field: None } => {
                write!(f, "unknown top-level type '{}'", name)
            }
            SchemaError::Recursive { ref name } => {
                write!(f, "recursive type '{}' is not supported", name)
            }
            SchemaError::TooDeep { ref field } => {
                write!(f, "schema nests too deeply at '{}'", field)
            }
        }
    }
}

impl error::Error for SchemaError { }


//------------ CompileWarning ------------------------------------------------

/// A problem with a schema that doesn’t stop it from being compiled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileWarning {
    /// Two members of a container share a tag.
    ///
    /// Only the first member is registered under the tag.
    DuplicateTag {
        container: String,
        tag: u32,
        kept: String,
        ignored: String,
    },

    /// A tag could not be parsed into a number.
    ///
    /// The member is treated as untagged.
    InvalidTag {
        field: String,
        tag: String,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CompileWarning::DuplicateTag {
                ref container, tag, ref kept, ref ignored
            } => {
                write!(f,
                    "duplicate tag [{}] in '{}': keeping '{}', ignoring '{}'",
                    tag, container, kept, ignored
                )
            }
            CompileWarning::InvalidTag { ref field, ref tag } => {
                write!(f, "invalid tag '{}' on '{}', treated as untagged",
                    tag, field
                )
            }
        }
    }
}
