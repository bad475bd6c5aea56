//! Compiled schemas.
//!
//! A BER encoding alone doesn’t say what the content of an implicitly
//! tagged value means. This module turns a type-definition graph into a
//! [`SchemaTree`] rooted at a top-level type. Every container node of the
//! tree knows which of its members goes with which tag, which is what the
//! [`resolve`](crate::resolve) module needs to interpret values.
//!
//! The [`TagPathIndex`] is a flat view of the same tree keyed by the path
//! of tags leading to a node.

pub use self::error::{CompileWarning, SchemaError};
pub use self::index::{format_path, TagPathIndex};
pub use self::node::{NodeId, SchemaNode, SchemaTree};
pub use self::typedef::{BuiltinKind, Component, Module, TypeDef, TypeRef};

pub mod typedef;

mod compile;
mod error;
mod index;
mod node;
