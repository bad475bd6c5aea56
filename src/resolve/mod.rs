//! Resolving generic values into documents.
//!
//! The [`Resolver`] walks a decoded [`Value`](crate::decode::Value) and,
//! if available, a [`SchemaTree`](crate::schema::SchemaTree) in lockstep.
//! Every time the value enters a tagged wrapper, the tag is pushed onto a
//! [`TagStack`]. The schema node the walk is currently at, the cursor,
//! decides how the content is interpreted: as an enumerated name, an
//! integer, a boolean, text, or a nested object or array.
//!
//! Failures are reported as a [`ResolveError`] carrying the tag path at
//! which they happened. Problems with character data never fail: content
//! that isn’t clean text is rendered in hex instead.

pub use self::document::Document;
pub use self::error::{ErrorKind, ResolveError};
pub use self::stack::TagStack;
pub use self::walk::{Options, Resolver};

mod document;
mod error;
mod stack;
mod walk;
