//! Decoding BER encoded data into generic values.
//!
//! This module turns a stream of octets into a sequence of [`Value`]s,
//! one per top-level record. A value only reflects what is visible in the
//! encoding: tags, whether content is constructed, and the content octets.
//! Giving meaning to the content is left to the [`resolve`] module.
//!
//! [`resolve`]: crate::resolve

pub use self::error::{ContentError, DecodeError};
pub use self::reader::RecordReader;
pub use self::source::{Pos, Source};
pub use self::value::Value;

mod error;
mod reader;
mod source;
mod value;
