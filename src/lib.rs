//! Schema-guided decoding of BER encoded records.
//!
//! Many systems produce long streams of records encoded in the Basic
//! Encoding Rules (BER) of ASN.1, each described by a large schema. This
//! crate turns such records into plain, hierarchical documents that can be
//! serialized as JSON or any other format supported by serde.
//!
//! Decoding happens in three steps:
//!
//! * The [`schema`] module compiles a type-definition graph into an
//!   immutable [`SchemaTree`][schema::SchemaTree] and indexes it by tag
//!   path. The graph can be built by hand or read from ASN.1 source via
//!   the [`asn1`] module.
//! * The [`decode`] module splits a byte stream into records, each a
//!   generic [`Value`][decode::Value] tree mirroring the encoding.
//! * The [`resolve`] module walks a value and the schema tree in lockstep
//!   and produces a [`Document`][resolve::Document].
//!
//! Here is how the three fit together:
//!
//! ```
//! use bertree::asn1::parse_module;
//! use bertree::decode::Value;
//! use bertree::resolve::Resolver;
//! use bertree::schema::SchemaTree;
//!
//! let module = parse_module("
//!     Example DEFINITIONS IMPLICIT TAGS ::= BEGIN
//!     Record ::= SEQUENCE { id [0] INTEGER, name [1] IA5String }
//!     END
//! ").unwrap();
//! let tree = SchemaTree::compile(&module, "Record").unwrap();
//! let value = Value::decode_slice(b"\x30\x08\x80\x01\x2a\x81\x03abc").unwrap();
//! let document = Resolver::with_schema(&tree).resolve(&value).unwrap();
//! assert_eq!(
//!     serde_json::to_string(&document).unwrap(),
//!     r#"{"id":42,"name":"abc"}"#
//! );
//! ```
//!
//! Character data is decoded carefully: anything that isn’t clean text is
//! rendered in hex rather than causing an error. See the [`text`] module
//! for the details.

pub use self::ident::{Class, Tag};
pub use self::int::Integer;
pub use self::oid::Oid;

pub mod asn1;
pub mod decode;
pub mod resolve;
pub mod schema;
pub mod text;

mod ident;
mod int;
mod length;
mod oid;
