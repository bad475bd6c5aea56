//! Generic values.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::io;
use bytes::{Bytes, BytesMut};
use crate::ident::{Ident, Tag};
use crate::length::Length;
use super::error::DecodeError;
use super::source::Source;


//------------ Value ---------------------------------------------------------

/// A BER encoded value decoded without knowledge of its type.
///
/// The tree mirrors the encoding. A value with a non-universal tag is
/// represented as a [`Value::Tagged`] wrapper around its base value which
/// itself has no tag. This is all we can say about such a value without a
/// schema: whether the tag is implicit or explicit is not visible in the
/// encoding. Values with a universal tag keep that tag on the primitive or
/// constructed node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// A value with a context, application, or private tag.
    Tagged {
        tag: Tag,
        base: Box<Value>,
    },

    /// A constructed value.
    ///
    /// The tag is `None` if this is the base of a tagged value.
    Constructed {
        tag: Option<Tag>,
        children: Vec<Value>,
    },

    /// A primitive value.
    ///
    /// The tag is `None` if this is the base of a tagged value.
    Primitive {
        tag: Option<Tag>,
        content: Bytes,
    },
}

impl Value {
    /// The maximum nesting of constructed values.
    pub const MAX_NESTING: usize = 64;

    /// Takes a single value from the beginning of a source.
    ///
    /// Returns `Ok(None)` if the source is at its end.
    pub fn take_opt_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Option<Self>, DecodeError> {
        let ident = match Ident::take_opt_from(source)? {
            Some(ident) => ident,
            None => return Ok(None)
        };
        if ident == Ident::END_OF_CONTENTS {
            return Err(source.content_err("unexpected end of contents"))
        }
        Self::take_content_from(source, ident, 0).map(Some)
    }

    /// Takes a single value from the beginning of a source.
    pub fn take_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Self, DecodeError> {
        match Self::take_opt_from(source)? {
            Some(res) => Ok(res),
            None => Err(source.content_err("unexpected end of data"))
        }
    }

    /// Decodes a complete value from a slice.
    ///
    /// Trailing data is an error.
    pub fn decode_slice(data: &[u8]) -> Result<Self, DecodeError> {
        let mut source = Source::new(data);
        let res = Self::take_from(&mut source)?;
        if !source.is_exhausted()? {
            return Err(source.content_err("trailing data"))
        }
        Ok(res)
    }

    /// Takes length and content of a value with the given identifier.
    fn take_content_from<R: io::Read>(
        source: &mut Source<R>, ident: Ident, depth: usize,
    ) -> Result<Self, DecodeError> {
        if depth >= Self::MAX_NESTING {
            return Err(source.content_err("values nested too deeply"))
        }
        let length = Length::take_from(source)?;
        let tag = ident.tag();
        let own_tag = if tag.is_universal() { Some(tag) } else { None };

        let base = if ident.is_constructed() {
            Value::Constructed {
                tag: own_tag,
                children: Self::take_children(source, length, depth)?,
            }
        }
        else {
            let len = match length {
                Length::Definite(len) => len,
                Length::Indefinite => {
                    return Err(source.content_err(
                        "primitive value with indefinite length"
                    ))
                }
            };
            Value::Primitive {
                tag: own_tag,
                content: source.take_bytes(len)?,
            }
        };

        if own_tag.is_some() {
            Ok(base)
        }
        else {
            Ok(Value::Tagged { tag, base: Box::new(base) })
        }
    }

    /// Takes the content of a constructed value.
    fn take_children<R: io::Read>(
        source: &mut Source<R>, length: Length, depth: usize,
    ) -> Result<Vec<Self>, DecodeError> {
        let mut res = Vec::new();
        match length {
            Length::Definite(len) => {
                let end = match source.pos().offset().checked_add(len) {
                    Some(end) => end,
                    None => return Err(source.content_err("excessive length"))
                };
                while source.pos().offset() < end {
                    let ident = Ident::take_from(source)?;
                    if ident == Ident::END_OF_CONTENTS {
                        return Err(source.content_err(
                            "unexpected end of contents"
                        ))
                    }
                    res.push(Self::take_content_from(source, ident, depth + 1)?);
                }
                if source.pos().offset() != end {
                    return Err(source.content_err(
                        "nested value exceeds its parent"
                    ))
                }
            }
            Length::Indefinite => {
                loop {
                    let ident = Ident::take_from(source)?;
                    if ident == Ident::END_OF_CONTENTS {
                        if !Length::take_from(source)?.is_zero() {
                            return Err(source.content_err(
                                "illegal end of contents"
                            ))
                        }
                        break
                    }
                    res.push(Self::take_content_from(source, ident, depth + 1)?);
                }
            }
        }
        Ok(res)
    }
}

/// # Access to the Shape
///
impl Value {
    /// Returns the tag of a tagged wrapper.
    ///
    /// This is the leading tag the resolver uses to select members. Values
    /// with a universal tag aren’t considered tagged.
    pub fn wrapper_tag(&self) -> Option<Tag> {
        match *self {
            Value::Tagged { tag, .. } => Some(tag),
            _ => None
        }
    }

    /// Returns the universal tag of the value if it has one.
    pub fn universal_tag(&self) -> Option<Tag> {
        match *self {
            Value::Tagged { .. } => None,
            Value::Constructed { tag, .. } => tag,
            Value::Primitive { tag, .. } => tag,
        }
    }

    /// Returns the content if this is a primitive value.
    pub fn as_primitive(&self) -> Option<&Bytes> {
        match *self {
            Value::Primitive { ref content, .. } => Some(content),
            _ => None
        }
    }

    /// Returns the concatenated content of a primitive or segmented value.
    ///
    /// BER allows string types to be encoded as a constructed value whose
    /// children are the segments of the string. Returns `None` if the value
    /// contains anything but primitive segments.
    pub fn string_content(&self) -> Option<Bytes> {
        match *self {
            Value::Primitive { ref content, .. } => Some(content.clone()),
            Value::Constructed { ref children, .. } => {
                let mut res = BytesMut::new();
                for child in children {
                    res.extend_from_slice(&child.string_content()?);
                }
                Some(res.freeze())
            }
            Value::Tagged { .. } => None,
        }
    }

    /// Returns the number of encoded values in the tree.
    ///
    /// A tagged value and its base count once since they share their
    /// encoding.
    pub fn node_count(&self) -> usize {
        match *self {
            Value::Tagged { ref base, .. } => base.node_count(),
            Value::Constructed { ref children, .. } => {
                1 + children.iter().map(Value::node_count).sum::<usize>()
            }
            Value::Primitive { .. } => 1,
        }
    }

    /// Returns a short description of the shape of the value.
    pub fn shape(&self) -> &'static str {
        match *self {
            Value::Tagged { .. } => "tagged value",
            Value::Constructed { .. } => "constructed value",
            Value::Primitive { .. } => "primitive value",
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn prim(tag: Option<Tag>, content: &'static [u8]) -> Value {
        Value::Primitive { tag, content: Bytes::from_static(content) }
    }

    fn tagged(number: u32, base: Value) -> Value {
        Value::Tagged { tag: Tag::ctx(number), base: Box::new(base) }
    }

    #[test]
    fn implicit_primitive() {
        assert_eq!(
            Value::decode_slice(b"\x81\x02\x00\x64").unwrap(),
            tagged(1, prim(None, b"\x00\x64"))
        );
    }

    #[test]
    fn universal_sequence() {
        assert_eq!(
            Value::decode_slice(b"\x30\x06\x02\x01\x05\x04\x01A").unwrap(),
            Value::Constructed {
                tag: Some(Tag::SEQUENCE),
                children: vec![
                    prim(Some(Tag::INTEGER), b"\x05"),
                    prim(Some(Tag::OCTET_STRING), b"A"),
                ]
            }
        );
    }

    #[test]
    fn indefinite_length() {
        assert_eq!(
            Value::decode_slice(
                b"\xa0\x80\x80\x01\x01\xa1\x80\x81\x00\x00\x00\x00\x00"
            ).unwrap(),
            tagged(0, Value::Constructed {
                tag: None,
                children: vec![
                    tagged(0, prim(None, b"\x01")),
                    tagged(1, Value::Constructed {
                        tag: None,
                        children: vec![tagged(1, prim(None, b""))],
                    }),
                ]
            })
        );
    }

    #[test]
    fn node_count() {
        let value = Value::decode_slice(
            b"\xa0\x80\x80\x01\x01\xa1\x80\x81\x00\x00\x00\x00\x00"
        ).unwrap();
        assert_eq!(value.node_count(), 4);
        assert_eq!(prim(Some(Tag::NULL), b"").node_count(), 1);
        assert_eq!(
            Value::Constructed { tag: Some(Tag::SEQUENCE), children: vec![] }
                .node_count(),
            1
        );
    }

    #[test]
    fn multi_octet_tag() {
        assert_eq!(
            Value::decode_slice(b"\x9f\x81\x00\x01\x07").unwrap(),
            tagged(128, prim(None, b"\x07"))
        );
    }

    #[test]
    fn malformed() {
        // Truncated content.
        assert!(Value::decode_slice(b"\x04\x05abc").unwrap_err().is_content());
        // Child longer than parent.
        assert!(Value::decode_slice(b"\x30\x02\x04\x02ab").is_err());
        // Indefinite primitive.
        assert!(Value::decode_slice(b"\x04\x80ab\x00\x00").is_err());
        // Missing end of contents.
        assert!(Value::decode_slice(b"\x30\x80\x05\x00").is_err());
        // Stray end of contents.
        assert!(Value::decode_slice(b"\x00\x00").is_err());
        // Trailing data.
        assert!(Value::decode_slice(b"\x05\x00\x05").is_err());
    }

    #[test]
    fn nesting_limit() {
        let mut data = Vec::new();
        for _ in 0..Value::MAX_NESTING + 1 {
            data.extend_from_slice(b"\x30\x80");
        }
        for _ in 0..Value::MAX_NESTING + 1 {
            data.extend_from_slice(b"\x00\x00");
        }
        assert!(Value::decode_slice(&data).is_err());

        let mut data = Vec::new();
        for _ in 0..Value::MAX_NESTING {
            data.extend_from_slice(b"\x30\x80");
        }
        for _ in 0..Value::MAX_NESTING {
            data.extend_from_slice(b"\x00\x00");
        }
        assert!(Value::decode_slice(&data).is_ok());
    }

    #[test]
    fn segmented_string() {
        let value = Value::decode_slice(
            b"\x24\x80\x04\x02ab\x04\x01c\x00\x00"
        ).unwrap();
        assert_eq!(value.string_content().unwrap().as_ref(), b"abc");
        assert_eq!(value.universal_tag(), Some(Tag::OCTET_STRING));
        assert_eq!(value.wrapper_tag(), None);
    }
}
