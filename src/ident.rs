//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use std::io;
use crate::decode::{DecodeError, Source};


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. That combination is represented by [`Ident`].
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This is plenty for
/// every schema we have come across.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in class “application” with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is of the universal class.
    pub const fn is_universal(self) -> bool {
        matches!(self.class, Class::Universal)
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. Only the tags the decoder
/// attaches meaning to are listed.
impl Tag {
    /// The tag marking the end-of-contents, UNIVERSAL 0.
    pub const END_OF_VALUE: Self = Self::new(Class::Universal, 0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::new(Class::Universal, 1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::new(Class::Universal, 2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::new(Class::Universal, 3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::new(Class::Universal, 4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::new(Class::Universal, 5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::new(Class::Universal, 6);

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::new(Class::Universal, 9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::new(Class::Universal, 10);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::new(Class::Universal, 12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::new(Class::Universal, 16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::new(Class::Universal, 17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::new(Class::Universal, 18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::new(Class::Universal, 19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::new(Class::Universal, 20);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::new(Class::Universal, 22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::new(Class::Universal, 23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::new(Class::Universal, 24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::new(Class::Universal, 25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::new(Class::Universal, 26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::new(Class::Universal, 27);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::REAL => write!(f, "REAL"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GRAPHIC_STRING => write!(f, "GraphicString"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// This is the tag plus the flag whether the content is constructed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    tag: Tag,
    constructed: bool,
}

impl Ident {
    /// The identifier of the end-of-contents marker.
    pub const END_OF_CONTENTS: Self = Self::new(Tag::END_OF_VALUE, false);

    /// Creates identifier octets from a tag.
    pub const fn new(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Returns the tag for the identifier octets.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Takes the identifier octets from the beginning of a source.
    ///
    /// Returns `Ok(None)` if the source is at its end before the first
    /// octet. If it ends in the middle of a multi-octet tag number, returns
    /// a content error.
    pub fn take_opt_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Option<Self>, DecodeError> {
        let first = match source.take_opt_u8()? {
            Some(first) => first,
            None => return Ok(None)
        };
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;

        // A tag number below 0x1f lives in the first octet.
        if (first & 0x1f) < 0x1f {
            return Ok(Some(
                Self::new(Tag::new(class, u32::from(first & 0x1f)), constructed)
            ))
        }

        // Otherwise, seven bits per octet follow, bit 8 set on all but the
        // last one.
        let mut number = 0u32;
        for _ in 0..5 {
            let octet = source.take_u8()?;
            if number > (u32::MAX >> 7) {
                return Err(source.content_err(
                    "tag numbers above 32 bits not supported"
                ))
            }
            number = (number << 7) | u32::from(octet & 0x7f);
            if octet & 0x80 == 0 {
                return Ok(Some(Self::new(Tag::new(class, number), constructed)))
            }
        }
        Err(source.content_err("tag numbers above 32 bits not supported"))
    }

    /// Takes the identifier octets from the beginning of a source.
    pub fn take_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Self, DecodeError> {
        match Self::take_opt_from(source)? {
            Some(res) => Ok(res),
            None => Err(source.content_err("unexpected end of data"))
        }
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take(data: &[u8]) -> Result<Option<Ident>, DecodeError> {
        Ident::take_opt_from(&mut Source::new(data))
    }

    #[test]
    fn single_octet() {
        assert_eq!(
            take(b"\x02").unwrap(),
            Some(Ident::new(Tag::INTEGER, false))
        );
        assert_eq!(
            take(b"\x30").unwrap(),
            Some(Ident::new(Tag::SEQUENCE, true))
        );
        assert_eq!(
            take(b"\xa3").unwrap(),
            Some(Ident::new(Tag::ctx(3), true))
        );
        assert_eq!(
            take(b"\x41").unwrap(),
            Some(Ident::new(Tag::application(1), false))
        );
        assert_eq!(take(b"").unwrap(), None);
    }

    #[test]
    fn multi_octet() {
        assert_eq!(
            take(b"\x9f\x1f").unwrap(),
            Some(Ident::new(Tag::ctx(31), false))
        );
        assert_eq!(
            take(b"\xbf\x81\x00").unwrap(),
            Some(Ident::new(Tag::ctx(128), true))
        );
        assert_eq!(
            take(b"\x7f\x8f\xff\xff\xff\x7f").unwrap(),
            Some(Ident::new(Tag::application(u32::MAX), true))
        );
        assert!(take(b"\x9f\x81").is_err());
        assert!(take(b"\x9f\x9f\xff\xff\xff\x7f").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::INTEGER.to_string(), "INTEGER");
        assert_eq!(Tag::ctx(7).to_string(), "[7]");
        assert_eq!(Tag::application(1).to_string(), "[APPLICATION 1]");
        assert_eq!(
            Tag::new(Class::Private, 2).to_string(), "[PRIVATE 2]"
        );
    }
}
