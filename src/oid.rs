//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.

use std::fmt;
use bytes::Bytes;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep a single object identifer in its BER encoding.
/// They can only be created from content that has been checked to be a
/// correctly encoded identifier, so displaying them never fails.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Oid(Bytes);

impl Oid {
    /// Creates an object identifier from its content octets.
    ///
    /// Returns `None` if the content isn’t a correctly encoded object
    /// identifier or if any of its sub-identifiers doesn’t fit into a
    /// `u64`.
    pub fn from_content(bytes: Bytes) -> Option<Self> {
        if bytes.is_empty() {
            return None
        }
        let mut iter = SubIdentifiers { slice: bytes.as_ref() };
        for sub in &mut iter {
            sub?;
        }
        Some(Oid(bytes))
    }

    /// Returns an iterator over the components of the identifier.
    ///
    /// The first sub-identifier encodes the first two components and is
    /// split up accordingly.
    pub fn components(&self) -> impl Iterator<Item = u64> + '_ {
        let mut subs = SubIdentifiers {
            slice: self.0.as_ref()
        }.map(|sub| sub.unwrap_or_default());
        let first = subs.next().unwrap_or_default();
        let (first, second) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        [first, second].into_iter().chain(subs)
    }
}


//--- AsRef

impl AsRef<[u8]> for Oid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- Display

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut components = self.components();
        if let Some(first) = components.next() {
            write!(f, "{}", first)?;
        }
        for component in components {
            write!(f, ".{}", component)?;
        }
        Ok(())
    }
}


//------------ SubIdentifiers ------------------------------------------------

/// An iterator over the encoded sub-identifiers.
///
/// Each sub-identifier is encoded in base 128, big-endian, with bit 8 set
/// on all but the last octet. Yields `None` for a sub-identifier that is
/// truncated, not minimally encoded, or too large.
struct SubIdentifiers<'a> {
    slice: &'a [u8],
}

impl<'a> Iterator for SubIdentifiers<'a> {
    type Item = Option<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None
        }
        let end = match self.slice.iter().position(|octet| octet & 0x80 == 0) {
            Some(end) => end,
            None => {
                self.slice = &[];
                return Some(None)
            }
        };
        let (sub, tail) = self.slice.split_at(end + 1);
        self.slice = tail;
        if sub[0] == 0x80 {
            return Some(None)
        }
        let mut res = 0u64;
        for &octet in sub {
            if res.leading_zeros() < 7 {
                return Some(None)
            }
            res = (res << 7) | u64::from(octet & 0x7F);
        }
        Some(Some(res))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn oid(slice: &'static [u8]) -> Option<Oid> {
        Oid::from_content(Bytes::from_static(slice))
    }

    #[test]
    fn display() {
        assert_eq!(
            oid(b"\x2b\x06\x01\x05\x05\x07\x01").unwrap().to_string(),
            "1.3.6.1.5.5.7.1"
        );
        assert_eq!(
            oid(b"\x60\x86\x48\x01\x65\x03\x04\x02\x01").unwrap().to_string(),
            "2.16.840.1.101.3.4.2.1"
        );
        assert_eq!(oid(b"\x00").unwrap().to_string(), "0.0");
        assert_eq!(oid(b"\x88\x37\x03").unwrap().to_string(), "2.999.3");
    }

    #[test]
    fn malformed() {
        assert!(oid(b"").is_none());
        assert!(oid(b"\x2b\x86").is_none());
        assert!(oid(b"\x2b\x80\x01").is_none());
        assert!(
            oid(b"\x2b\x82\x80\x80\x80\x80\x80\x80\x80\x80\x00").is_none()
        );
    }
}
