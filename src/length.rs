//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use std::io;
use crate::decode::{DecodeError, Source};


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// We only ever read BER, so leading zero octets in the long form are
/// accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A definite length.
    Definite(usize),

    /// An indefinite length.
    Indefinite,
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        self.definite() == Some(0)
    }

    /// Parses a length from a source.
    pub fn take_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Self, DecodeError> {
        let len = match FirstOctet::take_from(source)? {
            FirstOctet::Single(res) => return Ok(res),
            FirstOctet::Multi(len) => len,
        };

        let mut res = 0usize;
        for _ in 0..len {
            let octet = source.take_u8()?;
            if res.leading_zeros() < 8 {
                return Err(source.content_err("excessive length"))
            }
            res = (res << 8) | usize::from(octet);
        }
        Ok(Length::Definite(res))
    }
}


//------------ FirstOctet ---------------------------------------------------

/// The first octet of the encoded length.
enum FirstOctet {
    /// The first octet is a length in and of itself.
    Single(Length),

    /// The first octet indicates the number of octets to follow.
    Multi(usize),
}

impl FirstOctet {
    /// Takes the first octet and checks what it means.
    fn take_from<R: io::Read>(
        source: &mut Source<R>
    ) -> Result<Self, DecodeError> {
        match source.take_u8()? {
            // Bit 7 clear: single.
            n if (n & 0x80) == 0 => {
                Ok(Self::Single(Length::Definite(usize::from(n))))
            }

            // 0x80: indefinite.
            0x80 => Ok(Self::Single(Length::Indefinite)),

            // 0xFF: illegal.
            0xFF => Err(source.content_err("illegal length octets")),

            // anything else: clear left bit, number of octets.
            n => Ok(Self::Multi(usize::from(n & 0x7F)))
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ber_take_from() {
        fn take_from(src: &[u8]) -> Result<Option<usize>, DecodeError> {
            let mut src = Source::new(src);
            let res = Length::take_from(&mut src)?;
            if src.is_exhausted()? {
                Ok(res.definite())
            }
            else {
                Err(src.content_err("TRAILING DATA"))
            }
        }

        assert_eq!(take_from(b"\x00").unwrap(), Some(0x00));
        assert_eq!(take_from(b"\x12").unwrap(), Some(0x12));
        assert_eq!(take_from(b"\x7f").unwrap(), Some(0x7f));
        assert_eq!(take_from(b"\x80").unwrap(), None);
        assert_eq!(take_from(b"\x81\x00").unwrap(), Some(0));
        assert_eq!(take_from(b"\x81\xF0").unwrap(), Some(0xF0));
        assert_eq!(take_from(b"\x82\x00\x00").unwrap(), Some(0));
        assert_eq!(take_from(b"\x82\xF0\x0E").unwrap(), Some(0xF00E));
        assert_eq!(take_from(b"\x82\x00\x0E").unwrap(), Some(0x0E));
        assert!(take_from(b"\xFF").is_err());
        assert!(take_from(b"\x82\x01").is_err());
        assert!(take_from(b"").is_err());
    }

    #[test]
    fn excessive() {
        let mut src = Vec::from([0x89u8]);
        src.extend_from_slice(&[0x01; 9]);
        assert!(Length::take_from(&mut Source::new(src.as_slice())).is_err());
        assert!(Length::Definite(0).is_zero());
        assert!(!Length::Indefinite.is_zero());
    }
}
