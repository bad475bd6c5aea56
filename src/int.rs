//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer of arbitrary size.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. Values
/// that fit are converted into native integers on request, everything else
/// is only ever displayed.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// Strictly, the content must not be empty and must use the minimum number
/// of octets. Data in the wild doesn’t always follow these rules, so we
/// accept redundant leading octets and treat empty content as zero.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its content octets.
    pub fn from_bytes(bytes: Bytes) -> Self {
        Integer(bytes)
    }

    /// Returns the content octets of the integer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|first| first & 0x80 != 0).unwrap_or(false)
    }

    /// Converts the integer into an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        let slice = self.significant();
        if slice.len() > 8 {
            return None
        }
        let mut res: i64 = if self.is_negative() { -1 } else { 0 };
        for &octet in slice {
            res = (res << 8) | i64::from(octet);
        }
        Some(res)
    }

    /// Returns the content without redundant leading octets.
    fn significant(&self) -> &[u8] {
        let mut slice = self.as_slice();
        while let [first, second, ..] = *slice {
            let redundant = (first == 0 && second & 0x80 == 0)
                || (first == 0xFF && second & 0x80 != 0);
            if !redundant {
                break
            }
            slice = &slice[1..];
        }
        slice
    }

    /// Returns the absolute value as big-endian octets.
    fn magnitude(&self) -> Vec<u8> {
        let mut res = self.as_slice().to_vec();
        if self.is_negative() {
            // Two’s complement: invert and add one.
            for octet in res.iter_mut() {
                *octet = !*octet;
            }
            for octet in res.iter_mut().rev() {
                let (sum, carry) = octet.overflowing_add(1);
                *octet = sum;
                if !carry {
                    break
                }
            }
        }
        res
    }
}


//--- From

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        let bytes = value.to_be_bytes();
        let mut res = Integer(Bytes::copy_from_slice(&bytes));
        let start = bytes.len() - res.significant().len();
        res.0 = res.0.slice(start..);
        res
    }
}


//--- Display

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.to_i64() {
            return fmt::Display::fmt(&value, f)
        }

        // Convert into base 10^9 limbs, least significant first.
        const BASE: u64 = 1_000_000_000;
        let mut limbs: Vec<u32> = Vec::new();
        for octet in self.magnitude() {
            let mut carry = u64::from(octet);
            for limb in limbs.iter_mut() {
                let value = u64::from(*limb) * 256 + carry;
                *limb = (value % BASE) as u32;
                carry = value / BASE;
            }
            while carry > 0 {
                limbs.push((carry % BASE) as u32);
                carry /= BASE;
            }
        }

        if self.is_negative() {
            f.write_str("-")?;
        }
        let mut limbs = limbs.iter().rev();
        match limbs.next() {
            Some(first) => write!(f, "{}", first)?,
            None => f.write_str("0")?,
        }
        for limb in limbs {
            write!(f, "{:09}", limb)?;
        }
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn int(slice: &'static [u8]) -> Integer {
        Integer::from_bytes(Bytes::from_static(slice))
    }

    #[test]
    fn to_i64() {
        assert_eq!(int(b"").to_i64(), Some(0));
        assert_eq!(int(b"\x00").to_i64(), Some(0));
        assert_eq!(int(b"\x64").to_i64(), Some(100));
        assert_eq!(int(b"\x00\x64").to_i64(), Some(100));
        assert_eq!(int(b"\x00\x80").to_i64(), Some(128));
        assert_eq!(int(b"\xFF").to_i64(), Some(-1));
        assert_eq!(int(b"\x80").to_i64(), Some(-128));
        assert_eq!(int(b"\xFF\x7F").to_i64(), Some(-129));
        assert_eq!(
            int(b"\x7F\xFF\xFF\xFF\xFF\xFF\xFF\xFF").to_i64(), Some(i64::MAX)
        );
        assert_eq!(
            int(b"\x80\x00\x00\x00\x00\x00\x00\x00").to_i64(), Some(i64::MIN)
        );
        assert_eq!(
            int(b"\x00\x80\x00\x00\x00\x00\x00\x00\x00").to_i64(), None
        );
    }

    #[test]
    fn display_large() {
        // 2^64
        assert_eq!(
            int(b"\x01\x00\x00\x00\x00\x00\x00\x00\x00").to_string(),
            "18446744073709551616"
        );
        // 2^63
        assert_eq!(
            int(b"\x00\x80\x00\x00\x00\x00\x00\x00\x00").to_string(),
            "9223372036854775808"
        );
        // -2^64
        assert_eq!(
            int(b"\xFF\x00\x00\x00\x00\x00\x00\x00\x00").to_string(),
            "-18446744073709551616"
        );
        // 10^20
        assert_eq!(
            int(b"\x05\x6B\xC7\x5E\x2D\x63\x10\x00\x00").to_string(),
            "100000000000000000000"
        );
    }

    #[test]
    fn from_i64() {
        assert_eq!(Integer::from(0).as_slice(), b"\x00");
        assert_eq!(Integer::from(128).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(-129).as_slice(), b"\xFF\x7F");
        assert_eq!(Integer::from(-5).to_string(), "-5");
    }
}
