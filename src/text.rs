//! Careful conversion of octets into text.
//!
//! Strings in BER records are frequently declared as one of the character
//! string types but carry arbitrary octets. Rather than failing, we fall
//! back to a hex rendering whenever the octets aren’t clean UTF-8 text.

/// The prefix of a hex fallback rendering.
pub const HEX_PREFIX: &str = "hex[";

/// Renders octets as text.
///
/// If the octets are valid UTF-8 and don’t contain any control characters,
/// returns them as a string. Otherwise returns `hex[<n>]: <HEX>` where `n`
/// is the number of octets and `HEX` their upper case hex encoding.
///
/// This never fails.
pub fn render(bytes: &[u8]) -> String {
    match clean_str(bytes) {
        Some(s) => s.into(),
        None => {
            format!(
                "{}{}]: {}", HEX_PREFIX, bytes.len(), hex::encode_upper(bytes)
            )
        }
    }
}

/// Renders octets as text followed by their hex encoding.
///
/// This is [`render`] for clean text with `, HEX: <hex>` appended. Octets
/// that fall back to hex are not repeated.
pub fn render_with_hex(bytes: &[u8]) -> String {
    match clean_str(bytes) {
        Some(s) => format!("{}, HEX: {}", s, hex::encode(bytes)),
        None => render(bytes),
    }
}

/// Returns whether [`render`] would produce the octets as text.
pub fn is_clean(bytes: &[u8]) -> bool {
    clean_str(bytes).is_some()
}

fn clean_str(bytes: &[u8]) -> Option<&str> {
    let s = std::str::from_utf8(bytes).ok()?;
    if s.chars().any(char::is_control) {
        None
    }
    else {
        Some(s)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clean_text() {
        assert_eq!(render(b"Hello"), "Hello");
        assert_eq!(render("Grüße".as_bytes()), "Grüße");
        assert_eq!(render(b""), "");
        assert!(is_clean(b"Hello"));
    }

    #[test]
    fn fallback() {
        assert_eq!(render(b"He\x00lo"), "hex[5]: 4865006C6F");
        assert_eq!(render(b"\xff\xfe"), "hex[2]: FFFE");
        assert_eq!(render(b"a\nb"), "hex[3]: 610A62");
        assert_eq!(render(b"\x7f"), "hex[1]: 7F");
        assert!(!is_clean(b"\x00\x64"));
    }

    #[test]
    fn with_hex() {
        assert_eq!(render_with_hex(b"AB"), "AB, HEX: 4142");
        assert_eq!(render_with_hex(b"\x01"), "hex[1]: 01");
    }
}
