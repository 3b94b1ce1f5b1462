//! UTF-8 / UTF-16 conversion for downstream implementations of the [`crate::platform`]
//! traits that talk to wide-string printer APIs. Nothing inside this crate calls them;
//! the rest of the crate works on `&str` only.

/// Encodes `text` as UTF-16 without a terminator.
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Encodes `text` as NUL-terminated UTF-16.
pub fn to_wide_nul(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes UTF-16 up to the first NUL; unpaired surrogates become U+FFFD.
pub fn from_wide(wide: &[u16]) -> String {
    let end = wide.iter().position(|&unit| unit == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_terminates_and_stops() {
        let wide = to_wide_nul("HP LaserJet");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(from_wide(&wide), "HP LaserJet");
    }

    #[test]
    fn fixed_width_buffers_are_truncated_at_nul() {
        let mut buffer = to_wide("A4");
        buffer.resize(64, 0);
        assert_eq!(from_wide(&buffer), "A4");
    }

    #[test]
    fn non_bmp_characters_survive() {
        assert_eq!(from_wide(&to_wide("印表機 🖨")), "印表機 🖨");
        assert!(to_wide("").is_empty());
        assert_eq!(from_wide(&[0xD800]), "\u{FFFD}");
    }
}
