//! Script-aware percent-encoding for clipboard text
//!
//! Clipboard text is embedded into the translator URL with ASCII letters,
//! digits and the Japanese/CJK blocks in [`SCRIPT_RANGES`] left readable.
//! Everything else is percent-escaped, except for an escapable run at the
//! very start of the text, which is dropped.

use std::fmt::Write;
use std::ops::RangeInclusive;

/// Code point ranges copied into the query unescaped.
///
/// U+3000 (ideographic space) is intentionally outside the first range.
pub const SCRIPT_RANGES: [RangeInclusive<char>; 5] = [
    // Japanese-style punctuation
    '\u{3001}'..='\u{303f}',
    // Hiragana
    '\u{3040}'..='\u{309f}',
    // Katakana
    '\u{30a0}'..='\u{30ff}',
    // Full-width roman characters and half-width katakana
    '\u{ff00}'..='\u{ffef}',
    // CJK unified ideographs, common and uncommon kanji
    '\u{4e00}'..='\u{9faf}',
];

/// Whether `c` is copied into the query as-is.
pub fn is_pass_through(c: char) -> bool {
    c.is_ascii_alphanumeric() || SCRIPT_RANGES.iter().any(|range| range.contains(&c))
}

/// Encode clipboard text into a URL query value.
///
/// Escaping branches on the code point value: anything up to U+00FF is
/// written as a single `%xx` of the code point, larger code points as one
/// `%xx` per UTF-8 byte. Hex digits are lowercase.
///
/// # Examples
/// ```
/// use papago_core::encoding::encode_query;
///
/// assert_eq!(encode_query("ab c"), "ab%20c");
/// assert_eq!(encode_query(" abc"), "abc");
/// assert_eq!(encode_query("中文"), "中文");
/// ```
pub fn encode_query(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    let mut seen_pass_through = false;

    for c in text.chars() {
        if is_pass_through(c) {
            encoded.push(c);
            seen_pass_through = true;
            continue;
        }

        // Leading escapable run is discarded
        if !seen_pass_through {
            continue;
        }

        push_escaped(&mut encoded, c);
    }

    encoded
}

fn push_escaped(out: &mut String, c: char) {
    let code = u32::from(c);

    if code > 0xff {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            let _ = write!(out, "%{:x}", byte);
        }
    } else if code < 0x10 {
        let _ = write!(out, "%0{:x}", code);
    } else {
        let _ = write!(out, "%{:x}", code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_alphanumeric_is_identity() {
        assert_eq!(encode_query("Hello2World"), "Hello2World");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode_query(""), "");
    }

    #[test]
    fn test_only_escapable_input_is_dropped() {
        assert_eq!(encode_query("  ,.!?\n"), "");
    }

    #[test]
    fn test_leading_space_is_dropped() {
        assert_eq!(encode_query(" abc"), "abc");
    }

    #[test]
    fn test_space_after_first_char_is_escaped() {
        assert_eq!(encode_query("ab c"), "ab%20c");
    }

    #[test]
    fn test_control_char_gets_zero_padding() {
        assert_eq!(encode_query("a\tb\nc"), "a%09b%0ac");
        assert_eq!(encode_query("a\u{0}"), "a%00");
    }

    #[test]
    fn test_trailing_punctuation() {
        assert_eq!(encode_query("Hi, there!"), "Hi%2c%20there%21");
    }

    #[test]
    fn test_cjk_ideograph_passes_through() {
        assert_eq!(encode_query("中"), "中");
        assert_eq!(encode_query(" 中 文"), "中%20文");
    }

    #[test]
    fn test_kana_and_fullwidth_pass_through() {
        assert_eq!(encode_query("ひらがなカタカナ"), "ひらがなカタカナ");
        assert_eq!(encode_query("ＡＢＣ"), "ＡＢＣ");
        assert_eq!(encode_query("a。"), "a。");
    }

    #[test]
    fn test_ideographic_space_is_escaped() {
        assert_eq!(encode_query("a\u{3000}b"), "a%e3%80%80b");
    }

    #[test]
    fn test_cyrillic_is_utf8_escaped() {
        assert_eq!(encode_query("aА"), "a%d0%90");
    }

    #[test]
    fn test_hangul_is_escaped_and_leading_hangul_dropped() {
        // U+C548 is outside every script range
        assert_eq!(encode_query("안e"), "e");
        assert_eq!(encode_query("e안"), "e%ec%95%88");
    }

    #[test]
    fn test_latin1_uses_code_point_value() {
        assert_eq!(encode_query("caf\u{e9}"), "caf%e9");
    }

    #[test]
    fn test_supplementary_plane_is_four_bytes() {
        assert_eq!(encode_query("a\u{1f600}"), "a%f0%9f%98%80");
    }

    #[test]
    fn test_range_boundaries() {
        assert!(!is_pass_through('\u{3000}'));
        assert!(is_pass_through('\u{3001}'));
        assert!(is_pass_through('\u{30ff}'));
        assert!(!is_pass_through('\u{3100}'));
        assert!(is_pass_through('\u{4e00}'));
        assert!(is_pass_through('\u{9faf}'));
        assert!(!is_pass_through('\u{9fb0}'));
        assert!(is_pass_through('\u{ff00}'));
        assert!(is_pass_through('\u{ffef}'));
        assert!(!is_pass_through('\u{fff0}'));
    }
}
