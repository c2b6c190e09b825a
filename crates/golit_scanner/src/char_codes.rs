//! Character classification for the Go lexical grammar.

use unicode_xid::UnicodeXID;

pub const BYTE_ORDER_MARK: char = '\u{FEFF}';
pub const MAX_RUNE: u32 = 0x10FFFF;
pub const SURROGATE_MIN: u32 = 0xD800;
pub const SURROGATE_MAX: u32 = 0xDFFF;

/// `letter = unicode_letter | "_"`.
#[inline]
pub fn is_letter(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || (ch as u32 > 0x7F && is_unicode_letter(ch))
}

/// Letters (category L) that NFKC closure keeps out of XID_Start.
const NON_XID_LETTERS: &[char] = &[
    '\u{037A}', '\u{0E33}', '\u{0EB3}', '\u{FC5E}', '\u{FC5F}', '\u{FC60}', '\u{FC61}', '\u{FC62}',
    '\u{FC63}', '\u{FDFA}', '\u{FDFB}', '\u{FE70}', '\u{FE72}', '\u{FE74}', '\u{FE76}', '\u{FE78}',
    '\u{FE7A}', '\u{FE7C}', '\u{FE7E}', '\u{FF9E}', '\u{FF9F}',
];

/// Unicode category L. Alphabetic characters that start identifiers are
/// letters once letter numbers (Nl) and the two Mongolian marks that are
/// XID_Start by Other_ID_Start are removed.
fn is_unicode_letter(ch: char) -> bool {
    if !ch.is_alphabetic() || ch.is_numeric() {
        return false;
    }
    (ch.is_xid_start() && !matches!(ch, '\u{1885}' | '\u{1886}')) || NON_XID_LETTERS.contains(&ch)
}

/// `unicode_digit`: category Nd only. Superscripts, fractions (No) and
/// letter numbers (Nl) are not digits.
#[inline]
pub fn is_identifier_digit(ch: char) -> bool {
    ch.is_ascii_digit() || (ch as u32 > 0x7F && is_unicode_digit(ch))
}

fn is_unicode_digit(ch: char) -> bool {
    // Nd is the numeric part of XID_Continue, minus Nl (alphabetic) and the
    // Other_ID_Continue digits of Ethiopic and New Tai Lue (No).
    ch.is_numeric()
        && ch.is_xid_continue()
        && !ch.is_alphabetic()
        && !matches!(ch, '\u{1369}'..='\u{1371}' | '\u{19DA}')
}

#[inline]
pub fn is_decimal(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_hex(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Value of a hex digit, or 16 for anything else.
#[inline]
pub fn digit_val(ch: char) -> u32 {
    ch.to_digit(16).unwrap_or(16)
}

#[inline]
pub fn is_surrogate(value: u32) -> bool {
    (SURROGATE_MIN..=SURROGATE_MAX).contains(&value)
}

/// Whether `value` may appear in a `\u`/`\U` escape.
#[inline]
pub fn is_valid_code_point(value: u32) -> bool {
    value <= MAX_RUNE && !is_surrogate(value)
}

/// Describe a character as `U+0027 '''`, or just `U+000A` when unprintable.
pub fn describe_char(ch: char) -> String {
    if ch.is_control() || ch == BYTE_ORDER_MARK {
        format!("U+{:04X}", ch as u32)
    } else {
        format!("U+{:04X} '{}'", ch as u32, ch)
    }
}
