//! Decoding the values of scanned literals.
//!
//! The decoders expect text the scanner accepted without errors. Anything
//! else comes back as [`LiteralError::Malformed`] rather than a panic.

use crate::number::NumberPrefix;
use crate::token_kind::TokenKind;
use golit_core::text::TextSpan;
use golit_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use std::fmt;
use std::str::Chars;
use thiserror::Error;

/// The value of a basic literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(u128),
    Float(f64),
    /// The imaginary part of an imaginary literal.
    Imaginary(f64),
    Rune(char),
    /// String literals decode to bytes since `\x` and octal escapes may
    /// produce invalid UTF-8.
    Str(Vec<u8>),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(value) => write!(f, "{}", value),
            LiteralValue::Float(value) => write!(f, "{:?}", value),
            LiteralValue::Imaginary(value) => write!(f, "{:?}i", value),
            LiteralValue::Rune(ch) => write!(f, "{:?} (U+{:04X})", ch, *ch as u32),
            LiteralValue::Str(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => write!(f, "{:?}", text),
                Err(_) => write!(f, "{:?} (invalid UTF-8)", String::from_utf8_lossy(bytes)),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum LiteralError {
    #[error("integer literal {text} overflows 128 bits")]
    Overflow { text: String },

    #[error("malformed {kind} literal `{text}`")]
    Malformed { kind: &'static str, text: String },

    #[error("{0} tokens do not carry a literal value")]
    NotALiteral(TokenKind),

    #[error("string literal is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl LiteralError {
    /// Diagnostic code for errors that correspond to one.
    pub fn code(&self) -> Option<u32> {
        match self {
            LiteralError::Overflow { .. } => Some(messages::INTEGER_LITERAL_0_OVERFLOWS.code),
            _ => None,
        }
    }
}

fn malformed(kind: &'static str, text: &str) -> LiteralError {
    LiteralError::Malformed {
        kind,
        text: text.to_string(),
    }
}

/// Decode a literal token of the given kind.
pub fn decode(kind: TokenKind, text: &str) -> Result<LiteralValue, LiteralError> {
    match kind {
        TokenKind::Int => decode_int(text),
        TokenKind::Float => decode_float(text),
        TokenKind::Imaginary => decode_imaginary(text),
        TokenKind::Char => decode_rune(text),
        TokenKind::String => decode_string(text),
        other => Err(LiteralError::NotALiteral(other)),
    }
}

/// Decode a literal and report value problems as diagnostics: integer
/// overflow (GL1040, error) and floats that round to infinity (GL1041,
/// warning). Returns the value when there is one.
pub fn decode_checked(
    kind: TokenKind,
    text: &str,
    span: TextSpan,
    diagnostics: &mut DiagnosticCollection,
) -> Option<LiteralValue> {
    match decode(kind, text) {
        Ok(value) => {
            let infinite = matches!(value, LiteralValue::Float(v) | LiteralValue::Imaginary(v) if v.is_infinite());
            if infinite {
                diagnostics.add(Diagnostic::with_span(span, &messages::FLOAT_LITERAL_0_OUT_OF_RANGE, &[text]));
            }
            Some(value)
        }
        Err(LiteralError::Overflow { .. }) => {
            diagnostics.add(Diagnostic::with_span(span, &messages::INTEGER_LITERAL_0_OVERFLOWS, &[text]));
            None
        }
        Err(err) => {
            tracing::debug!(%err, "literal not decoded");
            None
        }
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// Remove digit separators.
fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

/// Digits of an integer literal after its prefix.
fn int_digits(text: &str, prefix: NumberPrefix) -> &str {
    match prefix {
        NumberPrefix::Decimal => text,
        NumberPrefix::LegacyOctal => &text[1..],
        NumberPrefix::Hex | NumberPrefix::Octal | NumberPrefix::Binary => &text[2..],
    }
}

pub fn decode_int(text: &str) -> Result<LiteralValue, LiteralError> {
    let cleaned = strip_separators(text);
    let prefix = NumberPrefix::of(&cleaned);
    let digits = int_digits(&cleaned, prefix);
    if digits.is_empty() && prefix != NumberPrefix::LegacyOctal {
        return Err(malformed("integer", text));
    }

    let base = prefix.base();
    let mut value: u128 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(base).ok_or_else(|| malformed("integer", text))?;
        value = value
            .checked_mul(base as u128)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or_else(|| LiteralError::Overflow {
                text: text.to_string(),
            })?;
    }
    Ok(LiteralValue::Int(value))
}

pub fn decode_float(text: &str) -> Result<LiteralValue, LiteralError> {
    let cleaned = strip_separators(text);
    let value = match NumberPrefix::of(&cleaned) {
        NumberPrefix::Hex => hex_float(&cleaned[2..]).ok_or_else(|| malformed("floating-point", text))?,
        NumberPrefix::Octal | NumberPrefix::Binary => return Err(malformed("floating-point", text)),
        NumberPrefix::Decimal | NumberPrefix::LegacyOctal => cleaned
            .parse::<f64>()
            .map_err(|_| malformed("floating-point", text))?,
    };
    Ok(LiteralValue::Float(value))
}

/// Imaginary literals: an integer part made only of decimal digits is read
/// as decimal even with a leading `0` (`0789i` is 789i).
pub fn decode_imaginary(text: &str) -> Result<LiteralValue, LiteralError> {
    let body = text
        .strip_suffix('i')
        .ok_or_else(|| malformed("imaginary", text))?;
    let cleaned = strip_separators(body);
    let prefix = NumberPrefix::of(&cleaned);
    let is_hex_float = prefix == NumberPrefix::Hex && cleaned.contains(['p', 'P']);

    let value = match prefix {
        NumberPrefix::Hex if is_hex_float => match decode_float(body)? {
            LiteralValue::Float(v) => v,
            _ => return Err(malformed("imaginary", text)),
        },
        NumberPrefix::Hex | NumberPrefix::Octal | NumberPrefix::Binary => match decode_int(body)? {
            LiteralValue::Int(v) => v as f64,
            _ => return Err(malformed("imaginary", text)),
        },
        NumberPrefix::Decimal | NumberPrefix::LegacyOctal => cleaned
            .parse::<f64>()
            .map_err(|_| malformed("imaginary", text))?,
    };
    Ok(LiteralValue::Imaginary(value))
}

/// Binary exponents beyond this saturate; the result is already 0 or inf.
const MAX_EXPONENT: i64 = 100_000;

/// Parse a signed decimal exponent, saturating at [`MAX_EXPONENT`].
fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(10)? as i64;
        value = (value * 10 + digit).min(MAX_EXPONENT);
    }
    Some(if negative { -value } else { value })
}

/// Value of a hexadecimal float without its `0x` prefix, e.g. `1.8p-1`,
/// correctly rounded (half to even) to the nearest `f64`.
fn hex_float(text: &str) -> Option<f64> {
    let (mantissa, exponent) = text.split_once(['p', 'P'])?;
    let mut exp = parse_exponent(exponent)?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    // Collect up to 128 significant bits; anything beyond only sets `sticky`.
    let mut bits: u128 = 0;
    let mut sticky = false;
    for ch in int_part.chars() {
        let digit = ch.to_digit(16)? as u128;
        if bits >> 124 == 0 {
            bits = bits << 4 | digit;
        } else {
            exp += 4;
            sticky |= digit != 0;
        }
    }
    for ch in frac_part.chars() {
        let digit = ch.to_digit(16)? as u128;
        if bits >> 124 == 0 {
            bits = bits << 4 | digit;
            exp -= 4;
        } else {
            sticky |= digit != 0;
        }
    }
    Some(round_to_f64(bits, exp, sticky))
}

/// `bits * 2^exp`, where `sticky` marks nonzero bits below `bits`.
fn round_to_f64(bits: u128, exp: i64, sticky: bool) -> f64 {
    if bits == 0 {
        return 0.0;
    }
    let width = 128 - bits.leading_zeros() as i64;
    let top = exp + width - 1;
    if top > f64::MAX_EXP as i64 - 1 {
        return f64::INFINITY;
    }
    // 53 bits for normal results, fewer once the value is subnormal.
    let min_normal = f64::MIN_EXP as i64 - 1;
    let precision = if top >= min_normal {
        f64::MANTISSA_DIGITS as i64
    } else {
        f64::MANTISSA_DIGITS as i64 - (min_normal - top)
    };
    let shift = width - precision;
    if shift <= 0 {
        return scale_by_pow2(bits as f64, exp);
    }
    let rounded = round_shift(bits, shift, sticky);
    scale_by_pow2(rounded as f64, exp + shift)
}

/// `bits >> shift`, rounded half to even.
fn round_shift(bits: u128, shift: i64, sticky: bool) -> u128 {
    if shift > 128 {
        return 0;
    }
    let shift = shift as u32;
    let kept = bits.checked_shr(shift).unwrap_or(0);
    let half = (bits >> (shift - 1)) & 1 == 1;
    let below_half = bits & ((1u128 << (shift - 1)) - 1) != 0 || sticky;
    if half && (below_half || kept & 1 == 1) {
        kept + 1
    } else {
        kept
    }
}

/// `value * 2^exp` without overflowing the intermediate power. Exact when
/// the result is representable.
fn scale_by_pow2(mut value: f64, mut exp: i64) -> f64 {
    while exp > 0 {
        let step = exp.min(1000);
        value *= 2f64.powi(step as i32);
        exp -= step;
    }
    while exp < 0 {
        let step = (-exp).min(1000);
        value /= 2f64.powi(step as i32);
        exp += step;
    }
    value
}

// ============================================================================
// Runes and strings
// ============================================================================

/// One decoded element of a quoted literal.
enum Unit {
    Char(char),
    /// A `\x` or octal escape.
    Byte(u8),
}

fn simple_escape(ch: char) -> Option<char> {
    let decoded = match ch {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '\\' | '\'' | '"' => ch,
        _ => return None,
    };
    Some(decoded)
}

/// Decode the next character or escape from a quoted literal body.
fn next_unit(chars: &mut Chars<'_>, kind: &'static str, text: &str) -> Result<Option<Unit>, LiteralError> {
    let Some(ch) = chars.next() else {
        return Ok(None);
    };
    if ch != '\\' {
        return Ok(Some(Unit::Char(ch)));
    }

    let escape = chars.next().ok_or_else(|| malformed(kind, text))?;
    if let Some(decoded) = simple_escape(escape) {
        return Ok(Some(Unit::Char(decoded)));
    }
    let (mut value, remaining, base) = match escape {
        '0'..='7' => (escape as u32 - '0' as u32, 2, 8),
        'x' => (0, 2, 16),
        'u' => (0, 4, 16),
        'U' => (0, 8, 16),
        _ => return Err(malformed(kind, text)),
    };
    for _ in 0..remaining {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(base))
            .ok_or_else(|| malformed(kind, text))?;
        value = value * base + digit;
    }

    match escape {
        'u' | 'U' => char::from_u32(value)
            .map(|c| Some(Unit::Char(c)))
            .ok_or_else(|| malformed(kind, text)),
        _ => u8::try_from(value)
            .map(|b| Some(Unit::Byte(b)))
            .map_err(|_| malformed(kind, text)),
    }
}

/// Decode `'x'`. Byte escapes give the code point with that value.
pub fn decode_rune(text: &str) -> Result<LiteralValue, LiteralError> {
    let body = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .ok_or_else(|| malformed("rune", text))?;
    let mut chars = body.chars();
    let ch = match next_unit(&mut chars, "rune", text)? {
        Some(Unit::Char(ch)) => ch,
        Some(Unit::Byte(b)) => char::from(b),
        None => return Err(malformed("rune", text)),
    };
    if chars.next().is_some() {
        return Err(malformed("rune", text));
    }
    Ok(LiteralValue::Rune(ch))
}

/// Decode an interpreted (`"…"`) or raw (`` `…` ``) string to bytes.
pub fn decode_string(text: &str) -> Result<LiteralValue, LiteralError> {
    if let Some(raw) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        let bytes = raw.bytes().filter(|&b| b != b'\r').collect();
        return Ok(LiteralValue::Str(bytes));
    }

    let body = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| malformed("string", text))?;
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(unit) = next_unit(&mut chars, "string", text)? {
        match unit {
            Unit::Char(ch) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            Unit::Byte(b) => bytes.push(b),
        }
    }
    Ok(LiteralValue::Str(bytes))
}

/// Decode a string literal that must hold valid UTF-8.
pub fn decode_string_utf8(text: &str) -> Result<String, LiteralError> {
    match decode_string(text)? {
        LiteralValue::Str(bytes) => Ok(String::from_utf8(bytes)?),
        _ => Err(malformed("string", text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_int_radixes() {
        assert_eq!(decode_int("42").unwrap(), LiteralValue::Int(42));
        assert_eq!(decode_int("1_000_000").unwrap(), LiteralValue::Int(1_000_000));
        assert_eq!(decode_int("0x_BadFace").unwrap(), LiteralValue::Int(0xBADFACE));
        assert_eq!(decode_int("0o660").unwrap(), LiteralValue::Int(0o660));
        assert_eq!(decode_int("0600").unwrap(), LiteralValue::Int(0o600));
        assert_eq!(decode_int("0b1011").unwrap(), LiteralValue::Int(11));
        assert_eq!(decode_int("0").unwrap(), LiteralValue::Int(0));
    }

    #[test]
    fn test_decode_int_overflow() {
        let huge = "170141183460469231731687303715884105727000";
        let err = decode_int(huge).unwrap_err();
        assert!(matches!(err, LiteralError::Overflow { .. }));
        assert_eq!(err.code(), Some(1040));
        assert_eq!(
            decode_int("340282366920938463463374607431768211455").unwrap(),
            LiteralValue::Int(u128::MAX)
        );
    }

    #[test]
    fn test_decode_float() {
        assert_eq!(decode_float("0.").unwrap(), LiteralValue::Float(0.0));
        assert_eq!(decode_float("072.40").unwrap(), LiteralValue::Float(72.4));
        assert_eq!(decode_float(".25").unwrap(), LiteralValue::Float(0.25));
        assert_eq!(decode_float("1_5.").unwrap(), LiteralValue::Float(15.0));
        assert_eq!(decode_float("6.67428e-11").unwrap(), LiteralValue::Float(6.67428e-11));
        assert_eq!(decode_float("1E6").unwrap(), LiteralValue::Float(1e6));
    }

    #[test]
    fn test_decode_hex_float() {
        assert_eq!(decode_float("0x1p-2").unwrap(), LiteralValue::Float(0.25));
        assert_eq!(decode_float("0x2.p10").unwrap(), LiteralValue::Float(2048.0));
        assert_eq!(decode_float("0x1.Fp+0").unwrap(), LiteralValue::Float(1.9375));
        assert_eq!(decode_float("0X.8p-0").unwrap(), LiteralValue::Float(0.5));
        assert_eq!(decode_float("0X_1FFFP-16").unwrap(), LiteralValue::Float(0.1249847412109375));
    }

    #[test]
    fn test_hex_float_rounds_once_half_to_even() {
        assert_eq!(decode_float("0x1.000000000000081p0").unwrap(), LiteralValue::Float(1.0000000000000002));
        assert_eq!(decode_float("0x1.00000000000008p0").unwrap(), LiteralValue::Float(1.0));
        assert_eq!(decode_float("0x1.00000000000018p0").unwrap(), LiteralValue::Float(1.0000000000000004));
        // A nonzero digit past the 128 collected bits still breaks the tie.
        let long = format!("0x1.{}8{}1p0", "0".repeat(13), "0".repeat(25));
        assert_eq!(decode_float(&long).unwrap(), LiteralValue::Float(1.0000000000000002));
    }

    #[test]
    fn test_hex_float_range_edges() {
        assert_eq!(decode_float("0x1.fffffffffffffp1023").unwrap(), LiteralValue::Float(f64::MAX));
        assert_eq!(decode_float("0x1p1024").unwrap(), LiteralValue::Float(f64::INFINITY));
        assert_eq!(decode_float("0x1p-1022").unwrap(), LiteralValue::Float(f64::MIN_POSITIVE));
        assert_eq!(decode_float("0x1p-1074").unwrap(), LiteralValue::Float(f64::from_bits(1)));
        assert_eq!(decode_float("0x1p-1075").unwrap(), LiteralValue::Float(0.0));
        assert_eq!(decode_float("0x1.8p-1075").unwrap(), LiteralValue::Float(f64::from_bits(1)));
        assert_eq!(decode_float("0x3p-1076").unwrap(), LiteralValue::Float(f64::from_bits(1)));
    }

    #[test]
    fn test_hex_float_huge_exponent_saturates() {
        assert_eq!(
            decode_float("0x1p99999999999999999999").unwrap(),
            LiteralValue::Float(f64::INFINITY)
        );
        assert_eq!(decode_float("0x1p-99999999999999999999").unwrap(), LiteralValue::Float(0.0));
        assert_eq!(
            decode_imaginary("0x1p99999999999999999999i").unwrap(),
            LiteralValue::Imaginary(f64::INFINITY)
        );
    }

    #[test]
    fn test_decode_imaginary() {
        assert_eq!(decode_imaginary("0i").unwrap(), LiteralValue::Imaginary(0.0));
        assert_eq!(decode_imaginary("0123i").unwrap(), LiteralValue::Imaginary(123.0));
        assert_eq!(decode_imaginary("0o123i").unwrap(), LiteralValue::Imaginary(83.0));
        assert_eq!(decode_imaginary("0xabci").unwrap(), LiteralValue::Imaginary(2748.0));
        assert_eq!(decode_imaginary("2.71828i").unwrap(), LiteralValue::Imaginary(2.71828));
        assert_eq!(decode_imaginary("0x1p-2i").unwrap(), LiteralValue::Imaginary(0.25));
    }

    #[test]
    fn test_decode_rune() {
        assert_eq!(decode_rune("'a'").unwrap(), LiteralValue::Rune('a'));
        assert_eq!(decode_rune("'本'").unwrap(), LiteralValue::Rune('本'));
        assert_eq!(decode_rune(r"'\t'").unwrap(), LiteralValue::Rune('\t'));
        assert_eq!(decode_rune(r"'\000'").unwrap(), LiteralValue::Rune('\0'));
        assert_eq!(decode_rune(r"'\377'").unwrap(), LiteralValue::Rune('\u{FF}'));
        assert_eq!(decode_rune(r"'\xff'").unwrap(), LiteralValue::Rune('\u{FF}'));
        assert_eq!(decode_rune(r"'\u12e4'").unwrap(), LiteralValue::Rune('\u{12E4}'));
        assert_eq!(decode_rune(r"'\U00101234'").unwrap(), LiteralValue::Rune('\u{101234}'));
        assert_eq!(decode_rune(r"'\''").unwrap(), LiteralValue::Rune('\''));
    }

    #[test]
    fn test_decode_rune_rejects_malformed() {
        assert!(decode_rune("'aa'").is_err());
        assert!(decode_rune("''").is_err());
        assert!(decode_rune(r"'\uD800'").is_err());
        assert!(decode_rune(r"'\400'").is_err());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string_utf8(r#""\n""#).unwrap(), "\n");
        assert_eq!(decode_string_utf8(r#""日本語""#).unwrap(), "日本語");
        assert_eq!(decode_string_utf8(r#""\u65e5本\U00008a9e""#).unwrap(), "日本語");
        assert_eq!(
            decode_string(r#""\xff\u00FF""#).unwrap(),
            LiteralValue::Str(vec![0xFF, 0xC3, 0xBF])
        );
        assert!(matches!(
            decode_string_utf8(r#""\xff""#),
            Err(LiteralError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_decode_raw_string_strips_carriage_returns() {
        assert_eq!(
            decode_string("`a\r\nb\\n`").unwrap(),
            LiteralValue::Str(b"a\nb\\n".to_vec())
        );
    }

    #[test]
    fn test_decode_dispatch() {
        assert_eq!(decode(TokenKind::Int, "0b11").unwrap(), LiteralValue::Int(3));
        assert!(matches!(
            decode(TokenKind::Identifier, "x"),
            Err(LiteralError::NotALiteral(TokenKind::Identifier))
        ));
    }

    #[test]
    fn test_decode_checked_reports_value_problems() {
        let mut diagnostics = DiagnosticCollection::new();
        let span = TextSpan::new(0, 5);
        assert_eq!(
            decode_checked(TokenKind::Float, "1e999", span, &mut diagnostics),
            Some(LiteralValue::Float(f64::INFINITY))
        );
        assert_eq!(
            decode_checked(TokenKind::Int, "0x1_0000_0000_0000_0000_0000_0000_0000_0000", span, &mut diagnostics),
            None
        );
        assert_eq!(
            decode_checked(TokenKind::Float, "0x1p99999999999999999999", span, &mut diagnostics),
            Some(LiteralValue::Float(f64::INFINITY))
        );
        assert_eq!(diagnostics.codes(), vec![1041, 1040, 1041]);
        assert!(!diagnostics.diagnostics()[0].is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(LiteralValue::Int(7).to_string(), "7");
        assert_eq!(LiteralValue::Float(0.5).to_string(), "0.5");
        assert_eq!(LiteralValue::Imaginary(1.0).to_string(), "1.0i");
        assert_eq!(LiteralValue::Rune('a').to_string(), "'a' (U+0061)");
        assert_eq!(LiteralValue::Str(b"hi".to_vec()).to_string(), "\"hi\"");
    }
}
