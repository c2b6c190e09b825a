//! Number literal helpers: radix prefixes and digit separator placement.

/// The radix prefix of a number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPrefix {
    /// No prefix (`42`, `.5`).
    Decimal,
    /// A bare leading `0` (`0644`, also plain `0`).
    LegacyOctal,
    Hex,
    Octal,
    Binary,
}

impl NumberPrefix {
    pub fn base(self) -> u32 {
        match self {
            NumberPrefix::Decimal => 10,
            NumberPrefix::LegacyOctal | NumberPrefix::Octal => 8,
            NumberPrefix::Hex => 16,
            NumberPrefix::Binary => 2,
        }
    }

    /// Word used in diagnostics (`"{0} literal has no digits"`).
    pub fn name(self) -> &'static str {
        match self {
            NumberPrefix::Decimal => "decimal",
            NumberPrefix::LegacyOctal | NumberPrefix::Octal => "octal",
            NumberPrefix::Hex => "hexadecimal",
            NumberPrefix::Binary => "binary",
        }
    }

    /// Whether an `e` exponent may follow a mantissa with this prefix.
    pub fn allows_decimal_exponent(self) -> bool {
        matches!(self, NumberPrefix::Decimal | NumberPrefix::LegacyOctal)
    }

    /// Detect the prefix of a literal's source text.
    pub fn of(text: &str) -> NumberPrefix {
        let bytes = text.as_bytes();
        if bytes.first() != Some(&b'0') {
            return NumberPrefix::Decimal;
        }
        match bytes.get(1).map(u8::to_ascii_lowercase) {
            Some(b'x') => NumberPrefix::Hex,
            Some(b'o') => NumberPrefix::Octal,
            Some(b'b') => NumberPrefix::Binary,
            _ => NumberPrefix::LegacyOctal,
        }
    }
}

/// Class of the previous character while checking separators.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Digit,
    Separator,
    Other,
}

/// Return the byte index of the first `_` that does not sit between two
/// digits, or `None` if every separator is well placed.
///
/// A radix prefix counts as a digit, so `0x_1` is fine but `0_x1` is not.
/// The exponent marker and sign, the radix point, and the `i` suffix all
/// count as non-digits.
pub fn invalid_separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut hex = false;
    let mut prev = Prev::Other;
    let mut i = 0;

    if bytes.len() >= 2 && bytes[0] == b'0' {
        let marker = bytes[1].to_ascii_lowercase();
        if matches!(marker, b'x' | b'o' | b'b') {
            hex = marker == b'x';
            prev = Prev::Digit;
            i = 2;
        }
    }

    while i < bytes.len() {
        let b = bytes[i];
        let before = prev;
        if b == b'_' {
            if before != Prev::Digit {
                return Some(i);
            }
            prev = Prev::Separator;
        } else if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            prev = Prev::Digit;
        } else {
            if before == Prev::Separator {
                return Some(i - 1);
            }
            prev = Prev::Other;
        }
        i += 1;
    }

    if prev == Prev::Separator {
        return Some(bytes.len() - 1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_placed_separators() {
        for text in ["1_000", "0x_1F", "0b_1010", "0o_7_7", "0_600", "1_0.2_5e1_0", "0x_1.8p-1_0", "1_0i"] {
            assert_eq!(invalid_separator(text), None, "{text}");
        }
    }

    #[test]
    fn test_misplaced_separators() {
        assert_eq!(invalid_separator("42_"), Some(2));
        assert_eq!(invalid_separator("4__2"), Some(2));
        assert_eq!(invalid_separator("0_xBadFace"), Some(1));
        assert_eq!(invalid_separator("1_.5"), Some(1));
        assert_eq!(invalid_separator("1._5"), Some(2));
        assert_eq!(invalid_separator("1.5_e1"), Some(3));
        assert_eq!(invalid_separator("1.5e_1"), Some(4));
        assert_eq!(invalid_separator("1.5e1_"), Some(5));
        assert_eq!(invalid_separator("0x__1"), Some(3));
    }

    #[test]
    fn test_hex_digits_only_count_after_hex_prefix() {
        // `e` is a digit in hex but the exponent marker elsewhere.
        assert_eq!(invalid_separator("0x1_e"), None);
        assert_eq!(invalid_separator("1_e2"), Some(1));
    }

    #[test]
    fn test_prefix_detection() {
        assert_eq!(NumberPrefix::of("0X1f"), NumberPrefix::Hex);
        assert_eq!(NumberPrefix::of("0o17"), NumberPrefix::Octal);
        assert_eq!(NumberPrefix::of("0B1"), NumberPrefix::Binary);
        assert_eq!(NumberPrefix::of("0644"), NumberPrefix::LegacyOctal);
        assert_eq!(NumberPrefix::of("0"), NumberPrefix::LegacyOctal);
        assert_eq!(NumberPrefix::of(".5"), NumberPrefix::Decimal);
        assert_eq!(NumberPrefix::Hex.name(), "hexadecimal");
        assert_eq!(NumberPrefix::LegacyOctal.base(), 8);
    }
}
