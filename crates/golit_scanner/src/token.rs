//! Token information produced by the scanner.

use crate::token_kind::TokenKind;

bitflags::bitflags! {
    /// Facts about a scanned token that its kind alone does not capture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                 = 0;
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED         = 1 << 1;
        const HEX_SPECIFIER        = 1 << 2;
        const OCTAL_SPECIFIER      = 1 << 3;
        const BINARY_SPECIFIER     = 1 << 4;
        /// `0` followed by octal digits, without the `o` (e.g. `0644`).
        const LEGACY_OCTAL         = 1 << 5;
        const CONTAINS_SEPARATOR   = 1 << 6;
        const SCIENTIFIC           = 1 << 7;
        const CONTAINS_ESCAPE      = 1 << 8;
        /// Backquoted string.
        const RAW                  = 1 << 9;
        /// The scanner reported at least one error inside this token.
        const IS_INVALID           = 1 << 10;
        /// A `;` inserted by the newline rule rather than written in source.
        const AUTO_SEMICOLON       = 1 << 11;
    }
}

/// Information about a scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    /// Start byte offset in the source text.
    pub pos: u32,
    /// End byte offset (exclusive).
    pub end: u32,
    /// Source text of identifiers, literals, and comments; `"\n"` for an
    /// inserted semicolon.
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub fn is_invalid(&self) -> bool {
        self.flags.contains(TokenFlags::IS_INVALID)
    }

    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
