//! golit_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every lexical error the scanner can report has a stable `GLxxxx` code in
//! [`messages`]. Fixture files refer to these codes, so a code is never reused
//! for a different problem.

pub mod render;

use golit_core::text::{LineMap, Position, TextSpan};
use std::fmt;

pub use render::{to_report, LexReport};

/// Prefix printed in front of every diagnostic code.
pub const CODE_PREFIX: &str = "GL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The numeric code (e.g., 1001). Printed as `GL1001`.
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The source text span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// Line and column of `span.start`, once resolved against a line map.
    pub position: Option<Position>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            position: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic with file and span info.
    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    /// Create a diagnostic that only carries a span (no file yet).
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The printable code, e.g. `GL1013`.
    pub fn code_string(&self) -> String {
        format!("{}{}", CODE_PREFIX, self.code)
    }

    /// Fill in `position` from the span using the given line map.
    pub fn resolve_position(&mut self, line_map: &LineMap) {
        if let Some(span) = self.span {
            self.position = Some(line_map.position(span.start));
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            match (self.position, self.span) {
                (Some(position), _) => write!(f, ":{}", position)?,
                (None, Some(span)) => write!(f, "({})", span.start)?,
                (None, None) => {}
            }
            write!(f, ": ")?;
        } else if let Some(position) = self.position {
            write!(f, "{}: ", position)?;
        }
        write!(
            f,
            "{} {}: {}",
            self.category,
            self.code_string(),
            self.message_text
        )
    }
}

/// Parse a printed code (`GL1013`, case-insensitive prefix) back into its number.
pub fn parse_code(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text
        .get(..CODE_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(CODE_PREFIX))
        .map(|_| &text[CODE_PREFIX.len()..])?;
    digits.parse().ok()
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated while scanning.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Codes of all diagnostics, in report order.
    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    pub fn contains_code(&self, code: u32) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Drop everything reported after the first `len` diagnostics.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    /// Attach a file name to every diagnostic that has none.
    pub fn set_file(&mut self, file: &str) {
        for diag in &mut self.diagnostics {
            if diag.file.is_none() {
                diag.file = Some(file.to_string());
            }
        }
    }

    pub fn resolve_positions(&mut self, line_map: &LineMap) {
        for diag in &mut self.diagnostics {
            diag.resolve_position(line_map);
        }
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Number literals (1001-1009)
    // ========================================================================
    pub const INVALID_DIGIT_SEPARATOR: DiagnosticMessage = diag!(1001, Error, "'_' must separate successive digits");
    pub const INVALID_DIGIT_0_IN_1_LITERAL: DiagnosticMessage = diag!(1002, Error, "invalid digit '{0}' in {1} literal");
    pub const _0_LITERAL_HAS_NO_DIGITS: DiagnosticMessage = diag!(1003, Error, "{0} literal has no digits");
    pub const EXPONENT_HAS_NO_DIGITS: DiagnosticMessage = diag!(1004, Error, "exponent has no digits");
    pub const HEXADECIMAL_MANTISSA_REQUIRES_P_EXPONENT: DiagnosticMessage = diag!(1005, Error, "hexadecimal mantissa requires a 'p' exponent");
    pub const _0_EXPONENT_REQUIRES_HEXADECIMAL_MANTISSA: DiagnosticMessage = diag!(1006, Error, "'{0}' exponent requires hexadecimal mantissa");
    pub const INVALID_RADIX_POINT_IN_0_LITERAL: DiagnosticMessage = diag!(1007, Error, "invalid radix point in {0} literal");
    pub const _0_EXPONENT_REQUIRES_DECIMAL_MANTISSA: DiagnosticMessage = diag!(1008, Error, "'{0}' exponent requires decimal mantissa");

    // ========================================================================
    // Escape sequences (1010-1019)
    // ========================================================================
    pub const UNKNOWN_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1010, Error, "unknown escape sequence");
    pub const ESCAPE_SEQUENCE_NOT_TERMINATED: DiagnosticMessage = diag!(1011, Error, "escape sequence not terminated");
    pub const ILLEGAL_CHARACTER_0_IN_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1012, Error, "illegal character {0} in escape sequence");
    pub const ESCAPE_SEQUENCE_IS_INVALID_UNICODE_CODE_POINT: DiagnosticMessage = diag!(1013, Error, "escape sequence is invalid Unicode code point");
    pub const ESCAPE_VALUE_0_EXCEEDS_BYTE_RANGE: DiagnosticMessage = diag!(1014, Error, "escape value {0} exceeds byte range");

    // ========================================================================
    // Rune, string, and comment termination (1020-1029)
    // ========================================================================
    pub const RUNE_LITERAL_NOT_TERMINATED: DiagnosticMessage = diag!(1020, Error, "rune literal not terminated");
    pub const EMPTY_RUNE_LITERAL: DiagnosticMessage = diag!(1021, Error, "empty rune literal or unescaped ' in rune literal");
    pub const ILLEGAL_RUNE_LITERAL: DiagnosticMessage = diag!(1022, Error, "illegal rune literal");
    pub const STRING_LITERAL_NOT_TERMINATED: DiagnosticMessage = diag!(1023, Error, "string literal not terminated");
    pub const RAW_STRING_LITERAL_NOT_TERMINATED: DiagnosticMessage = diag!(1024, Error, "raw string literal not terminated");
    pub const COMMENT_NOT_TERMINATED: DiagnosticMessage = diag!(1025, Error, "comment not terminated");

    // ========================================================================
    // Source characters (1030-1039)
    // ========================================================================
    pub const INVALID_CHARACTER_0: DiagnosticMessage = diag!(1030, Error, "invalid character {0}");
    pub const ILLEGAL_CHARACTER_NUL: DiagnosticMessage = diag!(1031, Error, "illegal character NUL");
    pub const ILLEGAL_BYTE_ORDER_MARK: DiagnosticMessage = diag!(1032, Error, "illegal byte order mark");

    // ========================================================================
    // Value decoding (1040-1049)
    // ========================================================================
    pub const INTEGER_LITERAL_0_OVERFLOWS: DiagnosticMessage = diag!(1040, Error, "integer literal {0} overflows 128 bits");
    pub const FLOAT_LITERAL_0_OUT_OF_RANGE: DiagnosticMessage = diag!(1041, Warning, "floating-point literal {0} is out of range and rounds to infinity");

    /// Every message, ordered by code.
    pub const ALL: &[&DiagnosticMessage] = &[
        &INVALID_DIGIT_SEPARATOR,
        &INVALID_DIGIT_0_IN_1_LITERAL,
        &_0_LITERAL_HAS_NO_DIGITS,
        &EXPONENT_HAS_NO_DIGITS,
        &HEXADECIMAL_MANTISSA_REQUIRES_P_EXPONENT,
        &_0_EXPONENT_REQUIRES_HEXADECIMAL_MANTISSA,
        &INVALID_RADIX_POINT_IN_0_LITERAL,
        &_0_EXPONENT_REQUIRES_DECIMAL_MANTISSA,
        &UNKNOWN_ESCAPE_SEQUENCE,
        &ESCAPE_SEQUENCE_NOT_TERMINATED,
        &ILLEGAL_CHARACTER_0_IN_ESCAPE_SEQUENCE,
        &ESCAPE_SEQUENCE_IS_INVALID_UNICODE_CODE_POINT,
        &ESCAPE_VALUE_0_EXCEEDS_BYTE_RANGE,
        &RUNE_LITERAL_NOT_TERMINATED,
        &EMPTY_RUNE_LITERAL,
        &ILLEGAL_RUNE_LITERAL,
        &STRING_LITERAL_NOT_TERMINATED,
        &RAW_STRING_LITERAL_NOT_TERMINATED,
        &COMMENT_NOT_TERMINATED,
        &INVALID_CHARACTER_0,
        &ILLEGAL_CHARACTER_NUL,
        &ILLEGAL_BYTE_ORDER_MARK,
        &INTEGER_LITERAL_0_OVERFLOWS,
        &FLOAT_LITERAL_0_OUT_OF_RANGE,
    ];

    /// Look up a message by its numeric code.
    pub fn by_code(code: u32) -> Option<&'static DiagnosticMessage> {
        ALL.iter().copied().find(|m| m.code == code)
    }
}
