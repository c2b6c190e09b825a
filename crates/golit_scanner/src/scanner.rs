//! The Go scanner/lexer.
//!
//! Converts Go source text into tokens. Lexical errors never stop the scanner:
//! each one is recorded as a positioned diagnostic and scanning resumes right
//! after the offending character, so a single literal may report several
//! problems.

use crate::char_codes::*;
use crate::number::{invalid_separator, NumberPrefix};
use crate::token::{TokenFlags, TokenInfo};
use crate::token_kind::TokenKind;
use golit_core::text::TextSpan;
use golit_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use memchr::memmem;

/// Scanner options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanMode {
    /// Return comments as `Comment` tokens instead of skipping them.
    pub keep_comments: bool,
    /// Apply Go's automatic semicolon insertion at line ends.
    pub insert_semicolons: bool,
}

impl ScanMode {
    /// Settings for scanning whole Go source files.
    pub const SOURCE: ScanMode = ScanMode {
        keep_comments: false,
        insert_semicolons: true,
    };

    pub fn with_comments(mut self) -> Self {
        self.keep_comments = true;
        self
    }

    pub fn with_semicolons(mut self) -> Self {
        self.insert_semicolons = true;
        self
    }
}

/// Saved scanner state for lookahead.
pub struct ScannerState {
    pub pos: usize,
    pub token_start: usize,
    pub token: TokenKind,
    pub token_value: String,
    pub token_flags: TokenFlags,
    pub insert_semi: bool,
    pub diagnostic_count: usize,
}

/// The scanner converts Go source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: String,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading whitespace).
    token_start: usize,
    token: TokenKind,
    /// The source text of the current token.
    token_value: String,
    token_flags: TokenFlags,
    mode: ScanMode,
    /// Whether a newline (or EOF) right now would produce a semicolon.
    insert_semi: bool,
    file_name: Option<String>,
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner with the default mode (no comments, no semicolons).
    pub fn new(text: &str) -> Self {
        Self::with_mode(text, ScanMode::default())
    }

    pub fn with_mode(text: &str, mode: ScanMode) -> Self {
        // A byte order mark is only allowed as the very first character.
        let pos = if text.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };
        Self {
            text: text.to_string(),
            pos,
            token_start: pos,
            token: TokenKind::Illegal,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            mode,
            insert_semi: false,
            file_name: None,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Attach a file name to every diagnostic reported from now on.
    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = Some(name.into());
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Look ahead: save state, call f, restore state and return result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> TokenKind {
        self.token
    }

    /// Get the current token's source text.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Get the start byte offset of the current token.
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the end byte offset of the current token.
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Get a TokenInfo for the current token.
    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            insert_semi: self.insert_semi,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore the full scanner state, dropping diagnostics reported since the save.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.insert_semi = state.insert_semi;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Consume the current character, reporting NUL and misplaced byte order marks.
    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        match ch {
            '\0' => self.error_at(self.pos, 1, &messages::ILLEGAL_CHARACTER_NUL, &[]),
            BYTE_ORDER_MARK => self.error_at(
                self.pos,
                BYTE_ORDER_MARK.len_utf8(),
                &messages::ILLEGAL_BYTE_ORDER_MARK,
                &[],
            ),
            _ => {}
        }
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error_at(&mut self, pos: usize, len: usize, message: &DiagnosticMessage, args: &[&str]) {
        tracing::debug!(code = message.code, offset = pos, "lexical error");
        let span = TextSpan::new(pos as u32, len as u32);
        let diagnostic = match self.file_name {
            Some(ref file) => Diagnostic::with_location(file.clone(), span, message, args),
            None => Diagnostic::with_span(span, message, args),
        };
        self.diagnostics.add(diagnostic);
    }

    /// Report an error spanning one character at `pos` (or nothing at EOF).
    fn error_at_char(&mut self, pos: usize, message: &DiagnosticMessage, args: &[&str]) {
        let len = self.text[pos..].chars().next().map_or(0, char::len_utf8);
        self.error_at(pos, len, message, args);
    }

    /// Skip blanks. Returns true when a newline must become a semicolon.
    fn skip_whitespace(&mut self) -> bool {
        while let Some(b) = self.byte_at(0) {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    if self.insert_semi {
                        return true;
                    }
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        false
    }

    /// Produce the semicolon the newline rule inserts at the current position.
    fn auto_semicolon(&mut self, consume_newline: bool) -> TokenKind {
        self.insert_semi = false;
        self.token_start = self.pos;
        if consume_newline {
            self.pos += 1;
        }
        self.token_value = "\n".to_string();
        self.token_flags |= TokenFlags::AUTO_SEMICOLON;
        self.token = TokenKind::Semicolon;
        self.token
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> TokenKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        loop {
            if self.skip_whitespace() {
                return self.auto_semicolon(true);
            }
            self.token_start = self.pos;

            if self.is_eof() {
                if self.insert_semi {
                    return self.auto_semicolon(false);
                }
                self.token = TokenKind::EndOfFile;
                return self.token;
            }

            let is_comment_start = self.byte_at(0) == Some(b'/')
                && matches!(self.byte_at(1), Some(b'/') | Some(b'*'));
            if is_comment_start {
                if self.insert_semi && self.comment_ends_line() {
                    // The comment is not consumed; it is scanned on the next call.
                    return self.auto_semicolon(false);
                }
                let diagnostics_before = self.diagnostics.len();
                let had_newline = self.scan_comment();
                if had_newline {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                }
                if self.mode.keep_comments {
                    if self.diagnostics.len() > diagnostics_before {
                        self.token_flags |= TokenFlags::IS_INVALID;
                    }
                    self.token_value = self.text[self.token_start..self.pos].to_string();
                    self.token = TokenKind::Comment;
                    return self.token;
                }
                continue;
            }
            break;
        }

        let diagnostics_before = self.diagnostics.len();
        self.token = self.scan_token();
        if self.diagnostics.len() > diagnostics_before {
            self.token_flags |= TokenFlags::IS_INVALID;
        }
        if self.token != TokenKind::EndOfFile {
            self.token_value = self.text[self.token_start..self.pos].to_string();
        }
        if self.mode.insert_semicolons {
            self.insert_semi = self.token.ends_statement();
        }
        self.token
    }

    fn scan_token(&mut self) -> TokenKind {
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return TokenKind::EndOfFile,
        };

        if is_letter(ch) {
            return self.scan_identifier();
        }
        if is_decimal(ch) || (ch == '.' && self.byte_at(1).is_some_and(|b| b.is_ascii_digit())) {
            return self.scan_number();
        }

        match ch {
            '"' => self.scan_string(),
            '`' => self.scan_raw_string(),
            '\'' => self.scan_rune(),
            ':' => self.scan_either(b'=', TokenKind::ColonEquals, TokenKind::Colon),
            '.' => {
                if self.byte_at(1) == Some(b'.') && self.byte_at(2) == Some(b'.') {
                    self.pos += 3;
                    TokenKind::DotDotDot
                } else {
                    self.pos += 1;
                    TokenKind::Dot
                }
            }
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '(' => self.single(TokenKind::OpenParen),
            ')' => self.single(TokenKind::CloseParen),
            '[' => self.single(TokenKind::OpenBracket),
            ']' => self.single(TokenKind::CloseBracket),
            '{' => self.single(TokenKind::OpenBrace),
            '}' => self.single(TokenKind::CloseBrace),
            '~' => self.single(TokenKind::Tilde),
            '+' => self.scan_doubled(b'+', TokenKind::PlusPlus, TokenKind::PlusEquals, TokenKind::Plus),
            '-' => self.scan_doubled(b'-', TokenKind::MinusMinus, TokenKind::MinusEquals, TokenKind::Minus),
            '*' => self.scan_either(b'=', TokenKind::AsteriskEquals, TokenKind::Asterisk),
            '/' => self.scan_either(b'=', TokenKind::SlashEquals, TokenKind::Slash),
            '%' => self.scan_either(b'=', TokenKind::PercentEquals, TokenKind::Percent),
            '^' => self.scan_either(b'=', TokenKind::CaretEquals, TokenKind::Caret),
            '=' => self.scan_either(b'=', TokenKind::EqualsEquals, TokenKind::Equals),
            '!' => self.scan_either(b'=', TokenKind::ExclamationEquals, TokenKind::Exclamation),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_doubled(b'|', TokenKind::BarBar, TokenKind::BarEquals, TokenKind::Bar),
            '\0' | BYTE_ORDER_MARK => {
                // advance() reports these.
                self.advance();
                TokenKind::Illegal
            }
            _ => {
                let described = describe_char(ch);
                self.error_at_char(self.pos, &messages::INVALID_CHARACTER_0, &[described.as_str()]);
                self.pos += ch.len_utf8();
                TokenKind::Illegal
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    /// `x` or `x<next>`.
    fn scan_either(&mut self, next: u8, long: TokenKind, short: TokenKind) -> TokenKind {
        if self.byte_at(1) == Some(next) {
            self.pos += 2;
            long
        } else {
            self.pos += 1;
            short
        }
    }

    /// `x`, `x=`, or the doubled form `xx`.
    fn scan_doubled(
        &mut self,
        same: u8,
        doubled: TokenKind,
        assign: TokenKind,
        plain: TokenKind,
    ) -> TokenKind {
        match self.byte_at(1) {
            Some(b) if b == same => {
                self.pos += 2;
                doubled
            }
            Some(b'=') => {
                self.pos += 2;
                assign
            }
            _ => {
                self.pos += 1;
                plain
            }
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'-'), _) => {
                self.pos += 2;
                TokenKind::Arrow
            }
            (Some(b'<'), Some(b'=')) => {
                self.pos += 3;
                TokenKind::LessLessEquals
            }
            (Some(b'<'), _) => {
                self.pos += 2;
                TokenKind::LessLess
            }
            (Some(b'='), _) => {
                self.pos += 2;
                TokenKind::LessEquals
            }
            _ => {
                self.pos += 1;
                TokenKind::Less
            }
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'>'), Some(b'=')) => {
                self.pos += 3;
                TokenKind::GreaterGreaterEquals
            }
            (Some(b'>'), _) => {
                self.pos += 2;
                TokenKind::GreaterGreater
            }
            (Some(b'='), _) => {
                self.pos += 2;
                TokenKind::GreaterEquals
            }
            _ => {
                self.pos += 1;
                TokenKind::Greater
            }
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'^'), Some(b'=')) => {
                self.pos += 3;
                TokenKind::AmpersandCaretEquals
            }
            (Some(b'^'), _) => {
                self.pos += 2;
                TokenKind::AmpersandCaret
            }
            (Some(b'&'), _) => {
                self.pos += 2;
                TokenKind::AmpersandAmpersand
            }
            (Some(b'='), _) => {
                self.pos += 2;
                TokenKind::AmpersandEquals
            }
            _ => {
                self.pos += 1;
                TokenKind::Ampersand
            }
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Scan a `//` or `/* */` comment. Returns whether it contained a newline.
    fn scan_comment(&mut self) -> bool {
        let start = self.pos;
        if self.byte_at(1) == Some(b'/') {
            self.pos += 2;
            while let Some(ch) = self.current_char() {
                if ch == '\n' {
                    break;
                }
                self.advance();
            }
            return false;
        }

        self.pos += 2;
        let mut had_newline = false;
        loop {
            match self.current_char() {
                None => {
                    self.error_at(start, 2, &messages::COMMENT_NOT_TERMINATED, &[]);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    return had_newline;
                }
                Some('*') if self.byte_at(1) == Some(b'/') => {
                    self.pos += 2;
                    return had_newline;
                }
                Some(ch) => {
                    had_newline |= ch == '\n';
                    self.advance();
                }
            }
        }
    }

    /// Whether the comments starting at the current position run to the end
    /// of the line, which makes a pending semicolon due here.
    fn comment_ends_line(&self) -> bool {
        let bytes = &self.text.as_bytes()[self.pos..];
        let mut i = 0;
        loop {
            let rest = &bytes[i..];
            if rest.starts_with(b"//") {
                return true;
            }
            if !rest.starts_with(b"/*") {
                return false;
            }
            let body = &rest[2..];
            let Some(end) = memmem::find(body, b"*/") else {
                return true;
            };
            if memchr::memchr(b'\n', &body[..end]).is_some() {
                return true;
            }
            i += 2 + end + 2;
            while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\r')) {
                i += 1;
            }
            match bytes.get(i) {
                None | Some(b'\n') => return true,
                Some(b'/') => continue,
                Some(_) => return false,
            }
        }
    }

    // ========================================================================
    // Identifiers and numbers
    // ========================================================================

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_letter(ch) && !is_identifier_digit(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        TokenKind::from_keyword(&self.text[start..self.pos]).unwrap_or(TokenKind::Identifier)
    }

    /// Consume digits of `base` and separators. Bit 0 of the result is set
    /// when a digit was seen, bit 1 when a `_` was seen. For bases up to 10,
    /// every decimal digit is consumed and the first one too large for the
    /// base is recorded in `invalid`.
    fn scan_digits(&mut self, base: u32, invalid: &mut Option<usize>) -> u8 {
        let mut digsep = 0;
        while let Some(b) = self.byte_at(0) {
            let ch = b as char;
            if ch == '_' {
                digsep |= 2;
            } else if base <= 10 && is_decimal(ch) {
                if digit_val(ch) >= base && invalid.is_none() {
                    *invalid = Some(self.pos);
                }
                digsep |= 1;
            } else if base > 10 && is_hex(ch) {
                digsep |= 1;
            } else {
                break;
            }
            self.pos += 1;
        }
        digsep
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        let mut kind = TokenKind::Illegal;
        let mut prefix = NumberPrefix::Decimal;
        let mut digsep = 0u8;
        let mut invalid = None;

        // Integer part.
        if self.byte_at(0) != Some(b'.') {
            kind = TokenKind::Int;
            if self.byte_at(0) == Some(b'0') {
                self.pos += 1;
                match self.byte_at(0).map(|b| b.to_ascii_lowercase()) {
                    Some(b'x') => {
                        self.pos += 1;
                        prefix = NumberPrefix::Hex;
                        self.token_flags |= TokenFlags::HEX_SPECIFIER;
                    }
                    Some(b'o') => {
                        self.pos += 1;
                        prefix = NumberPrefix::Octal;
                        self.token_flags |= TokenFlags::OCTAL_SPECIFIER;
                    }
                    Some(b'b') => {
                        self.pos += 1;
                        prefix = NumberPrefix::Binary;
                        self.token_flags |= TokenFlags::BINARY_SPECIFIER;
                    }
                    _ => {
                        // The leading 0 is itself a digit.
                        prefix = NumberPrefix::LegacyOctal;
                        digsep = 1;
                    }
                }
            }
            digsep |= self.scan_digits(prefix.base(), &mut invalid);
        }

        // Fractional part.
        if self.byte_at(0) == Some(b'.') {
            kind = TokenKind::Float;
            if matches!(prefix, NumberPrefix::Octal | NumberPrefix::Binary) {
                self.error_at(self.pos, 1, &messages::INVALID_RADIX_POINT_IN_0_LITERAL, &[prefix.name()]);
            }
            self.pos += 1;
            digsep |= self.scan_digits(prefix.base(), &mut invalid);
        }

        if digsep & 1 == 0 {
            self.error_at_char(self.pos, &messages::_0_LITERAL_HAS_NO_DIGITS, &[prefix.name()]);
        }

        // Exponent.
        match self.byte_at(0) {
            Some(marker @ (b'e' | b'E' | b'p' | b'P')) => {
                let marker_text = (marker as char).to_string();
                let is_p = marker.to_ascii_lowercase() == b'p';
                if !is_p && !prefix.allows_decimal_exponent() {
                    self.error_at(self.pos, 1, &messages::_0_EXPONENT_REQUIRES_DECIMAL_MANTISSA, &[marker_text.as_str()]);
                } else if is_p && prefix != NumberPrefix::Hex {
                    self.error_at(self.pos, 1, &messages::_0_EXPONENT_REQUIRES_HEXADECIMAL_MANTISSA, &[marker_text.as_str()]);
                }
                self.pos += 1;
                kind = TokenKind::Float;
                self.token_flags |= TokenFlags::SCIENTIFIC;
                if matches!(self.byte_at(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                let exponent = self.scan_digits(10, &mut None);
                digsep |= exponent;
                if exponent & 1 == 0 {
                    self.error_at_char(self.pos, &messages::EXPONENT_HAS_NO_DIGITS, &[]);
                }
            }
            _ if prefix == NumberPrefix::Hex && kind == TokenKind::Float => {
                self.error_at_char(self.pos, &messages::HEXADECIMAL_MANTISSA_REQUIRES_P_EXPONENT, &[]);
            }
            _ => {}
        }

        // Imaginary suffix.
        if self.byte_at(0) == Some(b'i') {
            kind = TokenKind::Imaginary;
            self.pos += 1;
        }

        let end = self.pos;
        if kind == TokenKind::Int {
            if let Some(offset) = invalid {
                let digit = (self.text.as_bytes()[offset] as char).to_string();
                self.error_at(offset, 1, &messages::INVALID_DIGIT_0_IN_1_LITERAL, &[digit.as_str(), prefix.name()]);
            }
            if prefix == NumberPrefix::LegacyOctal && end - start > 1 {
                self.token_flags |= TokenFlags::LEGACY_OCTAL;
            }
        }
        if digsep & 2 != 0 {
            self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
            if let Some(offset) = invalid_separator(&self.text[start..end]) {
                self.error_at(start + offset, 1, &messages::INVALID_DIGIT_SEPARATOR, &[]);
            }
        }
        kind
    }

    // ========================================================================
    // Runes and strings
    // ========================================================================

    /// Scan an escape sequence; the backslash has already been consumed.
    /// Returns false if the escape was malformed.
    fn scan_escape(&mut self, quote: char) -> bool {
        let start = self.pos - 1;
        let (mut remaining, base, max) = match self.current_char() {
            Some(ch) if matches!(ch, 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\') || ch == quote => {
                self.advance();
                return true;
            }
            Some('0'..='7') => (3, 8, 255),
            Some('x') => {
                self.pos += 1;
                (2, 16, 255)
            }
            Some('u') => {
                self.pos += 1;
                (4, 16, MAX_RUNE)
            }
            Some('U') => {
                self.pos += 1;
                (8, 16, MAX_RUNE)
            }
            Some(ch) => {
                // The unknown character is left for the literal loop to consume.
                self.error_at(start, 1 + ch.len_utf8(), &messages::UNKNOWN_ESCAPE_SEQUENCE, &[]);
                return false;
            }
            None => {
                self.error_at(start, 1, &messages::ESCAPE_SEQUENCE_NOT_TERMINATED, &[]);
                return false;
            }
        };

        let mut value: u32 = 0;
        while remaining > 0 {
            let Some(ch) = self.current_char() else {
                self.error_at(self.pos, 0, &messages::ESCAPE_SEQUENCE_NOT_TERMINATED, &[]);
                return false;
            };
            let digit = digit_val(ch);
            if digit >= base {
                let described = describe_char(ch);
                self.error_at_char(self.pos, &messages::ILLEGAL_CHARACTER_0_IN_ESCAPE_SEQUENCE, &[described.as_str()]);
                return false;
            }
            value = value * base + digit;
            self.pos += 1;
            remaining -= 1;
        }

        let len = self.pos - start;
        if max == 255 && value > max {
            let shown = value.to_string();
            self.error_at(start, len, &messages::ESCAPE_VALUE_0_EXCEEDS_BYTE_RANGE, &[shown.as_str()]);
            return false;
        }
        if !is_valid_code_point(value) {
            self.error_at(start, len, &messages::ESCAPE_SEQUENCE_IS_INVALID_UNICODE_CODE_POINT, &[]);
            return false;
        }
        true
    }

    fn scan_rune(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        let mut valid = true;
        let mut count = 0;
        loop {
            match self.current_char() {
                None | Some('\n') => {
                    if valid {
                        self.error_at(start, self.pos - start, &messages::RUNE_LITERAL_NOT_TERMINATED, &[]);
                        valid = false;
                    }
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
                Some(_) => {
                    let ch = self.advance();
                    if ch == Some('\'') {
                        break;
                    }
                    count += 1;
                    if ch == Some('\\') {
                        self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                        if !self.scan_escape('\'') {
                            valid = false;
                        }
                    }
                }
            }
        }

        if valid && count == 0 {
            self.error_at(start, self.pos - start, &messages::EMPTY_RUNE_LITERAL, &[]);
        } else if valid && count > 1 {
            self.error_at(start, self.pos - start, &messages::ILLEGAL_RUNE_LITERAL, &[]);
        }
        TokenKind::Char
    }

    fn scan_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        loop {
            match self.current_char() {
                None | Some('\n') => {
                    self.error_at(start, self.pos - start, &messages::STRING_LITERAL_NOT_TERMINATED, &[]);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
                Some(_) => {
                    let ch = self.advance();
                    if ch == Some('"') {
                        break;
                    }
                    if ch == Some('\\') {
                        self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                        self.scan_escape('"');
                    }
                }
            }
        }
        TokenKind::String
    }

    fn scan_raw_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // skip backquote
        self.token_flags |= TokenFlags::RAW;
        loop {
            match self.advance() {
                None => {
                    self.error_at(start, self.pos - start, &messages::RAW_STRING_LITERAL_NOT_TERMINATED, &[]);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
                Some('`') => break,
                Some(_) => {}
            }
        }
        TokenKind::String
    }
}

/// Scan `text` to the end, returning every token (without the final EOF)
/// and all diagnostics.
pub fn tokenize(text: &str) -> (Vec<TokenInfo>, DiagnosticCollection) {
    tokenize_with_mode(text, ScanMode::default())
}

pub fn tokenize_with_mode(text: &str, mode: ScanMode) -> (Vec<TokenInfo>, DiagnosticCollection) {
    let _span = tracing::trace_span!("tokenize", bytes = text.len()).entered();
    let mut scanner = Scanner::with_mode(text, mode);
    let mut tokens = Vec::new();
    while scanner.scan() != TokenKind::EndOfFile {
        tokens.push(scanner.token_info());
    }
    (tokens, scanner.take_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str, mode: ScanMode) -> Vec<TokenKind> {
        tokenize_with_mode(source, mode)
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } [ ] ; , : ~");
        assert_eq!(scanner.scan(), TokenKind::OpenParen);
        assert_eq!(scanner.scan(), TokenKind::CloseParen);
        assert_eq!(scanner.scan(), TokenKind::OpenBrace);
        assert_eq!(scanner.scan(), TokenKind::CloseBrace);
        assert_eq!(scanner.scan(), TokenKind::OpenBracket);
        assert_eq!(scanner.scan(), TokenKind::CloseBracket);
        assert_eq!(scanner.scan(), TokenKind::Semicolon);
        assert_eq!(scanner.scan(), TokenKind::Comma);
        assert_eq!(scanner.scan(), TokenKind::Colon);
        assert_eq!(scanner.scan(), TokenKind::Tilde);
        assert_eq!(scanner.scan(), TokenKind::EndOfFile);
    }

    #[test]
    fn test_scan_operators() {
        let source = "+ ++ += - -- -= * *= / /= % %= & && &= &^ &^= | || |= ^ ^= < <- << <<= <= > >> >>= >= = == ! != := . ...";
        assert_eq!(
            kinds(source, ScanMode::default()),
            vec![
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::PlusEquals,
                TokenKind::Minus,
                TokenKind::MinusMinus,
                TokenKind::MinusEquals,
                TokenKind::Asterisk,
                TokenKind::AsteriskEquals,
                TokenKind::Slash,
                TokenKind::SlashEquals,
                TokenKind::Percent,
                TokenKind::PercentEquals,
                TokenKind::Ampersand,
                TokenKind::AmpersandAmpersand,
                TokenKind::AmpersandEquals,
                TokenKind::AmpersandCaret,
                TokenKind::AmpersandCaretEquals,
                TokenKind::Bar,
                TokenKind::BarBar,
                TokenKind::BarEquals,
                TokenKind::Caret,
                TokenKind::CaretEquals,
                TokenKind::Less,
                TokenKind::Arrow,
                TokenKind::LessLess,
                TokenKind::LessLessEquals,
                TokenKind::LessEquals,
                TokenKind::Greater,
                TokenKind::GreaterGreater,
                TokenKind::GreaterGreaterEquals,
                TokenKind::GreaterEquals,
                TokenKind::Equals,
                TokenKind::EqualsEquals,
                TokenKind::Exclamation,
                TokenKind::ExclamationEquals,
                TokenKind::ColonEquals,
                TokenKind::Dot,
                TokenKind::DotDotDot,
            ]
        );
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let mut scanner = Scanner::new("var x = 42");
        assert_eq!(scanner.scan(), TokenKind::VarKeyword);
        assert_eq!(scanner.scan(), TokenKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
        assert_eq!(scanner.scan(), TokenKind::Equals);
        assert_eq!(scanner.scan(), TokenKind::Int);
        assert_eq!(scanner.token_value(), "42");
        assert_eq!(scanner.scan(), TokenKind::EndOfFile);
    }

    #[test]
    fn test_underscore_prefix_is_identifier() {
        let mut scanner = Scanner::new("_42");
        assert_eq!(scanner.scan(), TokenKind::Identifier);
        assert_eq!(scanner.token_value(), "_42");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_semicolon_insertion() {
        let source = "x++\nreturn\n}\nfoo(a,\nb)\n";
        assert_eq!(
            kinds(source, ScanMode::SOURCE),
            vec![
                TokenKind::Identifier,
                TokenKind::PlusPlus,
                TokenKind::Semicolon,
                TokenKind::ReturnKeyword,
                TokenKind::Semicolon,
                TokenKind::CloseBrace,
                TokenKind::Semicolon,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::CloseParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_semicolon_at_eof_and_before_comments() {
        let (tokens, _) = tokenize_with_mode("a // trailing\nb /* one\nline */ c", ScanMode::SOURCE.with_comments());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Comment,
                TokenKind::Identifier,
                TokenKind::Semicolon,
            ]
        );
        assert!(tokens[1].flags.contains(TokenFlags::AUTO_SEMICOLON));
        assert_eq!(tokens[1].text, "\n");
        assert_eq!(tokens[2].text, "// trailing");
    }

    #[test]
    fn test_inline_comment_does_not_end_line() {
        assert_eq!(
            kinds("a /* x */ + b", ScanMode::SOURCE),
            vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::Identifier, TokenKind::Semicolon]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let (tokens, diagnostics) = tokenize("x /* never closed");
        assert_eq!(tokens.len(), 1);
        assert_eq!(diagnostics.codes(), vec![1025]);
        assert_eq!(diagnostics.diagnostics()[0].span, Some(TextSpan::new(2, 2)));
    }

    #[test]
    fn test_byte_order_mark() {
        let (tokens, diagnostics) = tokenize("\u{FEFF}x");
        assert_eq!(tokens.len(), 1);
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].pos, 3);

        let (_, diagnostics) = tokenize("x\u{FEFF}");
        assert_eq!(diagnostics.codes(), vec![1032]);
    }

    #[test]
    fn test_nul_and_invalid_characters() {
        let (tokens, diagnostics) = tokenize("a\0b @");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Illegal, TokenKind::Identifier, TokenKind::Illegal]
        );
        assert_eq!(diagnostics.codes(), vec![1031, 1030]);
        assert_eq!(diagnostics.diagnostics()[1].message_text, "invalid character U+0040 '@'");
    }

    #[test]
    fn test_escape_diagnostic_span() {
        let (_, diagnostics) = tokenize(r"'\U00110000'");
        let diag = &diagnostics.diagnostics()[0];
        assert_eq!(diag.code, 1013);
        assert_eq!(diag.span, Some(TextSpan::new(1, 10)));
    }

    #[test]
    fn test_file_name_attached() {
        let mut scanner = Scanner::new("1__0");
        scanner.set_file_name("lits.go");
        scanner.scan();
        assert_eq!(scanner.diagnostics().diagnostics()[0].file.as_deref(), Some("lits.go"));
    }

    #[test]
    fn test_look_ahead_restores_state_and_diagnostics() {
        let mut scanner = Scanner::new("x '\\k'");
        scanner.scan();
        let next = scanner.look_ahead(|s| s.scan());
        assert_eq!(next, TokenKind::Char);
        assert_eq!(scanner.token(), TokenKind::Identifier);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.scan(), TokenKind::Char);
        assert_eq!(scanner.diagnostics().len(), 1);
    }
}
