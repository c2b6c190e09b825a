//! golit_scanner: Lexer for Go source text, with exact diagnostics for
//! malformed literals.
//!
//! The scanner follows Go's lexical grammar:
//! - Integer, floating-point and imaginary literals in every radix, with
//!   `_` digit separators
//! - Rune and string literals, including every escape form
//! - Comments, operators, keywords, and automatic semicolon insertion
//!
//! Values of accepted literals are decoded by the [`literal`] module.

mod char_codes;
pub mod literal;
mod number;
mod scanner;
mod token;
mod token_kind;

pub use literal::{decode, LiteralError, LiteralValue};
pub use number::{invalid_separator, NumberPrefix};
pub use scanner::{tokenize, tokenize_with_mode, ScanMode, Scanner, ScannerState};
pub use token::{TokenFlags, TokenInfo};
pub use token_kind::TokenKind;
