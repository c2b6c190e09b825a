//! Token kinds of the Go lexical grammar.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Special tokens
    Illegal,
    EndOfFile,
    Comment,

    // Identifiers and basic literals
    Identifier,
    Int,
    Float,
    Imaginary,
    Char,
    String,

    // Operators and delimiters
    Plus,           // +
    Minus,          // -
    Asterisk,       // *
    Slash,          // /
    Percent,        // %
    Ampersand,      // &
    Bar,            // |
    Caret,          // ^
    LessLess,       // <<
    GreaterGreater, // >>
    AmpersandCaret, // &^

    PlusEquals,           // +=
    MinusEquals,          // -=
    AsteriskEquals,       // *=
    SlashEquals,          // /=
    PercentEquals,        // %=
    AmpersandEquals,      // &=
    BarEquals,            // |=
    CaretEquals,          // ^=
    LessLessEquals,       // <<=
    GreaterGreaterEquals, // >>=
    AmpersandCaretEquals, // &^=

    AmpersandAmpersand, // &&
    BarBar,             // ||
    Arrow,              // <-
    PlusPlus,           // ++
    MinusMinus,         // --

    EqualsEquals,       // ==
    Less,               // <
    Greater,            // >
    Equals,             // =
    Exclamation,        // !
    Tilde,              // ~
    ExclamationEquals,  // !=
    LessEquals,         // <=
    GreaterEquals,      // >=
    ColonEquals,        // :=
    DotDotDot,          // ...

    OpenParen,    // (
    OpenBracket,  // [
    OpenBrace,    // {
    Comma,        // ,
    Dot,          // .
    CloseParen,   // )
    CloseBracket, // ]
    CloseBrace,   // }
    Semicolon,    // ;
    Colon,        // :

    // Keywords
    BreakKeyword,
    CaseKeyword,
    ChanKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DeferKeyword,
    ElseKeyword,
    FallthroughKeyword,
    ForKeyword,
    FuncKeyword,
    GoKeyword,
    GotoKeyword,
    IfKeyword,
    ImportKeyword,
    InterfaceKeyword,
    MapKeyword,
    PackageKeyword,
    RangeKeyword,
    ReturnKeyword,
    SelectKeyword,
    StructKeyword,
    SwitchKeyword,
    TypeKeyword,
    VarKeyword,
}

impl TokenKind {
    /// Map a keyword spelling to its kind.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "break" => Some(TokenKind::BreakKeyword),
            "case" => Some(TokenKind::CaseKeyword),
            "chan" => Some(TokenKind::ChanKeyword),
            "const" => Some(TokenKind::ConstKeyword),
            "continue" => Some(TokenKind::ContinueKeyword),
            "default" => Some(TokenKind::DefaultKeyword),
            "defer" => Some(TokenKind::DeferKeyword),
            "else" => Some(TokenKind::ElseKeyword),
            "fallthrough" => Some(TokenKind::FallthroughKeyword),
            "for" => Some(TokenKind::ForKeyword),
            "func" => Some(TokenKind::FuncKeyword),
            "go" => Some(TokenKind::GoKeyword),
            "goto" => Some(TokenKind::GotoKeyword),
            "if" => Some(TokenKind::IfKeyword),
            "import" => Some(TokenKind::ImportKeyword),
            "interface" => Some(TokenKind::InterfaceKeyword),
            "map" => Some(TokenKind::MapKeyword),
            "package" => Some(TokenKind::PackageKeyword),
            "range" => Some(TokenKind::RangeKeyword),
            "return" => Some(TokenKind::ReturnKeyword),
            "select" => Some(TokenKind::SelectKeyword),
            "struct" => Some(TokenKind::StructKeyword),
            "switch" => Some(TokenKind::SwitchKeyword),
            "type" => Some(TokenKind::TypeKeyword),
            "var" => Some(TokenKind::VarKeyword),
            _ => None,
        }
    }

    /// Basic literal kinds (`Int` through `String`).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imaginary
                | TokenKind::Char
                | TokenKind::String
        )
    }

    pub fn is_keyword(self) -> bool {
        self >= TokenKind::BreakKeyword
    }

    pub fn is_operator(self) -> bool {
        self >= TokenKind::Plus && self <= TokenKind::Colon
    }

    /// Whether a newline after this token triggers automatic semicolon insertion.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imaginary
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::BreakKeyword
                | TokenKind::ContinueKeyword
                | TokenKind::FallthroughKeyword
                | TokenKind::ReturnKeyword
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::CloseBrace
        )
    }

    /// The fixed source text of operators, delimiters, and keywords.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Ampersand => "&",
            TokenKind::Bar => "|",
            TokenKind::Caret => "^",
            TokenKind::LessLess => "<<",
            TokenKind::GreaterGreater => ">>",
            TokenKind::AmpersandCaret => "&^",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::AsteriskEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::AmpersandEquals => "&=",
            TokenKind::BarEquals => "|=",
            TokenKind::CaretEquals => "^=",
            TokenKind::LessLessEquals => "<<=",
            TokenKind::GreaterGreaterEquals => ">>=",
            TokenKind::AmpersandCaretEquals => "&^=",
            TokenKind::AmpersandAmpersand => "&&",
            TokenKind::BarBar => "||",
            TokenKind::Arrow => "<-",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::EqualsEquals => "==",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Equals => "=",
            TokenKind::Exclamation => "!",
            TokenKind::Tilde => "~",
            TokenKind::ExclamationEquals => "!=",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::ColonEquals => ":=",
            TokenKind::DotDotDot => "...",
            TokenKind::OpenParen => "(",
            TokenKind::OpenBracket => "[",
            TokenKind::OpenBrace => "{",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::CloseParen => ")",
            TokenKind::CloseBracket => "]",
            TokenKind::CloseBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::BreakKeyword => "break",
            TokenKind::CaseKeyword => "case",
            TokenKind::ChanKeyword => "chan",
            TokenKind::ConstKeyword => "const",
            TokenKind::ContinueKeyword => "continue",
            TokenKind::DefaultKeyword => "default",
            TokenKind::DeferKeyword => "defer",
            TokenKind::ElseKeyword => "else",
            TokenKind::FallthroughKeyword => "fallthrough",
            TokenKind::ForKeyword => "for",
            TokenKind::FuncKeyword => "func",
            TokenKind::GoKeyword => "go",
            TokenKind::GotoKeyword => "goto",
            TokenKind::IfKeyword => "if",
            TokenKind::ImportKeyword => "import",
            TokenKind::InterfaceKeyword => "interface",
            TokenKind::MapKeyword => "map",
            TokenKind::PackageKeyword => "package",
            TokenKind::RangeKeyword => "range",
            TokenKind::ReturnKeyword => "return",
            TokenKind::SelectKeyword => "select",
            TokenKind::StructKeyword => "struct",
            TokenKind::SwitchKeyword => "switch",
            TokenKind::TypeKeyword => "type",
            TokenKind::VarKeyword => "var",
            _ => return None,
        };
        Some(text)
    }

    /// Short lowercase name used in fixtures and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Illegal => "illegal",
            TokenKind::EndOfFile => "eof",
            TokenKind::Comment => "comment",
            TokenKind::Identifier => "ident",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Imaginary => "imag",
            TokenKind::Char => "char",
            TokenKind::String => "string",
            _ if self.is_keyword() => "keyword",
            _ => "operator",
        }
    }

    /// Inverse of [`TokenKind::name`] for the literal and identifier kinds.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        match name {
            "ident" => Some(TokenKind::Identifier),
            "int" => Some(TokenKind::Int),
            "float" => Some(TokenKind::Float),
            "imag" => Some(TokenKind::Imaginary),
            "char" => Some(TokenKind::Char),
            "string" => Some(TokenKind::String),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "{}", self.name()),
        }
    }
}
