//! Fixture file format.
//!
//! One literal per line, optionally annotated with the expected outcome:
//!
//! ```text
//! // Comment lines are ignored.
//! //! default: invalid
//! 42_         // ERROR GL1001
//! 0x_1F       // OK int
//! 'aa'        // illegal: too many characters
//! ```

use golit_diagnostics::{parse_code, CODE_PREFIX};
use golit_scanner::TokenKind;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Separator between a literal and its trailing annotation.
const ANNOTATION_SEPARATOR: &str = " // ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: `{code}` is not a diagnostic code (expected GLnnnn)")]
    BadCode { line: usize, code: String },

    #[error("line {line}: unknown token kind `{kind}` (expected int, float, imag, char, string or ident)")]
    UnknownKind { line: usize, kind: String },
}

/// What a case expects from the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// At least one error, including every listed code.
    Invalid { codes: Vec<u32> },
    /// Exactly one token, of `kind` when given, with no diagnostics.
    Valid { kind: Option<TokenKind> },
}

impl Expectation {
    pub fn any_error() -> Self {
        Expectation::Invalid { codes: Vec::new() }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Expectation::Valid { .. })
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Invalid { codes } if codes.is_empty() => write!(f, "ERROR"),
            Expectation::Invalid { codes } => {
                let codes: Vec<String> = codes.iter().map(|c| format!("{}{}", CODE_PREFIX, c)).collect();
                write!(f, "ERROR {}", codes.join(", "))
            }
            Expectation::Valid { kind: None } => write!(f, "OK"),
            Expectation::Valid { kind: Some(kind) } => write!(f, "OK {}", kind.name()),
        }
    }
}

/// A single literal and its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    /// 1-based line number in the fixture file.
    pub line: usize,
    pub literal: String,
    pub expectation: Expectation,
    /// Free-form trailing comment, if any.
    pub note: Option<String>,
}

/// A parsed fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fixture {
    /// Expectation for cases without an annotation.
    pub default_valid: bool,
    pub cases: Vec<FixtureCase>,
}

impl Fixture {
    fn default_expectation(&self) -> Expectation {
        if self.default_valid {
            Expectation::Valid { kind: None }
        } else {
            Expectation::any_error()
        }
    }
}

fn annotation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(ERROR|OK)\b\s*(.*)$").expect("valid regex"))
}

/// Split `line` at the last ` // ` followed by an annotation.
fn split_annotation(line: &str) -> Option<(&str, regex::Captures<'_>)> {
    let re = annotation_regex();
    line.rmatch_indices(ANNOTATION_SEPARATOR).find_map(|(idx, _)| {
        let rest = line[idx + ANNOTATION_SEPARATOR.len()..].trim();
        re.captures(rest).map(|caps| (&line[..idx], caps))
    })
}

fn parse_codes(text: &str, line: usize) -> Result<Vec<u32>, FixtureError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            parse_code(part).ok_or_else(|| FixtureError::BadCode {
                line,
                code: part.to_string(),
            })
        })
        .collect()
}

fn parse_kind(text: &str, line: usize) -> Result<Option<TokenKind>, FixtureError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    TokenKind::from_name(text)
        .map(Some)
        .ok_or_else(|| FixtureError::UnknownKind {
            line,
            kind: text.to_string(),
        })
}

fn parse_directive(fixture: &mut Fixture, directive: &str, line: usize) -> Result<(), FixtureError> {
    let unknown = || FixtureError::UnknownDirective {
        line,
        directive: directive.to_string(),
    };
    let (key, value) = directive.split_once(':').ok_or_else(unknown)?;
    match (key.trim(), value.trim()) {
        ("default", "invalid") => fixture.default_valid = false,
        ("default", "valid") => fixture.default_valid = true,
        _ => return Err(unknown()),
    }
    Ok(())
}

/// Parse the text of a fixture file.
pub fn parse_fixture(text: &str) -> Result<Fixture, FixtureError> {
    let mut fixture = Fixture::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(directive) = trimmed.strip_prefix("//!") {
            parse_directive(&mut fixture, directive.trim(), line)?;
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }

        let case = match split_annotation(trimmed) {
            Some((literal, caps)) => {
                let args = caps.get(2).map_or("", |m| m.as_str());
                let expectation = if &caps[1] == "ERROR" {
                    Expectation::Invalid {
                        codes: parse_codes(args, line)?,
                    }
                } else {
                    Expectation::Valid {
                        kind: parse_kind(args, line)?,
                    }
                };
                FixtureCase {
                    line,
                    literal: literal.trim().to_string(),
                    expectation,
                    note: None,
                }
            }
            None => {
                let (literal, note) = match trimmed.rsplit_once(ANNOTATION_SEPARATOR) {
                    Some((literal, note)) => (literal.trim(), Some(note.trim().to_string())),
                    None => (trimmed, None),
                };
                FixtureCase {
                    line,
                    literal: literal.to_string(),
                    expectation: fixture.default_expectation(),
                    note,
                }
            }
        };
        fixture.cases.push(case);
    }

    Ok(fixture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_annotated_cases() {
        let fixture = parse_fixture(
            "// header comment\n\n42_         // ERROR GL1001\n'\\400' // ERROR GL1014, GL1013\n0x_1F // OK int\n1.5 // OK\n",
        )
        .unwrap();
        assert!(!fixture.default_valid);
        let expectations: Vec<_> = fixture.cases.iter().map(|c| (c.line, c.literal.as_str(), c.expectation.clone())).collect();
        assert_eq!(
            expectations,
            vec![
                (3, "42_", Expectation::Invalid { codes: vec![1001] }),
                (4, "'\\400'", Expectation::Invalid { codes: vec![1014, 1013] }),
                (5, "0x_1F", Expectation::Valid { kind: Some(TokenKind::Int) }),
                (6, "1.5", Expectation::Valid { kind: None }),
            ]
        );
    }

    #[test]
    fn test_unannotated_cases_use_default() {
        let fixture = parse_fixture("'aa' // illegal: too many characters\n\"\\uD800\"\n").unwrap();
        assert_eq!(fixture.cases[0].literal, "'aa'");
        assert_eq!(fixture.cases[0].note.as_deref(), Some("illegal: too many characters"));
        assert_eq!(fixture.cases[0].expectation, Expectation::any_error());
        assert_eq!(fixture.cases[1].literal, "\"\\uD800\"");
        assert_eq!(fixture.cases[1].note, None);

        let fixture = parse_fixture("//! default: valid\n0b1010\n").unwrap();
        assert!(fixture.default_valid);
        assert!(fixture.cases[0].expectation.is_valid());
    }

    #[test]
    fn test_last_annotation_wins() {
        let fixture = parse_fixture(r#""a // b" // OK string"#).unwrap();
        assert_eq!(fixture.cases[0].literal, r#""a // b""#);
        assert_eq!(fixture.cases[0].expectation, Expectation::Valid { kind: Some(TokenKind::String) });
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        assert_eq!(
            parse_fixture("1\n//! mode: strict\n"),
            Err(FixtureError::UnknownDirective {
                line: 2,
                directive: "mode: strict".to_string()
            })
        );
        assert_eq!(
            parse_fixture("42_ // ERROR E1001"),
            Err(FixtureError::BadCode {
                line: 1,
                code: "E1001".to_string()
            })
        );
        assert_eq!(
            parse_fixture("\n\n1 // OK number"),
            Err(FixtureError::UnknownKind {
                line: 3,
                kind: "number".to_string()
            })
        );
    }

    #[test]
    fn test_expectation_display() {
        assert_eq!(Expectation::Invalid { codes: vec![1001, 1013] }.to_string(), "ERROR GL1001, GL1013");
        assert_eq!(Expectation::any_error().to_string(), "ERROR");
        assert_eq!(Expectation::Valid { kind: Some(TokenKind::Imaginary) }.to_string(), "OK imag");
    }
}
