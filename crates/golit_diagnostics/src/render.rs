//! Rendering of scanner diagnostics through `miette`.
//!
//! The scanner never builds miette types itself; the CLI converts finished
//! [`Diagnostic`]s here, attaching the source so the report can underline the
//! offending characters.

use crate::{Diagnostic, DiagnosticCategory};
use miette::{LabeledSpan, NamedSource, Severity, SourceCode};
use std::fmt;

/// A diagnostic bundled with its source text, ready for miette's handlers.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LexReport {
    message: String,
    code: String,
    severity: Severity,
    label: Option<LabeledSpan>,
    named_source: NamedSource<String>,
}

impl LexReport {
    pub fn new(diagnostic: &Diagnostic, name: &str, source: &str) -> Self {
        let severity = match diagnostic.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
            DiagnosticCategory::Message => Severity::Advice,
        };
        let label = diagnostic.span.map(|span| {
            // miette needs at least one column to draw an underline.
            let remaining = source.len().saturating_sub(span.start as usize).max(1);
            let len = (span.length as usize).clamp(1, remaining);
            LabeledSpan::new(Some(short_label(diagnostic)), span.start as usize, len)
        });
        Self {
            message: diagnostic.message_text.clone(),
            code: diagnostic.code_string(),
            severity,
            label,
            named_source: NamedSource::new(name, source.to_string()),
        }
    }
}

fn short_label(diagnostic: &Diagnostic) -> String {
    match diagnostic.code {
        1001 => "misplaced separator".to_string(),
        1010..=1014 => "here".to_string(),
        _ => diagnostic.message_text.clone(),
    }
}

impl miette::Diagnostic for LexReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.named_source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.label
            .as_ref()
            .map(|label| Box::new(std::iter::once(label.clone())) as Box<dyn Iterator<Item = LabeledSpan>>)
    }
}

/// Convert a diagnostic into a `miette::Report` over the named source.
pub fn to_report(diagnostic: &Diagnostic, name: &str, source: &str) -> miette::Report {
    miette::Report::new(LexReport::new(diagnostic, name, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages;
    use golit_core::text::TextSpan;
    use miette::Diagnostic as _;

    #[test]
    fn test_report_carries_code_and_label() {
        let diag = Diagnostic::with_span(
            TextSpan::new(1, 6),
            &messages::ESCAPE_SEQUENCE_IS_INVALID_UNICODE_CODE_POINT,
            &[],
        );
        let report = LexReport::new(&diag, "case.lit", r"'\uDFFF'");
        assert_eq!(report.to_string(), "escape sequence is invalid Unicode code point");
        assert_eq!(report.code().map(|c| c.to_string()), Some("GL1013".to_string()));
        assert_eq!(report.severity(), Some(Severity::Error));
        let labels: Vec<_> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 1);
        assert_eq!(labels[0].len(), 6);
    }

    #[test]
    fn test_zero_length_span_still_underlines() {
        let diag = Diagnostic::with_span(TextSpan::empty(2), &messages::EXPONENT_HAS_NO_DIGITS, &[]);
        let report = LexReport::new(&diag, "case.lit", "1e");
        let labels: Vec<_> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn test_report_without_span() {
        let diag = Diagnostic::new(&messages::ILLEGAL_CHARACTER_NUL, &[]);
        let report = LexReport::new(&diag, "case.lit", "\0");
        assert!(report.labels().is_none());
    }
}
