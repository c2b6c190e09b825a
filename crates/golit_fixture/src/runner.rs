//! Fixture execution.
//!
//! Each case is scanned on its own with the default scan mode (no comments,
//! no semicolon insertion), so a case's tokens are exactly the literal's.

use crate::config::HarnessConfig;
use crate::discovery::discover_fixture_files;
use crate::fixture::{parse_fixture, Expectation, Fixture, FixtureCase};
use crate::report::{CaseOutcome, CaseReport, FileReport, Observation, RunReport};
use crate::HarnessError;
use golit_core::text::TextSpan;
use golit_diagnostics::{DiagnosticCollection, CODE_PREFIX};
use golit_scanner::{literal, tokenize, TokenInfo};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Scan a case's literal, decode it when it scanned cleanly, and compare
/// the result with the expectation.
pub fn run_case(case: &FixtureCase) -> CaseOutcome {
    let (tokens, mut diagnostics) = tokenize(&case.literal);
    if let [token] = tokens.as_slice() {
        if token.kind.is_literal() && !diagnostics.has_errors() {
            let span = TextSpan::from_bounds(token.pos, token.end);
            literal::decode_checked(token.kind, &token.text, span, &mut diagnostics);
        }
    }

    let observed = Observation {
        tokens: tokens.iter().map(|t| t.kind.name().to_string()).collect(),
        codes: diagnostics.diagnostics().iter().map(|d| d.code_string()).collect(),
    };
    let outcome = match check(&case.expectation, &tokens, &diagnostics, &observed) {
        None => CaseOutcome::Pass { observed },
        Some(reason) => CaseOutcome::Fail { reason, observed },
    };
    tracing::debug!(line = case.line, literal = %case.literal, pass = outcome.is_pass(), "ran case");
    outcome
}

/// Why the observation does not meet the expectation, if it does not.
fn check(
    expectation: &Expectation,
    tokens: &[TokenInfo],
    diagnostics: &DiagnosticCollection,
    observed: &Observation,
) -> Option<String> {
    match expectation {
        Expectation::Valid { kind } => {
            if !diagnostics.is_empty() {
                return Some(format!("expected no diagnostics, got {}", observed.describe_codes()));
            }
            if tokens.len() != 1 {
                return Some(format!(
                    "expected a single token, got {} ({})",
                    tokens.len(),
                    observed.describe_tokens()
                ));
            }
            match kind {
                Some(kind) if tokens[0].kind != *kind => Some(format!(
                    "expected {} literal, got {}",
                    kind.name(),
                    tokens[0].kind.name()
                )),
                _ => None,
            }
        }
        Expectation::Invalid { codes } if codes.is_empty() => {
            if diagnostics.has_errors() {
                None
            } else {
                Some(format!(
                    "expected an error, but it was accepted as {}",
                    observed.describe_tokens()
                ))
            }
        }
        Expectation::Invalid { codes } => {
            let seen: FxHashSet<u32> = diagnostics.diagnostics().iter().map(|d| d.code).collect();
            let missing: Vec<String> = codes
                .iter()
                .filter(|code| !seen.contains(*code))
                .map(|code| format!("{}{}", CODE_PREFIX, code))
                .collect();
            if missing.is_empty() {
                None
            } else {
                Some(format!(
                    "missing {} (got {})",
                    missing.join(", "),
                    observed.describe_codes()
                ))
            }
        }
    }
}

/// Run the cases of a parsed fixture.
pub fn run_fixture(path: PathBuf, fixture: &Fixture, fail_fast: bool) -> FileReport {
    let mut report = FileReport::new(path);
    for case in &fixture.cases {
        let outcome = run_case(case);
        let failed = !outcome.is_pass();
        report.cases.push(CaseReport {
            line: case.line,
            literal: case.literal.clone(),
            expected: case.expectation.to_string(),
            outcome,
        });
        if failed && fail_fast {
            break;
        }
    }
    report
}

fn run_file_with(path: &Path, fail_fast: bool) -> Result<FileReport, HarnessError> {
    let _span = tracing::info_span!("fixture", path = %path.display()).entered();
    let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fixture = parse_fixture(&text).map_err(|source| HarnessError::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    let report = run_fixture(path.to_path_buf(), &fixture, fail_fast);
    tracing::info!(passed = report.passed(), failed = report.failed(), "fixture finished");
    Ok(report)
}

/// Run every case of one fixture file.
pub fn run_file(path: &Path) -> Result<FileReport, HarnessError> {
    run_file_with(path, false)
}

/// Discover and run all fixture files configured for `root`.
///
/// Files run in parallel unless the config turns that off or asks to stop
/// at the first failure.
pub fn run_all(config: &HarnessConfig, root: &Path) -> Result<RunReport, HarnessError> {
    let files = discover_fixture_files(config, root)?;
    let fail_fast = config.fail_fast();
    tracing::info!(files = files.len(), parallel = config.parallel(), fail_fast, "running fixtures");

    let mut report = RunReport::default();
    if config.parallel() && !fail_fast {
        let file_reports = files
            .par_iter()
            .map(|path| run_file_with(path, false))
            .collect::<Result<Vec<_>, _>>()?;
        for file_report in file_reports {
            report.add_file(file_report);
        }
    } else {
        for path in &files {
            let file_report = run_file_with(path, fail_fast)?;
            let stop = fail_fast && file_report.failed() > 0;
            report.add_file(file_report);
            if stop {
                break;
            }
        }
    }
    Ok(report)
}
