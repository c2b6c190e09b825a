//! Harness results.

use serde::Serialize;
use std::path::PathBuf;

/// What the scanner produced for a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Token kind names, e.g. `["int", "ident"]`.
    pub tokens: Vec<String>,
    /// Printed diagnostic codes, e.g. `["GL1001"]`.
    pub codes: Vec<String>,
}

impl Observation {
    pub fn describe_tokens(&self) -> String {
        if self.tokens.is_empty() {
            "no tokens".to_string()
        } else {
            self.tokens.join(" ")
        }
    }

    pub fn describe_codes(&self) -> String {
        if self.codes.is_empty() {
            "no diagnostics".to_string()
        } else {
            self.codes.join(", ")
        }
    }
}

/// Outcome of a single case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaseOutcome {
    Pass { observed: Observation },
    Fail { reason: String, observed: Observation },
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Pass { .. })
    }

    pub fn observed(&self) -> &Observation {
        match self {
            CaseOutcome::Pass { observed } | CaseOutcome::Fail { observed, .. } => observed,
        }
    }
}

/// Result of one fixture line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub line: usize,
    pub literal: String,
    /// The expectation as written in fixture syntax.
    pub expected: String,
    pub outcome: CaseOutcome,
}

/// Results for one fixture file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub cases: Vec<CaseReport>,
}

impl FileReport {
    pub fn new(path: PathBuf) -> Self {
        FileReport {
            path,
            cases: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.outcome.is_pass())
    }
}

/// Results for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn add_file(&mut self, file: FileReport) {
        self.files.push(file);
    }

    pub fn passed(&self) -> usize {
        self.files.iter().map(FileReport::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().map(FileReport::failed).sum()
    }

    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.cases.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Every failing case with the file it came from.
    pub fn failures(&self) -> impl Iterator<Item = (&FileReport, &CaseReport)> {
        self.files
            .iter()
            .flat_map(|file| file.failures().map(move |case| (file, case)))
    }

    /// The report as pretty-printed JSON, with totals.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Summary<'a> {
            passed: usize,
            failed: usize,
            total: usize,
            files: &'a [FileReport],
        }
        serde_json::to_string_pretty(&Summary {
            passed: self.passed(),
            failed: self.failed(),
            total: self.total(),
            files: &self.files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(line: usize, pass: bool) -> CaseReport {
        let observed = Observation {
            tokens: vec!["int".to_string()],
            codes: Vec::new(),
        };
        CaseReport {
            line,
            literal: "42".to_string(),
            expected: "ERROR".to_string(),
            outcome: if pass {
                CaseOutcome::Pass { observed }
            } else {
                CaseOutcome::Fail {
                    reason: "expected an error".to_string(),
                    observed,
                }
            },
        }
    }

    #[test]
    fn test_counts() {
        let mut report = RunReport::default();
        let mut first = FileReport::new(PathBuf::from("a.lit"));
        first.cases = vec![case(1, true), case(2, false)];
        let mut second = FileReport::new(PathBuf::from("b.lit"));
        second.cases = vec![case(1, true)];
        report.add_file(first);
        report.add_file(second);

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        let failures: Vec<_> = report.failures().map(|(f, c)| (f.path.clone(), c.line)).collect();
        assert_eq!(failures, vec![(PathBuf::from("a.lit"), 2)]);
    }

    #[test]
    fn test_json_shape() {
        let mut report = RunReport::default();
        let mut file = FileReport::new(PathBuf::from("a.lit"));
        file.cases = vec![case(3, false)];
        report.add_file(file);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["total"], 1);
        let outcome = &json["files"][0]["cases"][0]["outcome"];
        assert_eq!(outcome["status"], "fail");
        assert_eq!(outcome["reason"], "expected an error");
        assert_eq!(outcome["observed"]["tokens"][0], "int");
    }

    #[test]
    fn test_observation_descriptions() {
        let observed = Observation::default();
        assert_eq!(observed.describe_tokens(), "no tokens");
        assert_eq!(observed.describe_codes(), "no diagnostics");
    }
}
