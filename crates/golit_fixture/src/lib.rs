//! golit_fixture: Invalid-literal fixture files and the harness that runs
//! them against the scanner.
//!
//! A fixture file lists one literal per line with the diagnostics it must
//! (or must not) produce. See [`fixture`] for the format.

pub mod config;
pub mod discovery;
pub mod fixture;
pub mod report;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

pub use config::HarnessConfig;
pub use discovery::discover_fixture_files;
pub use fixture::{parse_fixture, Expectation, Fixture, FixtureCase, FixtureError};
pub use report::{CaseOutcome, CaseReport, FileReport, Observation, RunReport};
pub use runner::{run_all, run_case, run_file, run_fixture};

/// Errors that stop the harness before cases can run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: FixtureError,
    },

    #[error("fixture path {} does not exist", .0.display())]
    MissingFixture(PathBuf),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
