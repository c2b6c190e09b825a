//! golit.json: which fixture files to run and how.

use crate::HarnessError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Harness options, matching the golit.json schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Fixture files or directories, relative to the config's directory.
    pub fixtures: Option<Vec<PathBuf>>,
    /// Extension of fixture files inside directories (without the dot).
    pub extension: Option<String>,
    /// Stop at the first failing case.
    pub fail_fast: Option<bool>,
    /// Run fixture files in parallel.
    pub parallel: Option<bool>,
}

impl HarnessConfig {
    pub const FILE_NAME: &'static str = "golit.json";
    pub const DEFAULT_EXTENSION: &'static str = "lit";

    /// Parse a golit.json document.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a golit.json file.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded harness config");
        Ok(config)
    }

    /// Load `dir/golit.json` if present, otherwise use the defaults.
    pub fn discover(dir: &Path) -> Result<Self, HarnessError> {
        let path = dir.join(Self::FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Fixture roots; the config directory itself when none are listed.
    pub fn fixture_paths(&self) -> Vec<PathBuf> {
        match self.fixtures {
            Some(ref paths) if !paths.is_empty() => paths.clone(),
            _ => vec![PathBuf::from(".")],
        }
    }

    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .map(|ext| ext.trim_start_matches('.'))
            .unwrap_or(Self::DEFAULT_EXTENSION)
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast.unwrap_or(false)
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
