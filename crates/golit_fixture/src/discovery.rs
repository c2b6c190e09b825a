//! Fixture file discovery.

use crate::config::HarnessConfig;
use crate::HarnessError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether a walked entry is hidden or a build directory.
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

/// Resolve the configured fixture paths under `root` into a sorted,
/// deduplicated list of files. Listed files are taken as is; directories
/// are walked for files with the configured extension.
pub fn discover_fixture_files(config: &HarnessConfig, root: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let extension = config.extension();
    let mut files = Vec::new();

    for relative in config.fixture_paths() {
        let path = root.join(&relative);
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            let walker = WalkDir::new(&path).into_iter().filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry.file_name().to_str().is_some_and(is_skipped_dir)
            });
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == extension) {
                    files.push(entry.into_path());
                }
            }
        } else {
            return Err(HarnessError::MissingFixture(path));
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), root = %root.display(), "discovered fixture files");
    Ok(files)
}
