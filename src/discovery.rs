use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::LineageError;

/// Directories never searched for fact files
const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules"];

/// Finds fact files under a set of input paths
pub struct FactDiscovery {
    pattern: Pattern,
}

impl FactDiscovery {
    pub fn new(pattern: &str) -> Result<Self, LineageError> {
        let pattern = Pattern::new(pattern).map_err(|e| LineageError::ConfigurationError {
            message: format!("Invalid glob pattern '{pattern}': {e}"),
        })?;
        Ok(Self { pattern })
    }

    /// Fact files under `paths`, sorted and without duplicates.
    ///
    /// Directories are searched recursively for file names matching the
    /// pattern; files given directly are taken as they are. Missing paths
    /// are reported and skipped.
    pub fn discover(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();

        for path in paths {
            if path.is_file() {
                found.insert(path.clone());
                continue;
            }

            if !path.is_dir() {
                eprintln!(
                    "{} Path '{}' does not exist",
                    console::style("⚠").yellow(),
                    path.display()
                );
                warn!(path = %path.display(), "skipping missing input path");
                continue;
            }

            found.extend(self.discover_in_dir(path));
        }

        debug!(count = found.len(), pattern = %self.pattern, "discovered fact files");
        found.into_iter().collect()
    }

    fn discover_in_dir(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !SKIPPED_DIRS.iter().any(|skipped| e.file_name() == *skipped)
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|name| self.pattern.matches(name))
            })
            .map(|e| e.into_path())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_discover_matching_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("a.json"), "{}").unwrap();
        fs::write(root.join("nested/deeper/b.json"), "{}").unwrap();
        fs::write(root.join("nested/notes.txt"), "").unwrap();
        fs::write(root.join("target/c.json"), "{}").unwrap();

        let discovery = FactDiscovery::new("*.json").unwrap();
        let found = discovery.discover(&[root.to_path_buf()]);

        assert_eq!(
            found,
            vec![root.join("a.json"), root.join("nested/deeper/b.json")]
        );
    }

    #[test]
    fn test_explicit_files_and_duplicates() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("facts.toml");
        fs::write(&file, "").unwrap();

        let discovery = FactDiscovery::new("*.json").unwrap();
        let found = discovery.discover(&[file.clone(), file.clone()]);
        assert_eq!(found, vec![file]);
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let discovery = FactDiscovery::new("*.json").unwrap();
        assert!(discovery.discover(&[PathBuf::from("/nonexistent/facts")]).is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FactDiscovery::new("[").is_err());
    }
}
