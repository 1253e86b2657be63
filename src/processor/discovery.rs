//! File discovery module for IIS log inputs
//!
//! Resolves the input path into the list of log files to analyse: a single
//! file is taken as given, a directory is walked for `.log` files.

use crate::constants::LOG_FILE_EXTENSION;
use crate::error::{LogAnalyzerError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for IIS log inputs
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            recursive: true,
        }
    }

    /// Only look at the top level of a directory input
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Discover the log files to analyse, sorted by path
    ///
    /// A file input is returned whatever its extension. Directory inputs are
    /// searched for files ending in `.log`:
    /// ```text
    /// logs/
    ///   W3SVC1/
    ///     u_ex240101.log
    ///     u_ex240102.log
    ///   W3SVC2/
    ///     u_ex240101.log
    /// ```
    pub fn discover_log_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.exists() {
            return Err(LogAnalyzerError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        if self.input_path.is_file() {
            return Ok(vec![self.input_path.clone()]);
        }

        debug!("Searching for log files in: {}", self.input_path.display());

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_path).max_depth(max_depth) {
            let entry = entry.map_err(|e| {
                LogAnalyzerError::Io(std::io::Error::other(format!(
                    "Failed to walk {}: {}",
                    self.input_path.display(),
                    e
                )))
            })?;

            if entry.file_type().is_file() && is_log_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} log files", files.len());

        Ok(files)
    }
}

/// Check if a path is an IIS log file
fn is_log_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LOG_FILE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a test log directory structure
    fn create_test_logs(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("logs");

        let site1 = root.join("W3SVC1");
        fs::create_dir_all(&site1).unwrap();
        fs::write(site1.join("u_ex240101.log"), "#Fields: a\n1\n").unwrap();
        fs::write(site1.join("u_ex240102.log"), "#Fields: a\n1\n").unwrap();

        let site2 = root.join("W3SVC2");
        fs::create_dir_all(&site2).unwrap();
        fs::write(site2.join("u_ex240101.LOG"), "#Fields: a\n1\n").unwrap();

        // Not a log file
        fs::write(root.join("notes.txt"), "ignored").unwrap();
        fs::write(root.join("top.log"), "#Fields: a\n1\n").unwrap();

        root
    }

    #[test]
    fn test_discover_log_files_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_logs(&temp_dir);

        let files = FileDiscovery::new(root).discover_log_files().unwrap();

        assert_eq!(files.len(), 4);
        for file in &files {
            assert!(is_log_file(file));
        }

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_discover_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_logs(&temp_dir);

        let files = FileDiscovery::new(root)
            .non_recursive()
            .discover_log_files()
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "top.log");
    }

    #[test]
    fn test_single_file_input_is_used_as_is() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("access.txt");
        fs::write(&file, "#Fields: a\n1\n").unwrap();

        let files = FileDiscovery::new(file.clone()).discover_log_files().unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        match FileDiscovery::new(missing.clone()).discover_log_files() {
            Err(LogAnalyzerError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected InputNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = FileDiscovery::new(temp_dir.path().to_path_buf())
            .discover_log_files()
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_is_log_file() {
        assert!(is_log_file(Path::new("u_ex240101.log")));
        assert!(is_log_file(Path::new("/var/log/iis/u_ex240101.LOG")));
        assert!(!is_log_file(Path::new("test.txt")));
        assert!(!is_log_file(Path::new("log")));
    }
}
