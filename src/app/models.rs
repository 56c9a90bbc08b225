use std::collections::HashSet;
use std::path::PathBuf;

/// Extension allow-list and name-based exclusions, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct SnapshotConfig {
    /// Lowercased, dot-prefixed (e.g. `.rs`).
    pub include_extensions: HashSet<String>,
    pub exclude_folders: HashSet<String>,
    pub exclude_files: HashSet<String>,
}

/// Locations the run operates on, resolved once from CLI args and the executable's location.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub output_file: PathBuf,
    pub max_depth: usize,
}

/// One eligible file that was read successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub relative_path: String,
    pub content: String,
    pub char_count: usize,
}

/// An eligible file that could not be read as text.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Collector output: records and read failures, both in walk order.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl Collection {
    /// (path, character count) pairs in walk order.
    pub fn stats(&self) -> Vec<(&str, usize)> {
        self.records
            .iter()
            .map(|r| (r.relative_path.as_str(), r.char_count))
            .collect()
    }

    pub fn total_chars(&self) -> usize {
        self.records.iter().map(|r| r.char_count).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
