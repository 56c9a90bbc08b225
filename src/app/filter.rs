use crate::app::models::SnapshotConfig;
use std::path::Path;

/// Eligibility predicates shared by the collector and the tree renderer.
pub struct Filter<'a> {
    config: &'a SnapshotConfig,
    root: &'a Path,
}

impl<'a> Filter<'a> {
    pub fn new(config: &'a SnapshotConfig, root: &'a Path) -> Self {
        Self { config, root }
    }

    /// True iff the lowercased `.ext` of `path` is allow-listed.
    pub fn is_included_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let dotted = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.config.include_extensions.contains(&dotted)
            }
            None => false,
        }
    }

    /// True iff the basename is an excluded file, or any component below the
    /// root is an excluded folder name. Matching is by name only, not by type.
    pub fn should_skip(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name() {
            if self.config.exclude_files.contains(name.to_string_lossy().as_ref()) {
                return true;
            }
        }

        let relative = path.strip_prefix(self.root).unwrap_or(path);
        relative.components().any(|c| {
            self.config
                .exclude_folders
                .contains(c.as_os_str().to_string_lossy().as_ref())
        })
    }

    pub fn is_eligible(&self, path: &Path) -> bool {
        self.is_included_extension(path) && !self.should_skip(path)
    }

    /// Name-level check used when listing a directory: either exclusion set applies.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.config.exclude_folders.contains(name) || self.config.exclude_files.contains(name)
    }
}
