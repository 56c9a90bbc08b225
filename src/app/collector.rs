use crate::app::filter::Filter;
use crate::app::models::{Collection, FileRecord, SkippedFile, SnapshotConfig};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Unbounded walk of the project root that reads every eligible file.
pub struct Collector<'a> {
    root: &'a Path,
    config: &'a SnapshotConfig,
    skip_file: Option<PathBuf>,
}

impl<'a> Collector<'a> {
    pub fn new(root: &'a Path, config: &'a SnapshotConfig) -> Self {
        Self {
            root,
            config,
            skip_file: None,
        }
    }

    /// Never ingest `path` (the report destination, when it lives under the root).
    pub fn skipping(mut self, path: &Path) -> Self {
        self.skip_file = fs::canonicalize(path).ok();
        self
    }

    pub fn collect(&self) -> Collection {
        let filter = Filter::new(self.config, self.root);
        let mut collection = Collection::default();

        // Plain walk: only the configured exclusions apply, not .gitignore or hidden rules.
        let excluded: HashSet<String> = self.config.exclude_folders.clone();
        let walker = WalkBuilder::new(self.root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| !is_excluded_dir(entry, &excluded))
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if !is_file_like(&entry) {
                        continue;
                    }
                    match self.process_file(&filter, entry.path()) {
                        Some(Ok(record)) => collection.records.push(record),
                        Some(Err(skipped)) => {
                            log::warn!(
                                "Could not read {}: {}",
                                skipped.path.display(),
                                skipped.error
                            );
                            collection.skipped.push(skipped);
                        }
                        None => {}
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        collection
    }

    /// `None` for ineligible files, `Some(Err(_))` when an eligible file cannot be read.
    fn process_file(
        &self,
        filter: &Filter,
        path: &Path,
    ) -> Option<Result<FileRecord, SkippedFile>> {
        if !filter.is_eligible(path) {
            return None;
        }
        if self.is_skip_file(path) {
            log::info!("Skipping report destination {}", path.display());
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return Some(Err(SkippedFile {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                }));
            }
        };

        let relative = diff_paths(path, self.root)?;
        let relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Some(Ok(FileRecord {
            relative_path,
            char_count: content.chars().count(),
            content,
        }))
    }

    fn is_skip_file(&self, path: &Path) -> bool {
        let Some(skip) = &self.skip_file else {
            return false;
        };
        if path.file_name() != skip.file_name() {
            return false;
        }
        fs::canonicalize(path).is_ok_and(|p| &p == skip)
    }
}

/// Regular files, plus symlinks that do not resolve to a directory. Symlinked
/// directories are listed but never descended into.
fn is_file_like(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
        _ => false,
    }
}

fn is_excluded_dir(entry: &DirEntry, excluded: &HashSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && excluded.contains(entry.file_name().to_string_lossy().as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::{tempdir, TempDir};

    fn config(exts: &[&str], folders: &[&str], files: &[&str]) -> SnapshotConfig {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        SnapshotConfig {
            include_extensions: set(exts),
            exclude_folders: set(folders),
            exclude_files: set(files),
        }
    }

    fn setup_scenario() -> io::Result<TempDir> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "hi")?;
        fs::create_dir(dir.path().join("node_modules"))?;
        fs::write(dir.path().join("node_modules").join("b.txt"), "ignored")?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("sub").join("c.txt"), "xyz")?;
        Ok(dir)
    }

    fn sorted_stats(collection: &Collection) -> Vec<(String, usize)> {
        let mut stats: Vec<(String, usize)> = collection
            .stats()
            .into_iter()
            .map(|(p, n)| (p.to_string(), n))
            .collect();
        stats.sort();
        stats
    }

    #[test]
    fn collects_eligible_files_and_prunes_excluded_folders() -> io::Result<()> {
        let dir = setup_scenario()?;
        let cfg = config(&[".txt"], &["node_modules"], &[]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(
            sorted_stats(&collection),
            vec![("a.txt".to_string(), 2), ("sub/c.txt".to_string(), 3)]
        );
        assert_eq!(collection.total_chars(), 5);
        assert!(collection
            .records
            .iter()
            .all(|r| !r.relative_path.contains("node_modules")));
        Ok(())
    }

    #[test]
    fn excluded_files_and_other_extensions_are_dropped() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("keep.py"), "print(1)")?;
        fs::write(dir.path().join("secret.py"), "token")?;
        fs::write(dir.path().join("notes.rs"), "fn main() {}")?;
        fs::create_dir(dir.path().join("build"))?;
        fs::write(dir.path().join("build").join("output.py"), "x")?;
        let cfg = config(&[".py"], &["build"], &["secret.py"]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(sorted_stats(&collection), vec![("keep.py".to_string(), 8)]);
        Ok(())
    }

    #[test]
    fn no_depth_limit_and_hidden_files_included() -> io::Result<()> {
        let dir = tempdir()?;
        let deep = dir.path().join("a").join("b").join("c").join("d").join("e");
        fs::create_dir_all(&deep)?;
        fs::write(deep.join("deep.md"), "deep")?;
        fs::write(dir.path().join(".hidden.md"), "h")?;
        let cfg = config(&[".md"], &[], &[]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(
            sorted_stats(&collection),
            vec![
                (".hidden.md".to_string(), 1),
                ("a/b/c/d/e/deep.md".to_string(), 4)
            ]
        );
        Ok(())
    }

    #[test]
    fn counts_characters_not_bytes() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("u.txt"), "héllo→")?;
        let cfg = config(&[".txt"], &[], &[]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(collection.records[0].char_count, 6);
        assert_eq!(collection.records[0].content, "héllo→");
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_skipped() -> io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0x80])?;
        fs::write(dir.path().join("good.txt"), "ok")?;
        let cfg = config(&[".txt"], &[], &[]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(sorted_stats(&collection), vec![("good.txt".to_string(), 2)]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_recorded_once() -> io::Result<()> {
        use std::os::unix::fs::symlink;

        let dir = tempdir()?;
        // Dangling link: listed as a file, fails to open even for root.
        symlink(dir.path().join("missing"), dir.path().join("broken.txt"))?;
        fs::write(dir.path().join("open.txt"), "abc")?;
        let cfg = config(&[".txt"], &[], &[]);

        let collection = Collector::new(dir.path(), &cfg).collect();

        assert_eq!(sorted_stats(&collection), vec![("open.txt".to_string(), 3)]);
        assert_eq!(collection.total_chars(), 3);
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].path, dir.path().join("broken.txt"));
        assert!(!collection.skipped[0].error.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn permission_denied_is_skipped() -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let locked = dir.path().join("locked.txt");
        fs::write(&locked, "secret")?;
        fs::write(dir.path().join("open.txt"), "abc")?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        // Root ignores permission bits.
        if fs::read_to_string(&locked).is_ok() {
            return Ok(());
        }

        let cfg = config(&[".txt"], &[], &[]);
        let collection = Collector::new(dir.path(), &cfg).collect();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
        assert_eq!(sorted_stats(&collection), vec![("open.txt".to_string(), 3)]);
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(collection.skipped[0].path, locked);
        Ok(())
    }

    #[test]
    fn read_failure_is_returned_not_collected() -> io::Result<()> {
        let dir = tempdir()?;
        let not_a_file = dir.path().join("x.txt");
        fs::create_dir(&not_a_file)?;
        let cfg = config(&[".txt"], &[], &[]);
        let collector = Collector::new(dir.path(), &cfg);
        let filter = Filter::new(&cfg, dir.path());

        match collector.process_file(&filter, &not_a_file) {
            Some(Err(skipped)) => assert_eq!(skipped.path, not_a_file),
            other => panic!("expected a read failure, got {:?}", other),
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_collected_and_linked_dir_not_followed() -> io::Result<()> {
        use std::os::unix::fs::symlink;

        let dir = tempdir()?;
        let root = dir.path().join("proj");
        fs::create_dir(&root)?;
        fs::write(dir.path().join("real.txt"), "hello")?;
        symlink(dir.path().join("real.txt"), root.join("link.txt"))?;
        fs::create_dir(dir.path().join("outside"))?;
        fs::write(dir.path().join("outside").join("far.txt"), "far")?;
        symlink(dir.path().join("outside"), root.join("linked_dir"))?;
        let cfg = config(&[".txt"], &[], &[]);

        let collection = Collector::new(&root, &cfg).collect();

        assert_eq!(sorted_stats(&collection), vec![("link.txt".to_string(), 5)]);
        assert_eq!(collection.records[0].content, "hello");
        assert!(collection.skipped.is_empty());
        Ok(())
    }

    #[test]
    fn report_destination_is_not_ingested() -> io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("tools"))?;
        let output = dir.path().join("tools").join("output_all_code.txt");
        fs::write(&output, "previous report")?;
        fs::write(dir.path().join("a.txt"), "hi")?;
        let cfg = config(&[".txt"], &[], &[]);

        let collection = Collector::new(dir.path(), &cfg).skipping(&output).collect();

        assert_eq!(sorted_stats(&collection), vec![("a.txt".to_string(), 2)]);
        Ok(())
    }

    #[test]
    fn repeated_collection_is_stable() -> io::Result<()> {
        let dir = setup_scenario()?;
        let cfg = config(&[".txt"], &["node_modules"], &[]);
        let collector = Collector::new(dir.path(), &cfg);

        let mut first = collector.collect().records;
        let mut second = collector.collect().records;
        first.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        second.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        assert_eq!(first, second);
        Ok(())
    }
}
