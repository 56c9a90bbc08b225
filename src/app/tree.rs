//! Depth-bounded ASCII rendering of the project tree.

use crate::app::filter::Filter;
use std::fs;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const BLANK_INDENT: &str = "    ";

/// Renders `root` as tree lines. The root line is depth 0; a directory's
/// children are listed only while its depth is below `max_depth`.
///
/// This walk is independent of the collector's and bounded, so files deeper
/// than `max_depth` are collected but not drawn here.
pub fn render_tree(root: &Path, filter: &Filter, max_depth: usize) -> Vec<String> {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut lines = vec![format!("{}/", name)];
    lines.extend(build_level(root, filter, "", 0, max_depth));
    lines
}

fn build_level(
    dir: &Path,
    filter: &Filter,
    prefix: &str,
    depth: usize,
    max_depth: usize,
) -> Vec<String> {
    if depth >= max_depth {
        return Vec::new();
    }

    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            log::debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if filter.is_excluded_name(&name) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            // Symlinked directories are shown but, like in the collector, not followed.
            let followable = entry.file_type().is_ok_and(|ft| !ft.is_symlink());
            dirs.push((name, followable));
        } else if filter.is_eligible(&path) {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    let total = dirs.len() + files.len();
    let mut lines = Vec::new();

    for (i, (name, followable)) in dirs.iter().enumerate() {
        let is_last = i + 1 == total;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}/", prefix, connector, name));
        if !followable {
            continue;
        }

        let indent = if is_last { BLANK_INDENT } else { PIPE_INDENT };
        let child_prefix = format!("{}{}", prefix, indent);
        lines.extend(build_level(
            &dir.join(name),
            filter,
            &child_prefix,
            depth + 1,
            max_depth,
        ));
    }

    for (i, name) in files.iter().enumerate() {
        let is_last = dirs.len() + i + 1 == total;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, name));
    }

    lines
}
