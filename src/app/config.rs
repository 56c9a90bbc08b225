use crate::app::cli::Cli;
use crate::app::models::{RunPaths, SnapshotConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const OUTPUT_FILE_NAME: &str = "output_all_code.txt";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ConfigFile {
    include_extensions: Vec<String>,
    exclude_folders: Vec<String>,
    exclude_files: Vec<String>,
}

/// Reads the configuration document. `.toml` files are parsed as TOML, anything else as JSON.
pub fn load_config(path: &Path) -> Result<SnapshotConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let parsed: ConfigFile = if is_toml {
        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?
    };

    Ok(SnapshotConfig {
        include_extensions: parsed
            .include_extensions
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect(),
        exclude_folders: parsed.exclude_folders.into_iter().collect(),
        exclude_files: parsed.exclude_files.into_iter().collect(),
    })
}

/// Directory holding the running executable; defaults are laid out relative to it.
pub fn tool_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.to_path_buf())
}

/// Applies CLI overrides on top of the install-relative defaults.
pub fn resolve_paths(cli: Cli, tool_dir: &Path) -> RunPaths {
    let root = cli.root.unwrap_or_else(|| {
        tool_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| tool_dir.to_path_buf())
    });

    RunPaths {
        root,
        config_file: cli.config.unwrap_or_else(|| tool_dir.join(CONFIG_FILE_NAME)),
        output_file: cli.output.unwrap_or_else(|| tool_dir.join(OUTPUT_FILE_NAME)),
        max_depth: cli.max_depth,
    }
}
