use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate a project's source files into a single snapshot report"
)]
pub struct Cli {
    /// Project root to snapshot (default: parent of the executable's directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file, JSON or TOML (default: config.json beside the executable)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report destination (default: output_all_code.txt beside the executable)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Deepest level of the directory tree to show. The root is level 0, so 0
    /// prints only the root line and the default shows three levels below it
    /// (collection itself is never depth-limited)
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,
}
