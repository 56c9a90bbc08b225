// Declare modules
pub mod cli;
pub mod collector;
pub mod config;
pub mod filter;
pub mod models;
pub mod report;
pub mod tree;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::collector::Collector;
use self::config::{load_config, resolve_paths, tool_dir};
use self::filter::Filter;
use self::report::{console_summary, ReportWriter, SystemClock};
use self::tree::render_tree;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve locations relative to the executable
    let paths = resolve_paths(args, &tool_dir()?);

    // 3. Load Configuration (fatal on failure, before any output is touched)
    let config = load_config(&paths.config_file)?;

    // 4. Collect file contents
    log::info!("Collecting text files...");
    let collection = Collector::new(&paths.root, &config)
        .skipping(&paths.output_file)
        .collect();
    log::info!("Collected {} files.", collection.len());
    if !collection.skipped.is_empty() {
        log::warn!("Skipped {} unreadable files.", collection.skipped.len());
    }
    if collection.is_empty() {
        log::warn!("No files matched the configured extensions.");
    }

    // 5. Render the tree in its own, depth-bounded walk
    log::info!("Generating directory structure...");
    let filter = Filter::new(&config, &paths.root);
    let tree_lines = render_tree(&paths.root, &filter, paths.max_depth);

    // 6. Write the report
    log::info!("Writing output to {} ...", paths.output_file.display());
    ReportWriter::new(SystemClock).write(&paths.output_file, &collection, &tree_lines)?;
    log::info!("Done!");

    // 7. Echo statistics to stdout
    print!("{}", console_summary(&collection, &tree_lines));

    Ok(())
}
