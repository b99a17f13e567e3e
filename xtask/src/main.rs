//! Developer tasks for dirwatcher.
//!
//! Run with `cargo run -p xtask -- <task>`.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask", about = "Developer tasks for dirwatcher")]
enum Task {
    /// Render the dirwatcher(1) manual page from the CLI definition
    GenerateManPages {
        /// Directory the page is written to
        #[arg(short, long, default_value = "man")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    match Task::parse() {
        Task::GenerateManPages { output } => write_man_page(&output),
    }
}

fn write_man_page(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let page = output_dir.join("dirwatcher.1");
    let file = fs::File::create(&page)
        .with_context(|| format!("Failed to create {}", page.display()))?;

    clap_mangen::Man::new(dirwatcher::cli::Cli::command())
        .render(&mut std::io::BufWriter::new(file))
        .with_context(|| format!("Failed to render {}", page.display()))?;

    println!("wrote {}", page.display());
    println!("preview with: man -l {}", page.display());
    Ok(())
}
