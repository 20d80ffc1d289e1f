use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docsgen",
    version,
    about = "API documentation generator for multi-language repositories",
    after_help = r#"Examples:
  docsgen generate --repo .
  docsgen generate --repo . --format split --languages ts,py
  docsgen generate --exclude '(^|/)tests?/' --output-dir build/docs
  docsgen inventory --repo . --languages go
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan the repository and write Markdown docs.
    Generate {
        #[command(flatten)]
        scan: ScanArgs,
        /// Output directory (default: <repo>/docs).
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Which API pages to write.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the extracted inventory as JSON.
    Inventory {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Regex a relative path must match; repeatable.
    #[arg(long)]
    pub include: Vec<String>,
    /// Regex that drops a relative path; repeatable.
    #[arg(long)]
    pub exclude: Vec<String>,
    /// Comma-separated language names or aliases.
    #[arg(long)]
    pub languages: Option<String>,
    /// Settings file (default: docsgen.json in the repo root).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Include files ignored by .gitignore.
    #[arg(long)]
    pub no_ignore: bool,
    #[arg(long, short)]
    pub verbose: bool,
}
