use anyhow::{Context, Result};
use clap::Parser;
use docsgen::cli::{self, ScanArgs};
use docsgen::config::Config;
use docsgen::indexer::{self, extract::LanguageTable, scan};
use docsgen::model::Inventory;
use docsgen::render;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "docsgen=debug" } else { "docsgen=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves the repo, settings and language table, then indexes.
fn load_inventory(args: &ScanArgs) -> Result<(PathBuf, Config, Inventory)> {
    let repo = std::fs::canonicalize(&args.repo)
        .with_context(|| format!("repository {}", args.repo.display()))?;
    let config = Config::load(&repo, args.config.as_deref()).with_overrides(
        &args.include,
        &args.exclude,
        args.languages.as_deref(),
    );

    let mut table = LanguageTable::default();
    if let Some(languages) = scan::normalize_language_filter(&config.languages, &table)? {
        table.retain(&languages);
    }
    let options = scan::ScanOptions::from_config(&config, args.no_ignore)?;
    let inventory = indexer::index_repo(&repo, table, &options)?;
    Ok((repo, config, inventory))
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Generate {
            scan,
            output_dir,
            format,
        } => {
            init_tracing(scan.verbose);
            let (repo, config, inventory) = load_inventory(&scan)?;
            // Relative config paths are anchored at the repo; flags at the cwd.
            let output_dir = output_dir.unwrap_or_else(|| match &config.output_dir {
                Some(dir) => repo.join(dir),
                None => repo.join("docs"),
            });
            let format = format.unwrap_or(config.format);
            let written = render::write_docs(&inventory, &output_dir, format)?;
            info!(files = written.len(), dir = %output_dir.display(), "wrote docs");
            println!("Wrote docs to {}", output_dir.display());
            Ok(())
        }
        cli::Command::Inventory { scan } => {
            init_tracing(scan.verbose);
            let (_, _, inventory) = load_inventory(&scan)?;
            println!("{}", serde_json::to_string_pretty(&inventory)?);
            Ok(())
        }
    }
}
