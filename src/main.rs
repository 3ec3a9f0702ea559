// src/main.rs

//! iconharvest CLI
//!
//! Downloads item icons from the DayZ Fandom wiki into a categorized
//! folder tree.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use iconharvest::error::Result;
use iconharvest::models::Config;
use iconharvest::pipeline;

/// iconharvest - DayZ wiki item icon harvester
#[derive(Parser, Debug)]
#[command(name = "iconharvest", version, about = "DayZ wiki item icon harvester")]
struct Cli {
    /// Path to a TOML config file (built-in defaults apply when absent)
    #[arg(short, long, default_value = "iconharvest.toml")]
    config: PathBuf,

    /// Override the output directory
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: links, images, downloads
    Harvest,

    /// Collect and print deduplicated item links without downloading
    Links,

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(output) = cli.output {
        config.site.output_dir = output;
    }
    config.validate()?;

    match cli.command {
        Command::Harvest => {
            log::info!("Starting harvest into {}/", config.site.output_dir);
            let stats = pipeline::run_harvest(&config).await?;
            log::info!(
                "{} categories searched, {} unique items found",
                stats.category_count,
                stats.item_count
            );
        }

        Command::Links => {
            let items = pipeline::run_links(&config).await?;
            for item in &items {
                println!("{}\t{}\t{}", item.category, item.name, item.url);
            }
            log::info!("{} unique items", items.len());
        }

        Command::Validate => {
            log::info!("Configuration OK: {} seed categories", config.categories.len());
        }
    }

    Ok(())
}
