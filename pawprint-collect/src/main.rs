//! pawprint-collect - paw-print collection builder
//!
//! Reads the worklist, copies each image into `objects/`, extracts EXIF/IPTC
//! metadata, reverse-geocodes GPS positions through the persistent cache and
//! writes the metadata table the site generator consumes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pawprint_collect::geocode::NominatimClient;
use pawprint_collect::hooks::run_hook;
use pawprint_collect::{CollectionBuilder, RunSummary, SkipReason};
use pawprint_common::config::{bootstrap, Bootstrap};
use pawprint_common::logging::init_tracing;

/// Command-line arguments for pawprint-collect
#[derive(Parser, Debug)]
#[command(name = "pawprint-collect")]
#[command(about = "Build the paw-print collection metadata table")]
#[command(version)]
struct Args {
    /// Project root (site folder)
    #[arg(short, long, env = "PAWPRINT_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/pawprint.toml, then user config dir)
    #[arg(short, long, env = "PAWPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Use only the geocode cache, never the network
    #[arg(long)]
    offline: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Run the derivatives command after writing the table
    #[arg(long)]
    derivatives: bool,

    /// Run the deploy command after writing the table
    #[arg(long)]
    deploy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let Bootstrap {
        config,
        paths,
        config_file,
    } = bootstrap(args.root.as_deref(), args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!(
        "Starting pawprint-collect v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_file {
        Some(path) => info!("Loaded config: {}", path.display()),
        None => info!("No config file found, using built-in defaults"),
    }
    info!("Project root: {}", paths.root.display());

    if args.deploy && config.hooks.deploy.is_none() {
        anyhow::bail!("--deploy given but no [hooks] deploy command is configured");
    }
    if args.derivatives && config.hooks.derivatives.is_none() {
        anyhow::bail!("--derivatives given but no [hooks] derivatives command is configured");
    }

    let mut builder = CollectionBuilder::new(paths.clone(), config.collection.clone())
        .with_progress(!args.no_progress);

    if args.offline || !config.geocode.enabled {
        info!("Reverse geocoding disabled, using cache only");
    } else {
        let client = NominatimClient::new(&config.geocode).context("Failed to create geocoder")?;
        builder = builder.with_geocoder(Box::new(client));
    }

    let summary = builder.run().await.context("Collection build failed")?;
    print_summary(&summary);

    if summary.nothing_to_do() {
        return Ok(());
    }

    if args.derivatives {
        if let Some(argv) = &config.hooks.derivatives {
            run_hook("derivatives", argv, &paths.root).await?;
        }
    }
    if args.deploy {
        if let Some(argv) = &config.hooks.deploy {
            run_hook("deploy", argv, &paths.root).await?;
        }
    }

    let pending_derivatives = if args.derivatives {
        None
    } else {
        Some(config.hooks.derivatives.as_deref().unwrap_or_default())
    };
    print_next_steps(pending_derivatives);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let table = match &summary.metadata_table {
        Some(table) => table,
        None => {
            println!("Worklist is empty, nothing to do.");
            return;
        }
    };

    println!("Wrote {} rows to {}", summary.rows_written, table.display());
    println!("  with GPS:         {}", summary.with_gps);
    println!("  species tagged:   {}", summary.species_tagged);
    println!(
        "  geocode:          {} cached, {} looked up, {} failed",
        summary.cache_hits, summary.geocoder_lookups, summary.geocoder_failures
    );
    println!("  unchanged copies: {}", summary.unchanged_copies);

    if !summary.skipped.is_empty() {
        warn!(count = summary.skipped.len(), "Some worklist entries were skipped");
        println!("Skipped {}:", summary.skipped.len());
        for item in &summary.skipped {
            match &item.reason {
                SkipReason::SourceMissing => println!("  {} (not found)", item.source),
                SkipReason::CopyFailed(e) => println!("  {} (copy failed: {})", item.source, e),
            }
        }
    }
}

/// `derivatives` is `None` when they were just generated
fn print_next_steps(derivatives: Option<&[String]>) {
    println!();
    println!("Next steps:");
    match derivatives {
        Some(argv) if !argv.is_empty() => {
            println!("  {}    # or rerun with --derivatives", argv.join(" "))
        }
        Some(_) => println!("  generate image derivatives for objects/"),
        None => {}
    }
    println!("  bundle exec jekyll s    # preview the site");
}
