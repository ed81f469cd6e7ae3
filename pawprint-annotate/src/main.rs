//! pawprint-annotate - annotation folder staging
//!
//! Copies worklist images into the annotation folder under unique names,
//! records them in the annotation map and reports on species tag coverage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pawprint_annotate::{stage_worklist, workspace_status, StageReport, StatusReport};
use pawprint_common::config::{bootstrap, Bootstrap};
use pawprint_common::logging::init_tracing;

/// Command-line arguments for pawprint-annotate
#[derive(Parser, Debug)]
#[command(name = "pawprint-annotate")]
#[command(about = "Stage worklist images for species annotation")]
#[command(version)]
struct Args {
    /// Project root (site folder)
    #[arg(short, long, env = "PAWPRINT_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/pawprint.toml, then user config dir)
    #[arg(short, long, env = "PAWPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Only report status, do not stage
    #[arg(long)]
    status_only: bool,

    /// List every image without a species tag
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let Bootstrap {
        config,
        paths,
        config_file,
    } = bootstrap(args.root.as_deref(), args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!(
        "Starting pawprint-annotate v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_file {
        Some(path) => info!("Loaded config: {}", path.display()),
        None => info!("No config file found, using built-in defaults"),
    }
    info!("Annotation folder: {}", paths.annotation_dir.display());

    if !args.status_only {
        let report = stage_worklist(&paths, !args.no_progress).context("Staging failed")?;
        print_stage_report(&report);
        if report.nothing_to_do() {
            return Ok(());
        }
    }

    let status = workspace_status(&paths).context("Status check failed")?;
    print_status(&status, args.verbose);

    Ok(())
}

fn print_stage_report(report: &StageReport) {
    if report.nothing_to_do() {
        println!("Worklist is empty, nothing to do.");
        return;
    }

    println!("Staged {} new image(s)", report.staged.len());
    println!("  already mapped: {}", report.already_mapped);
    println!("  errors:         {}", report.error_count());
    for source in &report.missing {
        println!("    {} (not found)", source);
    }
    for (source, reason) in &report.failed {
        println!("    {} (copy failed: {})", source, reason);
    }
}

fn print_status(status: &StatusReport, verbose: bool) {
    println!();
    println!("Annotation map: {} entries", status.mapped);

    if !status.orphaned.is_empty() {
        println!("Orphaned (no longer in worklist, kept): {}", status.orphaned.len());
        for entry in &status.orphaned {
            println!("    {} -> {}", entry.source_file, entry.annotation_file);
        }
    }

    if !status.missing_files.is_empty() {
        println!("Missing from annotation folder: {}", status.missing_files.len());
        for entry in &status.missing_files {
            println!("    {} (from {})", entry.annotation_file, entry.source_file);
        }
    }

    let present = status.tagged + status.untagged.len();
    println!("Species tags: {}/{} images tagged", status.tagged, present);
    if verbose {
        for name in &status.untagged {
            println!("    untagged: {}", name);
        }
    } else if !status.untagged.is_empty() {
        println!("  (use --verbose to list untagged images)");
    }
}
