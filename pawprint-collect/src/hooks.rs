//! Post-run external commands
//!
//! Derivative generation and deployment belong to other tools; the collector
//! only launches them in the project root once the table is written.

use crate::error::{CollectError, CollectResult};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Run one configured command and wait for it
///
/// `argv[0]` is the program; the rest are its arguments. Output is inherited
/// so the user sees the tool's own progress.
pub async fn run_hook(name: &str, argv: &[String], working_dir: &Path) -> CollectResult<()> {
    let (program, args) = argv.split_first().ok_or_else(|| CollectError::Hook {
        name: name.to_string(),
        reason: "no command configured".to_string(),
    })?;

    info!(hook = name, command = %argv.join(" "), dir = %working_dir.display(), "Running hook");

    let status = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .status()
        .await
        .map_err(|e| CollectError::Hook {
            name: name.to_string(),
            reason: format!("failed to start '{}': {}", program, e),
        })?;

    if !status.success() {
        return Err(CollectError::Hook {
            name: name.to_string(),
            reason: match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            },
        });
    }

    info!(hook = name, "Hook finished");
    Ok(())
}
