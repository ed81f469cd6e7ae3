//! Build identification shared by the binaries' build scripts
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` to the crate
//! being built, for the startup log line. No `rerun-if-changed` is emitted,
//! so the values refresh on every build.

use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Short commit hash of the checkout, if built from git
fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

/// Local time with offset, e.g. `2025-10-26T14:30:45-05:00`
fn build_timestamp() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

/// Print the `cargo:rustc-env` lines
pub fn emit() {
    let values = [
        ("GIT_HASH", git_short_hash().unwrap_or_else(|| UNKNOWN.to_string())),
        ("BUILD_TIMESTAMP", build_timestamp()),
        (
            "BUILD_PROFILE",
            std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
        ),
    ];
    for (name, value) in values {
        println!("cargo:rustc-env={}={}", name, value);
    }
}
