//! Progress bar for the per-item loops

use indicatif::{ProgressBar, ProgressStyle};

/// Bar over `len` items on stderr, hidden when `enabled` is false
pub fn item_progress(len: u64, message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("##-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
