//! Annotation sidecar files
//!
//! Each staged image `NAME.ext` may have a `NAME.txt` next to it whose first
//! line is the species tag (e.g. `cat`).

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sidecar path for an annotation image file name
pub fn sidecar_path(annotation_dir: &Path, annotation_file: &str) -> PathBuf {
    let stem = Path::new(annotation_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| annotation_file.to_string());
    annotation_dir.join(format!("{}.txt", stem))
}

/// Species tag from a sidecar file
///
/// Returns `None` when the file is missing, unreadable, or its first line is
/// blank.
pub fn read_species_tag(path: &Path) -> Option<String> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return None,
    };

    let mut first_line = String::new();
    if let Err(e) = BufReader::new(file).read_line(&mut first_line) {
        tracing::warn!(sidecar = %path.display(), error = %e, "Unreadable sidecar");
        return None;
    }

    let tag = first_line.trim_start_matches('\u{feff}').trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Species tag for an annotation image
pub fn species_for(annotation_dir: &Path, annotation_file: &str) -> Option<String> {
    read_species_tag(&sidecar_path(annotation_dir, annotation_file))
}
