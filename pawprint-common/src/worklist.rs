//! Worklist CSV reading
//!
//! The worklist is a CSV with a header row and an `image_path` column. Each
//! non-blank value names one source image, in the order the collection should
//! be numbered.

use crate::{Error, Result};
use std::io::Read;
use std::path::Path;

/// Column holding source image paths
pub const IMAGE_PATH_COLUMN: &str = "image_path";

/// Read source image paths from a worklist file
pub fn read_worklist(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let paths = read_worklist_from(file)?;
    tracing::debug!(worklist = %path.display(), entries = paths.len(), "Read worklist");
    Ok(paths)
}

/// Read source image paths from any CSV source
///
/// Values are trimmed and blank values dropped. Duplicates are kept.
pub fn read_worklist_from<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == IMAGE_PATH_COLUMN)
        .ok_or_else(|| {
            Error::InvalidInput(format!("worklist has no '{}' column", IMAGE_PATH_COLUMN))
        })?;

    let mut paths = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                paths.push(value.to_string());
            }
        }
    }
    Ok(paths)
}
