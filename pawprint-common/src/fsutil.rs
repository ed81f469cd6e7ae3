//! Best-effort asset copy
//!
//! Copies carry the source modification time over (like `cp -p`) and are
//! skipped when the destination already holds identical bytes, so re-running
//! a tool over an unchanged worklist does not rewrite every asset.

use crate::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What `copy_preserving` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Bytes were written to the destination
    Copied,
    /// Destination already matched the source
    Unchanged,
}

/// Calculate SHA-256 of a file as lowercase hex
///
/// Reads in 1MB chunks.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 1024 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// True when both files exist with the same length and content hash
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let (meta_a, meta_b) = match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(meta_a), Ok(meta_b)) => (meta_a, meta_b),
        _ => return Ok(false),
    };
    if !meta_a.is_file() || !meta_b.is_file() || meta_a.len() != meta_b.len() {
        return Ok(false);
    }
    Ok(file_sha256(a)? == file_sha256(b)?)
}

/// Copy `src` to `dest`, keeping the source modification time
pub fn copy_preserving(src: &Path, dest: &Path) -> Result<CopyOutcome> {
    if same_content(src, dest)? {
        tracing::debug!(src = %src.display(), dest = %dest.display(), "Destination unchanged");
        return Ok(CopyOutcome::Unchanged);
    }

    std::fs::copy(src, dest)?;

    // Timestamp loss is not worth failing the item over.
    let modified = std::fs::metadata(src).and_then(|meta| meta.modified());
    match modified {
        Ok(mtime) => {
            let result = File::options()
                .write(true)
                .open(dest)
                .and_then(|file| file.set_modified(mtime));
            if let Err(e) = result {
                tracing::debug!(dest = %dest.display(), error = %e, "Could not preserve mtime");
            }
        }
        Err(e) => {
            tracing::debug!(src = %src.display(), error = %e, "Source mtime unavailable");
        }
    }

    Ok(CopyOutcome::Copied)
}
