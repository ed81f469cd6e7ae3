//! Stage worklist images into the annotation folder
//!
//! Each source is copied once under a collision-free name and recorded in
//! the annotation map. Sources already mapped are left alone so existing
//! sidecar tags survive reruns.

use pawprint_common::fsutil::copy_preserving;
use pawprint_common::progress::item_progress;
use pawprint_common::{worklist, AnnotationMap, ProjectPaths, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::naming::{unique_name, ReservedNames};

/// A source newly copied into the annotation folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub source: String,
    pub annotation_file: String,
}

/// Outcome of one staging pass
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub worklist_entries: usize,
    pub staged: Vec<StagedImage>,
    pub already_mapped: usize,
    /// Sources that do not exist
    pub missing: Vec<String>,
    /// Sources that exist but could not be copied, with the reason
    pub failed: Vec<(String, String)>,
}

impl StageReport {
    pub fn nothing_to_do(&self) -> bool {
        self.worklist_entries == 0
    }

    /// Missing plus failed sources
    pub fn error_count(&self) -> usize {
        self.missing.len() + self.failed.len()
    }
}

/// Files in the annotation folder (images and sidecars) plus names already
/// assigned in the map
pub fn reserved_names(map: &AnnotationMap, annotation_dir: &Path) -> Result<ReservedNames> {
    let mut names: ReservedNames = map.reserved_names().iter().collect();
    for entry in std::fs::read_dir(annotation_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.reserve(&entry.file_name().to_string_lossy());
        }
    }
    Ok(names)
}

/// Copy unmapped worklist sources into the annotation folder and save the map
pub fn stage_worklist(paths: &ProjectPaths, show_progress: bool) -> Result<StageReport> {
    let mut report = StageReport::default();

    std::fs::create_dir_all(&paths.annotation_dir)?;

    let sources = worklist::read_worklist(&paths.worklist)?;
    report.worklist_entries = sources.len();
    if sources.is_empty() {
        info!(worklist = %paths.worklist.display(), "No image paths in worklist, nothing to do");
        return Ok(report);
    }

    let mut map = AnnotationMap::load(&paths.annotation_map)?;
    let mut reserved = reserved_names(&map, &paths.annotation_dir)?;
    debug!(mapped = map.len(), reserved = reserved.len(), "Loaded annotation map");

    let pb = item_progress(sources.len() as u64, "Staging images", show_progress);

    for source in &sources {
        pb.inc(1);

        if map.contains(source) {
            report.already_mapped += 1;
            continue;
        }

        let src = Path::new(source);
        if !src.is_file() {
            pb.suspend(|| warn!(source = %source, "Source not found"));
            report.missing.push(source.clone());
            continue;
        }

        let file_name = match src.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                pb.suspend(|| warn!(source = %source, "Source has no file name"));
                report.missing.push(source.clone());
                continue;
            }
        };

        let annotation_file = unique_name(&file_name, &reserved);
        let dest = paths.annotation_dir.join(&annotation_file);
        if let Err(e) = copy_preserving(src, &dest) {
            pb.suspend(|| warn!(source = %source, error = %e, "Copy failed"));
            report.failed.push((source.clone(), e.to_string()));
            continue;
        }

        debug!(source = %source, annotation_file = %annotation_file, "Staged");
        reserved.reserve(&annotation_file);
        map.insert(source.clone(), annotation_file.clone());
        report.staged.push(StagedImage {
            source: source.clone(),
            annotation_file,
        });
    }
    pb.finish_and_clear();

    map.save(&paths.annotation_map)?;

    info!(
        staged = report.staged.len(),
        already_mapped = report.already_mapped,
        errors = report.error_count(),
        "Staging complete"
    );

    Ok(report)
}
