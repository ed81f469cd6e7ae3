//! Annotation workspace status

use pawprint_common::annotation_map::MapEntry;
use pawprint_common::{sidecar, worklist, AnnotationMap, ProjectPaths, Result};
use std::collections::HashSet;

/// Consistency report for the map, the folder and the worklist
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub mapped: usize,

    /// Mapped sources no longer in the worklist (kept in the map)
    pub orphaned: Vec<MapEntry>,

    /// Mapped entries whose annotation file is gone from the folder
    pub missing_files: Vec<MapEntry>,

    /// Present images with a non-empty species tag
    pub tagged: usize,

    /// Present images without a species tag
    pub untagged: Vec<String>,
}

/// Compare the annotation map against the worklist and the folder
pub fn workspace_status(paths: &ProjectPaths) -> Result<StatusReport> {
    let map = AnnotationMap::load(&paths.annotation_map)?;
    let sources = worklist::read_worklist(&paths.worklist)?;
    Ok(status_of(&map, &sources, paths))
}

fn status_of(map: &AnnotationMap, sources: &[String], paths: &ProjectPaths) -> StatusReport {
    let in_worklist: HashSet<&str> = sources.iter().map(String::as_str).collect();
    let mut report = StatusReport {
        mapped: map.len(),
        ..Default::default()
    };

    for entry in map.iter() {
        if !in_worklist.contains(entry.source_file.as_str()) {
            report.orphaned.push(entry.clone());
        }

        if !paths.annotation_dir.join(&entry.annotation_file).is_file() {
            report.missing_files.push(entry.clone());
            continue;
        }

        match sidecar::species_for(&paths.annotation_dir, &entry.annotation_file) {
            Some(_) => report.tagged += 1,
            None => report.untagged.push(entry.annotation_file.clone()),
        }
    }

    tracing::debug!(
        mapped = report.mapped,
        orphaned = report.orphaned.len(),
        missing_files = report.missing_files.len(),
        tagged = report.tagged,
        "Workspace status"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawprint_common::config::PathsConfig;
    use tempfile::TempDir;

    #[test]
    fn test_status_classifies_entries() {
        let dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(dir.path(), &PathsConfig::default());
        std::fs::create_dir_all(&paths.annotation_dir).unwrap();

        std::fs::write(paths.annotation_dir.join("a.jpg"), b"a").unwrap();
        std::fs::write(paths.annotation_dir.join("a.txt"), "fox\n").unwrap();
        std::fs::write(paths.annotation_dir.join("b.jpg"), b"b").unwrap();
        std::fs::write(paths.annotation_dir.join("b.txt"), "\n").unwrap();

        let mut map = AnnotationMap::new();
        map.insert("/p/a.jpg".to_string(), "a.jpg".to_string());
        map.insert("/p/b.jpg".to_string(), "b.jpg".to_string());
        map.insert("/p/c.jpg".to_string(), "c.jpg".to_string());

        let sources = vec!["/p/a.jpg".to_string(), "/p/c.jpg".to_string()];
        let report = status_of(&map, &sources, &paths);

        assert_eq!(report.mapped, 3);
        assert_eq!(report.orphaned.len(), 1);
        assert_eq!(report.orphaned[0].source_file, "/p/b.jpg");
        assert_eq!(report.missing_files.len(), 1);
        assert_eq!(report.missing_files[0].annotation_file, "c.jpg");
        assert_eq!(report.tagged, 1);
        assert_eq!(report.untagged, vec!["b.jpg".to_string()]);
    }
}
