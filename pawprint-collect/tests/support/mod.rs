//! Shared fixtures for pawprint-collect integration tests
#![allow(dead_code)]

pub mod image_fixtures;

use pawprint_common::config::PathsConfig;
use pawprint_common::ProjectPaths;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway site project with a `photos/` folder for sources
pub struct TestProject {
    pub dir: TempDir,
    pub paths: ProjectPaths,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp project");
        let paths = ProjectPaths::new(dir.path(), &PathsConfig::default());
        std::fs::create_dir_all(dir.path().join("_data")).expect("create _data");
        std::fs::create_dir_all(dir.path().join("photos")).expect("create photos");
        Self { dir, paths }
    }

    /// Path under `photos/`
    pub fn photo_path(&self, relative: &str) -> PathBuf {
        self.dir.path().join("photos").join(relative)
    }

    /// Write bytes under `photos/`, creating folders
    pub fn add_photo(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.photo_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create photo folder");
        }
        std::fs::write(&path, bytes).expect("write photo");
        path
    }

    /// Write the worklist with one `image_path` row per source
    pub fn write_worklist(&self, sources: &[&Path]) {
        let mut content = String::from("image_path\n");
        for source in sources {
            content.push_str(&source.to_string_lossy());
            content.push('\n');
        }
        std::fs::write(&self.paths.worklist, content).expect("write worklist");
    }

    /// Metadata table rows as header-keyed maps
    pub fn read_table(&self) -> Vec<std::collections::HashMap<String, String>> {
        let mut reader = csv::Reader::from_path(&self.paths.metadata_table).expect("open table");
        reader
            .deserialize()
            .map(|row| row.expect("table row"))
            .collect()
    }
}
