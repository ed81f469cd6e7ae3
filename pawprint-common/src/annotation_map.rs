//! Stable mapping from source image paths to annotation workspace files
//!
//! Stored as a two-column CSV (`source_file,annotation_file`). Entries keep
//! the order they were first added, so re-saving a map never reshuffles rows
//! a human may be diffing.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::path::Path;

/// One row of the annotation map file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub source_file: String,
    pub annotation_file: String,
}

/// Insertion-ordered `source_file -> annotation_file` mapping
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    entries: Vec<MapEntry>,
    index: HashMap<String, usize>,
}

impl AnnotationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a map file; a missing file yields an empty map
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(map = %path.display(), "No annotation map yet");
            return Ok(Self::new());
        }
        let file = std::fs::File::open(path)?;
        Self::read_from(file)
    }

    /// Parse a map from any CSV source
    ///
    /// A source listed twice keeps its first position and its last value.
    pub fn read_from<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(source);
        let mut map = Self::new();
        for row in reader.deserialize::<MapEntry>() {
            let row = row?;
            map.insert(row.source_file, row.annotation_file);
        }
        Ok(map)
    }

    /// Write the map atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("csv.tmp");
        {
            let file = std::fs::File::create(&temp_path)?;
            self.write_to(file)?;
        }
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            Error::Io(e)
        })?;

        tracing::debug!(map = %path.display(), entries = self.len(), "Saved annotation map");
        Ok(())
    }

    /// Serialize the map as CSV with header
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);
        // Header is written explicitly so an empty map still has one.
        writer.write_record(["source_file", "annotation_file"])?;
        for entry in &self.entries {
            writer.write_record([&entry.source_file, &entry.annotation_file])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Add or update a mapping
    pub fn insert(&mut self, source_file: String, annotation_file: String) {
        match self.index.get(&source_file) {
            Some(&pos) => self.entries[pos].annotation_file = annotation_file,
            None => {
                self.index.insert(source_file.clone(), self.entries.len());
                self.entries.push(MapEntry {
                    source_file,
                    annotation_file,
                });
            }
        }
    }

    /// Annotation file name for a source path
    pub fn get(&self, source_file: &str) -> Option<&str> {
        self.index
            .get(source_file)
            .map(|&pos| self.entries[pos].annotation_file.as_str())
    }

    pub fn contains(&self, source_file: &str) -> bool {
        self.index.contains_key(source_file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &MapEntry> {
        self.entries.iter()
    }

    /// Annotation file names already assigned
    pub fn reserved_names(&self) -> HashSet<String> {
        self.entries
            .iter()
            .map(|entry| entry.annotation_file.clone())
            .collect()
    }
}
