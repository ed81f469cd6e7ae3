//! On-disk geocode cache
//!
//! A flat JSON object: `"lat,lon"` to `[location, country]`.
//!
//! ```json
//! {
//!   "47.6062,-122.332071": ["Seattle, US", "United States"]
//! }
//! ```

use super::Location;
use pawprint_common::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Coordinate-keyed location cache
#[derive(Debug, Clone, Default)]
pub struct GeoCache {
    entries: BTreeMap<String, (String, String)>,
    dirty: bool,
}

impl GeoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache file; a missing file yields an empty cache, a
    /// malformed one is an error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(cache = %path.display(), "No geocode cache yet");
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let entries: BTreeMap<String, (String, String)> = serde_json::from_str(&content)
            .map_err(|e| {
                Error::InvalidInput(format!("geocode cache {}: {}", path.display(), e))
            })?;
        tracing::debug!(cache = %path.display(), entries = entries.len(), "Loaded geocode cache");
        Ok(Self {
            entries,
            dirty: false,
        })
    }

    /// Write pretty-printed JSON atomically (temp file + rename)
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, path)?;
        self.dirty = false;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Location> {
        self.entries.get(key).map(|(location, country)| Location {
            location: location.clone(),
            country: country.clone(),
        })
    }

    pub fn insert(&mut self, key: String, location: &Location) {
        self.entries
            .insert(key, (location.location.clone(), location.country.clone()));
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when entries were added since load/save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seattle() -> Location {
        Location {
            location: "Seattle, US".to_string(),
            country: "United States".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = GeoCache::load(&dir.path().join("geo_cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("_data").join("geo_cache.json");

        let mut cache = GeoCache::new();
        cache.insert("47.6062,-122.332071".to_string(), &seattle());
        assert!(cache.is_dirty());
        cache.save(&path).unwrap();
        assert!(!cache.is_dirty());

        let reloaded = GeoCache::load(&path).unwrap();
        assert_eq!(reloaded.get("47.6062,-122.332071"), Some(seattle()));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_reads_existing_array_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geo_cache.json");
        std::fs::write(
            &path,
            "{\n  \"59.9139,10.7522\": [\n    \"Oslo, NO\",\n    \"Norway\"\n  ]\n}",
        )
        .unwrap();

        let cache = GeoCache::load(&path).unwrap();
        let oslo = cache.get("59.9139,10.7522").unwrap();
        assert_eq!(oslo.location, "Oslo, NO");
        assert_eq!(oslo.country, "Norway");
    }

    #[test]
    fn test_written_json_uses_arrays() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geo_cache.json");
        let mut cache = GeoCache::new();
        cache.insert("1.0,2.0".to_string(), &seattle());
        cache.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["1.0,2.0"][0], "Seattle, US");
        assert_eq!(value["1.0,2.0"][1], "United States");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geo_cache.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(GeoCache::load(&path).is_err());
    }
}
