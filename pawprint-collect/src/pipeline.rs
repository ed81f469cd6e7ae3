//! Collection build
//!
//! One sequential pass over the worklist:
//!
//! ```text
//! worklist → copy into objects/ → EXIF/IPTC → date chain → geocode (cached) → species → row
//! ```
//!
//! then the geocode cache and metadata table are written. A missing or
//! uncopyable source is logged and skipped; its worklist position is still
//! consumed so object ids stay stable.

use crate::dates::{capture_time, infer_date};
use crate::error::CollectResult;
use crate::format::detect_format;
use crate::geocode::{GeoCache, Location, ReverseGeocoder};
use crate::metadata::{ImageMetadata, MetadataExtractor};
use crate::record::{
    object_id, object_location, object_title, write_table, CollectionRecord, DISPLAY_TEMPLATE,
    OBJECT_TYPE,
};
use pawprint_common::config::CollectionConfig;
use pawprint_common::fsutil::{copy_preserving, CopyOutcome};
use pawprint_common::progress::item_progress;
use pawprint_common::{sidecar, worklist, AnnotationMap, ProjectPaths};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension used when a source has none
const DEFAULT_EXTENSION: &str = ".jpg";

/// Why a worklist entry produced no row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    SourceMissing,
    CopyFailed(String),
}

/// A worklist entry that produced no row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub source: String,
    pub reason: SkipReason,
}

/// Counters reported after a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub worklist_entries: usize,
    pub rows_written: usize,
    pub with_gps: usize,
    pub cache_hits: usize,
    pub geocoder_lookups: usize,
    pub geocoder_failures: usize,
    pub unchanged_copies: usize,
    pub species_tagged: usize,
    pub skipped: Vec<SkippedItem>,

    /// Table written by this run; `None` when the worklist was empty
    pub metadata_table: Option<PathBuf>,
}

impl RunSummary {
    /// True when the worklist had nothing to process
    pub fn nothing_to_do(&self) -> bool {
        self.metadata_table.is_none()
    }
}

/// Destination file name: object id plus lower-cased source extension
pub fn destination_name(object_id: &str, source: &Path) -> String {
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}{}", object_id, ext)
}

/// Collection builder
pub struct CollectionBuilder {
    paths: ProjectPaths,
    collection: CollectionConfig,
    geocoder: Option<Box<dyn ReverseGeocoder>>,
    extractor: MetadataExtractor,
    show_progress: bool,
}

impl CollectionBuilder {
    /// Builder with no geocoder (cache-only) and no progress bar
    pub fn new(paths: ProjectPaths, collection: CollectionConfig) -> Self {
        Self {
            paths,
            collection,
            geocoder: None,
            extractor: MetadataExtractor::new(),
            show_progress: false,
        }
    }

    /// Resolve cache misses through `geocoder`
    pub fn with_geocoder(mut self, geocoder: Box<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Process the whole worklist
    pub async fn run(&self) -> CollectResult<RunSummary> {
        let mut summary = RunSummary::default();

        std::fs::create_dir_all(&self.paths.objects_dir)?;

        let sources = worklist::read_worklist(&self.paths.worklist)?;
        summary.worklist_entries = sources.len();
        if sources.is_empty() {
            info!(worklist = %self.paths.worklist.display(), "No image paths in worklist, nothing to do");
            return Ok(summary);
        }

        let annotation_map = match AnnotationMap::load(&self.paths.annotation_map) {
            Ok(map) => map,
            Err(e) => {
                warn!(map = %self.paths.annotation_map.display(), error = %e, "Ignoring unreadable annotation map");
                AnnotationMap::new()
            }
        };

        let mut cache = GeoCache::load(&self.paths.geo_cache)?;
        match &self.geocoder {
            Some(geocoder) => info!(backend = geocoder.name(), cached = cache.len(), "Geocoding enabled"),
            None => info!(cached = cache.len(), "Geocoding offline, cache only"),
        }

        let pb = item_progress(sources.len() as u64, "Processing images", self.show_progress);
        let mut records = Vec::with_capacity(sources.len());

        for (position, source) in sources.iter().enumerate() {
            let index = position + 1;
            match self
                .process_item(index, source, &annotation_map, &mut cache, &mut summary)
                .await
            {
                Ok(record) => records.push(record),
                Err(reason) => {
                    pb.suspend(|| match &reason {
                        SkipReason::SourceMissing => {
                            warn!(source = %source, "Source not found, skipping")
                        }
                        SkipReason::CopyFailed(e) => {
                            warn!(source = %source, error = %e, "Copy failed, skipping")
                        }
                    });
                    summary.skipped.push(SkippedItem {
                        source: source.clone(),
                        reason,
                    });
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        cache.save(&self.paths.geo_cache)?;
        write_table(&self.paths.metadata_table, &records)?;

        summary.rows_written = records.len();
        summary.with_gps = records.iter().filter(|r| r.has_gps()).count();
        summary.species_tagged = records.iter().filter(|r| !r.species.is_empty()).count();
        summary.metadata_table = Some(self.paths.metadata_table.clone());

        info!(
            rows = summary.rows_written,
            with_gps = summary.with_gps,
            skipped = summary.skipped.len(),
            table = %self.paths.metadata_table.display(),
            "Collection build complete"
        );

        Ok(summary)
    }

    /// Copy one source and build its row
    async fn process_item(
        &self,
        index: usize,
        source: &str,
        annotation_map: &AnnotationMap,
        cache: &mut GeoCache,
        summary: &mut RunSummary,
    ) -> Result<CollectionRecord, SkipReason> {
        let src = Path::new(source);
        let oid = object_id(&self.collection.id_prefix, index);
        let dest_name = destination_name(&oid, src);

        if !src.is_file() {
            return Err(SkipReason::SourceMissing);
        }

        let dest = self.paths.objects_dir.join(&dest_name);
        match copy_preserving(src, &dest) {
            Ok(CopyOutcome::Copied) => debug!(source = %source, dest = %dest.display(), "Copied"),
            Ok(CopyOutcome::Unchanged) => summary.unchanged_copies += 1,
            Err(e) => return Err(SkipReason::CopyFailed(e.to_string())),
        }

        let metadata = self.extractor.extract_or_empty(src);

        let date = infer_date(source, metadata.captured_at.as_deref())
            .map(|d| d.text)
            .unwrap_or_default();
        let time = metadata
            .captured_at
            .as_deref()
            .and_then(capture_time)
            .unwrap_or_default();

        let (latitude, longitude, location) = match metadata.gps {
            Some(gps) => {
                let location = self
                    .resolve_location(&gps.cache_key(), gps.latitude, gps.longitude, cache, summary)
                    .await;
                (gps.latitude_text(), gps.longitude_text(), location)
            }
            None => (String::new(), String::new(), Location::default()),
        };

        let species = self.species_for(source, annotation_map, &metadata);
        let creator = metadata
            .creator()
            .map(str::to_string)
            .or_else(|| self.collection.default_credit.clone())
            .unwrap_or_default();

        let asset_path = object_location(&dest_name);

        Ok(CollectionRecord {
            title: object_title(&self.collection.title_prefix, index, Some(&date)),
            objectid: oid,
            date,
            time,
            description: metadata.description().unwrap_or_default().to_string(),
            subject: metadata.iptc.keywords.join("; "),
            creator,
            species,
            location: location.location,
            country: location.country,
            latitude,
            longitude,
            object_type: OBJECT_TYPE.to_string(),
            format: detect_format(&dest).to_string(),
            display_template: DISPLAY_TEMPLATE.to_string(),
            object_location: asset_path.clone(),
            image_small: asset_path.clone(),
            image_thumb: asset_path,
        })
    }

    /// Cached location, else a geocoder lookup stored into the cache
    async fn resolve_location(
        &self,
        key: &str,
        latitude: f64,
        longitude: f64,
        cache: &mut GeoCache,
        summary: &mut RunSummary,
    ) -> Location {
        if let Some(location) = cache.get(key) {
            summary.cache_hits += 1;
            return location;
        }

        let geocoder = match &self.geocoder {
            Some(geocoder) => geocoder,
            None => {
                debug!(key = %key, "Not cached and geocoding is offline");
                return Location::default();
            }
        };

        summary.geocoder_lookups += 1;
        match geocoder.reverse(latitude, longitude).await {
            Ok(place) => {
                let location = Location::from(&place);
                debug!(key = %key, location = %location.location, country = %location.country, "Geocoded");
                cache.insert(key.to_string(), &location);
                location
            }
            Err(e) => {
                summary.geocoder_failures += 1;
                warn!(key = %key, error = %e, "Reverse geocoding failed");
                Location::default()
            }
        }
    }

    /// Sidecar tag of the mapped annotation file, else first IPTC keyword
    fn species_for(
        &self,
        source: &str,
        annotation_map: &AnnotationMap,
        metadata: &ImageMetadata,
    ) -> String {
        annotation_map
            .get(source)
            .and_then(|annotation_file| sidecar::species_for(&self.paths.annotation_dir, annotation_file))
            .or_else(|| metadata.iptc.keywords.first().cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_name_lowercases_extension() {
        assert_eq!(destination_name("paw_001", Path::new("/p/IMG_1.JPG")), "paw_001.jpg");
        assert_eq!(destination_name("paw_002", Path::new("/p/scan.Png")), "paw_002.png");
    }

    #[test]
    fn test_destination_name_defaults_to_jpg() {
        assert_eq!(destination_name("paw_003", Path::new("/p/noext")), "paw_003.jpg");
    }
}
