//! Metadata table rows
//!
//! Column order follows the field order below and is what the site
//! generator's collection layout expects.

use pawprint_common::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Fixed `type` value for every object
pub const OBJECT_TYPE: &str = "Image";

/// Fixed `display_template` value for every object
pub const DISPLAY_TEMPLATE: &str = "image";

/// One row of the metadata table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionRecord {
    pub objectid: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub subject: String,
    pub creator: String,
    pub species: String,
    pub location: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub format: String,
    pub display_template: String,
    pub object_location: String,
    pub image_small: String,
    pub image_thumb: String,
}

/// Header row, in output order
pub const FIELDNAMES: [&str; 18] = [
    "objectid",
    "title",
    "date",
    "time",
    "description",
    "subject",
    "creator",
    "species",
    "location",
    "country",
    "latitude",
    "longitude",
    "type",
    "format",
    "display_template",
    "object_location",
    "image_small",
    "image_thumb",
];

impl CollectionRecord {
    pub fn has_gps(&self) -> bool {
        !self.latitude.is_empty() && !self.longitude.is_empty()
    }
}

/// Object id for a 1-based worklist position: `paw_001`
pub fn object_id(prefix: &str, index: usize) -> String {
    format!("{}_{:03}", prefix, index)
}

/// Title for a 1-based worklist position: `Paw Print 7 (2023-04-15)`
pub fn object_title(prefix: &str, index: usize, date: Option<&str>) -> String {
    match date {
        Some(date) if !date.is_empty() => format!("{} {} ({})", prefix, index, date),
        _ => format!("{} {}", prefix, index),
    }
}

/// Site path of a copied asset
pub fn object_location(dest_name: &str) -> String {
    format!("/objects/{}", dest_name)
}

/// Write rows as CSV with header
pub fn write_records<W: Write>(sink: W, records: &[CollectionRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    // Header is written explicitly so an empty table still has one.
    writer.write_record(FIELDNAMES)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the metadata table file
pub fn write_table(path: &Path, records: &[CollectionRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_records(file, records)
}
