//! Image metadata extraction
//!
//! Reads EXIF (via kamadak-exif) and IPTC (APP13) from a source image.
//!
//! Extracts:
//! - GPS position (decimal degrees)
//! - Capture timestamp (DateTimeOriginal, else DateTime)
//! - Artist, image description
//! - IPTC keywords, by-line, credit, caption
//!
//! A file without metadata is not an error: every field is optional and the
//! collection row is simply left blank where nothing was found.

pub mod iptc;

use crate::coords::{dms_to_decimal, GpsPosition};
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub use iptc::IptcRecord;

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// EXIF block present but malformed
    #[error("Failed to parse EXIF: {0}")]
    Exif(String),
}

/// Extracted image metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    pub gps: Option<GpsPosition>,

    /// Raw EXIF timestamp, `YYYY:MM:DD HH:MM:SS`
    pub captured_at: Option<String>,

    pub artist: Option<String>,
    pub image_description: Option<String>,
    pub iptc: IptcRecord,
}

impl ImageMetadata {
    /// Contributor credit: EXIF Artist, IPTC By-line, then IPTC Credit
    pub fn creator(&self) -> Option<&str> {
        self.artist
            .as_deref()
            .or(self.iptc.by_line.as_deref())
            .or(self.iptc.credit.as_deref())
    }

    /// Caption: IPTC Caption/Abstract, then EXIF ImageDescription
    pub fn description(&self) -> Option<&str> {
        self.iptc
            .caption
            .as_deref()
            .or(self.image_description.as_deref())
    }
}

/// Metadata extractor service
pub struct MetadataExtractor {}

impl MetadataExtractor {
    /// Create new metadata extractor
    pub fn new() -> Self {
        Self {}
    }

    /// Extract metadata from an image file
    ///
    /// Missing EXIF or IPTC yields empty fields, and a corrupt EXIF block
    /// still lets IPTC through. Only an unreadable file is an error.
    pub fn extract(&self, path: &Path) -> Result<ImageMetadata, MetadataError> {
        let mut metadata = ImageMetadata::default();

        let exif = match read_exif(path) {
            Ok(exif) => exif,
            Err(MetadataError::Exif(reason)) => {
                tracing::warn!(file = %path.display(), %reason, "Ignoring malformed EXIF");
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(exif) = exif {
            metadata.gps = gps_position(&exif);
            metadata.captured_at = ascii_field(&exif, Tag::DateTimeOriginal)
                .or_else(|| ascii_field(&exif, Tag::DateTime));
            metadata.artist = ascii_field(&exif, Tag::Artist);
            metadata.image_description = ascii_field(&exif, Tag::ImageDescription);
        }

        let mut reader = BufReader::new(File::open(path)?);
        if let Some(record) = iptc::read_iptc(&mut reader)? {
            metadata.iptc = record;
        }

        tracing::debug!(
            file = %path.display(),
            gps = ?metadata.gps,
            captured_at = ?metadata.captured_at,
            creator = ?metadata.creator(),
            keywords = metadata.iptc.keywords.len(),
            "Extracted metadata"
        );

        Ok(metadata)
    }

    /// Extract, logging failures and falling back to empty metadata
    pub fn extract_or_empty(&self, path: &Path) -> ImageMetadata {
        match self.extract(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Metadata extraction failed");
                ImageMetadata::default()
            }
        }
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the EXIF container; `None` when the file carries no EXIF
fn read_exif(path: &Path) -> Result<Option<Exif>, MetadataError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        // Unknown containers (BMP, plain text) have nothing to offer either.
        Err(exif::Error::InvalidFormat(reason)) if reason.starts_with("Unknown image format") => {
            Ok(None)
        }
        Err(exif::Error::Io(e)) => Err(MetadataError::Io(e)),
        Err(e) => Err(MetadataError::Exif(e.to_string())),
    }
}

/// Decode GPSLatitude/GPSLongitude with their references
///
/// Both coordinates must be present as three rationals.
pub fn gps_position(exif: &Exif) -> Option<GpsPosition> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    Some(GpsPosition::new(latitude, longitude))
}

fn coordinate(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(coord_tag, In::PRIMARY)?;
    let parts = match field.value {
        Value::Rational(ref v) if v.len() >= 3 => v,
        _ => return None,
    };
    let (d, m, s) = (parts[0].to_f64(), parts[1].to_f64(), parts[2].to_f64());
    if !(d.is_finite() && m.is_finite() && s.is_finite()) {
        return None;
    }

    let reference = ascii_field(exif, ref_tag).and_then(|r| r.chars().next());
    Some(dms_to_decimal(d, m, s, reference))
}

/// First ASCII value of a primary-IFD field, trimmed, `None` when blank
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) => values.first().and_then(|bytes| {
            let text = String::from_utf8_lossy(bytes);
            let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }),
        _ => None,
    }
}
