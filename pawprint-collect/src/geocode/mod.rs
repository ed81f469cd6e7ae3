//! Reverse geocoding with a persistent cache
//!
//! GPS positions become a `"City, CC"` location and an English country name.
//! Results are cached on disk by coordinate text, so each distinct position
//! is looked up once across all runs.

pub mod cache;
pub mod countries;
pub mod nominatim;

use async_trait::async_trait;
use thiserror::Error;

pub use cache::GeoCache;
pub use nominatim::NominatimClient;

/// Reverse geocoder errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Nearest named place for a position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    /// City, town or village name
    pub name: Option<String>,

    /// ISO 3166-1 alpha-2, upper case; empty when unknown (open sea)
    pub country_code: String,

    /// Country name as reported by the geocoder
    pub country_name: Option<String>,
}

/// Location and country text for the collection table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// `"City, CC"`, or just `CC` when no place name is known
    pub location: String,
    pub country: String,
}

impl From<&Place> for Location {
    fn from(place: &Place) -> Self {
        let cc = place.country_code.as_str();
        let location = match place.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() && !cc.is_empty() => format!("{}, {}", name, cc),
            Some(name) if !name.is_empty() => name.to_string(),
            _ => cc.to_string(),
        };
        let country = countries::country_name(cc)
            .map(str::to_string)
            .or_else(|| place.country_name.clone())
            .unwrap_or_else(|| cc.to_string());
        Self { location, country }
    }
}

/// Position to place lookup
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Place, GeocodeError>;
}
