//! Nominatim reverse geocoding client
//!
//! Public Nominatim allows at most one request per second and requires an
//! identifying User-Agent; both come from `[geocode]` config.

use super::{GeocodeError, Place, ReverseGeocoder};
use async_trait::async_trait;
use pawprint_common::config::GeocodeConfig;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// City-level detail
const REVERSE_ZOOM: u8 = 10;

/// Reverse lookup response (`format=jsonv2`)
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResponse {
    /// Set instead of `address` when nothing is near (open sea)
    pub error: Option<String>,
    pub address: Option<Address>,
}

/// Address breakdown; only the fields used for naming
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl Address {
    /// Most specific settlement name available
    pub fn place_name(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.hamlet,
            &self.municipality,
            &self.county,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .map(str::trim)
        .find(|name| !name.is_empty())
    }
}

impl From<ReverseResponse> for Place {
    fn from(response: ReverseResponse) -> Self {
        let address = response.address.unwrap_or_default();
        Place {
            name: address.place_name().map(str::to_string),
            country_code: address
                .country_code
                .as_deref()
                .map(|cc| cc.trim().to_ascii_uppercase())
                .unwrap_or_default(),
            country_name: address.country.clone(),
        }
    }
}

/// Hands out request slots at least `interval` apart
///
/// The lock is only held to book a slot; callers sleep outside it.
struct RequestPacer {
    next_slot: Mutex<Instant>,
    interval: Duration,
}

impl RequestPacer {
    fn new(interval_ms: u64) -> Self {
        Self {
            next_slot: Mutex::new(Instant::now()),
            interval: Duration::from_millis(interval_ms),
        }
    }

    /// Book the next free slot and sleep until it
    async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let slot = (*next).max(Instant::now());
            *next = slot + self.interval;
            slot
        };
        if slot > Instant::now() {
            tracing::debug!(delay_ms = (slot - Instant::now()).as_millis() as u64, "Pacing geocoder request");
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// Nominatim API client
pub struct NominatimClient {
    http_client: reqwest::Client,
    base_url: String,
    pacer: RequestPacer,
}

impl NominatimClient {
    pub fn new(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pacer: RequestPacer::new(config.rate_limit_ms),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Place, GeocodeError> {
        self.pacer.acquire().await;

        let url = format!("{}/reverse", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let zoom = REVERSE_ZOOM.to_string();

        tracing::debug!(lat = %lat, lon = %lon, url = %url, "Querying Nominatim");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", zoom.as_str()),
                ("addressdetails", "1"),
                ("accept-language", "en"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = response.status();

        if status == 429 || status == 503 {
            return Err(GeocodeError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api(status.as_u16(), error_text));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        if let Some(reason) = &body.error {
            tracing::debug!(lat = %lat, lon = %lon, %reason, "No place near position");
        }

        Ok(Place::from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_name_precedence() {
        let address = Address {
            town: Some("Leavenworth".to_string()),
            county: Some("Chelan County".to_string()),
            ..Default::default()
        };
        assert_eq!(address.place_name(), Some("Leavenworth"));

        let address = Address {
            city: Some("  ".to_string()),
            village: Some("Hallstatt".to_string()),
            ..Default::default()
        };
        assert_eq!(address.place_name(), Some("Hallstatt"));
    }

    #[test]
    fn test_response_to_place() {
        let response: ReverseResponse = serde_json::from_str(
            r#"{"place_id": 1, "address": {"city": "Oslo", "country": "Norway", "country_code": "no"}}"#,
        )
        .unwrap();
        let place = Place::from(response);
        assert_eq!(place.name.as_deref(), Some("Oslo"));
        assert_eq!(place.country_code, "NO");
        assert_eq!(place.country_name.as_deref(), Some("Norway"));
    }

    #[test]
    fn test_error_response_is_empty_place() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert_eq!(Place::from(response), Place::default());
    }

    #[tokio::test]
    async fn test_pacer_spaces_requests() {
        let pacer = RequestPacer::new(50);
        let start = Instant::now();
        pacer.acquire().await;
        pacer.acquire().await;
        pacer.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let pacer = RequestPacer::new(10_000);
        let start = Instant::now();
        pacer.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(1_000));
    }
}
