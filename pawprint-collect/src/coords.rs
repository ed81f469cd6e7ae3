//! GPS coordinate conversion and formatting
//!
//! EXIF stores each coordinate as three rationals (degrees, minutes,
//! seconds) plus a hemisphere reference. The collection table and the
//! geocode cache both use the decimal form rounded to six places.

/// Decimal places kept for coordinates (~0.1 m)
pub const COORDINATE_PRECISION: i32 = 6;

/// A decoded GPS position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_coordinate(latitude),
            longitude: round_coordinate(longitude),
        }
    }

    /// Latitude as written to the metadata table
    pub fn latitude_text(&self) -> String {
        format_coordinate(self.latitude)
    }

    /// Longitude as written to the metadata table
    pub fn longitude_text(&self) -> String {
        format_coordinate(self.longitude)
    }

    /// Geocode cache key: `"lat,lon"` using the table text
    pub fn cache_key(&self) -> String {
        format!("{},{}", self.latitude_text(), self.longitude_text())
    }
}

/// Convert degrees/minutes/seconds plus hemisphere reference to decimal
///
/// `S` and `W` references give negative values. Any other reference,
/// including a missing one, is treated as `N`/`E`.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: Option<char>) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    let decimal = match reference.map(|c| c.to_ascii_uppercase()) {
        Some('S') | Some('W') => -decimal,
        _ => decimal,
    };
    round_coordinate(decimal)
}

/// Round to `COORDINATE_PRECISION` decimal places
pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

/// Shortest round-trip decimal text, with `.0` kept on whole numbers
///
/// Matches the key format of existing cache files: `10.0`, `47.6062`,
/// `-122.33207`, and exponent form below 1e-4 (`5e-05`, `-1.2e-05`).
pub fn format_coordinate(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        return format!("{:.1}", value);
    }
    if value.abs() < SCIENTIFIC_BELOW {
        return scientific(value);
    }
    format!("{}", value)
}

/// Magnitude under which cache keys use exponent notation
const SCIENTIFIC_BELOW: f64 = 1e-4;

/// `5e-05` style: shortest mantissa, signed exponent of at least two digits
fn scientific(value: f64) -> String {
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
