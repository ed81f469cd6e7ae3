//! Tiny JPEG files carrying EXIF and IPTC blocks
//!
//! The image data itself is empty; only the metadata segments matter to the
//! collector.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

/// Degrees, minutes, seconds as rationals
pub type Dms = [(u32, u32); 3];

/// 47° 36' 22.32" (Seattle latitude, 47.6062)
pub const SEATTLE_LAT: Dms = [(47, 1), (36, 1), (2232, 100)];
/// 122° 19' 55.2" (Seattle longitude, -122.332 with `W`)
pub const SEATTLE_LON: Dms = [(122, 1), (19, 1), (552, 10)];

/// Metadata to embed in a fixture
#[derive(Debug, Clone, Default)]
pub struct FixtureSpec {
    pub gps: Option<(Dms, char, Dms, char)>,
    /// Latitude written without any longitude
    pub latitude_only: Option<(Dms, char)>,
    pub date_time_original: Option<&'static str>,
    /// IFD0 `DateTime` (file modification stamp)
    pub date_time: Option<&'static str>,
    pub artist: Option<&'static str>,
    pub image_description: Option<&'static str>,
    pub keywords: Vec<&'static str>,
    pub by_line: Option<&'static str>,
    pub credit: Option<&'static str>,
    pub caption: Option<&'static str>,
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn rationals(tag: Tag, dms: &Dms) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(dms.iter().map(|&pair| Rational::from(pair)).collect()),
    }
}

/// TIFF-structured EXIF payload, or `None` when nothing is set
fn exif_payload(spec: &FixtureSpec) -> Option<Vec<u8>> {
    let mut fields = Vec::new();
    if let Some((lat, lat_ref, lon, lon_ref)) = &spec.gps {
        fields.push(rationals(Tag::GPSLatitude, lat));
        fields.push(ascii(Tag::GPSLatitudeRef, &lat_ref.to_string()));
        fields.push(rationals(Tag::GPSLongitude, lon));
        fields.push(ascii(Tag::GPSLongitudeRef, &lon_ref.to_string()));
    }
    if let Some((lat, lat_ref)) = &spec.latitude_only {
        fields.push(rationals(Tag::GPSLatitude, lat));
        fields.push(ascii(Tag::GPSLatitudeRef, &lat_ref.to_string()));
    }
    if let Some(dt) = spec.date_time_original {
        fields.push(ascii(Tag::DateTimeOriginal, dt));
    }
    if let Some(dt) = spec.date_time {
        fields.push(ascii(Tag::DateTime, dt));
    }
    if let Some(artist) = spec.artist {
        fields.push(ascii(Tag::Artist, artist));
    }
    if let Some(description) = spec.image_description {
        fields.push(ascii(Tag::ImageDescription, description));
    }
    if fields.is_empty() {
        return None;
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("encode EXIF");
    Some(buf.into_inner())
}

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn dataset(number: u8, value: &str) -> Vec<u8> {
    let mut out = vec![0x1C, 2, number];
    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    out.extend_from_slice(value.as_bytes());
    out
}

/// Photoshop APP13 payload with an IPTC resource, or `None` when nothing is set
fn iptc_payload(spec: &FixtureSpec) -> Option<Vec<u8>> {
    let mut iim = Vec::new();
    for keyword in &spec.keywords {
        iim.extend(dataset(25, keyword));
    }
    if let Some(by_line) = spec.by_line {
        iim.extend(dataset(80, by_line));
    }
    if let Some(credit) = spec.credit {
        iim.extend(dataset(110, credit));
    }
    if let Some(caption) = spec.caption {
        iim.extend(dataset(120, caption));
    }
    if iim.is_empty() {
        return None;
    }

    let mut payload = b"Photoshop 3.0\0".to_vec();
    payload.extend_from_slice(b"8BIM");
    payload.extend_from_slice(&0x0404u16.to_be_bytes());
    payload.extend_from_slice(&[0, 0]);
    payload.extend_from_slice(&(iim.len() as u32).to_be_bytes());
    payload.extend_from_slice(&iim);
    if iim.len() % 2 == 1 {
        payload.push(0);
    }
    Some(payload)
}

/// JPEG bytes: SOI, optional APP1 Exif, optional APP13 IPTC, EOI
pub fn jpeg(spec: &FixtureSpec) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    if let Some(tiff) = exif_payload(spec) {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);
        out.extend(segment(0xE1, &payload));
    }
    if let Some(payload) = iptc_payload(spec) {
        out.extend(segment(0xED, &payload));
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// JPEG with no metadata at all
pub fn plain_jpeg() -> Vec<u8> {
    jpeg(&FixtureSpec::default())
}

/// Seattle-tagged JPEG taken on 2023-04-15
pub fn seattle_jpeg() -> Vec<u8> {
    jpeg(&FixtureSpec {
        gps: Some((SEATTLE_LAT, 'N', SEATTLE_LON, 'W')),
        date_time_original: Some("2023:04:15 10:30:00"),
        ..Default::default()
    })
}
