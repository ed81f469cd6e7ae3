//! Capture date inference
//!
//! Fallback chain, first hit wins:
//! 1. `YYYYMMDD` in the file name (phone/camera naming, e.g. `IMG_20230415_101500`)
//! 2. A four-digit year folder anywhere in the source path (`.../2023/...`)
//! 3. EXIF capture timestamp

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static FILENAME_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").expect("valid filename date regex"));

static YEAR_FOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\](\d{4})[/\\]").expect("valid year folder regex"));

/// Where an inferred date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Filename,
    Exif,
    YearFolder,
}

/// A date for the collection table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredDate {
    /// `YYYY-MM-DD`, or `YYYY` for a year folder
    pub text: String,
    pub source: DateSource,
}

/// Run the fallback chain for one source path
pub fn infer_date(source_path: &str, captured_at: Option<&str>) -> Option<InferredDate> {
    if let Some(text) = date_from_filename(source_path) {
        return Some(InferredDate {
            text,
            source: DateSource::Filename,
        });
    }
    if let Some(text) = year_from_folder(source_path) {
        return Some(InferredDate {
            text,
            source: DateSource::YearFolder,
        });
    }
    captured_at.and_then(date_from_exif).map(|text| InferredDate {
        text,
        source: DateSource::Exif,
    })
}

/// First valid `YYYYMMDD` in the file stem, as `YYYY-MM-DD`
pub fn date_from_filename(source_path: &str) -> Option<String> {
    let stem = file_stem(source_path);
    FILENAME_DATE.captures_iter(stem).find_map(|caps| {
        let year = caps[1].parse::<i32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        let day = caps[3].parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
    })
}

/// Date part of an EXIF `YYYY:MM:DD HH:MM:SS` timestamp
///
/// Unset camera clocks write `0000:00:00 00:00:00`; those are rejected.
pub fn date_from_exif(captured_at: &str) -> Option<String> {
    let date_part = captured_at.trim().split(' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y:%m:%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Four-digit year folder in the path, either separator style
pub fn year_from_folder(source_path: &str) -> Option<String> {
    YEAR_FOLDER
        .captures(source_path)
        .map(|caps| caps[1].to_string())
}

/// Time part of an EXIF timestamp
///
/// The value must be exactly two space-separated parts; the second is
/// returned as written (`HH:MM:SS`).
pub fn capture_time(captured_at: &str) -> Option<String> {
    let parts: Vec<&str> = captured_at.trim().split(' ').collect();
    if parts.len() != 2 || parts[1].is_empty() {
        return None;
    }
    Some(parts[1].to_string())
}

/// File stem for either path separator style
fn file_stem(source_path: &str) -> &str {
    let name = source_path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(source_path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_date_wins() {
        let date = infer_date("/photos/2021/IMG_20230415_101500.jpg", Some("2022:01:02 03:04:05"));
        assert_eq!(
            date,
            Some(InferredDate {
                text: "2023-04-15".to_string(),
                source: DateSource::Filename
            })
        );
    }

    #[test]
    fn test_year_folder_before_exif() {
        let date = infer_date("/p/2023/CIMG1.JPG", Some("2010:01:01 00:00:00")).unwrap();
        assert_eq!(date.text, "2023");
        assert_eq!(date.source, DateSource::YearFolder);

        let date = infer_date("D:\\Pictures\\2019\\trail\\CIMG3046.JPG", None).unwrap();
        assert_eq!(date.text, "2019");
        assert_eq!(date.source, DateSource::YearFolder);
    }

    #[test]
    fn test_exif_is_last_resort() {
        let date = infer_date("/photos/trail/CIMG3046.JPG", Some("2022:01:02 03:04:05")).unwrap();
        assert_eq!(date.text, "2022-01-02");
        assert_eq!(date.source, DateSource::Exif);
    }

    #[test]
    fn test_no_date_at_all() {
        assert_eq!(infer_date("/photos/misc/CIMG3046.JPG", None), None);
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        // 20231345 is not a date; the later 20230102 is.
        assert_eq!(
            date_from_filename("/x/scan_20231345_20230102.jpg"),
            Some("2023-01-02".to_string())
        );
        assert_eq!(date_from_filename("/x/99999999.jpg"), None);
    }

    #[test]
    fn test_folder_digits_do_not_count_as_filename_date() {
        assert_eq!(date_from_filename("/archive/20230415/IMG_1.jpg"), None);
        assert_eq!(date_from_filename("C:\\archive\\20230415\\IMG_1.jpg"), None);
    }

    #[test]
    fn test_zeroed_exif_date_rejected() {
        assert_eq!(date_from_exif("0000:00:00 00:00:00"), None);
        let date = infer_date("/photos/x.jpg", Some("0000:00:00 00:00:00"));
        assert_eq!(date, None);
    }

    #[test]
    fn test_capture_time() {
        assert_eq!(capture_time("2023:04:15 10:15:00"), Some("10:15:00".to_string()));
        assert_eq!(capture_time("2023:04:15"), None);
        assert_eq!(capture_time("2023:04:15 10:15:00 extra"), None);
    }
}
