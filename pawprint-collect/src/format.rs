//! MIME type detection for the `format` column
//!
//! Magic bytes first, then the file extension, then `image/jpeg`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Used when neither content nor extension identifies the image
pub const DEFAULT_FORMAT: &str = "image/jpeg";

/// Detect the MIME type of an image file
pub fn detect_format(path: &Path) -> &'static str {
    match sniff_magic_bytes(path) {
        Some(mime) => mime,
        None => format_from_extension(path).unwrap_or(DEFAULT_FORMAT),
    }
}

/// MIME type from the first 12 bytes, if recognized
fn sniff_magic_bytes(path: &Path) -> Option<&'static str> {
    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 12];
    let mut filled = 0;
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return None,
        }
    }
    mime_from_header(&buffer[..filled])
}

/// MIME type for a header byte slice
pub fn mime_from_header(header: &[u8]) -> Option<&'static str> {
    if header.len() < 4 {
        return None;
    }

    let mime = match header {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P'] => "image/webp",
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => "image/tiff",

        // ISO BMFF brands
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c']
        | [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'x'] => "image/heic",
        [_, _, _, _, b'f', b't', b'y', b'p', b'm', b'i', b'f', b'1'] => "image/heif",
        [_, _, _, _, b'f', b't', b'y', b'p', b'a', b'v', b'i', b'f'] => "image/avif",

        _ => return None,
    };
    Some(mime)
}

/// MIME type from the file extension, if recognized
pub fn format_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}
