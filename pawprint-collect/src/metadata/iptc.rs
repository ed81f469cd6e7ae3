//! IPTC-IIM reader for JPEG files
//!
//! IPTC lives in the APP13 segment as a Photoshop image resource block:
//!
//! ```text
//! FF ED <len> "Photoshop 3.0\0" { "8BIM" <id:u16> <pascal name, even> <size:u32> <data, even> }*
//! ```
//!
//! Resource 0x0404 holds the IIM datasets:
//!
//! ```text
//! 1C <record:u8> <dataset:u8> <size:u16 | 0x8000+n, n-byte size> <data>
//! ```
//!
//! Only the record 2 datasets the collection uses are kept.

use std::io::{self, Read};

const PHOTOSHOP_ID: &[u8] = b"Photoshop 3.0\0";
const RESOURCE_SIGNATURE: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;

const MARKER_PREFIX: u8 = 0xFF;
const MARKER_SOI: u8 = 0xD8;
const MARKER_EOI: u8 = 0xD9;
const MARKER_SOS: u8 = 0xDA;
const MARKER_APP13: u8 = 0xED;

const TAG_MARKER: u8 = 0x1C;
const ENVELOPE_RECORD: u8 = 1;
const APPLICATION_RECORD: u8 = 2;
const CODED_CHARACTER_SET: u8 = 90;
const KEYWORDS: u8 = 25;
const BY_LINE: u8 = 80;
const CREDIT: u8 = 110;
const CAPTION: u8 = 120;

/// ESC % G: the envelope marker for UTF-8 text
const UTF8_CHARSET: &[u8] = &[0x1B, 0x25, 0x47];

/// Record 2 fields used by the collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IptcRecord {
    pub keywords: Vec<String>,
    pub by_line: Option<String>,
    pub credit: Option<String>,
    pub caption: Option<String>,
}

impl IptcRecord {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.by_line.is_none()
            && self.credit.is_none()
            && self.caption.is_none()
    }
}

/// Read IPTC from a JPEG stream
///
/// Returns `Ok(None)` for non-JPEG input or when no IPTC block exists before
/// the first scan. Only I/O failures are errors.
pub fn read_iptc<R: Read>(reader: &mut R) -> io::Result<Option<IptcRecord>> {
    match find_iptc_block(reader)? {
        Some(block) => Ok(Some(parse_iim(&block))),
        None => Ok(None),
    }
}

/// Walk JPEG marker segments up to SOS looking for the IPTC resource
fn find_iptc_block<R: Read>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut soi = [0u8; 2];
    if read_fully(reader, &mut soi)? < 2 || soi != [MARKER_PREFIX, MARKER_SOI] {
        return Ok(None);
    }

    loop {
        let mut byte = [0u8; 1];
        if read_fully(reader, &mut byte)? == 0 {
            return Ok(None);
        }
        if byte[0] != MARKER_PREFIX {
            // Out of sync; nothing sensible to recover.
            return Ok(None);
        }

        let mut code = MARKER_PREFIX;
        while code == MARKER_PREFIX {
            if read_fully(reader, &mut byte)? == 0 {
                return Ok(None);
            }
            code = byte[0];
        }

        match code {
            MARKER_SOS | MARKER_EOI => return Ok(None),
            // Stand-alone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let mut len_bytes = [0u8; 2];
        if read_fully(reader, &mut len_bytes)? < 2 {
            return Ok(None);
        }
        let len = u16::from_be_bytes(len_bytes) as usize;
        if len < 2 {
            return Ok(None);
        }
        let payload_len = len - 2;

        if code == MARKER_APP13 {
            let mut payload = vec![0u8; payload_len];
            if read_fully(reader, &mut payload)? < payload_len {
                return Ok(None);
            }
            if let Some(rest) = payload.strip_prefix(PHOTOSHOP_ID) {
                if let Some(block) = find_resource(rest, IPTC_RESOURCE_ID) {
                    return Ok(Some(block.to_vec()));
                }
            }
        } else {
            let skipped = io::copy(&mut reader.by_ref().take(payload_len as u64), &mut io::sink())?;
            if skipped < payload_len as u64 {
                return Ok(None);
            }
        }
    }
}

/// Locate one resource in a Photoshop image resource block
fn find_resource(data: &[u8], wanted: u16) -> Option<&[u8]> {
    let mut pos = 0usize;
    while pos + 7 <= data.len() {
        if &data[pos..pos + 4] != RESOURCE_SIGNATURE {
            return None;
        }
        let id = u16::from_be_bytes([data[pos + 4], data[pos + 5]]);

        // Pascal string: length byte + chars, padded to even total
        let name_len = data[pos + 6] as usize;
        let mut name_total = 1 + name_len;
        if name_total % 2 == 1 {
            name_total += 1;
        }

        let size_pos = pos + 6 + name_total;
        if size_pos + 4 > data.len() {
            return None;
        }
        let size = u32::from_be_bytes([
            data[size_pos],
            data[size_pos + 1],
            data[size_pos + 2],
            data[size_pos + 3],
        ]) as usize;

        let start = size_pos + 4;
        let end = start.checked_add(size)?;
        if end > data.len() {
            return None;
        }
        if id == wanted {
            return Some(&data[start..end]);
        }
        pos = end + (size % 2);
    }
    None
}

/// Parse IIM datasets
///
/// Parsing stops at the first malformed dataset; whatever was read before it
/// is kept.
pub fn parse_iim(data: &[u8]) -> IptcRecord {
    let mut record = IptcRecord::default();
    let mut utf8 = false;
    let mut pos = 0usize;

    while pos + 5 <= data.len() {
        if data[pos] != TAG_MARKER {
            break;
        }
        let record_number = data[pos + 1];
        let dataset = data[pos + 2];
        let raw_size = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;

        let (size, header) = if raw_size & 0x8000 != 0 {
            // Extended dataset: low bits give the byte count of the size field
            let count = raw_size & 0x7FFF;
            if count == 0 || count > 4 || pos + 5 + count > data.len() {
                break;
            }
            let size = data[pos + 5..pos + 5 + count]
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            (size, 5 + count)
        } else {
            (raw_size, 5)
        };

        let start = pos + header;
        let end = match start.checked_add(size) {
            Some(end) if end <= data.len() => end,
            _ => break,
        };
        let value = &data[start..end];

        match (record_number, dataset) {
            (ENVELOPE_RECORD, CODED_CHARACTER_SET) => utf8 = value == UTF8_CHARSET,
            (APPLICATION_RECORD, KEYWORDS) => {
                if let Some(text) = decode_text(value, utf8) {
                    record.keywords.push(text);
                }
            }
            (APPLICATION_RECORD, BY_LINE) => {
                if record.by_line.is_none() {
                    record.by_line = decode_text(value, utf8);
                }
            }
            (APPLICATION_RECORD, CREDIT) => {
                if record.credit.is_none() {
                    record.credit = decode_text(value, utf8);
                }
            }
            (APPLICATION_RECORD, CAPTION) => {
                if record.caption.is_none() {
                    record.caption = decode_text(value, utf8);
                }
            }
            _ => {}
        }

        pos = end;
    }

    record
}

/// Decode dataset text: UTF-8 when declared or valid, else Latin-1
fn decode_text(bytes: &[u8], declared_utf8: bool) -> Option<String> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) if declared_utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    };
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read until `buf` is full or EOF; returns bytes read
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
