//! Finds where TIFF data lives inside a file.
//!
//! Raw TIFF files are TIFF data from start to end. JPEG files keep theirs in
//! an `APP1` segment, right after an `Exif\0\0` signature, and it ends where
//! the segment does.

use core::ops::Range;

use winnow::{
    Parser as _,
    binary::{be_u16, u8},
    error::EmptyError,
    token::take,
};

use crate::error::SourceError;

/// The first marker code, `SOI` (start of image).
const SOI_MARKER_CODE: u8 = 0xD8;

/// The last marker code, `EOI` (end of image).
const EOI_MARKER_CODE: u8 = 0xD9;

/// Start of scan. Metadata segments always come before this.
const SOS_MARKER_CODE: u8 = 0xDA;

/// The marker code for `APP1`, which holds EXIF.
const APP1_MARKER_CODE: u8 = 0xE1;

/// Comes before the TIFF header in an `APP1` segment.
const EXIF_SIG: &[u8] = b"Exif\0\0";

const TIFF_LE_SIG: &[u8] = b"II\x2a\x00";
const TIFF_BE_SIG: &[u8] = b"MM\x00\x2a";

enum Marker {
    Standalone { marker_code: u8 },
    Full { marker_code: u8, len: u16 },
}

/// Returns the byte range of the TIFF data inside `file`.
///
/// TIFF offsets must never reach outside this range, so pass only
/// `&file[range]` to the parser.
///
/// `Ok(None)` means the file is fine, but has no TIFF data we know how to
/// find.
pub fn find_tiff_range(file: &[u8]) -> Result<Option<Range<usize>>, SourceError> {
    if file.starts_with(TIFF_LE_SIG) || file.starts_with(TIFF_BE_SIG) {
        log::trace!("File is a raw TIFF.");
        return Ok(Some(0..file.len()));
    }

    if file.first() == Some(&0xFF) {
        log::trace!("File looks like a JPEG. Scanning its segments...");
        return find_in_jpeg(file);
    }

    log::trace!("File isn't a TIFF or JPEG. No TIFF data to find.");
    Ok(None)
}

fn find_in_jpeg(file: &[u8]) -> Result<Option<Range<usize>>, SourceError> {
    let input: &mut &[u8] = &mut &*file;

    match marker(input)? {
        Some(Marker::Standalone { marker_code }) if marker_code == SOI_MARKER_CODE => (),
        Some(Marker::Standalone { marker_code } | Marker::Full { marker_code, .. }) => {
            log::error!("The first marker of a JPEG file should be `SOI`. got: `{marker_code:#04x}`");
            return Err(SourceError::FirstMarkerWasNotSoi { marker_code });
        }
        None => return Ok(None),
    }

    while !input.is_empty() {
        let (marker_code, len) = match marker(input)? {
            None => break,
            Some(Marker::Standalone { marker_code }) if marker_code == EOI_MARKER_CODE => {
                log::trace!("Hit EOI without finding EXIF.");
                break;
            }
            Some(Marker::Standalone { marker_code }) => {
                log::trace!("Skipping standalone marker `{marker_code:#04x}`.");
                continue;
            }
            Some(Marker::Full { marker_code, .. }) if marker_code == SOS_MARKER_CODE => {
                log::trace!("Hit SOS without finding EXIF.");
                break;
            }
            Some(Marker::Full { marker_code, len }) => (marker_code, len),
        };

        let payload_offset = file.len() - input.len();
        let remaining = input.len();
        let payload: &[u8] = take(len as usize)
            .parse_next(input)
            .map_err(|_: EmptyError| {
                log::error!(
                    "JPEG segment ran past the end of the file. \
                    marker code: `{marker_code:#04x}`, len: `{len}`, remaining: `{remaining}`"
                );
                SourceError::TruncatedSegment {
                    marker_code,
                    len,
                    remaining,
                }
            })?;

        if marker_code == APP1_MARKER_CODE && payload.starts_with(EXIF_SIG) {
            let range = payload_offset + EXIF_SIG.len()..payload_offset + payload.len();
            log::trace!("Found EXIF in APP1. TIFF data spans `{range:?}`.");
            return Ok(Some(range));
        }
    }

    Ok(None)
}

/// Grabs the next marker.
///
/// Returns `Ok(None)` when the file ends before a whole marker does.
fn marker(input: &mut &[u8]) -> Result<Option<Marker>, SourceError> {
    let Ok(first_marker_byte) = u8::<_, EmptyError>.parse_next(input) else {
        log::warn!("File ended before the next JPEG marker.");
        return Ok(None);
    };
    if first_marker_byte != 0xFF {
        log::error!("JPEG marker's first byte was wrong. got: `{first_marker_byte:#04x}`");
        return Err(SourceError::MarkerByteWasWrong(first_marker_byte));
    }

    // any number of `0xFF` fill bytes can come before the code
    let marker_code: u8 = loop {
        let Ok(k) = u8::<_, EmptyError>.parse_next(input) else {
            log::warn!("File ended inside a JPEG marker.");
            return Ok(None);
        };

        if k != 0xFF {
            break k;
        }
    };

    const STANDALONE_MARKERS: &[u8] = &[
        0x01, 0xD0, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9,
    ];
    if STANDALONE_MARKERS.contains(&marker_code) {
        return Ok(Some(Marker::Standalone { marker_code }));
    }

    let Ok(original_len) = be_u16::<_, EmptyError>.parse_next(input) else {
        log::warn!("File ended before JPEG segment `{marker_code:#04x}` gave its length.");
        return Ok(None);
    };

    // the length counts its own two bytes
    let len: u16 = original_len
        .checked_sub(2)
        .ok_or(SourceError::NegativeLength { marker_code })
        .inspect_err(|e| log::error!("Bad JPEG segment length! err: {e}"))?;

    Ok(Some(Marker::Full { marker_code, len }))
}
