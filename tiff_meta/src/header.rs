//! The 8-byte TIFF header: byte order, magic number, and IFD 0's location.

use crate::{
    error::{HeaderProblem, TiffResult},
    reader::Reader,
};
use tiff_meta_types::Endianness;

/// The TIFF magic number. Always 42, in the file's own byte order.
const TIFF_MAGIC_NUMBER: u16 = 0x002A;

/// How long the header is. IFD 0 can't start before this.
pub const HEADER_LEN: u32 = 8;

/// Finds the endianness of the TIFF blob and checks its magic number.
///
/// Returns a reader that uses the found endianness for everything after.
pub fn read_header(blob: &[u8]) -> TiffResult<Reader<'_>> {
    let [a, b, ..] = *blob else {
        log::error!("Couldn't find byte order marker! len: `{}`", blob.len());
        return Err(HeaderProblem::TooShort { len: blob.len() }.into());
    };

    // the marker is the same in both byte orders, so we don't need one yet
    log::trace!("Grabbing BOM...");
    let endianness = match [a, b] {
        [b'I', b'I'] => Endianness::Little,
        [b'M', b'M'] => Endianness::Big,
        found => {
            let e = HeaderProblem::WeirdByteOrderMarker { found };
            log::error!("Couldn't parse TIFF header! err: {e}");
            return Err(e.into());
        }
    };
    log::trace!("Found BOM: {endianness:?}");

    let reader = Reader::new(blob, endianness);

    log::trace!("Checking magic number...");
    let magic_number: u16 = reader.u16(2).map_err(|_| {
        log::error!("Couldn't find TIFF magic number!");
        HeaderProblem::TooShort { len: blob.len() }
    })?;

    if magic_number != TIFF_MAGIC_NUMBER {
        log::error!("Magic number wasn't for TIFF. got: `{magic_number}`");
        return Err(HeaderProblem::MagicNumberWasntTiff {
            found: magic_number,
        }
        .into());
    }

    log::trace!("Magic number was good!");
    Ok(reader)
}

/// Grabs IFD 0's offset from the header.
pub fn ifd0_offset(reader: &Reader<'_>) -> TiffResult<u32> {
    let offset: u32 = reader.u32(4).map_err(|_| {
        log::error!("Didn't find an IFD 0 offset!");
        HeaderProblem::TooShort { len: reader.len() }
    })?;

    if offset < HEADER_LEN {
        log::error!("IFD 0 offset placed it inside the header. offset: `{offset}`");
        return Err(HeaderProblem::Ifd0OffsetInsideHeader { found: offset }.into());
    }

    log::trace!("found IFD 0 offset: `{offset}`");
    Ok(offset)
}
