//! # `tiff_meta`
//!
//! Decodes TIFF-structured metadata (EXIF, GPS, Interop, and thumbnails) from
//! raw TIFF files and JPEG `APP1` segments.
//!
//! TIFF metadata is a graph of directories pointing at each other by byte
//! offset. This crate walks that graph from one borrowed buffer, checking
//! every offset before it's read, so truncated or hostile files give an error
//! instead of a crash.
//!
//! ## Usage
//!
//! For whole files, use [`parse`] or [`thumbnail`]:
//!
//! ```
//! use tiff_meta::{Options, Output, TagKey};
//!
//! // a tiny little-endian TIFF with one entry: `ImageWidth = 640`
//! let file: &[u8] = &[
//!     b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // header
//!     0x01, 0x00, // one entry
//!     0x00, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x80, 0x02, 0x00, 0x00,
//!     0x00, 0x00, 0x00, 0x00, // no next directory
//! ];
//!
//! let Some(Output::Merged(tags)) = tiff_meta::parse(file, Options::default().merge_output(true))?
//! else {
//!     panic!("should have found metadata");
//! };
//! assert_eq!(tags[&TagKey::Id(0x0100)].as_u32(), Some(640));
//! # Ok::<(), tiff_meta::error::MetaError>(())
//! ```
//!
//! If you already know where the TIFF header is, make a [`TiffParser`]
//! yourself. It decodes each block at most once, and only when asked.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub mod directory;
pub mod entry;
pub mod error;
pub mod header;
pub mod options;
pub mod parser;
pub mod post_process;
pub mod reader;
pub mod source;

pub use directory::TagFilter;
pub use error::{MetaError, TiffError, TiffResult};
pub use options::Options;
pub use parser::{BlockState, Output, TiffParser};
pub use tiff_meta_types::{
    Block, Date, DateTime, Endianness, FieldTy, IfdBlock, Scalar, TagKey, TagValue,
};

/// Finds the TIFF metadata in `file` and decodes it.
///
/// Returns `Ok(None)` if the file doesn't carry any TIFF metadata.
pub fn parse(file: &[u8], options: Options) -> Result<Option<Output>, MetaError> {
    let Some(tiff) = tiff_region(file)? else {
        log::trace!("No TIFF metadata in file.");
        return Ok(None);
    };

    let output = TiffParser::new(tiff, 0, options).parse()?;
    Ok(Some(output))
}

/// Finds the TIFF metadata in `file` and grabs its embedded thumbnail.
///
/// Returns `Ok(None)` if there's no metadata, or no thumbnail in it.
pub fn thumbnail(file: &[u8]) -> Result<Option<Vec<u8>>, MetaError> {
    let Some(tiff) = tiff_region(file)? else {
        log::trace!("No TIFF metadata in file, so no thumbnail.");
        return Ok(None);
    };

    Ok(TiffParser::new(tiff, 0, Options::default()).extract_thumbnail()?)
}

/// Slices out just the TIFF data, so offsets can't wander into the rest of
/// the file.
fn tiff_region(file: &[u8]) -> Result<Option<&[u8]>, MetaError> {
    let Some(range) = source::find_tiff_range(file)? else {
        return Ok(None);
    };

    Ok(Some(file.get(range).unwrap_or_default()))
}

pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }

    #[cfg(test)]
    pub mod testing;
}
