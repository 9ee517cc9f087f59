//! Random-access reads over the TIFF buffer.
//!
//! Offsets inside TIFF structures are absolute (relative to the header), so,
//! unlike a streaming parser, we jump around a lot. Every read here takes an
//! offset, checks it against the buffer's length, and only then hands the
//! window to `winnow` for decoding.

use winnow::{
    Parser as _,
    binary::{Endianness as WinnowEndianness, f32, f64, i8, i16, i32, u8, u16, u32},
    error::EmptyError,
    token::take,
};

use crate::error::{TiffError, TiffResult};
use tiff_meta_types::Endianness;

/// A bounds-checked, endian-aware view over the TIFF bytes.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'b> {
    blob: &'b [u8],
    endianness: Endianness,
}

impl<'b> Reader<'b> {
    pub fn new(blob: &'b [u8], endianness: Endianness) -> Self {
        Self { blob, endianness }
    }

    /// The byte order every multi-byte read uses.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn winnow_endianness(&self) -> WinnowEndianness {
        match self.endianness {
            Endianness::Little => WinnowEndianness::Little,
            Endianness::Big => WinnowEndianness::Big,
        }
    }

    /// The buffer's length in bytes.
    pub fn len(&self) -> usize {
        self.blob.len()
    }

    /// Borrows `len` bytes starting at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> TiffResult<&'b [u8]> {
        let out_of_bounds = || {
            log::error!(
                "Read of `{len}` bytes at offset `{offset}` leaves the buffer! \
                buffer len: `{}`",
                self.blob.len()
            );
            self.out_of_bounds(offset, len)
        };

        let mut input: &'b [u8] = self.blob.get(offset..).ok_or_else(out_of_bounds)?;
        take(len)
            .parse_next(&mut input)
            .map_err(|_: EmptyError| out_of_bounds())
    }

    pub fn u8(&self, offset: usize) -> TiffResult<u8> {
        let mut input = self.bytes(offset, 1)?;
        u8.parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 1))
    }

    pub fn i8(&self, offset: usize) -> TiffResult<i8> {
        let mut input = self.bytes(offset, 1)?;
        i8.parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 1))
    }

    pub fn u16(&self, offset: usize) -> TiffResult<u16> {
        let mut input = self.bytes(offset, 2)?;
        u16(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 2))
    }

    pub fn i16(&self, offset: usize) -> TiffResult<i16> {
        let mut input = self.bytes(offset, 2)?;
        i16(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 2))
    }

    pub fn u32(&self, offset: usize) -> TiffResult<u32> {
        let mut input = self.bytes(offset, 4)?;
        u32(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 4))
    }

    pub fn i32(&self, offset: usize) -> TiffResult<i32> {
        let mut input = self.bytes(offset, 4)?;
        i32(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 4))
    }

    pub fn f32(&self, offset: usize) -> TiffResult<f32> {
        let mut input = self.bytes(offset, 4)?;
        f32(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 4))
    }

    pub fn f64(&self, offset: usize) -> TiffResult<f64> {
        let mut input = self.bytes(offset, 8)?;
        f64(self.winnow_endianness())
            .parse_next(&mut input)
            .map_err(|_: EmptyError| self.out_of_bounds(offset, 8))
    }

    /// Reads `len` bytes of text.
    ///
    /// Anything that isn't valid UTF-8 is replaced rather than failing the
    /// whole parse. Plenty of writers put Latin-1 in "ASCII" fields.
    pub fn ascii(&self, offset: usize, len: usize) -> TiffResult<String> {
        let raw = self.bytes(offset, len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    fn out_of_bounds(&self, offset: usize, needed: usize) -> TiffError {
        TiffError::OffsetOutOfBounds {
            offset: offset as u64,
            needed: needed as u64,
            len: self.blob.len(),
        }
    }
}
