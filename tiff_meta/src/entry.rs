//! Decodes one 12-byte directory entry into a [`TagValue`].
//!
//! An entry looks like this:
//!
//! | bytes  | meaning                 |
//! |--------|-------------------------|
//! | 0..2   | tag ID                  |
//! | 2..4   | field type              |
//! | 4..8   | count of values         |
//! | 8..12  | the value, or an offset |
//!
//! When all the values fit in four bytes, they're stored inline in the last
//! slot. Otherwise, that slot holds an offset to where they really are.

use crate::{
    error::{TiffError, TiffResult},
    reader::Reader,
};
use tiff_meta_types::{FieldTy, Scalar, TagValue};

/// The size of one directory entry.
pub const ENTRY_LEN: usize = 12;

/// The most bytes a value can take while still being inlined.
const INLINE_CAPACITY: u64 = 4;

/// Parses out the value of the entry starting at `entry_offset`.
///
/// `tag` is only used for diagnostics. The directory has already read it.
pub fn decode_entry(reader: &Reader<'_>, tag: u16, entry_offset: usize) -> TiffResult<TagValue> {
    // type (2 bytes)
    let raw_ty: u16 = reader.u16(entry_offset + 2)?;
    let ty = FieldTy::try_from(raw_ty).map_err(|_| {
        log::error!("Encountered unknown field type on tag `{tag:#06x}`: `{raw_ty}`");
        TiffError::UnknownFieldType { tag, got: raw_ty }
    })?;

    // count (4 bytes)
    let count: u32 = reader.u32(entry_offset + 4)?;

    // can't overflow: the widest type is 8 bytes
    let total_size: u64 = u64::from(ty.width()) * u64::from(count);
    log::trace!(
        "(entry info...
    tag: {tag:#06x},
    ty: {ty:?},
    count: {count},
    total size: {total_size}
)"
    );

    // figure out where the value lives
    let value_offset: usize = if total_size <= INLINE_CAPACITY {
        log::trace!("Value is inline.");
        entry_offset + 8
    } else {
        let offset: u32 = reader.u32(entry_offset + 8)?;
        log::trace!("Value is out-of-line at offset `{offset}`.");

        // check the whole range before touching any of it
        let end: u64 = u64::from(offset) + total_size;
        if end > reader.len() as u64 {
            log::error!(
                "Entry for tag `{tag:#06x}` said its data is stored outside the buffer! \
                offset: `{offset}`, size: `{total_size}`, buffer len: `{}`",
                reader.len()
            );
            return Err(TiffError::OffsetOutOfBounds {
                offset: offset.into(),
                needed: total_size,
                len: reader.len(),
            });
        }

        offset as usize
    };

    let count = count as usize;
    match ty {
        // text stays one string. writers pad it with any number of NULs
        FieldTy::Ascii => {
            let text: String = reader.ascii(value_offset, count)?;
            Ok(TagValue::Ascii(text.trim_end_matches('\0').to_owned()))
        }

        // opaque bytes stay opaque
        FieldTy::Undefined => Ok(TagValue::Undefined(
            reader.bytes(value_offset, count)?.to_vec(),
        )),

        _ if count == 1 => Ok(TagValue::Scalar(read_scalar(reader, ty, value_offset)?)),

        _ => {
            let width = usize::from(ty.width());
            (0..count)
                .map(|i| read_scalar(reader, ty, value_offset + i * width))
                .collect::<TiffResult<Vec<Scalar>>>()
                .map(TagValue::List)
        }
    }
}

/// Reads a single value of type `ty` at `offset`.
fn read_scalar(reader: &Reader<'_>, ty: FieldTy, offset: usize) -> TiffResult<Scalar> {
    Ok(match ty {
        FieldTy::Byte | FieldTy::Ascii | FieldTy::Undefined => Scalar::Byte(reader.u8(offset)?),
        FieldTy::SByte => Scalar::SByte(reader.i8(offset)?),
        FieldTy::Short => Scalar::Short(reader.u16(offset)?),
        FieldTy::SShort => Scalar::SShort(reader.i16(offset)?),
        FieldTy::Long | FieldTy::Ifd => Scalar::Long(reader.u32(offset)?),
        FieldTy::SLong => Scalar::SLong(reader.i32(offset)?),
        FieldTy::Float => Scalar::Float(reader.f32(offset)?),
        FieldTy::Double => Scalar::Double(reader.f64(offset)?),

        // a zero denominator gives back inf/NaN. that's left to the caller
        FieldTy::Rational => {
            let numerator = reader.u32(offset)?;
            let denominator = reader.u32(offset + 4)?;
            Scalar::Double(f64::from(numerator) / f64::from(denominator))
        }
        FieldTy::SRational => {
            let numerator = reader.i32(offset)?;
            let denominator = reader.i32(offset + 4)?;
            Scalar::Double(f64::from(numerator) / f64::from(denominator))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::decode_entry;
    use crate::{error::TiffError, reader::Reader, util::logger};
    use tiff_meta_types::{Endianness, Scalar, TagValue};

    /// helper: a little-endian entry at offset zero
    fn entry(tag: u16, ty: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(tag.to_le_bytes().as_slice());
        v.extend_from_slice(ty.to_le_bytes().as_slice());
        v.extend_from_slice(count.to_le_bytes().as_slice());
        v.extend_from_slice(value.as_slice());
        v
    }

    fn decode(bytes: &[u8]) -> Result<TagValue, TiffError> {
        decode_entry(&Reader::new(bytes, Endianness::Little), 0x0100, 0)
    }

    #[test]
    fn inline_long() {
        logger();

        let bytes = entry(0x0100, 4, 1, 640_u32.to_le_bytes());
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::Long(640))));
    }

    /// These inline bytes would point way out of the buffer if they were
    /// misread as an offset.
    #[test]
    fn inline_slot_is_never_dereferenced() {
        logger();

        let bytes = entry(0x0100, 3, 2, [0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(
            decode(&bytes),
            Ok(TagValue::List(vec![
                Scalar::Short(0xFFFF),
                Scalar::Short(0x7FFF)
            ]))
        );

        let bytes = entry(0x0100, 1, 4, [1, 2, 3, 4]);
        assert_eq!(
            decode(&bytes),
            Ok(TagValue::List(vec![
                Scalar::Byte(1),
                Scalar::Byte(2),
                Scalar::Byte(3),
                Scalar::Byte(4)
            ]))
        );
    }

    #[test]
    fn out_of_line_list() {
        logger();

        let mut bytes = entry(0x0102, 3, 3, 12_u32.to_le_bytes());
        for v in [8_u16, 8, 8] {
            bytes.extend_from_slice(v.to_le_bytes().as_slice());
        }

        assert_eq!(
            decode(&bytes),
            Ok(TagValue::List(vec![
                Scalar::Short(8),
                Scalar::Short(8),
                Scalar::Short(8)
            ]))
        );
    }

    #[test]
    fn ascii_strips_every_trailing_nul() {
        logger();

        let mut bytes = entry(0x010F, 2, 8, 12_u32.to_le_bytes());
        bytes.extend_from_slice(b"Canon\0\0\0");
        assert_eq!(decode(&bytes), Ok(TagValue::Ascii("Canon".into())));

        // short strings are inline
        let bytes = entry(0x010F, 2, 4, *b"ab\0\0");
        assert_eq!(decode(&bytes), Ok(TagValue::Ascii("ab".into())));

        // a single character is still a string, not a byte
        let bytes = entry(0x0001, 2, 2, *b"S\0\0\0");
        assert_eq!(decode(&bytes), Ok(TagValue::Ascii("S".into())));
    }

    #[test]
    fn undefined_stays_opaque() {
        logger();

        let bytes = entry(0x9000, 7, 4, *b"0232");
        assert_eq!(decode(&bytes), Ok(TagValue::Undefined(b"0232".to_vec())));

        let mut bytes = entry(0x927C, 7, 6, 12_u32.to_le_bytes());
        bytes.extend_from_slice(&[9, 8, 7, 6, 5, 4]);
        assert_eq!(
            decode(&bytes),
            Ok(TagValue::Undefined(vec![9, 8, 7, 6, 5, 4]))
        );
    }

    #[test]
    fn rationals_become_ratios() {
        logger();

        let mut bytes = entry(0x011A, 5, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice(72_u32.to_le_bytes().as_slice());
        bytes.extend_from_slice(1_u32.to_le_bytes().as_slice());
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::Double(72.0))));

        let mut bytes = entry(0x9204, 10, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice((-1_i32).to_le_bytes().as_slice());
        bytes.extend_from_slice(3_i32.to_le_bytes().as_slice());
        assert_eq!(
            decode(&bytes),
            Ok(TagValue::Scalar(Scalar::Double(-1.0 / 3.0)))
        );
    }

    #[test]
    fn zero_denominator_is_non_finite() {
        logger();

        let mut bytes = entry(0x011A, 5, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice(5_u32.to_le_bytes().as_slice());
        bytes.extend_from_slice(0_u32.to_le_bytes().as_slice());
        let Ok(TagValue::Scalar(Scalar::Double(v))) = decode(&bytes) else {
            panic!("rational should decode");
        };
        assert!(v.is_infinite());

        let mut bytes = entry(0x011A, 5, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice([0_u8; 8].as_slice());
        let Ok(TagValue::Scalar(Scalar::Double(v))) = decode(&bytes) else {
            panic!("rational should decode");
        };
        assert!(v.is_nan());
    }

    #[test]
    fn signed_and_floats() {
        logger();

        let bytes = entry(0x0001, 8, 1, [0xFE, 0xFF, 0, 0]);
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::SShort(-2))));

        let bytes = entry(0x0001, 6, 1, [0x80, 0, 0, 0]);
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::SByte(-128))));

        let bytes = entry(0x0001, 11, 1, 2.5_f32.to_le_bytes());
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::Float(2.5))));

        let mut bytes = entry(0x0001, 12, 1, 12_u32.to_le_bytes());
        bytes.extend_from_slice(6.25_f64.to_le_bytes().as_slice());
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::Double(6.25))));

        let bytes = entry(0x8769, 13, 1, 26_u32.to_le_bytes());
        assert_eq!(decode(&bytes), Ok(TagValue::Scalar(Scalar::Long(26))));
    }

    #[test]
    fn unknown_type() {
        logger();

        for bad in [0_u16, 14, 129] {
            let bytes = entry(0x0100, bad, 1, [0; 4]);
            assert_eq!(
                decode(&bytes),
                Err(TiffError::UnknownFieldType {
                    tag: 0x0100,
                    got: bad
                })
            );
        }
    }

    #[test]
    fn out_of_line_offset_past_buffer() {
        logger();

        let bytes = entry(0x010F, 2, 20, 500_u32.to_le_bytes());
        assert_eq!(
            decode(&bytes),
            Err(TiffError::OffsetOutOfBounds {
                offset: 500,
                needed: 20,
                len: 12
            })
        );

        // starts inside, but runs off the end
        let mut bytes = entry(0x010F, 2, 20, 12_u32.to_le_bytes());
        bytes.extend_from_slice(b"too short");
        assert!(matches!(
            decode(&bytes),
            Err(TiffError::OffsetOutOfBounds { offset: 12, .. })
        ));

        // huge counts don't overflow into something small
        let bytes = entry(0x0111, 12, u32::MAX, 12_u32.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(TiffError::OffsetOutOfBounds { .. })
        ));
    }

    #[test]
    fn zero_count() {
        logger();

        assert_eq!(
            decode(&entry(0x0100, 3, 0, [0; 4])),
            Ok(TagValue::List(Vec::new()))
        );
        assert_eq!(
            decode(&entry(0x010F, 2, 0, [0; 4])),
            Ok(TagValue::Ascii(String::new()))
        );
    }

    #[test]
    fn big_endian_entry() {
        logger();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(0x0100_u16.to_be_bytes().as_slice());
        bytes.extend_from_slice(3_u16.to_be_bytes().as_slice());
        bytes.extend_from_slice(1_u32.to_be_bytes().as_slice());
        bytes.extend_from_slice(1920_u16.to_be_bytes().as_slice());
        bytes.extend_from_slice(0_u16.to_be_bytes().as_slice());

        assert_eq!(
            decode_entry(&Reader::new(&bytes, Endianness::Big), 0x0100, 0),
            Ok(TagValue::Scalar(Scalar::Short(1920))),
            "inline shorts sit in the first half of the slot"
        );
    }
}
