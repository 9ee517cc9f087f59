//! Field types, as stored in the second slot of each directory entry.

/// The type of the values stored in a directory entry.
///
/// TIFF 6.0 defines twelve of these, and the Exif/TIFF-EP extensions add a
/// thirteenth (`Ifd`) for entries that point at another directory.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FieldTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    Ifd = 13,
}

impl FieldTy {
    /// How many bytes one value of this type takes up.
    ///
    /// ```
    /// use tiff_meta_types::field::FieldTy;
    ///
    /// assert_eq!(FieldTy::Short.width(), 2_u8);
    /// assert_eq!(FieldTy::SRational.width(), 8_u8);
    /// ```
    pub const fn width(&self) -> u8 {
        match self {
            FieldTy::Byte | FieldTy::Ascii | FieldTy::SByte | FieldTy::Undefined => 1_u8,
            FieldTy::Short | FieldTy::SShort => 2_u8,
            FieldTy::Long | FieldTy::SLong | FieldTy::Float | FieldTy::Ifd => 4_u8,
            FieldTy::Rational | FieldTy::SRational | FieldTy::Double => 8_u8,
        }
    }
}

impl TryFrom<u16> for FieldTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),
            13 => Ok(Self::Ifd),

            _ => Err(()),
        }
    }
}

/// The byte order of all multi-byte values in a TIFF structure.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian), found in the first two bytes of the header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}
