/// Result of anything that decodes TIFF structure.
///
/// An `Err` means the whole parse failed. Callers usually treat that as "this
/// file has no usable metadata".
pub type TiffResult<T> = Result<T, TiffError>;

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum TiffError {
    /// The 8-byte TIFF header was broken.
    MalformedHeader(HeaderProblem),

    /// A directory entry used a field type outside of `1..=13`.
    UnknownFieldType {
        /// The tag of the entry that had the weird type.
        tag: u16,

        /// The type code we found.
        got: u16,
    },

    /// A read would have gone past the end of the buffer.
    ///
    /// The offset is relative to the start of the TIFF header.
    OffsetOutOfBounds {
        /// Where the read started.
        offset: u64,

        /// How many bytes the read needed.
        needed: u64,

        /// The buffer's length.
        len: usize,
    },
}

/// What exactly was wrong with the TIFF header.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum HeaderProblem {
    /// The input was shorter than a TIFF header.
    TooShort { len: usize },

    /// The byte order marker wasn't `II` or `MM`.
    WeirdByteOrderMarker { found: [u8; 2] },

    /// The magic number wasn't 42.
    MagicNumberWasntTiff { found: u16 },

    /// IFD 0's offset would place it inside the header.
    Ifd0OffsetInsideHeader { found: u32 },
}

impl core::fmt::Display for TiffError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TiffError::MalformedHeader(problem) => write!(f, "Malformed TIFF header: {problem}"),
            TiffError::UnknownFieldType { tag, got } => write!(
                f,
                "Entry for tag `{tag:#06x}` has an unknown field type. got: `{got}`"
            ),
            TiffError::OffsetOutOfBounds {
                offset,
                needed,
                len,
            } => write!(
                f,
                "Tried to read `{needed}` bytes at offset `{offset}`, \
                but the buffer is only `{len}` bytes long."
            ),
        }
    }
}

impl core::fmt::Display for HeaderProblem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HeaderProblem::TooShort { len } => {
                write!(f, "input is too short to hold a header. len: `{len}`")
            }
            HeaderProblem::WeirdByteOrderMarker { found } => {
                match core::str::from_utf8(found.as_slice()) {
                    Ok(s) => write!(f, "got a weird byte-order marker: `{s}`"),
                    Err(_) => write!(f, "got a weird byte-order marker: {found:x?}"),
                }
            }
            HeaderProblem::MagicNumberWasntTiff { found } => {
                write!(f, "magic number was not TIFF's. got: `{found}`")
            }
            HeaderProblem::Ifd0OffsetInsideHeader { found } => write!(
                f,
                "IFD 0 offset points inside the 8-byte header. got: `{found}`"
            ),
        }
    }
}

impl From<HeaderProblem> for TiffError {
    fn from(value: HeaderProblem) -> Self {
        TiffError::MalformedHeader(value)
    }
}

impl core::error::Error for TiffError {}

/// Problems finding TIFF data inside a container file.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum SourceError {
    /// The first marker of a JPEG file wasn't `SOI`.
    FirstMarkerWasNotSoi {
        /// The marker code we found instead.
        marker_code: u8,
    },

    /// A JPEG marker didn't start with `0xFF`.
    MarkerByteWasWrong(u8),

    /// A JPEG segment claimed more bytes than the file had left.
    TruncatedSegment {
        /// The segment's marker code.
        marker_code: u8,

        /// The length the segment asked for, minus its length bytes.
        len: u16,

        /// How many bytes were actually left.
        remaining: usize,
    },

    /// A JPEG segment's length was smaller than its own length field.
    NegativeLength { marker_code: u8 },
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceError::FirstMarkerWasNotSoi { marker_code } => write!(
                f,
                "The first JPEG marker should be `SOI`, but got `{marker_code:#04x}`."
            ),
            SourceError::MarkerByteWasWrong(b) => {
                write!(f, "JPEG markers start with `0xFF`, but got `{b:#04x}`.")
            }
            SourceError::TruncatedSegment {
                marker_code,
                len,
                remaining,
            } => write!(
                f,
                "JPEG segment `{marker_code:#04x}` wanted `{len}` bytes, \
                but only `{remaining}` were left."
            ),
            SourceError::NegativeLength { marker_code } => write!(
                f,
                "JPEG segment `{marker_code:#04x}` had a length shorter than its length bytes."
            ),
        }
    }
}

impl core::error::Error for SourceError {}

/// Anything that can go wrong in the one-call helpers, like
/// [`crate::parse`].
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum MetaError {
    Source(SourceError),
    Tiff(TiffError),
}

impl core::fmt::Display for MetaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetaError::Source(e) => write!(f, "Couldn't find TIFF data. err: {e}"),
            MetaError::Tiff(e) => write!(f, "Couldn't decode TIFF data. err: {e}"),
        }
    }
}

impl core::error::Error for MetaError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            MetaError::Source(e) => Some(e),
            MetaError::Tiff(e) => Some(e),
        }
    }
}

impl From<SourceError> for MetaError {
    fn from(value: SourceError) -> Self {
        MetaError::Source(value)
    }
}

impl From<TiffError> for MetaError {
    fn from(value: TiffError) -> Self {
        MetaError::Tiff(value)
    }
}
