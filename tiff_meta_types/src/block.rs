//! Contains the named blocks (IFDs) a TIFF structure can hold.
//!
//! For more info, see the [`IfdBlock`] enumeration.

/// A named directory within TIFF metadata.
///
/// Only IFD 0 is found directly from the header. The others are reachable
/// through pointers: EXIF and GPS through tags in IFD 0, Interop through a tag
/// in IFD 0 or EXIF, and the thumbnail through the "next IFD" link trailing
/// IFD 0's entries.
///
/// The variant order is the decoding order, which is also the order blocks
/// are merged in.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdBlock {
    /// The primary directory, describing the main image.
    #[doc(alias = "IFD0")]
    Ifd0,

    /// Camera-based metadata, like exposure information.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// Location metadata.
    #[doc(alias = "GPSIFD")]
    Gps,

    /// Info about the rules the Exif data was written under.
    #[doc(alias = "InteropIFD")]
    Interop,

    /// The chained "next" directory, which describes the embedded thumbnail.
    #[doc(alias = "IFD1")]
    Thumbnail,
}

impl IfdBlock {
    /// Every block, in decoding order.
    pub const ALL: [IfdBlock; 5] = [
        IfdBlock::Ifd0,
        IfdBlock::Exif,
        IfdBlock::Gps,
        IfdBlock::Interop,
        IfdBlock::Thumbnail,
    ];

    /// The block's short name.
    ///
    /// ```
    /// use tiff_meta_types::block::IfdBlock;
    ///
    /// assert_eq!(IfdBlock::Thumbnail.name(), "thumbnail");
    /// ```
    pub const fn name(&self) -> &'static str {
        match self {
            IfdBlock::Ifd0 => "ifd0",
            IfdBlock::Exif => "exif",
            IfdBlock::Gps => "gps",
            IfdBlock::Interop => "interop",
            IfdBlock::Thumbnail => "thumbnail",
        }
    }

    /// The block whose dictionary names this block's tags.
    ///
    /// The thumbnail directory is an IFD 0-style table, so it shares IFD 0's
    /// tags.
    pub const fn dictionary(&self) -> IfdBlock {
        match self {
            IfdBlock::Thumbnail => IfdBlock::Ifd0,
            other => *other,
        }
    }
}

impl core::fmt::Display for IfdBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
