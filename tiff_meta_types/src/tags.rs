//! Tag dictionaries for each [`IfdBlock`].
//!
//! Decoding never needs these. They're used afterward to give numeric tag IDs
//! their conventional names, and by the parser to find the handful of tags
//! that point at other blocks.
//!
//! ## For contributors
//!
//! To add a tag, find the `tag_dictionary!` call for its block and add a line:
//!
//! ```no_compile
//! tag_dictionary!(enum ExifTag => IfdBlock::Exif,
//!     // ...snip!
//!     YourNewTag = 0x1234 => "YourNewTag",
//! );
//! ```
//!
//! The same ID may show up in several blocks with different meanings, so each
//! block gets its own enum.

use crate::block::IfdBlock;

/// Creates the tag enum for one block.
macro_rules! tag_dictionary {
    (enum $enum_name:ident => $block:expr,
        $( $tag_ident:ident = $tag_id:literal => $tag_name:literal, )+
    ) => {
        #[doc = "All tags known in the matching `IfdBlock` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $tag_ident = $tag_id,
            )+
        }

        impl $enum_name {
            /// Returns the `IfdBlock` whose tags this enum names.
            pub const fn block() -> IfdBlock {
                $block
            }

            /// Returns this tag's ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs the tag's conventional name.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$tag_ident => $tag_name, )+
                }
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $tag_id => Ok($enum_name::$tag_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

/// A tag known to one of the dictionaries.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifTag(ExifTag),
    GpsTag(GpsTag),
    InteropTag(InteropTag),
}

impl KnownTag {
    /// Looks up a tag ID in the dictionary for `block`.
    ///
    /// ```
    /// use tiff_meta_types::{block::IfdBlock, tags::{Ifd0Tag, KnownTag}};
    ///
    /// assert_eq!(
    ///     KnownTag::lookup(IfdBlock::Thumbnail, 0x0201),
    ///     Some(KnownTag::Ifd0Tag(Ifd0Tag::ThumbnailOffset)),
    /// );
    /// assert_eq!(KnownTag::lookup(IfdBlock::Gps, 0xBEEF), None);
    /// ```
    pub fn lookup(block: IfdBlock, tag_id: u16) -> Option<KnownTag> {
        match block {
            IfdBlock::Ifd0 | IfdBlock::Thumbnail => {
                Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag).ok()
            }
            IfdBlock::Exif => ExifTag::try_from(tag_id).map(KnownTag::ExifTag).ok(),
            IfdBlock::Gps => GpsTag::try_from(tag_id).map(KnownTag::GpsTag).ok(),
            IfdBlock::Interop => InteropTag::try_from(tag_id).map(KnownTag::InteropTag).ok(),
        }
    }

    /// Returns this tag's ID.
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_id(),
            KnownTag::ExifTag(k) => k.tag_id(),
            KnownTag::GpsTag(k) => k.tag_id(),
            KnownTag::InteropTag(k) => k.tag_id(),
        }
    }

    /// Grabs the tag's conventional name.
    ///
    /// ```
    /// use tiff_meta_types::tags::{ExifTag, KnownTag};
    ///
    /// assert_eq!(KnownTag::ExifTag(ExifTag::Iso).tag_name(), "ISO");
    /// ```
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_name(),
            KnownTag::ExifTag(k) => k.tag_name(),
            KnownTag::GpsTag(k) => k.tag_name(),
            KnownTag::InteropTag(k) => k.tag_name(),
        }
    }
}

/// Shorthand for `KnownTag::lookup(..).map(|t| t.tag_name())`.
pub fn tag_name(block: IfdBlock, tag_id: u16) -> Option<&'static str> {
    KnownTag::lookup(block, tag_id).map(|t| t.tag_name())
}

/// IFD 0's pointer to the EXIF block.
pub const EXIF_IFD_POINTER: u16 = Ifd0Tag::ExifIfdPointer.tag_id();

/// IFD 0's pointer to the GPS block.
pub const GPS_IFD_POINTER: u16 = Ifd0Tag::GpsIfdPointer.tag_id();

/// The pointer to the Interop block. It lives in EXIF, though some writers
/// put it in IFD 0.
pub const INTEROP_IFD_POINTER: u16 = ExifTag::InteropIfdPointer.tag_id();

/// Where the thumbnail's bytes start, stored in the thumbnail block.
pub const THUMBNAIL_OFFSET: u16 = Ifd0Tag::ThumbnailOffset.tag_id();

/// How many bytes the thumbnail takes, stored in the thumbnail block.
pub const THUMBNAIL_LENGTH: u16 = Ifd0Tag::ThumbnailLength.tag_id();

/*
 *
 *
 *  IFD 0 (and IFD 1, the thumbnail)
 *
 *
 */
tag_dictionary!(enum Ifd0Tag => IfdBlock::Ifd0,
    //
    // image structure
    ImageWidth = 0x0100 => "ImageWidth",
    ImageHeight = 0x0101 => "ImageHeight",
    BitsPerSample = 0x0102 => "BitsPerSample",
    Compression = 0x0103 => "Compression",
    PhotometricInterpretation = 0x0106 => "PhotometricInterpretation",
    Orientation = 0x0112 => "Orientation",
    SamplesPerPixel = 0x0115 => "SamplesPerPixel",
    PlanarConfiguration = 0x011C => "PlanarConfiguration",
    YCbCrSubSampling = 0x0212 => "YCbCrSubSampling",
    YCbCrPositioning = 0x0213 => "YCbCrPositioning",
    XResolution = 0x011A => "XResolution",
    YResolution = 0x011B => "YResolution",
    ResolutionUnit = 0x0128 => "ResolutionUnit",

    //
    // image data location
    StripOffsets = 0x0111 => "StripOffsets",
    RowsPerStrip = 0x0116 => "RowsPerStrip",
    StripByteCounts = 0x0117 => "StripByteCounts",
    ThumbnailOffset = 0x0201 => "ThumbnailOffset",
    ThumbnailLength = 0x0202 => "ThumbnailLength",

    //
    // image data characteristics
    TransferFunction = 0x012D => "TransferFunction",
    WhitePoint = 0x013E => "WhitePoint",
    PrimaryChromaticities = 0x013F => "PrimaryChromaticities",
    YCbCrCoefficients = 0x0211 => "YCbCrCoefficients",
    ReferenceBlackWhite = 0x0214 => "ReferenceBlackWhite",

    //
    // descriptive
    ImageDescription = 0x010E => "ImageDescription",
    Make = 0x010F => "Make",
    Model = 0x0110 => "Model",
    Software = 0x0131 => "Software",
    ModifyDate = 0x0132 => "ModifyDate",
    Artist = 0x013B => "Artist",
    HostComputer = 0x013C => "HostComputer",
    Copyright = 0x8298 => "Copyright",
    Rating = 0x4746 => "Rating",
    RatingPercent = 0x4749 => "RatingPercent",
    XpTitle = 0x9C9B => "XPTitle",
    XpComment = 0x9C9C => "XPComment",
    XpAuthor = 0x9C9D => "XPAuthor",
    XpKeywords = 0x9C9E => "XPKeywords",
    XpSubject = 0x9C9F => "XPSubject",

    //
    // embedded blobs of other formats
    ApplicationNotes = 0x02BC => "ApplicationNotes",
    IptcNaa = 0x83BB => "IPTC",
    IccProfile = 0x8773 => "ICC",
    PrintIm = 0xC4A5 => "PrintIM",

    //
    // pointers
    ExifIfdPointer = 0x8769 => "ExifIFDPointer",
    GpsIfdPointer = 0x8825 => "GPSIFDPointer",
    InteropIfdPointer = 0xA005 => "InteropIFDPointer",
);

/*
 *
 *
 *  EXIF
 *
 *
 */
tag_dictionary!(enum ExifTag => IfdBlock::Exif,
    //
    // versions
    ExifVersion = 0x9000 => "ExifVersion",
    FlashpixVersion = 0xA000 => "FlashpixVersion",

    //
    // color and image
    ColorSpace = 0xA001 => "ColorSpace",
    Gamma = 0xA500 => "Gamma",
    ComponentsConfiguration = 0x9101 => "ComponentsConfiguration",
    CompressedBitsPerPixel = 0x9102 => "CompressedBitsPerPixel",
    ExifImageWidth = 0xA002 => "ExifImageWidth",
    ExifImageHeight = 0xA003 => "ExifImageHeight",

    //
    // user info
    MakerNote = 0x927C => "MakerNote",
    UserComment = 0x9286 => "UserComment",
    RelatedSoundFile = 0xA004 => "RelatedSoundFile",

    //
    // dates
    DateTimeOriginal = 0x9003 => "DateTimeOriginal",
    CreateDate = 0x9004 => "CreateDate",
    OffsetTime = 0x9010 => "OffsetTime",
    OffsetTimeOriginal = 0x9011 => "OffsetTimeOriginal",
    OffsetTimeDigitized = 0x9012 => "OffsetTimeDigitized",
    SubSecTime = 0x9290 => "SubSecTime",
    SubSecTimeOriginal = 0x9291 => "SubSecTimeOriginal",
    SubSecTimeDigitized = 0x9292 => "SubSecTimeDigitized",

    //
    // capture conditions
    ExposureTime = 0x829A => "ExposureTime",
    FNumber = 0x829D => "FNumber",
    ExposureProgram = 0x8822 => "ExposureProgram",
    SpectralSensitivity = 0x8824 => "SpectralSensitivity",
    Iso = 0x8827 => "ISO",
    SensitivityType = 0x8830 => "SensitivityType",
    RecommendedExposureIndex = 0x8832 => "RecommendedExposureIndex",
    ShutterSpeedValue = 0x9201 => "ShutterSpeedValue",
    ApertureValue = 0x9202 => "ApertureValue",
    BrightnessValue = 0x9203 => "BrightnessValue",
    ExposureCompensation = 0x9204 => "ExposureCompensation",
    MaxApertureValue = 0x9205 => "MaxApertureValue",
    SubjectDistance = 0x9206 => "SubjectDistance",
    MeteringMode = 0x9207 => "MeteringMode",
    LightSource = 0x9208 => "LightSource",
    Flash = 0x9209 => "Flash",
    FocalLength = 0x920A => "FocalLength",
    SubjectArea = 0x9214 => "SubjectArea",
    FlashEnergy = 0xA20B => "FlashEnergy",
    FocalPlaneXResolution = 0xA20E => "FocalPlaneXResolution",
    FocalPlaneYResolution = 0xA20F => "FocalPlaneYResolution",
    FocalPlaneResolutionUnit = 0xA210 => "FocalPlaneResolutionUnit",
    SubjectLocation = 0xA214 => "SubjectLocation",
    ExposureIndex = 0xA215 => "ExposureIndex",
    SensingMethod = 0xA217 => "SensingMethod",
    FileSource = 0xA300 => "FileSource",
    SceneType = 0xA301 => "SceneType",
    CfaPattern = 0xA302 => "CFAPattern",
    CustomRendered = 0xA401 => "CustomRendered",
    ExposureMode = 0xA402 => "ExposureMode",
    WhiteBalance = 0xA403 => "WhiteBalance",
    DigitalZoomRatio = 0xA404 => "DigitalZoomRatio",
    FocalLengthIn35mmFormat = 0xA405 => "FocalLengthIn35mmFormat",
    SceneCaptureType = 0xA406 => "SceneCaptureType",
    GainControl = 0xA407 => "GainControl",
    Contrast = 0xA408 => "Contrast",
    Saturation = 0xA409 => "Saturation",
    Sharpness = 0xA40A => "Sharpness",
    SubjectDistanceRange = 0xA40C => "SubjectDistanceRange",

    //
    // other
    ImageUniqueId = 0xA420 => "ImageUniqueID",
    OwnerName = 0xA430 => "OwnerName",
    SerialNumber = 0xA431 => "SerialNumber",
    LensInfo = 0xA432 => "LensInfo",
    LensMake = 0xA433 => "LensMake",
    LensModel = 0xA434 => "LensModel",
    LensSerialNumber = 0xA435 => "LensSerialNumber",

    //
    // pointers
    InteropIfdPointer = 0xA005 => "InteropIFDPointer",
);

/*
 *
 *
 *  GPS
 *
 *
 */
tag_dictionary!(enum GpsTag => IfdBlock::Gps,
    GpsVersionId = 0x0000 => "GPSVersionID",
    GpsLatitudeRef = 0x0001 => "GPSLatitudeRef",
    GpsLatitude = 0x0002 => "GPSLatitude",
    GpsLongitudeRef = 0x0003 => "GPSLongitudeRef",
    GpsLongitude = 0x0004 => "GPSLongitude",
    GpsAltitudeRef = 0x0005 => "GPSAltitudeRef",
    GpsAltitude = 0x0006 => "GPSAltitude",
    GpsTimeStamp = 0x0007 => "GPSTimeStamp",
    GpsSatellites = 0x0008 => "GPSSatellites",
    GpsStatus = 0x0009 => "GPSStatus",
    GpsMeasureMode = 0x000A => "GPSMeasureMode",
    GpsDop = 0x000B => "GPSDOP",
    GpsSpeedRef = 0x000C => "GPSSpeedRef",
    GpsSpeed = 0x000D => "GPSSpeed",
    GpsTrackRef = 0x000E => "GPSTrackRef",
    GpsTrack = 0x000F => "GPSTrack",
    GpsImgDirectionRef = 0x0010 => "GPSImgDirectionRef",
    GpsImgDirection = 0x0011 => "GPSImgDirection",
    GpsMapDatum = 0x0012 => "GPSMapDatum",
    GpsDestLatitudeRef = 0x0013 => "GPSDestLatitudeRef",
    GpsDestLatitude = 0x0014 => "GPSDestLatitude",
    GpsDestLongitudeRef = 0x0015 => "GPSDestLongitudeRef",
    GpsDestLongitude = 0x0016 => "GPSDestLongitude",
    GpsDestBearingRef = 0x0017 => "GPSDestBearingRef",
    GpsDestBearing = 0x0018 => "GPSDestBearing",
    GpsDestDistanceRef = 0x0019 => "GPSDestDistanceRef",
    GpsDestDistance = 0x001A => "GPSDestDistance",
    GpsProcessingMethod = 0x001B => "GPSProcessingMethod",
    GpsAreaInformation = 0x001C => "GPSAreaInformation",
    GpsDateStamp = 0x001D => "GPSDateStamp",
    GpsDifferential = 0x001E => "GPSDifferential",
    GpsHPositioningError = 0x001F => "GPSHPositioningError",
);

/*
 *
 *
 *  Interop
 *
 *
 */
tag_dictionary!(enum InteropTag => IfdBlock::Interop,
    InteropIndex = 0x0001 => "InteropIndex",
    InteropVersion = 0x0002 => "InteropVersion",
    RelatedImageFileFormat = 0x1000 => "RelatedImageFileFormat",
    RelatedImageWidth = 0x1001 => "RelatedImageWidth",
    RelatedImageHeight = 0x1002 => "RelatedImageHeight",
);
