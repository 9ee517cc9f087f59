//! Tells post-processing how to turn raw values into friendlier ones.
//!
//! Each entry maps a `(block, tag ID)` pair to a [`Revival`]. Tags that aren't
//! listed are left alone.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::{
    block::IfdBlock,
    tags::{ExifTag, GpsTag, Ifd0Tag, InteropTag},
};

/// How a raw value should be revived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Revival {
    /// Text in `YYYY:MM:DD HH:MM:SS` form.
    DateTime,

    /// Text in `YYYY:MM:DD` form.
    Date,

    /// Four undefined bytes spelling out a version, like `0232`.
    Version,

    /// An integer with a fixed set of named meanings.
    Enumerated(&'static [(u16, &'static str)]),
}

/// Finds the revival for a tag, if it has one.
///
/// ```
/// use tiff_meta_types::{block::IfdBlock, revival::{Revival, revival_for}};
///
/// assert_eq!(revival_for(IfdBlock::Exif, 0x9003), Some(Revival::DateTime));
/// assert_eq!(revival_for(IfdBlock::Exif, 0x0100), None);
/// ```
pub fn revival_for(block: IfdBlock, tag_id: u16) -> Option<Revival> {
    REVIVAL_MAP.get(&(block.dictionary(), tag_id)).copied()
}

/// Every revivable tag, keyed by its dictionary block and ID.
static REVIVAL_MAP: LazyLock<FxHashMap<(IfdBlock, u16), Revival>> = LazyLock::new(|| {
    let mut m: FxHashMap<(IfdBlock, u16), Revival> = FxHashMap::default();
    map(&mut m);
    m
});

/// Adds all entries to the currently empty map.
fn map(m: &mut FxHashMap<(IfdBlock, u16), Revival>) {
    let mut i = |block: IfdBlock, tag_id: u16, revival: Revival| m.insert((block, tag_id), revival);
    use IfdBlock::{Exif, Gps, Ifd0, Interop};
    use Revival::{Date, DateTime, Enumerated as E, Version};

    //
    // dates
    i(Ifd0, Ifd0Tag::ModifyDate.tag_id(), DateTime);
    i(Exif, ExifTag::DateTimeOriginal.tag_id(), DateTime);
    i(Exif, ExifTag::CreateDate.tag_id(), DateTime);
    i(Gps, GpsTag::GpsDateStamp.tag_id(), Date);

    //
    // versions
    i(Exif, ExifTag::ExifVersion.tag_id(), Version);
    i(Exif, ExifTag::FlashpixVersion.tag_id(), Version);
    i(Interop, InteropTag::InteropVersion.tag_id(), Version);

    //
    // IFD 0
    i(Ifd0, Ifd0Tag::Orientation.tag_id(), E(ORIENTATION));
    i(Ifd0, Ifd0Tag::ResolutionUnit.tag_id(), E(RESOLUTION_UNIT));
    i(Ifd0, Ifd0Tag::YCbCrPositioning.tag_id(), E(YCBCR_POSITIONING));
    i(Ifd0, Ifd0Tag::Compression.tag_id(), E(COMPRESSION));
    i(Ifd0, Ifd0Tag::PhotometricInterpretation.tag_id(), E(PHOTOMETRIC));

    //
    // EXIF
    i(Exif, ExifTag::ExposureProgram.tag_id(), E(EXPOSURE_PROGRAM));
    i(Exif, ExifTag::MeteringMode.tag_id(), E(METERING_MODE));
    i(Exif, ExifTag::LightSource.tag_id(), E(LIGHT_SOURCE));
    i(Exif, ExifTag::Flash.tag_id(), E(FLASH));
    i(Exif, ExifTag::ColorSpace.tag_id(), E(COLOR_SPACE));
    i(Exif, ExifTag::FocalPlaneResolutionUnit.tag_id(), E(RESOLUTION_UNIT));
    i(Exif, ExifTag::SensingMethod.tag_id(), E(SENSING_METHOD));
    i(Exif, ExifTag::CustomRendered.tag_id(), E(CUSTOM_RENDERED));
    i(Exif, ExifTag::ExposureMode.tag_id(), E(EXPOSURE_MODE));
    i(Exif, ExifTag::WhiteBalance.tag_id(), E(WHITE_BALANCE));
    i(Exif, ExifTag::SceneCaptureType.tag_id(), E(SCENE_CAPTURE_TYPE));
    i(Exif, ExifTag::GainControl.tag_id(), E(GAIN_CONTROL));
    i(Exif, ExifTag::Contrast.tag_id(), E(NORMAL_LOW_HIGH));
    i(Exif, ExifTag::Saturation.tag_id(), E(NORMAL_LOW_HIGH));
    i(Exif, ExifTag::Sharpness.tag_id(), E(NORMAL_SOFT_HARD));
    i(Exif, ExifTag::SubjectDistanceRange.tag_id(), E(SUBJECT_DISTANCE_RANGE));

    //
    // GPS
    i(Gps, GpsTag::GpsAltitudeRef.tag_id(), E(GPS_ALTITUDE_REF));
}

const ORIENTATION: &[(u16, &str)] = &[
    (1, "Horizontal (normal)"),
    (2, "Mirror horizontal"),
    (3, "Rotate 180"),
    (4, "Mirror vertical"),
    (5, "Mirror horizontal and rotate 270 CW"),
    (6, "Rotate 90 CW"),
    (7, "Mirror horizontal and rotate 90 CW"),
    (8, "Rotate 270 CW"),
];

const RESOLUTION_UNIT: &[(u16, &str)] = &[
    (1, "None"),
    (2, "inches"),
    (3, "cm"),
    (4, "mm"),
    (5, "um"),
];

const YCBCR_POSITIONING: &[(u16, &str)] = &[(1, "Centered"), (2, "Co-sited")];

const COMPRESSION: &[(u16, &str)] = &[
    (1, "Uncompressed"),
    (2, "CCITT 1D"),
    (3, "T4/Group 3 Fax"),
    (4, "T6/Group 4 Fax"),
    (5, "LZW"),
    (6, "JPEG (old-style)"),
    (7, "JPEG"),
    (8, "Adobe Deflate"),
    (32773, "PackBits"),
];

const PHOTOMETRIC: &[(u16, &str)] = &[
    (0, "WhiteIsZero"),
    (1, "BlackIsZero"),
    (2, "RGB"),
    (3, "RGB Palette"),
    (4, "Transparency Mask"),
    (5, "CMYK"),
    (6, "YCbCr"),
    (8, "CIELab"),
];

const EXPOSURE_PROGRAM: &[(u16, &str)] = &[
    (0, "Not Defined"),
    (1, "Manual"),
    (2, "Normal program"),
    (3, "Aperture priority"),
    (4, "Shutter priority"),
    (5, "Creative program"),
    (6, "Action program"),
    (7, "Portrait mode"),
    (8, "Landscape mode"),
];

const METERING_MODE: &[(u16, &str)] = &[
    (0, "Unknown"),
    (1, "Average"),
    (2, "CenterWeightedAverage"),
    (3, "Spot"),
    (4, "MultiSpot"),
    (5, "Pattern"),
    (6, "Partial"),
    (255, "Other"),
];

const LIGHT_SOURCE: &[(u16, &str)] = &[
    (0, "Unknown"),
    (1, "Daylight"),
    (2, "Fluorescent"),
    (3, "Tungsten (incandescent light)"),
    (4, "Flash"),
    (9, "Fine weather"),
    (10, "Cloudy weather"),
    (11, "Shade"),
    (12, "Daylight fluorescent (D 5700 - 7100K)"),
    (13, "Day white fluorescent (N 4600 - 5400K)"),
    (14, "Cool white fluorescent (W 3900 - 4500K)"),
    (15, "White fluorescent (WW 3200 - 3700K)"),
    (17, "Standard light A"),
    (18, "Standard light B"),
    (19, "Standard light C"),
    (20, "D55"),
    (21, "D65"),
    (22, "D75"),
    (23, "D50"),
    (24, "ISO studio tungsten"),
    (255, "Other"),
];

const FLASH: &[(u16, &str)] = &[
    (0x00, "Flash did not fire"),
    (0x01, "Flash fired"),
    (0x05, "Strobe return light not detected"),
    (0x07, "Strobe return light detected"),
    (0x09, "Flash fired, compulsory flash mode"),
    (0x0D, "Flash fired, compulsory flash mode, return light not detected"),
    (0x0F, "Flash fired, compulsory flash mode, return light detected"),
    (0x10, "Flash did not fire, compulsory flash mode"),
    (0x18, "Flash did not fire, auto mode"),
    (0x19, "Flash fired, auto mode"),
    (0x1D, "Flash fired, auto mode, return light not detected"),
    (0x1F, "Flash fired, auto mode, return light detected"),
    (0x20, "No flash function"),
    (0x41, "Flash fired, red-eye reduction mode"),
    (0x45, "Flash fired, red-eye reduction mode, return light not detected"),
    (0x47, "Flash fired, red-eye reduction mode, return light detected"),
    (0x49, "Flash fired, compulsory flash mode, red-eye reduction mode"),
    (0x59, "Flash fired, auto mode, red-eye reduction mode"),
    (0x5D, "Flash fired, auto mode, return light not detected, red-eye reduction mode"),
    (0x5F, "Flash fired, auto mode, return light detected, red-eye reduction mode"),
];

const COLOR_SPACE: &[(u16, &str)] = &[(1, "sRGB"), (2, "Adobe RGB"), (0xFFFF, "Uncalibrated")];

const SENSING_METHOD: &[(u16, &str)] = &[
    (1, "Not defined"),
    (2, "One-chip color area sensor"),
    (3, "Two-chip color area sensor"),
    (4, "Three-chip color area sensor"),
    (5, "Color sequential area sensor"),
    (7, "Trilinear sensor"),
    (8, "Color sequential linear sensor"),
];

const CUSTOM_RENDERED: &[(u16, &str)] = &[(0, "Normal"), (1, "Custom")];

const EXPOSURE_MODE: &[(u16, &str)] = &[(0, "Auto"), (1, "Manual"), (2, "Auto bracket")];

const WHITE_BALANCE: &[(u16, &str)] = &[(0, "Auto"), (1, "Manual")];

const SCENE_CAPTURE_TYPE: &[(u16, &str)] = &[
    (0, "Standard"),
    (1, "Landscape"),
    (2, "Portrait"),
    (3, "Night"),
];

const GAIN_CONTROL: &[(u16, &str)] = &[
    (0, "None"),
    (1, "Low gain up"),
    (2, "High gain up"),
    (3, "Low gain down"),
    (4, "High gain down"),
];

const NORMAL_LOW_HIGH: &[(u16, &str)] = &[(0, "Normal"), (1, "Low"), (2, "High")];

const NORMAL_SOFT_HARD: &[(u16, &str)] = &[(0, "Normal"), (1, "Soft"), (2, "Hard")];

const SUBJECT_DISTANCE_RANGE: &[(u16, &str)] = &[
    (0, "Unknown"),
    (1, "Macro"),
    (2, "Close"),
    (3, "Distant"),
];

const GPS_ALTITUDE_REF: &[(u16, &str)] = &[(0, "Above sea level"), (1, "Below sea level")];

#[cfg(test)]
mod tests {
    use super::{Revival, revival_for};
    use crate::block::IfdBlock;

    #[test]
    fn thumbnail_shares_ifd0_revivals() {
        assert_eq!(
            revival_for(IfdBlock::Thumbnail, 0x0112),
            revival_for(IfdBlock::Ifd0, 0x0112)
        );
    }

    #[test]
    fn enumerations_name_their_values() {
        let Some(Revival::Enumerated(table)) = revival_for(IfdBlock::Ifd0, 0x0112) else {
            panic!("orientation should be enumerated");
        };
        assert_eq!(
            table.iter().find(|(raw, _)| *raw == 6).map(|(_, name)| *name),
            Some("Rotate 90 CW")
        );
    }
}
