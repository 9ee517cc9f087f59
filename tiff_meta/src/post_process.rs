//! Turns freshly decoded blocks into friendlier ones.
//!
//! Nothing here touches the buffer. It takes decoded blocks and returns new
//! ones, so the parser's own copies stay raw.

use std::collections::BTreeMap;

use winnow::{Parser as _, ascii::dec_uint, error::EmptyError};

use crate::options::Options;
use tiff_meta_types::{
    Block, Date, DateTime, IfdBlock, TagKey, TagValue,
    revival::{Revival, revival_for},
    tags::{GpsTag, tag_name},
};

const GPS_LATITUDE_REF: u16 = GpsTag::GpsLatitudeRef.tag_id();
const GPS_LATITUDE: u16 = GpsTag::GpsLatitude.tag_id();
const GPS_LONGITUDE_REF: u16 = GpsTag::GpsLongitudeRef.tag_id();
const GPS_LONGITUDE: u16 = GpsTag::GpsLongitude.tag_id();

/// Key for the signed decimal latitude.
pub const LATITUDE: TagKey = TagKey::Name("latitude");

/// Key for the signed decimal longitude.
pub const LONGITUDE: TagKey = TagKey::Name("longitude");

/// Runs GPS conversion, then value revival, then key translation, each only
/// if `options` asks for it.
pub fn post_process(
    blocks: &BTreeMap<IfdBlock, Block>,
    options: &Options,
) -> BTreeMap<IfdBlock, Block> {
    blocks
        .iter()
        .map(|(&ifd, block)| {
            let mut block = block.clone();

            if ifd == IfdBlock::Gps {
                add_decimal_coordinates(&mut block);
            }
            if options.revive_values {
                block = revive_block(ifd, block);
            }
            if options.translate_tags {
                block = translate_block(ifd, block);
            }

            (ifd, block)
        })
        .collect()
}

/// Adds `latitude` and `longitude` keys when both coordinates are present.
fn add_decimal_coordinates(gps: &mut Block) {
    let (Some(lat), Some(lon)) = (
        gps.get(&TagKey::Id(GPS_LATITUDE)),
        gps.get(&TagKey::Id(GPS_LONGITUDE)),
    ) else {
        log::trace!("GPS block doesn't have both coordinates. Not converting.");
        return;
    };

    let latitude = dms_to_decimal(lat, gps.get(&TagKey::Id(GPS_LATITUDE_REF)), 'S');
    let longitude = dms_to_decimal(lon, gps.get(&TagKey::Id(GPS_LONGITUDE_REF)), 'W');

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            log::trace!("Converted GPS position to `({latitude}, {longitude})`.");
            gps.insert(LATITUDE, TagValue::Decimal(latitude));
            gps.insert(LONGITUDE, TagValue::Decimal(longitude));
        }
        _ => log::warn!("GPS coordinates weren't degree/minute/second triples. Leaving them raw."),
    }
}

/// Converts a `[degrees, minutes, seconds]` value into signed decimal degrees.
///
/// The result is negative when the reference's first letter is `negative`.
fn dms_to_decimal(dms: &TagValue, reference: Option<&TagValue>, negative: char) -> Option<f64> {
    let [degrees, minutes, seconds] = dms.as_f64_list()?[..] else {
        return None;
    };
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;

    let is_negative = reference
        .and_then(TagValue::as_str)
        .and_then(|r| r.trim().chars().next())
        .is_some_and(|c| c.eq_ignore_ascii_case(&negative));

    Some(if is_negative { -magnitude } else { magnitude })
}

fn revive_block(ifd: IfdBlock, block: Block) -> Block {
    block
        .into_iter()
        .map(|(key, value)| {
            let revived = match (&key, revival_for_key(ifd, &key)) {
                (TagKey::Id(id), Some(revival)) => revive(*id, revival, value),
                _ => value,
            };
            (key, revived)
        })
        .collect()
}

fn revival_for_key(ifd: IfdBlock, key: &TagKey) -> Option<Revival> {
    match key {
        TagKey::Id(id) => revival_for(ifd, *id),
        TagKey::Name(_) => None,
    }
}

/// Revives one value. If it doesn't look like what we expected, it's kept.
fn revive(tag: u16, revival: Revival, value: TagValue) -> TagValue {
    let revived = match revival {
        Revival::DateTime => value
            .as_str()
            .and_then(parse_date_time)
            .map(TagValue::DateTime),
        Revival::Date => value.as_str().and_then(parse_date).map(TagValue::Date),
        Revival::Version => version_text(&value).map(TagValue::Text),
        Revival::Enumerated(table) => value.as_u32().and_then(|raw| {
            table
                .iter()
                .find(|(code, _)| u32::from(*code) == raw)
                .map(|&(_, name)| TagValue::Named(name))
        }),
    };

    revived.unwrap_or_else(|| {
        log::warn!("Couldn't revive tag `{tag:#06x}`. Keeping it raw: `{value:?}`");
        value
    })
}

/// Version tags are four characters, like `0232`.
fn version_text(value: &TagValue) -> Option<String> {
    match value {
        TagValue::Undefined(bytes) if bytes.is_ascii() => {
            Some(String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string())
        }
        TagValue::Ascii(s) => Some(s.clone()),
        _ => None,
    }
}

/// Parses `YYYY:MM:DD HH:MM:SS`.
fn parse_date_time(s: &str) -> Option<DateTime> {
    let mut input = s.trim();
    let (year, _, month, _, day, _, hour, _, minute, _, second) = (
        dec_uint::<_, u16, EmptyError>,
        ':',
        dec_uint,
        ':',
        dec_uint,
        ' ',
        dec_uint,
        ':',
        dec_uint,
        ':',
        dec_uint,
    )
        .parse_next(&mut input)
        .ok()?;

    let date = checked_date(year, month, day)?;
    (input.is_empty() && hour < 24 && minute < 60 && second < 61).then_some(DateTime {
        date,
        hour,
        minute,
        second,
    })
}

/// Parses `YYYY:MM:DD`.
fn parse_date(s: &str) -> Option<Date> {
    let mut input = s.trim();
    let (year, _, month, _, day) = (
        dec_uint::<_, u16, EmptyError>,
        ':',
        dec_uint,
        ':',
        dec_uint,
    )
        .parse_next(&mut input)
        .ok()?;

    if !input.is_empty() {
        return None;
    }
    checked_date(year, month, day)
}

/// Writers often fill unknown dates with zeroes. Those aren't dates.
fn checked_date(year: u16, month: u8, day: u8) -> Option<Date> {
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(Date { year, month, day })
}

/// Swaps numeric keys for names. Unknown tags keep their number.
fn translate_block(ifd: IfdBlock, block: Block) -> Block {
    block
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                TagKey::Id(id) => tag_name(ifd, id).map_or(key, TagKey::Name),
                named @ TagKey::Name(_) => named,
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{LATITUDE, LONGITUDE, parse_date, parse_date_time, post_process};
    use crate::{options::Options, util::logger};
    use tiff_meta_types::{Block, Date, DateTime, IfdBlock, Scalar, TagKey, TagValue};

    fn rationals(values: &[f64]) -> TagValue {
        TagValue::List(values.iter().copied().map(Scalar::Double).collect())
    }

    fn gps(lat: &[f64], lat_ref: &str, lon: &[f64], lon_ref: &str) -> BTreeMap<IfdBlock, Block> {
        let mut block = Block::default();
        block.insert(TagKey::Id(0x0001), TagValue::Ascii(lat_ref.into()));
        block.insert(TagKey::Id(0x0002), rationals(lat));
        block.insert(TagKey::Id(0x0003), TagValue::Ascii(lon_ref.into()));
        block.insert(TagKey::Id(0x0004), rationals(lon));
        [(IfdBlock::Gps, block)].into_iter().collect()
    }

    #[test]
    fn southern_latitude_is_negative() {
        logger();

        let out = post_process(
            &gps(&[10.0, 30.0, 0.0], "S", &[20.0, 15.0, 0.0], "E"),
            &Options::default(),
        );
        let gps = &out[&IfdBlock::Gps];

        assert_eq!(gps.get(&LATITUDE), Some(&TagValue::Decimal(-10.5)));
        assert_eq!(gps.get(&LONGITUDE), Some(&TagValue::Decimal(20.25)));
        assert!(
            gps.contains_key(&TagKey::Id(0x0002)),
            "originals are kept alongside"
        );
    }

    #[test]
    fn western_longitude_is_negative() {
        logger();

        let out = post_process(
            &gps(&[51.0, 30.0, 0.0], "n", &[0.0, 30.0, 0.0], "w"),
            &Options::default(),
        );
        let gps = &out[&IfdBlock::Gps];

        assert_eq!(gps.get(&LATITUDE), Some(&TagValue::Decimal(51.5)));
        assert_eq!(gps.get(&LONGITUDE), Some(&TagValue::Decimal(-0.5)));
    }

    #[test]
    fn one_coordinate_isnt_enough() {
        logger();

        let mut blocks = gps(&[10.0, 30.0, 0.0], "S", &[1.0, 2.0, 3.0], "E");
        if let Some(block) = blocks.get_mut(&IfdBlock::Gps) {
            block.remove(&TagKey::Id(0x0004));
        }

        let out = post_process(&blocks, &Options::default());
        assert!(!out[&IfdBlock::Gps].contains_key(&LATITUDE));
        assert_eq!(out, blocks, "nothing else changes");
    }

    #[test]
    fn malformed_coordinates_are_left_alone() {
        logger();

        let blocks = gps(&[10.0, 30.0], "S", &[1.0, 2.0, 3.0], "E");
        let out = post_process(&blocks, &Options::default());
        assert_eq!(out, blocks);
    }

    #[test]
    fn input_isnt_touched() {
        logger();

        let blocks = gps(&[10.0, 30.0, 0.0], "S", &[1.0, 2.0, 3.0], "E");
        let before = blocks.clone();
        let options = Options::default().revive_values(true).translate_tags(true);

        let first = post_process(&blocks, &options);
        let second = post_process(&blocks, &options);
        assert_eq!(blocks, before);
        assert_eq!(first, second, "running twice gives the same answer");
    }

    #[test]
    fn revives_then_renames() {
        logger();

        let mut ifd0 = Block::default();
        ifd0.insert(TagKey::Id(0x0112), TagValue::Scalar(Scalar::Short(6)));
        ifd0.insert(TagKey::Id(0x0132), TagValue::Ascii("2019:03:07 09:41:05".into()));
        ifd0.insert(TagKey::Id(0xBEEF), TagValue::Scalar(Scalar::Byte(1)));

        let mut exif = Block::default();
        exif.insert(TagKey::Id(0x9000), TagValue::Undefined(b"0232".to_vec()));
        exif.insert(TagKey::Id(0x9209), TagValue::Scalar(Scalar::Short(0x0200)));

        let blocks = [(IfdBlock::Ifd0, ifd0), (IfdBlock::Exif, exif)]
            .into_iter()
            .collect();
        let out = post_process(
            &blocks,
            &Options::default().revive_values(true).translate_tags(true),
        );

        let ifd0 = &out[&IfdBlock::Ifd0];
        assert_eq!(
            ifd0.get(&TagKey::Name("Orientation")),
            Some(&TagValue::Named("Rotate 90 CW"))
        );
        assert_eq!(
            ifd0.get(&TagKey::Name("ModifyDate")),
            Some(&TagValue::DateTime(DateTime {
                date: Date {
                    year: 2019,
                    month: 3,
                    day: 7
                },
                hour: 9,
                minute: 41,
                second: 5,
            }))
        );
        assert_eq!(
            ifd0.get(&TagKey::Id(0xBEEF)),
            Some(&TagValue::Scalar(Scalar::Byte(1))),
            "unknown tags keep their number"
        );

        let exif = &out[&IfdBlock::Exif];
        assert_eq!(
            exif.get(&TagKey::Name("ExifVersion")),
            Some(&TagValue::Text("0232".into()))
        );
        assert_eq!(
            exif.get(&TagKey::Name("Flash")),
            Some(&TagValue::Scalar(Scalar::Short(0x0200))),
            "unlisted enum values stay raw"
        );
    }

    #[test]
    fn translation_without_revival() {
        logger();

        let mut ifd0 = Block::default();
        ifd0.insert(TagKey::Id(0x0112), TagValue::Scalar(Scalar::Short(6)));
        let blocks = [(IfdBlock::Ifd0, ifd0)].into_iter().collect();

        let out = post_process(&blocks, &Options::default().translate_tags(true));
        assert_eq!(
            out[&IfdBlock::Ifd0].get(&TagKey::Name("Orientation")),
            Some(&TagValue::Scalar(Scalar::Short(6)))
        );
    }

    #[test]
    fn thumbnail_uses_ifd0_names() {
        logger();

        let mut thumb = Block::default();
        thumb.insert(TagKey::Id(0x0201), TagValue::Scalar(Scalar::Long(8)));
        let blocks = [(IfdBlock::Thumbnail, thumb)].into_iter().collect();

        let out = post_process(&blocks, &Options::default().translate_tags(true));
        assert!(out[&IfdBlock::Thumbnail].contains_key(&TagKey::Name("ThumbnailOffset")));
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_date("2024:02:29"),
            Some(Date {
                year: 2024,
                month: 2,
                day: 29
            })
        );
        assert_eq!(parse_date("0000:00:00"), None, "placeholder zeroes");
        assert_eq!(parse_date("2024-02-29"), None);
        assert_eq!(parse_date("2024:02:29 junk"), None);

        assert!(parse_date_time("2001:01:01 00:00:00").is_some());
        assert!(parse_date_time(" 2001:01:01 23:59:59 ").is_some());
        assert_eq!(parse_date_time("    :  :     :  :  "), None);
        assert_eq!(parse_date_time("2001:01:01 24:00:00"), None);
        assert_eq!(parse_date_time("2001:01:01"), None);
    }
}
