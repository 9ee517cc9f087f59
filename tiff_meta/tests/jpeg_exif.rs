use tiff_meta::{
    IfdBlock, Options, Output, TagKey, TagValue, TiffParser,
    error::{MetaError, SourceError, TiffError},
};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// One big-endian entry: tag, type, count, and its encoded value bytes.
struct Entry {
    tag: u16,
    ty: u16,
    count: u32,
    bytes: Vec<u8>,
}

fn ascii(tag: u16, s: &str) -> Entry {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    Entry {
        tag,
        ty: 2,
        count: bytes.len() as u32,
        bytes,
    }
}

fn short(tag: u16, v: u16) -> Entry {
    Entry {
        tag,
        ty: 3,
        count: 1,
        bytes: v.to_be_bytes().to_vec(),
    }
}

fn long(tag: u16, v: u32) -> Entry {
    Entry {
        tag,
        ty: 4,
        count: 1,
        bytes: v.to_be_bytes().to_vec(),
    }
}

fn rationals(tag: u16, values: &[(u32, u32)]) -> Entry {
    Entry {
        tag,
        ty: 5,
        count: values.len() as u32,
        bytes: values
            .iter()
            .flat_map(|(n, d)| [n.to_be_bytes(), d.to_be_bytes()].concat())
            .collect(),
    }
}

fn undefined(tag: u16, bytes: &[u8]) -> Entry {
    Entry {
        tag,
        ty: 7,
        count: bytes.len() as u32,
        bytes: bytes.to_vec(),
    }
}

/// Appends a directory (and its out-of-line data) to `tiff`, returning its
/// offset.
fn push_directory(tiff: &mut Vec<u8>, entries: &[Entry], next: u32) -> u32 {
    let offset = tiff.len() as u32;
    let mut data_at = offset as usize + 2 + entries.len() * 12 + 4;
    let mut data = Vec::new();

    tiff.extend_from_slice((entries.len() as u16).to_be_bytes().as_slice());
    for e in entries {
        tiff.extend_from_slice(e.tag.to_be_bytes().as_slice());
        tiff.extend_from_slice(e.ty.to_be_bytes().as_slice());
        tiff.extend_from_slice(e.count.to_be_bytes().as_slice());
        if e.bytes.len() <= 4 {
            let mut inline = e.bytes.clone();
            inline.resize(4, 0);
            tiff.extend_from_slice(&inline);
        } else {
            tiff.extend_from_slice((data_at as u32).to_be_bytes().as_slice());
            data_at += e.bytes.len();
            data.extend_from_slice(&e.bytes);
        }
    }
    tiff.extend_from_slice(next.to_be_bytes().as_slice());
    tiff.extend_from_slice(&data);
    offset
}

const THUMBNAIL: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

/// A camera-ish TIFF: IFD 0, EXIF, GPS, and a thumbnail.
fn camera_tiff() -> Vec<u8> {
    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x00".to_vec();

    let thumb_at = tiff.len() as u32;
    tiff.extend_from_slice(THUMBNAIL);

    let exif = push_directory(
        &mut tiff,
        &[
            ascii(0x9003, "2019:03:07 09:41:05"),
            undefined(0x9000, b"0232"),
            short(0xA402, 0),
        ],
        0,
    );
    let gps = push_directory(
        &mut tiff,
        &[
            ascii(0x0001, "S"),
            rationals(0x0002, &[(10, 1), (30, 1), (0, 1)]),
            ascii(0x0003, "E"),
            rationals(0x0004, &[(20, 1), (15, 1), (0, 1)]),
        ],
        0,
    );
    let ifd1 = push_directory(
        &mut tiff,
        &[long(0x0201, thumb_at), long(0x0202, THUMBNAIL.len() as u32)],
        0,
    );
    let ifd0 = push_directory(
        &mut tiff,
        &[
            ascii(0x010F, "Canon"),
            short(0x0112, 6),
            long(0x8769, exif),
            long(0x8825, gps),
        ],
        ifd1,
    );

    tiff[4..8].copy_from_slice(ifd0.to_be_bytes().as_slice());
    tiff
}

/// Wraps TIFF data in a JPEG `APP1` segment, after a `JFIF` one.
fn jpeg_around(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];

    jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x07]);
    jpeg.extend_from_slice(b"JFIF\0");

    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(((tiff.len() + 6 + 2) as u16).to_be_bytes().as_slice());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);

    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0x12, 0x34, 0xFF, 0xD9]);
    jpeg
}

#[test]
fn grouped_from_jpeg() {
    logger();

    let file = jpeg_around(&camera_tiff());
    let Some(Output::Grouped(groups)) = tiff_meta::parse(&file, Options::default()).unwrap() else {
        panic!("should find grouped metadata");
    };

    assert_eq!(
        groups.keys().copied().collect::<Vec<_>>(),
        vec![
            IfdBlock::Ifd0,
            IfdBlock::Exif,
            IfdBlock::Gps,
            IfdBlock::Thumbnail
        ]
    );

    let ifd0 = &groups[&IfdBlock::Ifd0];
    assert_eq!(
        ifd0.get(&TagKey::Id(0x010F)),
        Some(&TagValue::Ascii("Canon".into()))
    );
    assert!(
        !ifd0.contains_key(&TagKey::Id(0x8769)),
        "pointers are sanitized by default"
    );

    let gps = &groups[&IfdBlock::Gps];
    assert_eq!(gps.get(&TagKey::Name("latitude")), Some(&TagValue::Decimal(-10.5)));
    assert_eq!(gps.get(&TagKey::Name("longitude")), Some(&TagValue::Decimal(20.25)));
}

#[test]
fn merged_and_friendly() {
    logger();

    let file = jpeg_around(&camera_tiff());
    let options = Options::default()
        .merge_output(true)
        .translate_tags(true)
        .revive_values(true);

    let Some(Output::Merged(tags)) = tiff_meta::parse(&file, options).unwrap() else {
        panic!("should find merged metadata");
    };

    assert_eq!(
        tags.get(&TagKey::Name("Orientation")),
        Some(&TagValue::Named("Rotate 90 CW"))
    );
    assert_eq!(
        tags.get(&TagKey::Name("ExifVersion")),
        Some(&TagValue::Text("0232".into()))
    );
    assert_eq!(
        tags.get(&TagKey::Name("DateTimeOriginal"))
            .map(|v| match v {
                TagValue::DateTime(dt) => dt.to_string(),
                other => panic!("date wasn't revived: {other:?}"),
            }),
        Some("2019-03-07T09:41:05".to_string())
    );
    assert!(
        !tags.contains_key(&TagKey::Name("ThumbnailOffset")),
        "merged output skips the thumbnail"
    );
}

#[test]
fn raw_values_when_post_processing_is_off() {
    logger();

    let tiff = camera_tiff();
    let Some(Output::Grouped(groups)) =
        tiff_meta::parse(&tiff, Options::default().post_process(false)).unwrap()
    else {
        panic!("should find grouped metadata");
    };

    let gps = &groups[&IfdBlock::Gps];
    assert!(!gps.contains_key(&TagKey::Name("latitude")));
    assert_eq!(gps[&TagKey::Id(0x0002)].as_f64_list(), Some(vec![10.0, 30.0, 0.0]));
}

#[test]
fn thumbnail_from_jpeg() {
    logger();

    let file = jpeg_around(&camera_tiff());
    assert_eq!(tiff_meta::thumbnail(&file), Ok(Some(THUMBNAIL.to_vec())));
}

#[test]
fn pick_and_skip() {
    logger();

    let tiff = camera_tiff();
    let mut parser = TiffParser::new(
        &tiff,
        0,
        Options::default()
            .skip_tags([0x010F, 0x0112, 0x9003])
            .pick_tags([0x0112]),
    );
    parser.parse().unwrap();

    let ifd0 = parser.block(IfdBlock::Ifd0).unwrap();
    assert!(!ifd0.contains_key(&TagKey::Id(0x010F)));
    assert!(ifd0.contains_key(&TagKey::Id(0x0112)));
    assert!(
        !parser
            .block(IfdBlock::Exif)
            .unwrap()
            .contains_key(&TagKey::Id(0x9003)),
        "the filter applies to every block"
    );
}

#[test]
fn files_without_metadata() {
    logger();

    // a JPEG with only a JFIF segment
    let file = [
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x07, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9,
    ];
    assert_eq!(tiff_meta::parse(&file, Options::default()), Ok(None));
    assert_eq!(tiff_meta::thumbnail(&file), Ok(None));

    assert_eq!(tiff_meta::parse(b"not an image", Options::default()), Ok(None));
}

#[test]
fn broken_files_are_errors() {
    logger();

    // EXIF segment with a broken header
    let file = jpeg_around(b"MM\x00\x2b\x00\x00\x00\x08");
    assert!(matches!(
        tiff_meta::parse(&file, Options::default()),
        Err(MetaError::Tiff(TiffError::MalformedHeader(_)))
    ));

    // segment runs off the end
    let mut file = jpeg_around(&camera_tiff());
    file.truncate(40);
    assert!(matches!(
        tiff_meta::parse(&file, Options::default()),
        Err(MetaError::Source(SourceError::TruncatedSegment { .. }))
    ));
}

#[test]
fn offsets_cant_leave_the_exif_segment() {
    logger();

    // `Make` points right at the end of the TIFF data. in the JPEG, the scan
    // data comes next, but that isn't part of the TIFF
    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    let end = 8 + 2 + 12 + 4;
    push_directory(
        &mut tiff,
        &[Entry {
            tag: 0x010F,
            ty: 2,
            count: 8,
            bytes: (end as u32).to_be_bytes().to_vec(),
        }],
        0,
    );
    assert_eq!(tiff.len(), end);

    let file = jpeg_around(&tiff);
    assert_eq!(
        tiff_meta::parse(&file, Options::default()),
        Err(MetaError::Tiff(TiffError::OffsetOutOfBounds {
            offset: end as u64,
            needed: 8,
            len: end
        }))
    );
}

#[test]
fn truncated_tiff_never_panics() {
    logger();

    let tiff = camera_tiff();
    for len in 0..tiff.len() {
        let cut = &tiff[..len];
        let mut parser = TiffParser::new(cut, 0, Options::default().interop(true));

        // any answer is fine, as long as we get one
        _ = parser.parse();
        _ = parser.extract_thumbnail();
    }
}
