use std::fs;
use std::path::Path;

use exif::Tag;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::error::AppError;
use crate::services::exif::{gps_dms, ExifData};

const JPEG_QUALITY: u8 = 85;
const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: [u8; 2] = [0xFF, 0xE0];
const APP1: [u8; 2] = [0xFF, 0xE1];

/// A solid-colour photo written into the demo tree.
#[derive(Debug, Clone)]
pub struct DemoImage {
    pub path: &'static str,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
    pub exif: ExifData,
}

/// Encodes a solid-colour JPEG and embeds `exif` as an APP1 segment.
pub fn make_jpeg(
    width: u32,
    height: u32,
    color: [u8; 3],
    exif: &ExifData,
) -> Result<Vec<u8>, AppError> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).write_image(
        img.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;
    insert_app1(&jpeg, &exif.to_app1_payload()?)
}

/// Splices an APP1 segment in after SOI, or after the JFIF APP0 segment when
/// the encoder wrote one, since APP0 must stay first.
fn insert_app1(jpeg: &[u8], payload: &[u8]) -> Result<Vec<u8>, AppError> {
    if jpeg.len() < 4 || jpeg[..2] != SOI {
        return Err(AppError::General("encoder output is not a JPEG stream".to_string()));
    }

    let mut at = 2;
    if jpeg[2..4] == APP0 && jpeg.len() >= 6 {
        let len = u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize;
        at = (4 + len).min(jpeg.len());
    }

    let segment_len = (payload.len() + 2) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..at]);
    out.extend_from_slice(&APP1);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[at..]);
    Ok(out)
}

pub fn demo_images() -> Vec<DemoImage> {
    vec![
        // Team offsite, Golden Gate Park
        DemoImage {
            path: "notes/photos/team-offsite-2024.jpg",
            width: 1280,
            height: 853,
            color: [110, 130, 95],
            exif: ExifData::new()
                .ascii(Tag::Make, "FUJIFILM")
                .ascii(Tag::Model, "X-T5")
                .short(Tag::Orientation, 1)
                .ascii(Tag::Software, "Capture One 23")
                .ascii(Tag::DateTime, "2024:03:14 13:22:45")
                .ascii(Tag::Artist, "Carol Diaz")
                .ascii(
                    Tag::ImageDescription,
                    "Team offsite, Golden Gate Park, San Francisco",
                )
                .ascii(Tag::DateTimeOriginal, "2024:03:14 13:22:45")
                .ascii(Tag::DateTimeDigitized, "2024:03:14 13:22:45")
                .rational(Tag::FNumber, 8, 1)
                .rational(Tag::ExposureTime, 1, 500)
                .short(Tag::PhotographicSensitivity, 320)
                .rational(Tag::FocalLength, 35, 1)
                .short(Tag::FocalLengthIn35mmFilm, 53)
                .short(Tag::Flash, 0)
                .short(Tag::WhiteBalance, 0)
                .ascii(Tag::GPSLatitudeRef, "N")
                .with(Tag::GPSLatitude, gps_dms(37.7694))
                .ascii(Tag::GPSLongitudeRef, "W")
                .with(Tag::GPSLongitude, gps_dms(122.4862))
                .byte(Tag::GPSAltitudeRef, 0)
                .rational(Tag::GPSAltitude, 52, 1)
                .ascii(Tag::GPSSpeedRef, "K")
                .rational(Tag::GPSSpeed, 0, 1),
        },
        // Architecture review whiteboard, London office, phone held portrait
        DemoImage {
            path: "notes/photos/architecture-whiteboard.jpg",
            width: 1024,
            height: 768,
            color: [230, 225, 210],
            exif: ExifData::new()
                .ascii(Tag::Make, "Google")
                .ascii(Tag::Model, "Pixel 8")
                .short(Tag::Orientation, 6)
                .ascii(Tag::Software, "Android 14")
                .ascii(Tag::DateTime, "2024:03:07 11:08:03")
                .ascii(Tag::Artist, "Ben Okafor")
                .ascii(
                    Tag::ImageDescription,
                    "Architecture review whiteboard - caching strategy",
                )
                .ascii(Tag::DateTimeOriginal, "2024:03:07 11:08:03")
                .ascii(Tag::DateTimeDigitized, "2024:03:07 11:08:03")
                .rational(Tag::FNumber, 18, 10)
                .rational(Tag::ExposureTime, 1, 60)
                .short(Tag::PhotographicSensitivity, 800)
                .rational(Tag::FocalLength, 6, 1)
                .short(Tag::Flash, 0)
                .short(Tag::WhiteBalance, 0)
                .ascii(Tag::GPSLatitudeRef, "N")
                .with(Tag::GPSLatitude, gps_dms(51.5074))
                .ascii(Tag::GPSLongitudeRef, "W")
                .with(Tag::GPSLongitude, gps_dms(0.1278))
                .byte(Tag::GPSAltitudeRef, 0)
                .rational(Tag::GPSAltitude, 15, 1),
        },
        // Product screenshot export: camera metadata only
        DemoImage {
            path: "projects/taskflow/docs/screenshots/task-list.jpg",
            width: 1440,
            height: 900,
            color: [13, 17, 23],
            exif: ExifData::new()
                .ascii(Tag::Make, "Apple")
                .ascii(Tag::Model, "MacBook Pro")
                .ascii(Tag::Software, "macOS Sequoia 15.2")
                .ascii(Tag::DateTime, "2024:03:20 16:45:00")
                .ascii(Tag::ImageDescription, "Taskflow task list - sprint view")
                .ascii(Tag::DateTimeOriginal, "2024:03:20 16:45:00")
                .ascii(Tag::DateTimeDigitized, "2024:03:20 16:45:00"),
        },
    ]
}

/// Writes every demo photo under `root`, returning how many were written.
pub fn write_demo_images(root: &Path) -> Result<usize, AppError> {
    let images = demo_images();
    for image in &images {
        let path = root.join(image.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = make_jpeg(image.width, image.height, image.color, &image.exif)?;
        fs::write(&path, &data)?;
        tracing::info!(
            "wrote {}  ({}x{}, {}KB)",
            image.path,
            image.width,
            image.height,
            data.len() / 1024
        );
    }
    Ok(images.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    use exif::{In, Reader};
    use image::GenericImageView;

    fn find_app1(jpeg: &[u8]) -> Option<usize> {
        jpeg.windows(8)
            .position(|w| w[..2] == APP1 && &w[4..8] == b"Exif")
    }

    #[test]
    fn jpeg_decodes_with_requested_dimensions() {
        let exif = demo_images()[2].exif.clone();
        let data = make_jpeg(64, 48, [13, 17, 23], &exif).unwrap();
        assert_eq!(data[..2], SOI);

        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        let pixel = decoded.to_rgb8().get_pixel(32, 24).0;
        for (got, want) in pixel.iter().zip([13u8, 17, 23]) {
            assert!((*got as i16 - want as i16).abs() <= 8, "{pixel:?}");
        }
    }

    #[test]
    fn app1_segment_carries_the_payload() {
        let exif = demo_images()[0].exif.clone();
        let payload = exif.to_app1_payload().unwrap();
        let data = make_jpeg(32, 32, [110, 130, 95], &exif).unwrap();

        let at = find_app1(&data).unwrap();
        let len = u16::from_be_bytes([data[at + 2], data[at + 3]]) as usize;
        assert_eq!(len, payload.len() + 2);
        assert_eq!(&data[at + 4..at + 4 + payload.len()], payload.as_slice());
    }

    #[test]
    fn app1_follows_app0_when_present() {
        let jfif: [u8; 10] = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0xAA, 0xBB, 0xFF, 0xD9,
        ];
        let out = insert_app1(&jfif, b"Exif\0\0MM").unwrap();
        assert_eq!(&out[..8], &jfif[..8]);
        assert_eq!(out[8..10], APP1);
        assert_eq!(&out[out.len() - 2..], &[0xFFu8, 0xD9]);
    }

    #[test]
    fn app1_follows_soi_without_app0() {
        let bare: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xDB, 0xFF, 0xD9];
        let out = insert_app1(&bare, b"Exif\0\0").unwrap();
        assert_eq!(out[2..4], APP1);
        assert_eq!(u16::from_be_bytes([out[4], out[5]]), 8);
    }

    #[test]
    fn rejects_non_jpeg_input() {
        assert!(insert_app1(b"\x89PNG", b"Exif\0\0").is_err());
    }

    #[test]
    fn demo_images_have_expected_metadata() {
        let images = demo_images();
        assert_eq!(images.len(), 3);
        assert_eq!(
            images[1]
                .exif
                .get(Tag::Orientation)
                .and_then(|f| f.value.get_uint(0)),
            Some(6)
        );
        assert!(images[0].exif.has_gps());
        assert!(images[1].exif.has_gps());
        assert!(!images[2].exif.has_gps());
        assert!(images.iter().all(|i| i.path.ends_with(".jpg")));
    }

    #[test]
    fn writes_all_images() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_demo_images(dir.path()).unwrap();
        assert_eq!(written, 3);
        for image in demo_images() {
            let bytes = std::fs::read(dir.path().join(image.path)).unwrap();
            assert!(find_app1(&bytes).is_some(), "{} lacks EXIF", image.path);
        }
    }

    #[test]
    fn written_photos_carry_readable_exif() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_images(dir.path()).unwrap();
        let read = |path: &str| {
            let file = std::fs::File::open(dir.path().join(path)).unwrap();
            Reader::new()
                .read_from_container(&mut BufReader::new(file))
                .unwrap()
        };
        let show = |exif: &exif::Exif, tag: Tag| {
            exif.get_field(tag, In::PRIMARY)
                .map(|f| f.display_value().to_string())
        };

        let offsite = read("notes/photos/team-offsite-2024.jpg");
        assert_eq!(
            show(&offsite, Tag::GPSLatitude).as_deref(),
            Some("37 deg 46 min 9.84 sec")
        );
        assert_eq!(show(&offsite, Tag::GPSLatitudeRef).as_deref(), Some("N"));
        assert_eq!(show(&offsite, Tag::FNumber).as_deref(), Some("8"));

        let whiteboard = read("notes/photos/architecture-whiteboard.jpg");
        assert_eq!(
            show(&whiteboard, Tag::Orientation).as_deref(),
            Some("row 0 at right and column 0 at top")
        );
        assert_eq!(show(&whiteboard, Tag::FNumber).as_deref(), Some("1.8"));

        let screenshot = read("projects/taskflow/docs/screenshots/task-list.jpg");
        assert_eq!(show(&screenshot, Tag::Model).as_deref(), Some("\"MacBook Pro\""));
        assert!(show(&screenshot, Tag::GPSLatitude).is_none());
    }
}
