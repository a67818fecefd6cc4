//! EXIF metadata for the demo photos, encoded with `exif::experimental::Writer`.
//!
//! Fields go to IFD0, the Exif sub-IFD or the GPS sub-IFD according to the
//! context of their tag; the writer adds the sub-IFD pointers itself.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Context, Field, In, Tag, Value};

use crate::error::AppError;

const EXIF_PREAMBLE: &[u8] = b"Exif\0\0";
/// APP1 length field is a u16 that counts itself.
const MAX_APP1_PAYLOAD: usize = u16::MAX as usize - 2;

/// Primary-image fields destined for a JPEG's APP1 segment.
#[derive(Debug, Clone, Default)]
pub struct ExifData {
    fields: Vec<Field>,
}

impl ExifData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `tag`, replacing any earlier value for it.
    pub fn with(mut self, tag: Tag, value: Value) -> Self {
        self.fields.retain(|f| f.tag != tag);
        self.fields.push(Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        });
        self
    }

    pub fn ascii(self, tag: Tag, text: &str) -> Self {
        self.with(tag, Value::Ascii(vec![text.as_bytes().to_vec()]))
    }

    pub fn short(self, tag: Tag, value: u16) -> Self {
        self.with(tag, Value::Short(vec![value]))
    }

    pub fn byte(self, tag: Tag, value: u8) -> Self {
        self.with(tag, Value::Byte(vec![value]))
    }

    pub fn rational(self, tag: Tag, num: u32, denom: u32) -> Self {
        self.with(tag, Value::Rational(vec![(num, denom).into()]))
    }

    pub fn get(&self, tag: Tag) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn has_gps(&self) -> bool {
        self.fields.iter().any(|f| f.tag.context() == Context::Gps)
    }

    /// Big-endian TIFF block: header, IFD0, then whichever sub-IFDs have fields.
    pub fn to_tiff(&self) -> Result<Vec<u8>, AppError> {
        let mut writer = Writer::new();
        for field in &self.fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false)?;
        Ok(buf.into_inner())
    }

    /// `Exif\0\0` followed by the TIFF block: the body of a JPEG APP1 segment.
    pub fn to_app1_payload(&self) -> Result<Vec<u8>, AppError> {
        let mut payload = EXIF_PREAMBLE.to_vec();
        payload.extend(self.to_tiff()?);
        if payload.len() > MAX_APP1_PAYLOAD {
            return Err(AppError::General(format!(
                "EXIF payload of {} bytes does not fit in an APP1 segment",
                payload.len()
            )));
        }
        Ok(payload)
    }
}

/// Decimal degrees to the degrees/minutes/centiseconds rational triple used by
/// the GPS latitude and longitude tags. The sign is dropped; callers set the
/// hemisphere through the matching `*Ref` tag.
pub fn gps_dms(decimal_degrees: f64) -> Value {
    let abs = decimal_degrees.abs();
    let degrees = abs.trunc();
    let minutes = ((abs - degrees) * 60.0).trunc();
    let centiseconds = (((abs - degrees) * 60.0 - minutes) * 6000.0).round();
    Value::Rational(vec![
        (degrees as u32, 1).into(),
        (minutes as u32, 1).into(),
        (centiseconds as u32, 100).into(),
    ])
}
