use crate::error::{RenameError, Result};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Source of the "original capture" date/time tag of an image.
pub trait CaptureTimestampReader {
    /// Raw value of the capture timestamp field, or `None` when the file
    /// carries no such field.
    fn read_capture_timestamp(&self, path: &Path) -> Result<Option<String>>;
}

/// Reads `DateTimeOriginal` from the primary IFD with kamadak-exif.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifCaptureReader;

impl CaptureTimestampReader for ExifCaptureReader {
    fn read_capture_timestamp(&self, path: &Path) -> Result<Option<String>> {
        let file = File::open(path).map_err(|err| metadata_error(path, err))?;
        let mut buf = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut buf) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(err) => return Err(metadata_error(path, err)),
        };

        Ok(exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .and_then(|field| ascii_value(&field.value)))
    }
}

fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|raw| String::from_utf8_lossy(raw).into_owned()),
        _ => None,
    }
}

fn metadata_error(path: &Path, err: impl std::fmt::Display) -> RenameError {
    RenameError::MetadataRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ascii_value_takes_first_string() {
        let value = Value::Ascii(vec![b"2023:06:15 14:22:33".to_vec()]);
        assert_eq!(ascii_value(&value).as_deref(), Some("2023:06:15 14:22:33"));
        assert_eq!(ascii_value(&Value::Ascii(Vec::new())), None);
        assert_eq!(ascii_value(&Value::Short(vec![1])), None);
    }

    #[test]
    fn missing_file_is_a_metadata_error() {
        let temp = tempdir().expect("tempdir");
        let err = ExifCaptureReader
            .read_capture_timestamp(&temp.path().join("missing.jpg"))
            .expect_err("missing file must fail");
        assert!(matches!(err, RenameError::MetadataRead { .. }));
    }

    /// Little-endian TIFF with IFD0 pointing at an Exif IFD that holds a
    /// single ASCII `DateTimeOriginal`.
    fn tiff_with_capture_time(value: &[u8; 19]) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II");
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes());

        // IFD0 at 8: one entry, ExifIFDPointer -> 26
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x8769u16.to_le_bytes());
        tiff.extend_from_slice(&4u16.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&26u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());

        // Exif IFD at 26: DateTimeOriginal, 20 ASCII bytes at 44
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x9003u16.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        tiff.extend_from_slice(&20u32.to_le_bytes());
        tiff.extend_from_slice(&44u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());

        tiff.extend_from_slice(value);
        tiff.push(0);
        tiff
    }

    fn jpeg_with_capture_time(value: &[u8; 19]) -> Vec<u8> {
        let tiff = tiff_with_capture_time(value);
        let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("segment length");

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&segment_len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn reads_date_time_original_from_jpeg() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("camera.jpg");
        fs::write(&path, jpeg_with_capture_time(b"2019:07:08 09:10:11")).expect("write jpeg");

        let raw = ExifCaptureReader
            .read_capture_timestamp(&path)
            .expect("readable exif");
        assert_eq!(raw.as_deref(), Some("2019:07:08 09:10:11"));
    }

    #[test]
    fn jpeg_without_exif_has_no_timestamp() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("plain.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]).expect("write jpeg");

        let raw = ExifCaptureReader
            .read_capture_timestamp(&path)
            .expect("absent exif is not an error");
        assert_eq!(raw, None);
    }

    #[test]
    fn non_image_bytes_do_not_yield_a_timestamp() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fake.jpg");
        fs::write(&path, b"not really a jpeg").expect("write fake");
        let result = ExifCaptureReader.read_capture_timestamp(&path);
        assert!(!matches!(result, Ok(Some(_))));
    }
}
