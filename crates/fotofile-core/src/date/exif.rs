use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Value};

use super::DateLabel;
use crate::error::{Error, Result};

/// Decoded EXIF tags of one file, keyed by tag name (`DateTimeOriginal`, ...).
pub type TagMapping = HashMap<String, String>;

/// Date tags in priority order. Capture time first, file write time last.
pub const DATE_TAGS: [&str; 3] = ["DateTimeOriginal", "DateTimeDigitized", "DateTime"];

/// Open `path` and decode its primary IFD into a [`TagMapping`].
pub fn read_tags(path: &Path) -> Result<TagMapping> {
    let decode_failed = |source: exif::Error| Error::DecodeFailed {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| decode_failed(exif::Error::Io(e)))?;
    let reader = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .map_err(decode_failed)?;

    let mut tags = TagMapping::new();
    for field in reader.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let value = match &field.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default(),
            _ => field.display_value().to_string(),
        };
        tags.insert(field.tag.to_string(), value);
    }
    Ok(tags)
}

/// Resolve year/month from decoded tags. The first non-empty tag of
/// [`DATE_TAGS`] wins and is the only one parsed.
pub fn resolve(tags: &TagMapping) -> Result<DateLabel> {
    let value = DATE_TAGS
        .iter()
        .filter_map(|name| tags.get(*name))
        .map(|v| v.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
        .find(|v| !v.is_empty())
        .ok_or(Error::TagMissing)?;

    parse_exif_date(value)
}

/// Parse `YYYY:MM:DD hh:mm:ss` down to its year and month.
fn parse_exif_date(value: &str) -> Result<DateLabel> {
    let malformed = || Error::MalformedDate(value.to_string());

    let date = value.split(' ').next().unwrap_or_default().replace('-', ":");
    let mut parts = date.split(':');
    let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
        return Err(malformed());
    };

    DateLabel::checked(year, month).ok_or_else(malformed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use exif::experimental::Writer;
    use exif::{Field, Tag};
    use std::io::Cursor;

    fn tags(pairs: &[(&str, &str)]) -> TagMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Minimal JPEG carrying a single EXIF date tag in an APP1 segment.
    pub(crate) fn jpeg_with_date(tag: Tag, value: &str) -> Vec<u8> {
        let field = Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut tiff = Cursor::new(Vec::new());
        writer.write(&mut tiff, false).unwrap();
        let tiff = tiff.into_inner();

        let len = (2 + 6 + tiff.len()) as u16;
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn test_resolve_priority() {
        let t = tags(&[("DateTimeOriginal", "2021:11:05 14:30:00")]);
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2021", "11"));

        let t = tags(&[("DateTime", "2019:01:01 00:00:00")]);
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2019", "01"));

        let t = tags(&[
            ("DateTime", "2019:01:01 00:00:00"),
            ("DateTimeDigitized", "2018:05:02 10:00:00"),
            ("DateTimeOriginal", "2017:03:04 09:00:00"),
        ]);
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2017", "03"));
    }

    #[test]
    fn test_resolve_skips_empty_values() {
        let t = tags(&[
            ("DateTimeOriginal", "   "),
            ("DateTimeDigitized", "\0\0"),
            ("DateTime", "2016:12:31 23:59:59"),
        ]);
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2016", "12"));
    }

    #[test]
    fn test_resolve_missing() {
        assert!(matches!(resolve(&TagMapping::new()), Err(Error::TagMissing)));
        let t = tags(&[("Make", "Canon"), ("DateTime", "")]);
        assert!(matches!(resolve(&t), Err(Error::TagMissing)));
    }

    #[test]
    fn test_resolve_malformed() {
        for bad in ["2021", "garbage value", "2021:13:01 00:00:00", "21:01:01", "    :  :   "] {
            let t = tags(&[("DateTimeOriginal", bad)]);
            assert!(
                matches!(resolve(&t), Err(Error::MalformedDate(_))),
                "{bad:?} should be malformed"
            );
        }
        // A malformed winner is not rescued by a lower-priority tag.
        let t = tags(&[("DateTimeOriginal", "unknown"), ("DateTime", "2019:01:01 00:00:00")]);
        assert!(matches!(resolve(&t), Err(Error::MalformedDate(_))));
    }

    #[test]
    fn test_resolve_hyphenated_date() {
        let t = tags(&[("DateTimeOriginal", "2015-08-20 12:00:00")]);
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2015", "08"));
    }

    #[test]
    fn test_read_tags_from_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, jpeg_with_date(Tag::DateTimeOriginal, "2021:11:05 14:30:00")).unwrap();

        let t = read_tags(&path).unwrap();
        assert_eq!(t.get("DateTimeOriginal").map(String::as_str), Some("2021:11:05 14:30:00"));
        assert_eq!(resolve(&t).unwrap(), DateLabel::new("2021", "11"));
    }

    #[test]
    fn test_read_tags_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(matches!(read_tags(&path), Err(Error::DecodeFailed { .. })));

        let missing = dir.path().join("missing.jpg");
        assert!(matches!(read_tags(&missing), Err(Error::DecodeFailed { .. })));
    }
}
