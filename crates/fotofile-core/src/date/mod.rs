pub mod exif;
pub mod file_info;

use std::fmt;

/// Year/month pair naming a destination folder, e.g. `2023` / `07`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateLabel {
    pub year: String,
    pub month: String,
}

impl DateLabel {
    pub fn new(year: impl Into<String>, month: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
        }
    }

    /// Build a label only if `year` is four ASCII digits and `month` is
    /// two ASCII digits in 01..=12.
    pub fn checked(year: &str, month: &str) -> Option<Self> {
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || !all_digits(year) {
            return None;
        }
        if month.len() != 2 || !all_digits(month) {
            return None;
        }
        match month.parse::<u8>() {
            Ok(1..=12) => Some(Self::new(year, month)),
            _ => None,
        }
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.month)
    }
}

/// Which fallback tier produced a label. Ordered from most to least trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateSource {
    Metadata,
    Filename,
    FileInfo,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateSource::Metadata => "metadata",
            DateSource::Filename => "filename",
            DateSource::FileInfo => "file-info",
        };
        f.write_str(name)
    }
}
