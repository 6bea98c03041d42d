use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::date::DateLabel;
use crate::error::{Error, Result};

/// `<2YYY>/<MM>/` directly above the file name, either separator.
static ORGANIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\]2[0-9]{3}[/\\][0-9]{2}[/\\][^/\\]+$").unwrap());

static FILENAME_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})([0-9]{2})[0-9]{2}").unwrap());

/// Check if a path already sits in a year/month folder, under any root.
pub fn is_already_organized(path: &Path) -> bool {
    ORGANIZED_RE.is_match(&path.to_string_lossy())
}

/// Take year and month from the first run of eight digits in the file name.
/// The day digits are dropped and the month is not range-checked.
pub fn resolve_from_filename(path: &Path) -> Result<DateLabel> {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let caps = FILENAME_DATE_RE.captures(&basename).ok_or(Error::NotFound)?;
    Ok(DateLabel::new(&caps[1], &caps[2]))
}
