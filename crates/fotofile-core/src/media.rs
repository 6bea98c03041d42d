use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use walkdir::DirEntry;

use crate::error::{Error, Result};

/// One node handed over by the tree walk.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path as walked
    pub path: PathBuf,
    pub is_dir: bool,
    /// Last modification time, local zone
    pub modified: DateTime<Local>,
}

impl DiscoveredFile {
    pub fn new(path: PathBuf, is_dir: bool, modified: DateTime<Local>) -> Self {
        Self { path, is_dir, modified }
    }

    pub fn from_entry(entry: &DirEntry) -> Result<Self> {
        let metadata_failed = |source: std::io::Error| Error::Metadata {
            path: entry.path().to_path_buf(),
            source,
        };
        let meta = entry
            .metadata()
            .map_err(|e| metadata_failed(e.into()))?;
        let modified = meta.modified().map_err(metadata_failed)?;

        Ok(Self::new(
            entry.path().to_path_buf(),
            entry.file_type().is_dir(),
            DateTime::<Local>::from(modified),
        ))
    }

    /// Whether the EXIF tier should be tried for this file.
    pub fn is_image(&self) -> bool {
        is_image(&self.path)
    }
}

/// Extension-based image check.
pub fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map_or(false, |mime| mime.type_() == mime_guess::mime::IMAGE)
}
