use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::date::DateLabel;
use crate::error::{Error, Result};

/// What to do when the destination file name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Pick the first free `name(N).ext`
    #[default]
    Rename,
    /// Leave the source in place and report `DestinationExists`
    Fail,
    /// Replace the existing file
    Overwrite,
}

/// Moves files into `<root>/<year>/<month>/`.
#[derive(Debug, Clone)]
pub struct Relocator {
    destination_root: PathBuf,
    on_collision: CollisionPolicy,
    dry_run: bool,
}

impl Relocator {
    pub fn new(destination_root: impl Into<PathBuf>, on_collision: CollisionPolicy, dry_run: bool) -> Self {
        Self {
            destination_root: destination_root.into(),
            on_collision,
            dry_run,
        }
    }

    pub fn destination_dir(&self, label: &DateLabel) -> PathBuf {
        self.destination_root.join(&label.year).join(&label.month)
    }

    /// True when `path` already lives in the folder `label` maps to.
    pub fn is_in_place(&self, path: &Path, label: &DateLabel) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        match (fs::canonicalize(parent), fs::canonicalize(self.destination_dir(label))) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Move `path` under the folder for `label` and return where it landed.
    /// A single `fs::rename` does the move, so a failure leaves the source untouched.
    pub fn relocate(&self, path: &Path, label: &DateLabel) -> Result<PathBuf> {
        let sub_dir = self.destination_dir(label);
        let filename = path
            .file_name()
            .ok_or_else(|| Error::RenameFailed {
                from: path.to_path_buf(),
                to: sub_dir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            })?;

        let base_dest = sub_dir.join(filename);
        let dest = if base_dest.exists() {
            match self.on_collision {
                CollisionPolicy::Overwrite => base_dest,
                CollisionPolicy::Fail => return Err(Error::DestinationExists(base_dest)),
                CollisionPolicy::Rename => free_name(&sub_dir, Path::new(filename)),
            }
        } else {
            base_dest
        };

        if self.dry_run {
            return Ok(dest);
        }

        fs::create_dir_all(&sub_dir).map_err(|source| Error::DirCreateFailed {
            dir: sub_dir.clone(),
            source,
        })?;

        fs::rename(path, &dest).map_err(|source| Error::RenameFailed {
            from: path.to_path_buf(),
            to: dest.clone(),
            source,
        })?;

        Ok(dest)
    }
}

/// First `stem(N).ext` in `dir` that does not exist yet, N from 1.
fn free_name(dir: &Path, filename: &Path) -> PathBuf {
    let stem = filename.file_stem().unwrap_or(filename.as_os_str());
    let ext = filename.extension();

    let mut counter = 1u32;
    loop {
        let mut new_name = OsString::from(stem);
        new_name.push(format!("({})", counter));
        if let Some(ext) = ext {
            new_name.push(".");
            new_name.push(ext);
        }
        let candidate = dir.join(&new_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
