pub mod date;
pub mod error;
pub mod media;
pub mod path_classify;
pub mod pipeline;
pub mod relocate;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

pub use date::{DateLabel, DateSource};
pub use error::{Error, Result};
pub use media::DiscoveredFile;
pub use pipeline::{Outcome, Pipeline, SkipReason};
pub use relocate::{CollisionPolicy, Relocator};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Tree to scan
    pub source_root: PathBuf,
    /// Archive root that receives `<year>/<month>/` folders
    pub destination_root: PathBuf,
    #[serde(default)]
    pub on_collision: CollisionPolicy,
    #[serde(default)]
    pub dry_run: bool,
}

impl ProcessOptions {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            on_collision: CollisionPolicy::default(),
            dry_run: false,
        }
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::Config(format!("cannot open {}: {}", path.display(), e)))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Files seen (directories excluded)
    pub scanned: u64,
    pub relocated: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Something worth telling the operator about.
#[derive(Debug)]
pub enum Event<'a> {
    Skipped {
        path: &'a Path,
        reason: SkipReason,
    },
    /// A date tier gave no answer and the next one is tried.
    FallThrough {
        path: &'a Path,
        tier: DateSource,
        error: &'a Error,
    },
    Relocated {
        path: &'a Path,
        destination: &'a Path,
        label: &'a DateLabel,
        source: DateSource,
    },
    Failed {
        path: &'a Path,
        error: &'a Error,
    },
    /// The walker could not read an entry.
    Unreadable {
        path: Option<&'a Path>,
        error: &'a Error,
    },
}

/// Type alias for the injected log sink
pub type LogCallback = dyn Fn(&Event<'_>) + Send + Sync;

/// Walk `source_root` depth-first and run every entry through the pipeline.
/// Only a source root that cannot be read is fatal.
pub fn process(options: &ProcessOptions, log: &LogCallback) -> Result<ProcessResult> {
    if !options.source_root.is_dir() {
        return Err(Error::InvalidRoot(options.source_root.clone()));
    }

    let pipeline = Pipeline::new(options, log);
    let mut result = ProcessResult::default();
    // Files moved by this run that the walk may reach again when the
    // destination sits inside the source tree.
    let mut placed: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(&options.source_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                let error = Error::from(e);
                log(&Event::Unreadable {
                    path: path.as_deref(),
                    error: &error,
                });
                result.failed += 1;
                continue;
            }
        };

        let file = match DiscoveredFile::from_entry(&entry) {
            Ok(file) => file,
            Err(error) => {
                log(&Event::Unreadable {
                    path: Some(entry.path()),
                    error: &error,
                });
                result.failed += 1;
                continue;
            }
        };
        if !file.is_dir && !placed.is_empty() {
            if let Ok(canonical) = fs::canonicalize(&file.path) {
                if placed.contains(&canonical) {
                    continue;
                }
            }
        }
        if !file.is_dir {
            result.scanned += 1;
        }

        match pipeline.handle(&file) {
            Outcome::Skipped(SkipReason::Directory) => {}
            Outcome::Skipped(_) => result.skipped += 1,
            Outcome::Relocated { destination, .. } => {
                result.relocated += 1;
                if !options.dry_run {
                    if let Ok(canonical) = fs::canonicalize(&destination) {
                        placed.insert(canonical);
                    }
                }
            }
            Outcome::Failed(_) => result.failed += 1,
        }
    }

    Ok(result)
}
