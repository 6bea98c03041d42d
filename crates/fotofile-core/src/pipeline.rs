use std::path::PathBuf;

use crate::date::{self, DateLabel, DateSource};
use crate::error::Error;
use crate::media::DiscoveredFile;
use crate::path_classify;
use crate::relocate::Relocator;
use crate::{Event, LogCallback, ProcessOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    /// Path already ends in `<2YYY>/<MM>/<name>`
    AlreadyOrganized,
    /// The resolved folder is the one the file is already in
    AlreadyInPlace,
}

/// Terminal state of one file.
#[derive(Debug)]
pub enum Outcome {
    Skipped(SkipReason),
    Relocated {
        destination: PathBuf,
        label: DateLabel,
        source: DateSource,
    },
    Failed(Error),
}

/// Per-file classification: metadata, then filename, then modification time,
/// then one relocation attempt.
pub struct Pipeline<'a> {
    relocator: Relocator,
    log: &'a LogCallback,
}

impl<'a> Pipeline<'a> {
    pub fn new(options: &ProcessOptions, log: &'a LogCallback) -> Self {
        Self {
            relocator: Relocator::new(&options.destination_root, options.on_collision, options.dry_run),
            log,
        }
    }

    pub fn handle(&self, file: &DiscoveredFile) -> Outcome {
        let outcome = self.classify(file);

        match &outcome {
            Outcome::Skipped(reason) => (self.log)(&Event::Skipped {
                path: &file.path,
                reason: *reason,
            }),
            Outcome::Relocated {
                destination,
                label,
                source,
            } => (self.log)(&Event::Relocated {
                path: &file.path,
                destination,
                label,
                source: *source,
            }),
            Outcome::Failed(error) => (self.log)(&Event::Failed {
                path: &file.path,
                error,
            }),
        }
        outcome
    }

    fn classify(&self, file: &DiscoveredFile) -> Outcome {
        if file.is_dir {
            return Outcome::Skipped(SkipReason::Directory);
        }
        if path_classify::is_already_organized(&file.path) {
            return Outcome::Skipped(SkipReason::AlreadyOrganized);
        }

        let (label, source) = self.resolve(file);
        if self.relocator.is_in_place(&file.path, &label) {
            return Outcome::Skipped(SkipReason::AlreadyInPlace);
        }

        match self.relocator.relocate(&file.path, &label) {
            Ok(destination) => Outcome::Relocated {
                destination,
                label,
                source,
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Walk the fallback tiers. The last tier always answers.
    fn resolve(&self, file: &DiscoveredFile) -> (DateLabel, DateSource) {
        if file.is_image() {
            match date::exif::read_tags(&file.path).and_then(|tags| date::exif::resolve(&tags)) {
                Ok(label) => return (label, DateSource::Metadata),
                Err(e) => self.fall_through(file, DateSource::Metadata, &e),
            }
        }

        match path_classify::resolve_from_filename(&file.path) {
            Ok(label) => return (label, DateSource::Filename),
            Err(e) => self.fall_through(file, DateSource::Filename, &e),
        }

        (date::file_info::resolve(&file.modified), DateSource::FileInfo)
    }

    fn fall_through(&self, file: &DiscoveredFile, tier: DateSource, error: &Error) {
        (self.log)(&Event::FallThrough {
            path: &file.path,
            tier,
            error,
        });
    }
}
