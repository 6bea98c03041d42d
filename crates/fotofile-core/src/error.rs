use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be opened or holds no readable EXIF block.
    #[error("cannot decode metadata of {path}: {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },

    #[error("no DateTimeOriginal, DateTimeDigitized or DateTime tag")]
    TagMissing,

    #[error("malformed date value {0:?}")]
    MalformedDate(String),

    #[error("no YYYYMMDD date in file name")]
    NotFound,

    #[error("cannot create directory {dir}: {source}")]
    DirCreateFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot move {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("source root {0} is not a readable directory")]
    InvalidRoot(PathBuf),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("cannot read file info of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}
