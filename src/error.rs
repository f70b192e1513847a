use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("No PDF files to split; add at least one file first")]
    NothingToSplit,

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Failed to extract pages {first}-{last} from {path}: {reason}")]
    Extract {
        path: PathBuf,
        first: u32,
        last: u32,
        reason: String,
    },

    #[error("Failed to write {path}: {reason}")]
    Save { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, SplitError>;
