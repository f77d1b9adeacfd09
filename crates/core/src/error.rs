use crate::template::TemplateError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenameError>;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("failed to read image metadata from {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    #[error("failed to read file attributes of {path}: {source}")]
    FilesystemAttribute {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename {from} to {to}: {source}")]
    RenameFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no free name for {name} after {attempts} attempts")]
    SuffixExhausted { name: String, attempts: usize },

    #[error("no timestamp source produced a value for {path}")]
    NoTimestamp { path: PathBuf },

    #[error("failed to list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
