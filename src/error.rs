//! Error types for restart file staging

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the staging Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Filename errors
    #[error("malformed region filename: {filename}")]
    Format { filename: String },

    // Data errors
    #[error("no files found")]
    NoFiles { base: String },

    #[error("no field data file for {timestep} found")]
    NoFieldData { timestep: String },

    #[error("no numeric timestep found for {base}")]
    NoNumericTimestep { base: String },

    // Metadata errors
    #[error("dfi file not found!")]
    DfiNotFound { path: PathBuf },

    #[error("metadata key not found: {key}")]
    MetadataLookup { key: String },

    #[error("dfi parse error at line {line}: {message}")]
    DfiSyntax { line: usize, message: String },

    // Usage errors
    #[error("number of procs must be larger than 0")]
    InvalidProcessCount,

    #[error("invalid time step: {step}")]
    InvalidStep { step: String },

    #[error("glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn format(filename: impl Into<String>) -> Self {
        Error::Format {
            filename: filename.into(),
        }
    }
}
