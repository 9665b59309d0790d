use std::{io, path::Path, path::PathBuf};

use thiserror::Error;

/// Error taxonomy for the tabular core.
///
/// Every failing operation leaves the table in its prior state; callers can
/// always retry with corrected input. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum WranglerError {
    /// The file could not be opened, read, or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// User-correctable input problem; no partial mutation occurred.
    #[error("{0}")]
    Validation(String),
    /// Row or column index outside the declared range; a caller contract
    /// violation rather than a user-recoverable condition.
    #[error("{0}")]
    Structural(String),
}

impl WranglerError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        WranglerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        WranglerError::Validation(message.into())
    }

    pub fn structural(message: impl Into<String>) -> Self {
        WranglerError::Structural(message.into())
    }
}

pub type WranglerResult<T> = Result<T, WranglerError>;
