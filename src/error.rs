use std::io;

use camino::{Utf8Path, Utf8PathBuf};

/// Failures raised by the listing, scaffolding and summary merge steps.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// An input document (index or summary) is missing.
    #[error("{path} not found")]
    NotFound { path: Utf8PathBuf },

    /// A directory or placeholder collided with something already on disk.
    #[error("{path} already exists")]
    AlreadyExists { path: Utf8PathBuf },

    #[error("{path} exists but is not a directory")]
    NotADirectory { path: Utf8PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;

impl DocError {
    /// Classify an I/O error against the path it happened on.
    pub fn from_io(path: &Utf8Path, source: io::Error) -> Self {
        let path = path.to_owned();
        match source.kind() {
            io::ErrorKind::NotFound => DocError::NotFound { path },
            io::ErrorKind::AlreadyExists => DocError::AlreadyExists { path },
            _ => DocError::Io { path, source },
        }
    }
}
