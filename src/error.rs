//! Error types for guide loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while listing or rendering guides
#[derive(Error, Debug)]
pub enum Error {
    /// The content directory or a guide file does not exist
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed front-matter, markdown, or component reference
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Map an IO error, turning `NotFound` into [`Error::NotFound`]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
