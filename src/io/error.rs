use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("invalid reaction template in '{path}': {source}")]
    Template {
        path: String,
        #[source]
        source: crate::reaction::Error,
    },

    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn open(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
