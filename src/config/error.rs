use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving a run configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize run configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range or a required companion field is missing.
    #[error("invalid run configuration: {0}")]
    Invalid(String),
}

impl Error {
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::Invalid(details.into())
    }
}
