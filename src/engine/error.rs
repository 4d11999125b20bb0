//! Error types for the reactive-step engine.
//!
//! Variants fall in two groups. Structural violations (a mandated molecule or
//! reaction record that does not exist, a failed relaxation) are fatal: the
//! physical state can no longer be trusted and the driver must terminate the
//! process. Everything else is an ordinary failure of a collaborator or of the
//! input and can be reported normally.

use thiserror::Error;

/// Errors that can occur while running reactive cycles.
#[derive(Debug, Error)]
pub enum Error {
    /// A molecule that must exist in a snapshot is missing.
    #[error("couldn't find molecule {id} in the {snapshot} topology")]
    MoleculeNotFound { id: usize, snapshot: &'static str },

    /// No reaction record exists for a provisional product id.
    #[error("couldn't find reaction record for reacted molecule {id}")]
    RecordNotFound { id: usize },

    /// The external relaxation after accepted reactions failed.
    #[error("relaxation failed in cycle {cycle}, the simulation cannot continue")]
    RelaxationFailed { cycle: usize },

    /// The box or cell grid cannot be used to build a cell list.
    #[error("invalid cell grid: {0}")]
    InvalidGrid(String),

    /// A reaction template or binding failed.
    #[error(transparent)]
    Reaction(#[from] crate::reaction::Error),

    /// Reading or writing a snapshot failed.
    #[error("topology persistence failed: {0}")]
    Persistence(#[from] crate::io::Error),

    /// The external MD engine could not be driven.
    #[error("MD engine step '{step}' failed in cycle {cycle}: {details}")]
    MdEngine {
        step: &'static str,
        cycle: usize,
        details: String,
    },

    /// Writing the statistics table failed.
    #[error("failed to write statistics: {0}")]
    Statistics(#[source] std::io::Error),
}

impl Error {
    pub fn md_engine(step: &'static str, cycle: usize, details: impl Into<String>) -> Self {
        Self::MdEngine {
            step,
            cycle,
            details: details.into(),
        }
    }

    /// Whether this error must terminate the process without recovery.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MoleculeNotFound { .. } | Error::RecordNotFound { .. } | Error::RelaxationFailed { .. }
        )
    }
}
