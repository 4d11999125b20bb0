//! File formats and file-backed collaborators of the engine.
//!
//! - [`gro`] — GROMACS coordinate snapshots
//! - [`top`] — GROMACS topology molecule tables
//! - [`ndx`] — Index groups of reacted atoms
//! - [`reaction`] — Reaction template files
//! - [`GroStore`] — Snapshot persistence over `.gro`/`.top` files
//! - [`CommandEngine`] — MD engine driven through shell commands

use std::fmt;

pub mod error;

pub mod gro;
pub mod ndx;
pub mod reaction;
pub mod top;

mod command;
mod store;

pub use command::{CommandEngine, Commands};
pub use error::Error;
pub use store::{GroStore, SnapshotFiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Gro,
    Top,
    Reaction,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Gro => write!(f, "GRO"),
            Format::Top => write!(f, "TOP"),
            Format::Reaction => write!(f, "reaction"),
        }
    }
}

/// Substitutes `{cycle}`, `{last}` and `{previous}` (the cycle before
/// `cycle`) in a file or command pattern.
pub fn expand(pattern: &str, cycle: usize, last: usize) -> String {
    pattern
        .replace("{cycle}", &cycle.to_string())
        .replace("{last}", &last.to_string())
        .replace("{previous}", &cycle.saturating_sub(1).to_string())
}
