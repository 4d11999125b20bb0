//! Collaborator interfaces of the reactive-step engine.
//!
//! The engine reads and writes snapshots and drives molecular dynamics only
//! through these traits; [`crate::io::GroStore`] and
//! [`crate::io::CommandEngine`] are the file-backed implementations.

use super::error::Error;
use crate::model::topology::Topology;

/// Persistence of topology snapshots, addressed by cycle.
pub trait TopologyStore {
    /// Reads the current MD snapshot. MD trajectories are named after the
    /// reactive cycle they started from, so `last_reactive_cycle` selects the
    /// file (0 before the first reaction).
    fn read(&mut self, last_reactive_cycle: usize) -> Result<Topology, Error>;

    /// Reads the relaxed snapshot of `cycle`.
    fn read_relaxed(&mut self, cycle: usize) -> Result<Topology, Error>;

    /// Writes the reacted snapshot of `cycle` for relaxation.
    fn write(&mut self, topology: &Topology, cycle: usize) -> Result<(), Error>;
}

/// The external molecular-dynamics engine.
pub trait MdEngine {
    /// Runs the MD that precedes the first reactive cycle.
    fn run_initial(&mut self) -> Result<(), Error>;

    /// Runs MD for `cycle` starting from the relaxed snapshot of that cycle.
    fn run_md(&mut self, cycle: usize) -> Result<(), Error>;

    /// Runs MD for `cycle` continuing the trajectory started after
    /// reactive cycle `last`.
    fn run_md_appending(&mut self, cycle: usize, last: usize) -> Result<(), Error>;

    /// Relaxes the reacted snapshot of `cycle`. `Ok(false)` reports a
    /// relaxation that ran but did not succeed.
    fn run_relaxation(&mut self, cycle: usize) -> Result<bool, Error>;
}
