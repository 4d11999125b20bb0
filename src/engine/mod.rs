//! The reactive-step engine.
//!
//! One reactive cycle flows through these stages:
//!
//! - [`SpatialIndex`] — Cell list over the *old* snapshot, rebuilt every cycle
//! - [`find_candidates`] — Deduplicated 2-, 3- and 4-body candidate search
//!   with early geometric pruning
//! - [`weighted_shuffle`] — Random ordering of the candidates
//! - [`AcceptanceEngine`] — Rate-based Monte-Carlo acceptance with
//!   per-template counters
//! - [`react`] — Application of an accepted candidate to the *new* snapshot
//! - [`MovementValidator`] — Displacement check after relaxation
//!
//! [`Simulator`] drives the cycles and talks to the outside world only
//! through [`TopologyStore`], [`MdEngine`] and [`StatisticsSink`].

mod acceptance;
mod apply;
mod cell_list;
mod config;
mod error;
mod movement;
mod ports;
mod search;
mod shuffle;
mod simulator;
mod stats;

pub use acceptance::AcceptanceEngine;
pub use apply::{ReactionOutcome, react};
pub use cell_list::{SpatialIndex, left, right};
pub use config::{EngineConfig, NeighborWrap};
pub use error::Error;
pub use movement::{Displacement, MovementValidator, Severity, typical_distance};
pub use ports::{MdEngine, TopologyStore};
pub use search::find_candidates;
pub use shuffle::weighted_shuffle;
pub use simulator::{CycleReport, RunSummary, Simulator};
pub use stats::{CycleStatistics, NullSink, StatisticsSink, TableWriter};
