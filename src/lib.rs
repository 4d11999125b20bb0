//! Reactive steps for molecular dynamics.
//!
//! Between molecular-dynamics runs, a reactive step scans the current
//! snapshot for sets of molecules that match a reaction template, accepts
//! candidates by their rate with a Monte-Carlo draw, and replaces the
//! reactants by the template's products. The changed system is relaxed by the
//! MD engine, checked for atoms that moved too far, and handed back to MD.
//!
//! # Features
//!
//! - **Cell-list candidate search** — 2-, 3- and 4-body candidates found
//!   through a periodic cell grid, with geometric pruning as soon as a slot is
//!   bound and without duplicates
//! - **Rate-based acceptance** — `u < frequency * rate` per candidate, in a
//!   random order, with per-template attempted/accepted counters
//! - **Reaction application** — Atom transitions, periodic repair and
//!   translations of products, renumbering with reaction records
//! - **Movement check** — Displacements of reacted atoms after relaxation,
//!   classified against the typical interatomic distance
//! - **File I/O** — GRO snapshots, topology molecule tables, index groups and
//!   reaction template files; MD driven through shell commands
//!
//! # Quick Start
//!
//! ```
//! use rsmd::{AtomRef, Criterion, CriterionKind, ReactionTemplate};
//! use rsmd::{Atom, Molecule, SpatialIndex, Topology, NeighborWrap, find_candidates};
//!
//! let mut template = ReactionTemplate::new("dimerization");
//! template.add_reactant("MON", &["C1"]);
//! template.add_reactant("MON", &["C1"]);
//! template.add_product("DIM", &["C1", "C2"]);
//! template.add_transition(AtomRef::new(0, 0), AtomRef::new(0, 0));
//! template.add_transition(AtomRef::new(1, 0), AtomRef::new(0, 1));
//! template.add_criterion(Criterion::new(
//!     CriterionKind::Distance,
//!     vec![AtomRef::new(0, 0), AtomRef::new(1, 0)],
//!     0.0,
//!     0.5,
//! )?);
//! template.set_rate(vec![(0.0, 1.0)]);
//!
//! let mut topology = Topology::new([4.0, 4.0, 4.0], [1, 1, 1]);
//! topology.add_molecule(Molecule::with_atoms(1, "MON", vec![Atom::new(1, "C1", [1.0, 1.0, 1.0])]));
//! topology.add_molecule(Molecule::with_atoms(2, "MON", vec![Atom::new(2, "C1", [1.3, 1.0, 1.0])]));
//! topology.add_molecule(Molecule::with_atoms(3, "MON", vec![Atom::new(3, "C1", [3.0, 3.0, 3.0])]));
//!
//! let index = SpatialIndex::build(&topology, [1, 1, 1], NeighborWrap::PerAxis)?;
//! let templates = [template];
//! let candidates = find_candidates(&index, &templates, topology.dimensions)?;
//!
//! assert_eq!(candidates.len(), 1);
//! # Ok::<(), rsmd::engine::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`model`] — Atoms, molecules and topology snapshots
//! - [`reaction`] — Reaction templates, criteria and bound candidates
//! - [`engine`] — Cell list, search, acceptance, application, validation and
//!   the [`Simulator`] cycle driver
//! - [`io`] — File formats, the GRO snapshot store and the command MD engine
//! - [`config`] — TOML run configuration

pub mod config;
pub mod engine;
pub mod io;
pub mod model;
pub mod reaction;

pub use model::atom::Atom;
pub use model::molecule::Molecule;
pub use model::topology::Topology;

pub use reaction::{AtomRef, Criterion, CriterionKind, ReactionCandidate, ReactionTemplate};

pub use engine::{
    AcceptanceEngine, CycleReport, EngineConfig, MdEngine, MovementValidator, NeighborWrap,
    RunSummary, Simulator, SpatialIndex, StatisticsSink, TopologyStore, find_candidates,
};

pub use config::RunConfig;
