//! Reaction templates and the candidates bound from them.
//!
//! - [`ReactionTemplate`] — Immutable species-level description: reactant
//!   and product slots, geometric criteria, transitions, translations and a
//!   rate table
//! - [`Criterion`] — Distance, angle or dihedral window over reactant atoms
//! - [`ReactionCandidate`] — A template bound to concrete molecules for one
//!   reactive cycle

mod candidate;
mod criterion;
mod error;
mod template;

pub use candidate::ReactionCandidate;
pub use criterion::{AtomRef, Criterion, CriterionKind};
pub use error::{Error, Side};
pub use template::{MAX_REACTANTS, MIN_REACTANTS, ReactionTemplate, Transition, Translation};
