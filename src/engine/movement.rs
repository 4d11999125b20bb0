//! Post-relaxation displacement check of reacted molecules.
//!
//! Each product of an accepted reaction is located in the relaxed snapshot
//! through the reaction records of the new snapshot, and every atom's
//! minimum-image displacement is compared with the typical interatomic
//! distance of the box. The check only reports; it never rejects a move.

use std::f64::consts::PI;
use std::fmt;

use tracing::{debug, warn};

use super::error::Error;
use crate::model::geometry;
use crate::model::topology::Topology;
use crate::reaction::ReactionCandidate;

/// How far an atom moved relative to the typical interatomic distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Displacement of one product atom during relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    pub molecule_id: usize,
    pub molecule_name: String,
    pub atom_id: usize,
    pub atom_name: String,
    pub distance: f64,
    pub severity: Severity,
}

/// Radius of the sphere each atom would occupy if the atoms of `topology`
/// were spread evenly over its box: `cbrt(3V / (4 pi N))`.
pub fn typical_distance(topology: &Topology) -> f64 {
    let atoms = topology.atom_count().max(1) as f64;
    (3.0 * topology.volume() / (4.0 * PI * atoms)).cbrt()
}

#[derive(Debug, Clone, Copy)]
pub struct MovementValidator {
    typical: f64,
}

impl MovementValidator {
    pub fn new(new: &Topology) -> Self {
        Self {
            typical: typical_distance(new),
        }
    }

    #[inline]
    pub fn typical_distance(&self) -> f64 {
        self.typical
    }

    pub fn classify(&self, distance: f64) -> Severity {
        if distance > 3.0 * self.typical {
            Severity::High
        } else if distance > 2.0 * self.typical {
            Severity::Medium
        } else {
            Severity::Info
        }
    }

    /// Measures how far every product atom of `candidate` moved between the
    /// `new` and `relaxed` snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if a product has no reaction record
    /// in `new`, and [`Error::MoleculeNotFound`] if the recorded molecule is
    /// missing from either snapshot.
    pub fn check(
        &self,
        new: &Topology,
        relaxed: &Topology,
        candidate: &ReactionCandidate<'_>,
    ) -> Result<Vec<Displacement>, Error> {
        let mut displacements = Vec::new();
        for product in candidate.products() {
            let id = new
                .reaction_record(product.id)
                .ok_or(Error::RecordNotFound { id: product.id })?;
            let before = new
                .molecule(id)
                .ok_or(Error::MoleculeNotFound { id, snapshot: "new" })?;
            let after = relaxed
                .molecule(id)
                .ok_or(Error::MoleculeNotFound { id, snapshot: "relaxed" })?;

            for (old, moved) in before.atoms.iter().zip(&after.atoms) {
                let distance = geometry::distance(old.position, moved.position, relaxed.dimensions);
                let severity = self.classify(distance);
                match severity {
                    Severity::High | Severity::Medium => warn!(
                        %severity,
                        molecule = id,
                        name = %after.name,
                        atom = moved.id,
                        atom_name = %moved.name,
                        distance,
                        typical = self.typical,
                        "atom moved unusually far during relaxation"
                    ),
                    Severity::Info => debug!(
                        molecule = id,
                        atom = moved.id,
                        distance,
                        "atom displacement during relaxation"
                    ),
                }
                displacements.push(Displacement {
                    molecule_id: id,
                    molecule_name: after.name.clone(),
                    atom_id: moved.id,
                    atom_name: moved.name.clone(),
                    distance,
                    severity,
                });
            }
        }
        Ok(displacements)
    }
}
