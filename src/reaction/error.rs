//! Error types for reaction templates and candidates.

use std::fmt;

use thiserror::Error;

/// Which side of a template an atom reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reactants,
    Products,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reactants => write!(f, "reactants"),
            Side::Products => write!(f, "products"),
        }
    }
}

/// Errors raised while validating a reaction template or binding molecules
/// to one of its reactant slots.
#[derive(Debug, Error)]
pub enum Error {
    /// The template lists no reactant molecule.
    #[error("reaction '{template}': no reactant molecule was found")]
    NoReactants { template: String },

    /// The template lists no product molecule.
    #[error("reaction '{template}': no product molecule was found")]
    NoProducts { template: String },

    /// Candidate search supports two to four reactants.
    #[error("reaction '{template}': {count} reactants given, only 2 to 4 are supported")]
    UnsupportedReactantCount { template: String, count: usize },

    /// An atom reference in `directive` does not exist.
    ///
    /// Molecule and atom are reported 1-based, as written in the reaction file.
    #[error(
        "reaction '{template}', directive [{directive}]: atom ({molecule}, {atom}) doesn't exist in {side}"
    )]
    MissingAtom {
        template: String,
        directive: &'static str,
        side: Side,
        molecule: usize,
        atom: usize,
    },

    /// A criterion whose minimum is not below its maximum.
    #[error(
        "reaction '{template}', directive [criteria]: minimum {min} is not below maximum {max}, values interchanged?"
    )]
    InvertedThresholds { template: String, min: f64, max: f64 },

    /// A criterion with the wrong number of atoms for its kind.
    #[error("{kind} criterion needs {expected} atoms, got {found}")]
    CriterionArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A template atom ordinal points past the end of the bound molecule.
    #[error(
        "reaction '{template}': reactant {slot} expects atom {ordinal}, but molecule {molecule_id} has only {count} atoms"
    )]
    AtomOutOfRange {
        template: String,
        slot: usize,
        molecule_id: usize,
        ordinal: usize,
        count: usize,
    },
}

impl Error {
    pub fn missing_atom(
        template: &str,
        directive: &'static str,
        side: Side,
        molecule_ix: usize,
        atom_ix: usize,
    ) -> Self {
        Self::MissingAtom {
            template: template.to_string(),
            directive,
            side,
            molecule: molecule_ix + 1,
            atom: atom_ix + 1,
        }
    }
}
