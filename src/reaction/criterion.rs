use std::fmt;

use super::error::Error;
use crate::model::geometry::{self, Vec3};
use crate::model::molecule::Molecule;

/// Zero-based reference to one atom of a template molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomRef {
    pub molecule: usize,
    pub atom: usize,
}

impl AtomRef {
    pub fn new(molecule: usize, atom: usize) -> Self {
        Self { molecule, atom }
    }

    pub(crate) fn resolve<'a>(&self, molecules: &'a [Molecule]) -> Option<&'a Vec3> {
        molecules
            .get(self.molecule)
            .and_then(|m| m.atoms.get(self.atom))
            .map(|a| &a.position)
    }
}

impl fmt::Display for AtomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.molecule + 1, self.atom + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionKind {
    Distance,
    Angle,
    Dihedral,
}

impl CriterionKind {
    /// Number of atoms the geometric quantity is defined on.
    pub fn arity(self) -> usize {
        match self {
            CriterionKind::Distance => 2,
            CriterionKind::Angle => 3,
            CriterionKind::Dihedral => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CriterionKind::Distance => "distance",
            CriterionKind::Angle => "angle",
            CriterionKind::Dihedral => "dihedral",
        }
    }

    /// Parses the directive keyword (`dist`, `ang`, `dih`, any case).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "dist" => Some(CriterionKind::Distance),
            "ang" => Some(CriterionKind::Angle),
            "dih" => Some(CriterionKind::Dihedral),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CriterionKind::Distance => "dist",
            CriterionKind::Angle => "ang",
            CriterionKind::Dihedral => "dih",
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geometric window over reactant atoms: distance, angle or dihedral
/// must lie within `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub atoms: Vec<AtomRef>,
    pub min: f64,
    pub max: f64,
}

impl Criterion {
    pub fn new(kind: CriterionKind, atoms: Vec<AtomRef>, min: f64, max: f64) -> Result<Self, Error> {
        if atoms.len() != kind.arity() {
            return Err(Error::CriterionArity {
                kind: kind.as_str(),
                expected: kind.arity(),
                found: atoms.len(),
            });
        }
        Ok(Self {
            kind,
            atoms,
            min,
            max,
        })
    }

    pub fn distance(a: AtomRef, b: AtomRef, min: f64, max: f64) -> Self {
        Self {
            kind: CriterionKind::Distance,
            atoms: vec![a, b],
            min,
            max,
        }
    }

    /// Highest reactant slot this criterion depends on.
    ///
    /// The criterion can be evaluated as soon as this slot is bound.
    pub fn slot(&self) -> usize {
        self.atoms.iter().map(|a| a.molecule).max().unwrap_or(0)
    }

    /// Computes the geometric value on the given reactants, or `None` if an
    /// atom reference does not resolve or the atom count does not match the
    /// kind.
    pub fn evaluate(&self, reactants: &[Molecule], dimensions: Vec3) -> Option<f64> {
        let mut points = Vec::with_capacity(self.atoms.len());
        for atom in &self.atoms {
            points.push(*atom.resolve(reactants)?);
        }
        match (self.kind, points.as_slice()) {
            (CriterionKind::Distance, &[a, b]) => Some(geometry::distance(a, b, dimensions)),
            (CriterionKind::Angle, &[a, b, c]) => Some(geometry::angle(a, b, c, dimensions)),
            (CriterionKind::Dihedral, &[a, b, c, d]) => Some(geometry::dihedral(a, b, c, d, dimensions)),
            _ => None,
        }
    }

    #[inline]
    pub fn accepts(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for atom in &self.atoms {
            write!(f, " {}", atom)?;
        }
        write!(f, " [{}, {}]", self.min, self.max)
    }
}
