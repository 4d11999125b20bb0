use std::fmt;

use tracing::warn;

use super::criterion::{AtomRef, Criterion};
use super::error::{Error, Side};
use crate::model::atom::Atom;
use crate::model::molecule::Molecule;

/// Reactant atom `from` becomes product atom `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AtomRef,
    pub to: AtomRef,
}

/// Moves product atom `atom` by `value` along the axis towards `towards`.
///
/// Positive values move the atom closer, negative values move it away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    pub atom: AtomRef,
    pub towards: AtomRef,
    pub value: f64,
}

/// A species-level reaction description.
///
/// Reactant and product molecules are templates: their atoms carry 1-based
/// ordinal ids that address the atoms of the concrete molecule bound to the
/// slot. Criteria address reactant atoms, translations address product atoms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReactionTemplate {
    pub name: String,
    pub reactants: Vec<Molecule>,
    pub products: Vec<Molecule>,
    pub criteria: Vec<Criterion>,
    pub transitions: Vec<Transition>,
    pub translations: Vec<Translation>,
    pub reaction_energy: f64,
    pub activation_energy: f64,
    rate: Vec<(f64, f64)>,
}

pub const MIN_REACTANTS: usize = 2;
pub const MAX_REACTANTS: usize = 4;

impl ReactionTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn reactant_count(&self) -> usize {
        self.reactants.len()
    }

    pub fn reactant_names(&self) -> impl Iterator<Item = &str> {
        self.reactants.iter().map(|m| m.name.as_str())
    }

    /// Returns the reactant declared with file id `id`, creating it in
    /// declaration order if it is new.
    pub fn get_or_add_reactant(&mut self, id: usize, name: &str) -> &mut Molecule {
        get_or_add(&mut self.reactants, id, name)
    }

    pub fn get_or_add_product(&mut self, id: usize, name: &str) -> &mut Molecule {
        get_or_add(&mut self.products, id, name)
    }

    /// Appends a reactant slot whose atoms are `1..=atom_count` of the bound
    /// molecule, in order.
    pub fn add_reactant(&mut self, name: &str, atom_names: &[&str]) {
        let id = self.reactants.len() + 1;
        self.reactants.push(template_molecule(id, name, atom_names));
    }

    pub fn add_product(&mut self, name: &str, atom_names: &[&str]) {
        let id = self.products.len() + 1;
        self.products.push(template_molecule(id, name, atom_names));
    }

    pub fn add_transition(&mut self, from: AtomRef, to: AtomRef) {
        self.transitions.push(Transition { from, to });
    }

    pub fn add_translation(&mut self, atom: AtomRef, towards: AtomRef, value: f64) {
        self.translations.push(Translation {
            atom,
            towards,
            value,
        });
    }

    pub fn add_criterion(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    /// Sets the rate table, stable-sorted by ascending distance.
    pub fn set_rate(&mut self, mut rate: Vec<(f64, f64)>) {
        rate.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.rate = rate;
    }

    pub fn rate(&self) -> &[(f64, f64)] {
        &self.rate
    }

    /// Stepwise rate lookup for a value of the first criterion.
    ///
    /// Starts from the first entry's rate and advances while the entry's
    /// distance does not exceed `value`. An empty table yields zero; a missing
    /// value yields the first entry's rate.
    pub fn rate_at(&self, value: Option<f64>) -> f64 {
        let Some(&(_, first)) = self.rate.first() else {
            return 0.0;
        };
        let Some(value) = value else {
            return first;
        };

        let mut current = first;
        for &(distance, rate) in &self.rate {
            if distance > value {
                break;
            }
            current = rate;
        }
        current
    }

    /// Validates internal references of the template.
    ///
    /// # Errors
    ///
    /// Fails if the template has no reactants or products, an unsupported
    /// number of reactants, a transition, translation or criterion that
    /// references a non-existent atom, or a criterion with `min >= max`.
    pub fn consistency_check(&self) -> Result<(), Error> {
        if self.reactants.is_empty() {
            return Err(Error::NoReactants {
                template: self.name.clone(),
            });
        }
        if self.products.is_empty() {
            return Err(Error::NoProducts {
                template: self.name.clone(),
            });
        }
        if !(MIN_REACTANTS..=MAX_REACTANTS).contains(&self.reactants.len()) {
            return Err(Error::UnsupportedReactantCount {
                template: self.name.clone(),
                count: self.reactants.len(),
            });
        }

        for t in &self.transitions {
            self.check_ref(t.from, Side::Reactants, "products")?;
            self.check_ref(t.to, Side::Products, "products")?;
        }
        for t in &self.translations {
            self.check_ref(t.atom, Side::Products, "translations")?;
            self.check_ref(t.towards, Side::Products, "translations")?;
        }
        for c in &self.criteria {
            if c.atoms.len() != c.kind.arity() {
                return Err(Error::CriterionArity {
                    kind: c.kind.as_str(),
                    expected: c.kind.arity(),
                    found: c.atoms.len(),
                });
            }
            for atom in &c.atoms {
                self.check_ref(*atom, Side::Reactants, "criteria")?;
            }
            if c.min >= c.max {
                return Err(Error::InvertedThresholds {
                    template: self.name.clone(),
                    min: c.min,
                    max: c.max,
                });
            }
        }
        if self.rate.is_empty() {
            warn!(reaction = %self.name, "no rate table given, candidates will never be accepted");
        }
        Ok(())
    }

    fn check_ref(&self, atom: AtomRef, side: Side, directive: &'static str) -> Result<(), Error> {
        let molecules = match side {
            Side::Reactants => &self.reactants,
            Side::Products => &self.products,
        };
        if atom.resolve(molecules).is_none() {
            return Err(Error::missing_atom(
                &self.name,
                directive,
                side,
                atom.molecule,
                atom.atom,
            ));
        }
        Ok(())
    }
}

fn get_or_add<'a>(molecules: &'a mut Vec<Molecule>, id: usize, name: &str) -> &'a mut Molecule {
    let idx = match molecules.iter().position(|m| m.id == id) {
        Some(idx) => idx,
        None => {
            molecules.push(Molecule::new(id, name));
            molecules.len() - 1
        }
    };
    &mut molecules[idx]
}

fn template_molecule(id: usize, name: &str, atom_names: &[&str]) -> Molecule {
    Molecule::with_atoms(
        id,
        name,
        atom_names
            .iter()
            .enumerate()
            .map(|(i, atom)| Atom::new(i + 1, *atom, [0.0; 3]))
            .collect(),
    )
}

impl fmt::Display for ReactionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "reaction '{}'", self.name)?;
        let join = |mols: &[Molecule]| {
            mols.iter()
                .map(|m| format!("{} {}", m.id, m.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "  reactants: {}", join(&self.reactants))?;
        writeln!(f, "  products: {}", join(&self.products))?;
        for t in &self.transitions {
            writeln!(f, "  transition {} -> {}", t.from, t.to)?;
        }
        for t in &self.translations {
            writeln!(f, "  translation {} {} {}", t.atom, t.towards, t.value)?;
        }
        for c in &self.criteria {
            writeln!(f, "  criterion {}", c)?;
        }
        writeln!(f, "  reaction energy: {}", self.reaction_energy)?;
        writeln!(f, "  activation energy: {}", self.activation_energy)?;
        for (distance, rate) in &self.rate {
            writeln!(f, "  rate {} {}", distance, rate)?;
        }
        Ok(())
    }
}
