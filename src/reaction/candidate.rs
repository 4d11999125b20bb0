use std::fmt;

use tracing::{debug, info};

use super::criterion::Criterion;
use super::error::Error;
use super::template::ReactionTemplate;
use crate::model::geometry::{self, Vec3};
use crate::model::molecule::Molecule;

/// A reaction template bound to concrete molecules.
///
/// Binding copies the molecule's atom data into the slot, so a candidate
/// never refers back into the topology it was found in. Whether the bound
/// molecules still exist is re-checked by id when the candidate is
/// considered for acceptance.
#[derive(Debug, Clone)]
pub struct ReactionCandidate<'t> {
    template: &'t ReactionTemplate,
    template_index: usize,
    reactants: Vec<Molecule>,
    products: Vec<Molecule>,
    cells: Vec<Option<usize>>,
    values: Vec<Option<f64>>,
}

impl<'t> ReactionCandidate<'t> {
    pub fn new(template_index: usize, template: &'t ReactionTemplate) -> Self {
        Self {
            template,
            template_index,
            reactants: template.reactants.clone(),
            products: template.products.clone(),
            cells: vec![None; template.reactants.len()],
            values: vec![None; template.criteria.len()],
        }
    }

    pub fn template(&self) -> &'t ReactionTemplate {
        self.template
    }

    pub fn template_index(&self) -> usize {
        self.template_index
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn reactants(&self) -> &[Molecule] {
        &self.reactants
    }

    pub fn products(&self) -> &[Molecule] {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut [Molecule] {
        &mut self.products
    }

    /// Cell the molecule in `slot` was found in.
    pub fn cell(&self, slot: usize) -> Option<usize> {
        self.cells.get(slot).copied().flatten()
    }

    pub fn is_bound(&self, slot: usize) -> bool {
        self.cell(slot).is_some()
    }

    /// Latest evaluated value of criterion `index`.
    pub fn criterion_value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Ids of the bound reactants, in slot order.
    pub fn reactant_ids(&self) -> Vec<usize> {
        self.reactants.iter().map(|m| m.id).collect()
    }

    /// Binds `molecule`, found in `cell`, to reactant slot `slot`.
    ///
    /// Each template atom's ordinal selects the molecule atom whose id,
    /// position and velocity are copied; the slot takes the molecule's id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AtomOutOfRange`] if a template ordinal exceeds the
    /// molecule's atom count.
    pub fn bind(&mut self, slot: usize, molecule: &Molecule, cell: usize) -> Result<(), Error> {
        let template = self.template;
        let reactant = &mut self.reactants[slot];
        for (template_atom, atom) in template.reactants[slot].atoms.iter().zip(&mut reactant.atoms) {
            let source = template_atom
                .id
                .checked_sub(1)
                .and_then(|ix| molecule.atoms.get(ix))
                .ok_or_else(|| Error::AtomOutOfRange {
                    template: template.name.clone(),
                    slot: slot + 1,
                    molecule_id: molecule.id,
                    ordinal: template_atom.id,
                    count: molecule.atom_count(),
                })?;
            atom.id = source.id;
            atom.position = source.position;
            atom.velocity = source.velocity;
        }
        reactant.id = molecule.id;
        self.cells[slot] = Some(cell);
        Ok(())
    }

    /// Evaluates the criteria that become decidable once `slot` is bound.
    ///
    /// Stops at the first criterion whose value falls outside its window.
    pub fn valid_for_slot(&mut self, slot: usize, dimensions: Vec3) -> bool {
        self.check(dimensions, |c| c.slot() == slot)
    }

    /// Evaluates every criterion of the template.
    pub fn valid(&mut self, dimensions: Vec3) -> bool {
        self.check(dimensions, |_| true)
    }

    fn check(&mut self, dimensions: Vec3, select: impl Fn(&Criterion) -> bool) -> bool {
        for (idx, criterion) in self.template.criteria.iter().enumerate() {
            if !select(criterion) {
                continue;
            }
            let Some(value) = criterion.evaluate(&self.reactants, dimensions) else {
                return false;
            };
            self.values[idx] = Some(value);
            if !criterion.accepts(value) {
                debug!(
                    reaction = %self.template.name,
                    criterion = %criterion,
                    value,
                    "criterion not met"
                );
                return false;
            }
        }
        true
    }

    /// Instantaneous rate from the template's rate table at the current
    /// value of the first criterion.
    pub fn current_rate(&self) -> f64 {
        self.template.rate_at(self.criterion_value(0))
    }

    /// Copies id, position and velocity of reactant atoms into the product
    /// atoms they turn into.
    pub fn apply_transitions(&mut self) {
        for t in &self.template.transitions {
            let Some(source) = self
                .reactants
                .get(t.from.molecule)
                .and_then(|m| m.atoms.get(t.from.atom))
                .cloned()
            else {
                continue;
            };
            if let Some(target) = self
                .products
                .get_mut(t.to.molecule)
                .and_then(|m| m.atoms.get_mut(t.to.atom))
            {
                target.id = source.id;
                target.position = source.position;
                target.velocity = source.velocity;
            }
        }
    }

    /// Makes every product whole across periodic boundaries, logging moved
    /// atoms.
    pub fn make_products_whole(&mut self, dimensions: Vec3) {
        for product in &mut self.products {
            let moved = product.make_whole(dimensions);
            if !moved.is_empty() {
                info!(
                    product = %product.name,
                    atoms = ?moved,
                    "shifted product atoms across periodic boundaries"
                );
            }
        }
    }

    /// Moves product atoms along their configured translation axes.
    pub fn apply_translations(&mut self) {
        for t in &self.template.translations {
            let (Some(from), Some(to)) = (
                t.atom.resolve(&self.products).copied(),
                t.towards.resolve(&self.products).copied(),
            ) else {
                continue;
            };
            let axis = geometry::sub(to, from);
            let length = geometry::norm(axis);
            if length == 0.0 {
                continue;
            }
            let shifted = geometry::add(from, geometry::scale(axis, t.value / length));
            let after = geometry::norm(geometry::sub(to, shifted));

            info!(
                atom = %t.atom,
                towards = %t.towards,
                before = length,
                after,
                "translated product atom"
            );

            if let Some(atom) = self
                .products
                .get_mut(t.atom.molecule)
                .and_then(|m| m.atoms.get_mut(t.atom.atom))
            {
                atom.position = shifted;
            }
        }
    }

    pub fn short_info(&self) -> String {
        let list = |mols: &[Molecule]| {
            mols.iter()
                .map(|m| format!("{} {}", m.id, m.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "<{}: {} -> {}>",
            self.template.name,
            list(&self.reactants),
            list(&self.products)
        )
    }
}

impl fmt::Display for ReactionCandidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_info())
    }
}
