use tracing::{debug, info};

use super::error::Error;
use crate::model::topology::Topology;
use crate::reaction::ReactionCandidate;

/// Molecule ids touched by one applied reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub template: usize,
    pub reactant_ids: Vec<usize>,
    /// Provisional ids given to the products, valid until the topology is
    /// renumbered. The reaction records map them to the renumbered ids.
    pub product_ids: Vec<usize>,
}

/// Realizes an accepted candidate in `topology`.
///
/// Product atoms inherit identity, position and velocity from the reactant
/// atoms they come from, products are made whole across periodic boundaries
/// and then translated. The reactants are removed and every product is
/// inserted under a fresh id above the current maximum, with a reaction
/// record for that id. The candidate's products carry the provisional ids
/// afterwards.
///
/// # Errors
///
/// Returns [`Error::MoleculeNotFound`] if a bound reactant is not in
/// `topology`.
pub fn react(topology: &mut Topology, candidate: &mut ReactionCandidate<'_>) -> Result<ReactionOutcome, Error> {
    let reactant_ids = candidate.reactant_ids();
    if let Some(&id) = reactant_ids.iter().find(|&&id| !topology.contains_molecule(id)) {
        return Err(Error::MoleculeNotFound { id, snapshot: "new" });
    }

    candidate.apply_transitions();
    candidate.make_products_whole(topology.dimensions);
    candidate.apply_translations();

    let mut highest = topology.max_molecule_id().unwrap_or(0);
    for &id in &reactant_ids {
        topology.remove_molecule(id);
    }

    let mut product_ids = Vec::with_capacity(candidate.products().len());
    for product in candidate.products_mut() {
        highest += 1;
        product.id = highest;
        topology.add_molecule(product.clone());
        topology.add_reaction_record(highest);
        product_ids.push(highest);
        debug!(id = highest, name = %product.name, "inserted product");
    }

    info!(reaction = %candidate, "applied reaction");

    Ok(ReactionOutcome {
        template: candidate.template_index(),
        reactant_ids,
        product_ids,
    })
}
