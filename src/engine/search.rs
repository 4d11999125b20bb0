//! Enumeration of reaction candidates over a cell list.
//!
//! Slot 0 of every template is seeded from a single cell; every later slot is
//! drawn from that seed cell's neighbor stencil. Partial bindings are checked
//! against the criteria that become decidable with each new slot, so invalid
//! branches are pruned before they are expanded.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::cell_list::SpatialIndex;
use super::error::Error;
use crate::model::geometry::Vec3;
use crate::model::molecule::Molecule;
use crate::reaction::{MAX_REACTANTS, MIN_REACTANTS, ReactionCandidate, ReactionTemplate};

/// Finds every valid, fully bound candidate for `templates` in `index`.
///
/// Candidates come back in discovery order: templates in the given order,
/// seed cells in ascending linear index. Each unordered set of physical
/// molecules is reported at most once per template.
///
/// # Errors
///
/// Returns [`Error::Reaction`] if a template atom ordinal does not exist in a
/// molecule it is bound to.
pub fn find_candidates<'t>(
    index: &SpatialIndex<'_>,
    templates: &'t [ReactionTemplate],
    dimensions: Vec3,
) -> Result<Vec<ReactionCandidate<'t>>, Error> {
    let mut search = Search {
        index,
        dimensions,
        seen: HashSet::new(),
        found: Vec::new(),
    };

    for (template_index, template) in templates.iter().enumerate() {
        let count = template.reactant_count();
        if !(MIN_REACTANTS..=MAX_REACTANTS).contains(&count) {
            warn!(
                reaction = %template.name,
                reactants = count,
                "skipping template with unsupported reactant count"
            );
            continue;
        }

        let before = search.found.len();
        let first = &template.reactants[0].name;
        for seed in 0..index.cell_count() {
            for molecule in index.cells_of(seed, first) {
                let mut candidate = ReactionCandidate::new(template_index, template);
                candidate.bind(0, molecule, seed)?;
                if !candidate.valid_for_slot(0, dimensions) {
                    continue;
                }
                search.expand(candidate, seed, 1)?;
            }
        }
        debug!(
            reaction = %template.name,
            candidates = search.found.len() - before,
            "searched template"
        );
    }

    Ok(search.found)
}

struct Search<'i, 'a, 't> {
    index: &'i SpatialIndex<'a>,
    dimensions: Vec3,
    seen: HashSet<(usize, Vec<usize>)>,
    found: Vec<ReactionCandidate<'t>>,
}

impl<'t> Search<'_, '_, 't> {
    fn expand(&mut self, candidate: ReactionCandidate<'t>, seed: usize, slot: usize) -> Result<(), Error> {
        if slot == candidate.reactants().len() {
            let key = (candidate.template_index(), candidate.reactant_ids());
            if self.seen.insert(key) {
                self.found.push(candidate);
            }
            return Ok(());
        }

        let name = &candidate.template().reactants[slot].name;
        for (molecule, cell) in self.index.neighbors_of(seed, name) {
            if !admissible(&candidate, slot, molecule) {
                continue;
            }
            let mut next = candidate.clone();
            next.bind(slot, molecule, cell)?;
            if !next.valid_for_slot(slot, self.dimensions) {
                continue;
            }
            self.expand(next, seed, slot + 1)?;
        }
        Ok(())
    }
}

/// Whether `molecule` may fill `slot` given the slots already bound.
///
/// A molecule may not fill two slots, and same-species slots are filled in
/// ascending id order. Repeats from duplicated stencil cells are removed
/// afterwards by the `(template, ids)` set.
fn admissible(candidate: &ReactionCandidate<'_>, slot: usize, molecule: &Molecule) -> bool {
    candidate.reactants()[..slot].iter().all(|bound| {
        bound.id != molecule.id && (bound.name != molecule.name || bound.id < molecule.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::NeighborWrap;
    use crate::model::atom::Atom;
    use crate::model::topology::Topology;
    use crate::reaction::{AtomRef, Criterion};

    fn single(id: usize, name: &str, position: Vec3) -> Molecule {
        Molecule::with_atoms(id, name, vec![Atom::new(id, "X", position)])
    }

    fn template(name: &str, species: &[&str]) -> ReactionTemplate {
        let mut t = ReactionTemplate::new(name);
        for s in species {
            t.add_reactant(s, &["X"]);
        }
        t.add_product("P", &["X"]);
        t
    }

    fn ids(candidates: &[ReactionCandidate<'_>]) -> Vec<Vec<usize>> {
        candidates.iter().map(|c| c.reactant_ids()).collect()
    }

    #[test]
    fn pair_in_same_cell_yields_one_candidate() {
        let mut top = Topology::new([10.0; 3], [2, 2, 2]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [2.0, 1.0, 1.0]));
        let templates = vec![template("ab", &["A", "B"])];

        let index = SpatialIndex::build(&top, [2, 2, 2], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2]]);
        assert_eq!(found[0].cell(0), Some(0));
        assert_eq!(found[0].cell(1), Some(0));
    }

    #[test]
    fn same_species_pair_is_bound_in_ascending_id_order() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(single(7, "B", [1.0, 1.0, 1.0]));
        top.add_molecule(single(5, "B", [1.5, 1.0, 1.0]));
        let templates = vec![template("bb", &["B", "B"])];

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![5, 7]]);
    }

    #[test]
    fn repeated_stencil_cells_do_not_duplicate_candidates() {
        let mut top = Topology::new([10.0; 3], [2, 2, 2]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [6.0, 1.0, 1.0]));
        top.add_molecule(single(3, "B", [6.0, 6.0, 6.0]));
        let templates = vec![template("ab", &["A", "B"])];

        let index = SpatialIndex::build(&top, [2, 2, 2], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2], vec![1, 3]]);
    }

    #[test]
    fn geometric_criteria_prune_candidates() {
        let mut top = Topology::new([20.0; 3], [1, 1, 1]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [1.5, 1.0, 1.0]));
        top.add_molecule(single(3, "B", [9.0, 1.0, 1.0]));
        top.add_molecule(single(4, "B", [19.0, 1.0, 1.0]));
        let mut t = template("ab", &["A", "B"]);
        t.add_criterion(Criterion::distance(AtomRef::new(0, 0), AtomRef::new(1, 0), 0.0, 3.0));

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let templates = vec![t];
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        // molecule 4 is 2.0 away through the periodic boundary
        assert_eq!(ids(&found), vec![vec![1, 2], vec![1, 4]]);
        assert!((found[1].criterion_value(0).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn three_body_search_counts_each_combination_once() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [2.0, 1.0, 1.0]));
        top.add_molecule(single(3, "B", [3.0, 1.0, 1.0]));
        top.add_molecule(single(4, "B", [4.0, 1.0, 1.0]));
        let templates = vec![template("abb", &["A", "B", "B"])];

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2, 3], vec![1, 2, 4], vec![1, 3, 4]]);
    }

    #[test]
    fn same_species_slots_across_cells_are_found() {
        // the lower-id partner sits in the higher-numbered cell
        let mut top = Topology::new([30.0, 10.0, 10.0], [3, 1, 1]);
        top.add_molecule(single(1, "A", [15.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [25.0, 1.0, 1.0]));
        top.add_molecule(single(3, "B", [5.0, 1.0, 1.0]));
        let templates = vec![template("abb", &["A", "B", "B"])];

        let index = SpatialIndex::build(&top, [3, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2, 3]]);
        assert_eq!(found[0].cell(1), Some(2));
        assert_eq!(found[0].cell(2), Some(0));
    }

    #[test]
    fn same_species_pair_across_cells_is_found_once() {
        let mut top = Topology::new([30.0, 10.0, 10.0], [3, 1, 1]);
        top.add_molecule(single(1, "B", [25.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [5.0, 1.0, 1.0]));
        let templates = vec![template("bb", &["B", "B"])];

        let index = SpatialIndex::build(&top, [3, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2]]);
    }

    #[test]
    fn four_body_search_binds_distinct_molecules() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "A", [2.0, 1.0, 1.0]));
        top.add_molecule(single(3, "B", [3.0, 1.0, 1.0]));
        top.add_molecule(single(4, "C", [4.0, 1.0, 1.0]));
        let templates = vec![template("aabc", &["A", "A", "B", "C"])];

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(ids(&found), vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn unsupported_templates_are_skipped() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        let templates = vec![template("lonely", &["A"]), template("none", &[])];

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert!(found.is_empty());
    }

    #[test]
    fn candidates_remember_their_template() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(single(1, "A", [1.0, 1.0, 1.0]));
        top.add_molecule(single(2, "B", [2.0, 1.0, 1.0]));
        let templates = vec![template("bb", &["B", "B"]), template("ab", &["A", "B"])];

        let index = SpatialIndex::build(&top, [1, 1, 1], NeighborWrap::PerAxis).unwrap();
        let found = find_candidates(&index, &templates, top.dimensions).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].template_index(), 1);
        assert_eq!(found[0].name(), "ab");
    }
}
