use super::atom::Atom;
use super::geometry::Vec3;
use super::molecule::Molecule;

/// A complete molecular snapshot of the simulation box.
///
/// Molecules keep insertion order until [`sort`](Topology::sort) re-establishes
/// the canonical name-sorted, densely numbered layout. Besides the molecules
/// the topology carries the box edge lengths, the cell-list resolution used
/// for candidate search, and the reaction records that link provisional
/// product ids to their ids after renumbering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    pub molecules: Vec<Molecule>,
    pub dimensions: Vec3,
    pub cell_counts: [usize; 3],
    molecule_records: Vec<(usize, usize)>,
    atom_records: Vec<(usize, usize)>,
}

impl Topology {
    pub fn new(dimensions: Vec3, cell_counts: [usize; 3]) -> Self {
        Self {
            dimensions,
            cell_counts,
            ..Self::default()
        }
    }

    #[inline]
    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(Molecule::atom_count).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.dimensions[0] * self.dimensions[1] * self.dimensions[2]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Molecule> {
        self.molecules.iter()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.molecules.iter().flat_map(|m| m.atoms.iter())
    }

    pub fn add_molecule(&mut self, molecule: Molecule) -> &mut Molecule {
        self.molecules.push(molecule);
        let last = self.molecules.len() - 1;
        &mut self.molecules[last]
    }

    /// Returns the molecule with the given id, appending an empty one named
    /// `name` when none exists.
    pub fn get_or_add_molecule(&mut self, id: usize, name: &str) -> &mut Molecule {
        match self.molecules.iter().position(|m| m.id == id) {
            Some(idx) => &mut self.molecules[idx],
            None => self.add_molecule(Molecule::new(id, name)),
        }
    }

    pub fn remove_molecule(&mut self, id: usize) {
        self.molecules.retain(|m| m.id != id);
    }

    pub fn contains_molecule(&self, id: usize) -> bool {
        self.molecules.iter().any(|m| m.id == id)
    }

    /// Checks for the same physical molecule (matching id and name).
    pub fn contains(&self, molecule: &Molecule) -> bool {
        self.molecules.iter().any(|m| m.is_same(molecule))
    }

    pub fn molecule(&self, id: usize) -> Option<&Molecule> {
        self.molecules.iter().find(|m| m.id == id)
    }

    pub fn molecule_mut(&mut self, id: usize) -> Option<&mut Molecule> {
        self.molecules.iter_mut().find(|m| m.id == id)
    }

    pub fn molecules_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Molecule> {
        self.molecules.iter().filter(move |m| m.name == name)
    }

    /// Distinct species names in order of first appearance.
    pub fn molecule_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for m in &self.molecules {
            if !types.contains(&m.name.as_str()) {
                types.push(&m.name);
            }
        }
        types
    }

    pub fn max_molecule_id(&self) -> Option<usize> {
        self.molecules.iter().map(|m| m.id).max()
    }

    /// Stable-sorts molecules by name and renumbers molecules `1..=N` and
    /// atoms `1..=M` in the resulting order.
    ///
    /// Molecule reaction records are rewritten to the renumbered ids, and the
    /// atom records are rebuilt with `(old, new)` pairs for every atom of a
    /// recorded molecule.
    pub fn sort(&mut self) {
        self.atom_records.clear();
        self.molecules.sort_by(|a, b| a.name.cmp(&b.name));

        let mut atom_counter = 0;
        for (idx, molecule) in self.molecules.iter_mut().enumerate() {
            let new_id = idx + 1;

            let record = self
                .molecule_records
                .iter_mut()
                .find(|(provisional, _)| *provisional == molecule.id);
            let reacted = match record {
                Some(record) => {
                    record.1 = new_id;
                    true
                }
                None => false,
            };

            molecule.id = new_id;
            for atom in &mut molecule.atoms {
                atom_counter += 1;
                if reacted {
                    self.atom_records.push((atom.id, atom_counter));
                }
                atom.id = atom_counter;
            }
        }
    }

    /// Makes one molecule whole across periodic boundaries, returning the ids
    /// of moved atoms, or `None` when no molecule has this id.
    pub fn repair_molecule_pbc(&mut self, id: usize) -> Option<Vec<usize>> {
        let dimensions = self.dimensions;
        self.molecule_mut(id).map(|m| m.make_whole(dimensions))
    }

    /// Removes all molecules and reaction records. Box and grid are kept.
    pub fn clear(&mut self) {
        self.molecules.clear();
        self.clear_reaction_records();
    }

    pub fn clear_reaction_records(&mut self) {
        self.molecule_records.clear();
        self.atom_records.clear();
    }

    pub fn add_reaction_record(&mut self, provisional_id: usize) {
        self.molecule_records.push((provisional_id, provisional_id));
    }

    /// Current id of a molecule inserted under `provisional_id`.
    pub fn reaction_record(&self, provisional_id: usize) -> Option<usize> {
        self.molecule_records
            .iter()
            .find(|(provisional, _)| *provisional == provisional_id)
            .map(|(_, current)| *current)
    }

    pub fn molecule_records(&self) -> &[(usize, usize)] {
        &self.molecule_records
    }

    pub fn atom_records(&self) -> &[(usize, usize)] {
        &self.atom_records
    }
}

impl<'a> IntoIterator for &'a Topology {
    type Item = &'a Molecule;
    type IntoIter = std::slice::Iter<'a, Molecule>;

    fn into_iter(self) -> Self::IntoIter {
        self.molecules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn molecule(id: usize, name: &str, atom_ids: &[usize]) -> Molecule {
        Molecule::with_atoms(
            id,
            name,
            atom_ids
                .iter()
                .map(|&a| Atom::new(a, "X", [a as f64 * 0.1, 0.0, 0.0]))
                .collect(),
        )
    }

    fn make_mixed() -> Topology {
        let mut top = Topology::new([10.0, 10.0, 10.0], [2, 2, 2]);
        top.add_molecule(molecule(7, "SOL", &[20, 21, 22]));
        top.add_molecule(molecule(3, "ABC", &[5, 6]));
        top.add_molecule(molecule(12, "SOL", &[40, 41, 42]));
        top.add_molecule(molecule(9, "ABC", &[1]));
        top
    }

    #[test]
    fn sort_renumbers_densely_in_stable_name_order() {
        let mut top = make_mixed();
        top.sort();

        let layout: Vec<(usize, &str)> = top.iter().map(|m| (m.id, m.name.as_str())).collect();
        assert_eq!(layout, vec![(1, "ABC"), (2, "ABC"), (3, "SOL"), (4, "SOL")]);

        let atom_ids: Vec<usize> = top.atoms().map(|a| a.id).collect();
        assert_eq!(atom_ids, (1..=9).collect::<Vec<_>>());

        // stable: ABC 3 before ABC 9, SOL 7 before SOL 12, atom order kept
        assert_eq!(top.molecules[0].atom_count(), 2);
        assert_eq!(top.molecules[1].atom_count(), 1);
        assert!((top.molecules[2].atoms[1].position[0] - 2.1).abs() < 1e-12);
    }

    #[test]
    fn sort_updates_reaction_records() {
        let mut top = make_mixed();
        top.add_reaction_record(12);
        top.sort();

        assert_eq!(top.reaction_record(12), Some(4));
        assert_eq!(top.atom_records(), &[(40, 7), (41, 8), (42, 9)]);
    }

    #[test]
    fn reaction_record_miss_is_none() {
        let mut top = make_mixed();
        top.add_reaction_record(3);
        assert_eq!(top.reaction_record(3), Some(3));
        assert_eq!(top.reaction_record(4), None);
        top.clear_reaction_records();
        assert_eq!(top.reaction_record(3), None);
    }

    #[test]
    fn lookup_insert_remove() {
        let mut top = make_mixed();
        assert_eq!(top.molecule_count(), 4);
        assert_eq!(top.atom_count(), 9);
        assert_eq!(top.max_molecule_id(), Some(12));
        assert!(top.contains_molecule(9));
        assert!(top.contains(&Molecule::new(9, "ABC")));
        assert!(!top.contains(&Molecule::new(9, "SOL")));

        top.remove_molecule(9);
        assert!(!top.contains_molecule(9));
        assert!(top.molecule(9).is_none());
        assert_eq!(top.molecules_named("SOL").count(), 2);
        assert_eq!(top.molecule_types(), vec!["SOL", "ABC"]);
    }

    #[test]
    fn get_or_add_reuses_existing() {
        let mut top = make_mixed();
        top.get_or_add_molecule(3, "ABC").add_atom(Atom::new(99, "N", [0.0; 3]));
        assert_eq!(top.molecule(3).map(Molecule::atom_count), Some(3));

        top.get_or_add_molecule(50, "NEW");
        assert_eq!(top.molecule_count(), 5);
        assert_eq!(top.molecule(50).map(|m| m.name.as_str()), Some("NEW"));
    }

    #[test]
    fn clear_keeps_box_and_grid() {
        let mut top = make_mixed();
        top.add_reaction_record(7);
        top.clear();
        assert!(top.is_empty());
        assert_eq!(top.dimensions, [10.0, 10.0, 10.0]);
        assert_eq!(top.cell_counts, [2, 2, 2]);
        assert!(top.molecule_records().is_empty());
    }

    #[test]
    fn repair_pbc_by_id() {
        let mut top = Topology::new([4.0, 4.0, 4.0], [1, 1, 1]);
        top.add_molecule(Molecule::with_atoms(
            1,
            "M",
            vec![
                Atom::new(1, "A", [0.1, 1.0, 1.0]),
                Atom::new(2, "B", [3.9, 1.0, 1.0]),
            ],
        ));
        assert_eq!(top.repair_molecule_pbc(1), Some(vec![2]));
        assert_eq!(top.repair_molecule_pbc(2), None);
    }
}
