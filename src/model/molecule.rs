use super::atom::Atom;
use super::geometry::{self, Vec3};

/// An ordered group of atoms sharing a species name.
///
/// The first atom is the molecule's reference atom: it decides which cell
/// of the cell list the molecule belongs to and anchors periodic-boundary
/// repair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    pub id: usize,
    pub name: String,
    pub atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            atoms: Vec::new(),
        }
    }

    pub fn with_atoms(id: usize, name: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Self {
            id,
            name: name.into(),
            atoms,
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn reference_atom(&self) -> Option<&Atom> {
        self.atoms.first()
    }

    /// Same physical molecule: identical id and species name.
    #[inline]
    pub fn is_same(&self, other: &Molecule) -> bool {
        self.id == other.id && self.name == other.name
    }

    /// Shifts atoms by whole box lengths so that none lies farther than half
    /// a box length from the reference atom along any axis.
    ///
    /// Returns the ids of atoms that were moved.
    pub fn make_whole(&mut self, dimensions: Vec3) -> Vec<usize> {
        let Some(reference) = self.reference_atom().map(|a| a.position) else {
            return Vec::new();
        };

        let mut moved = Vec::new();
        for atom in self.atoms.iter_mut().skip(1) {
            let delta = geometry::sub(atom.position, reference);
            let mut shifted = false;
            for axis in 0..3 {
                let length = dimensions[axis];
                if length <= 0.0 {
                    continue;
                }
                let images = (delta[axis] / length).round();
                if images != 0.0 {
                    atom.position[axis] -= images * length;
                    shifted = true;
                }
            }
            if shifted {
                moved.push(atom.id);
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_molecule() -> Molecule {
        Molecule::with_atoms(
            1,
            "MOL",
            vec![
                Atom::new(1, "C", [0.2, 5.0, 9.9]),
                Atom::new(2, "H", [9.8, 5.0, 0.1]),
                Atom::new(3, "H", [0.6, 5.2, 9.5]),
                Atom::new(4, "H", [30.1, 5.0, 9.9]),
            ],
        )
    }

    #[test]
    fn make_whole_keeps_atoms_within_half_box() {
        let dims = [10.0, 10.0, 10.0];
        let mut mol = broken_molecule();
        let moved = mol.make_whole(dims);

        assert_eq!(moved, vec![2, 4]);
        let reference = mol.atoms[0].position;
        for atom in &mol.atoms {
            for axis in 0..3 {
                assert!((atom.position[axis] - reference[axis]).abs() <= 0.5 * dims[axis]);
            }
        }
        assert!((mol.atoms[1].position[0] - (-0.2)).abs() < 1e-12);
        assert!((mol.atoms[1].position[2] - 10.1).abs() < 1e-12);
    }

    #[test]
    fn make_whole_leaves_intact_molecule_untouched() {
        let mut mol = Molecule::with_atoms(
            3,
            "W",
            vec![
                Atom::new(1, "O", [5.0, 5.0, 5.0]),
                Atom::new(2, "H", [5.1, 5.0, 5.0]),
            ],
        );
        let before = mol.clone();
        assert!(mol.make_whole([10.0, 10.0, 10.0]).is_empty());
        assert_eq!(mol, before);
    }

    #[test]
    fn same_requires_matching_id_and_name() {
        let a = Molecule::new(4, "A");
        assert!(a.is_same(&Molecule::new(4, "A")));
        assert!(!a.is_same(&Molecule::new(4, "B")));
        assert!(!a.is_same(&Molecule::new(5, "A")));
    }
}
