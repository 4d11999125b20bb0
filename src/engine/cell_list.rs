//! Periodic cell list over molecule reference atoms.
//!
//! The box is divided into a regular grid; every molecule is filed under the
//! cell containing its first atom. Each cell also stores the linear indices
//! of its 27-cell periodic stencil. On grids with at most three cells along an
//! axis the stencil repeats cells, and those repeats are kept.

use tracing::debug;

use super::config::NeighborWrap;
use super::error::Error;
use crate::model::geometry::Vec3;
use crate::model::molecule::Molecule;
use crate::model::topology::Topology;

/// Cell list built from one topology snapshot.
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    counts: [usize; 3],
    dimensions: Vec3,
    cells: Vec<Vec<&'a Molecule>>,
    neighbors: Vec<Vec<usize>>,
}

impl<'a> SpatialIndex<'a> {
    /// Builds the cell list for `topology` with `counts` cells per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if a cell count is zero or a box edge
    /// is not positive.
    pub fn build(topology: &'a Topology, counts: [usize; 3], wrap: NeighborWrap) -> Result<Self, Error> {
        if counts.contains(&0) {
            return Err(Error::InvalidGrid(format!(
                "cell counts must be at least 1 per axis, got {counts:?}"
            )));
        }
        let dimensions = topology.dimensions;
        if dimensions.iter().any(|d| !(*d > 0.0)) {
            return Err(Error::InvalidGrid(format!(
                "box dimensions must be positive, got {dimensions:?}"
            )));
        }

        let total = counts[0] * counts[1] * counts[2];
        let mut index = Self {
            counts,
            dimensions,
            cells: vec![Vec::new(); total],
            neighbors: Vec::with_capacity(total),
        };

        for molecule in topology {
            let Some(reference) = molecule.reference_atom() else {
                debug!(id = molecule.id, name = %molecule.name, "skipping molecule without atoms");
                continue;
            };
            let cell = index.cell_of(reference.position);
            index.cells[cell].push(molecule);
        }

        for k in 0..counts[2] {
            for j in 0..counts[1] {
                for i in 0..counts[0] {
                    let stencil = index.stencil(i, j, k, wrap);
                    index.neighbors.push(stencil);
                }
            }
        }

        Ok(index)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.counts[0] + k * self.counts[0] * self.counts[1]
    }

    /// Linear index of the cell containing `position`, after wrapping it
    /// into the primary box.
    pub fn cell_of(&self, position: Vec3) -> usize {
        let mut coords = [0usize; 3];
        for axis in 0..3 {
            let scaled = position[axis] / self.dimensions[axis];
            let frac = scaled - scaled.floor();
            let c = (frac * self.counts[axis] as f64).floor() as usize;
            coords[axis] = c.min(self.counts[axis] - 1);
        }
        self.linear_index(coords[0], coords[1], coords[2])
    }

    /// Stencil of cell `cell`, 27 entries with repeats.
    pub fn neighbor_cells(&self, cell: usize) -> &[usize] {
        &self.neighbors[cell]
    }

    /// Molecules named `name` filed under `cell`.
    pub fn cells_of<'s>(&'s self, cell: usize, name: &'s str) -> impl Iterator<Item = &'a Molecule> + 's {
        self.cells[cell].iter().copied().filter(move |m| m.name == name)
    }

    /// Molecules named `name` in every stencil cell of `cell`, each paired with
    /// the cell it was found in. Repeated stencil cells yield repeated entries.
    pub fn neighbors_of(&self, cell: usize, name: &str) -> Vec<(&'a Molecule, usize)> {
        let mut found = Vec::new();
        for &neighbor in &self.neighbors[cell] {
            for molecule in self.cells_of(neighbor, name) {
                found.push((molecule, neighbor));
            }
        }
        found
    }

    fn stencil(&self, i: usize, j: usize, k: usize, wrap: NeighborWrap) -> Vec<usize> {
        let [nx, ny, nz] = self.counts;
        let y_wrap = match wrap {
            NeighborWrap::PerAxis => ny,
            NeighborWrap::Legacy => nx,
        };

        let mut stencil = Vec::with_capacity(27);
        for x in [i, right(i, nx), left(i, nx)] {
            for y in [j, right(j, y_wrap), left(j, y_wrap)] {
                // the legacy count may step outside the y range
                let y = y % ny;
                for z in [k, right(k, nz), left(k, nz)] {
                    stencil.push(self.linear_index(x, y, z));
                }
            }
        }
        stencil
    }
}

/// Next cell index along an axis with `count` cells, wrapping to 0.
#[inline]
pub fn right(n: usize, count: usize) -> usize {
    if n + 1 < count { n + 1 } else { 0 }
}

/// Previous cell index along an axis with `count` cells, wrapping to the end.
#[inline]
pub fn left(n: usize, count: usize) -> usize {
    if n > 0 { n - 1 } else { count.saturating_sub(1) }
}
