//! GROMACS `.gro` coordinate files.
//!
//! Each residue of the file is one molecule. Atom and residue ids are kept
//! as written; positions are in nm and velocities in nm/ps.

mod reader;
mod writer;

pub use reader::{read, read_with_title};
pub use writer::write;
