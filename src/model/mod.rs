//! Core data structures describing a simulation snapshot.
//!
//! - [`atom`] – A single atom with id, name, position and velocity.
//! - [`molecule`] – An ordered group of atoms with a species name.
//! - [`topology`] – The full snapshot: molecules, box, cell grid, and
//!   reaction records.
//! - [`geometry`] – Minimum-image distances, angles and dihedrals.

pub mod atom;
pub mod geometry;
pub mod molecule;
pub mod topology;
