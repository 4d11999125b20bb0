//! Index groups of the atoms that took part in reactions.

use crate::io::error::Error;
use crate::model::topology::Topology;
use std::io::Write;

/// Writes the pre-reaction ids of reacted atoms to `reactants` and their
/// renumbered ids to `products`, as one index group each.
pub fn write<W: Write, V: Write>(mut reactants: W, mut products: V, topology: &Topology) -> Result<(), Error> {
    writeln!(reactants, "[ reactants ]")?;
    writeln!(products, "[ products ]")?;
    for (old, new) in topology.atom_records() {
        write!(reactants, "{} ", old)?;
        write!(products, "{} ", new)?;
    }
    writeln!(reactants)?;
    writeln!(products)?;
    reactants.flush()?;
    products.flush()?;
    Ok(())
}
