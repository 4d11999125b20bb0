use crate::io::error::Error;
use crate::model::topology::Topology;
use std::io::Write;

// residue and atom numbers are five columns wide and wrap around
const ID_WRAP: usize = 100_000;

/// Writes `topology` in molecule order. Callers sort the topology first when
/// the MD engine expects molecules grouped by species.
pub fn write<W: Write>(mut writer: W, topology: &Topology, title: &str) -> Result<(), Error> {
    writeln!(writer, "{}", title)?;
    writeln!(writer, "{:>5}", topology.atom_count())?;

    for molecule in topology {
        for atom in &molecule.atoms {
            let [x, y, z] = atom.position;
            let [vx, vy, vz] = atom.velocity;
            writeln!(
                writer,
                "{:>5}{:<5}{:>5}{:>5}{:>8.3}{:>8.3}{:>8.3}{:>8.4}{:>8.4}{:>8.4}",
                molecule.id % ID_WRAP,
                molecule.name,
                atom.name,
                atom.id % ID_WRAP,
                x,
                y,
                z,
                vx,
                vy,
                vz
            )?;
        }
    }

    let [bx, by, bz] = topology.dimensions;
    writeln!(writer, "{:>10.5}{:>10.5}{:>10.5}", bx, by, bz)?;
    writer.flush()?;
    Ok(())
}
