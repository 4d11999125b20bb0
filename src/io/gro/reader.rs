use crate::io::{Format, error::Error};
use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::topology::Topology;
use std::io::BufRead;

const VELOCITY_END: usize = 68;

pub fn read<R: BufRead>(reader: R) -> Result<Topology, Error> {
    read_with_title(reader).map(|(_, topology)| topology)
}

/// Reads a snapshot together with its title line.
pub fn read_with_title<R: BufRead>(reader: R) -> Result<(String, Topology), Error> {
    let mut lines = reader.lines().enumerate();
    let mut next_line = |what: &str| -> Result<(usize, String), Error> {
        match lines.next() {
            Some((i, line)) => Ok((i + 1, line?)),
            None => Err(Error::parse(Format::Gro, 0, format!("unexpected end of file, missing {what}"))),
        }
    };

    let (_, title) = next_line("title line")?;
    let (count_no, count_line) = next_line("atom count line")?;
    let atom_count = count_line
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Gro, count_no, "invalid atom count"))?;

    // residue numbers wrap at 100000, so molecules are numbered by appearance
    let mut topology = Topology::default();
    let mut previous_resid = None;
    for _ in 0..atom_count {
        let (ln, line) = next_line("atom line")?;
        let (resid, resname, atom) = parse_atom(&line, ln)?;

        let same_residue = previous_resid == Some(resid);
        match topology.molecules.last_mut() {
            Some(molecule) if same_residue && molecule.name == resname => molecule.add_atom(atom),
            _ => {
                let id = topology.molecule_count() + 1;
                topology.add_molecule(Molecule::with_atoms(id, resname, vec![atom]));
            }
        }
        previous_resid = Some(resid);
    }

    let (box_no, box_line) = next_line("box line")?;
    topology.dimensions = parse_box(&box_line, box_no)?;
    topology.cell_counts = [1, 1, 1];

    Ok((title.trim().to_string(), topology))
}

fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start.min(end)..end).unwrap_or("").trim()
}

fn parse_atom(line: &str, ln: usize) -> Result<(usize, String, Atom), Error> {
    if line.len() < 44 {
        return Err(Error::parse(Format::Gro, ln, "atom line shorter than 44 columns"));
    }

    let resid = field(line, 0, 5)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Gro, ln, "invalid residue number"))?;
    let resname = field(line, 5, 10).to_string();
    let name = field(line, 10, 15);
    let id = field(line, 15, 20)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Gro, ln, "invalid atom number"))?;

    let mut position = [0.0; 3];
    for (axis, value) in position.iter_mut().enumerate() {
        let start = 20 + axis * 8;
        *value = field(line, start, start + 8)
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Gro, ln, "invalid coordinate"))?;
    }

    let mut velocity = [0.0; 3];
    if line.trim_end().len() >= VELOCITY_END {
        for (axis, value) in velocity.iter_mut().enumerate() {
            let start = 44 + axis * 8;
            *value = field(line, start, start + 8)
                .parse::<f64>()
                .map_err(|_| Error::parse(Format::Gro, ln, "invalid velocity"))?;
        }
    }

    Ok((resid, resname, Atom::new(id, name, position).with_velocity(velocity)))
}

fn parse_box(line: &str, ln: usize) -> Result<[f64; 3], Error> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(3)
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .map_err(|_| Error::parse(Format::Gro, ln, "invalid box vector"))?;
    match values[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(Error::parse(Format::Gro, ln, "box line needs three edge lengths")),
    }
}
