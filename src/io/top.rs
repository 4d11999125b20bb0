//! GROMACS `.top` topology files.
//!
//! Only the `[ system ]` name and the `[ molecules ]` table are interpreted.
//! Everything else is kept verbatim so the file can be written back with an
//! updated molecule table after reactions.

use crate::io::{Format, error::Error};
use crate::model::topology::Topology;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopFile {
    pub system_name: String,
    /// Species and counts of the `[ molecules ]` table, in file order.
    pub molecules: Vec<(String, usize)>,
    lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    System,
    Molecules,
    Other,
}

fn directive_of(line: &str) -> Option<Directive> {
    let start = line.find('[')?;
    let end = line[start..].find(']')? + start;
    Some(match line[start + 1..end].trim() {
        "system" => Directive::System,
        "molecules" => Directive::Molecules,
        _ => Directive::Other,
    })
}

pub fn read<R: BufRead>(reader: R) -> Result<TopFile, Error> {
    let mut top = TopFile::default();
    let mut current = Directive::Other;
    let mut in_table = false;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let data = line.split(';').next().unwrap_or("").trim();

        if let Some(directive) = directive_of(data) {
            current = directive;
            in_table = directive == Directive::Molecules;
            top.lines.push(line);
            continue;
        }

        match current {
            Directive::System if !data.is_empty() && top.system_name.is_empty() => {
                top.system_name = data.to_string();
            }
            Directive::Molecules if !data.is_empty() => {
                let mut parts = data.split_whitespace();
                let (Some(name), Some(count)) = (parts.next(), parts.next()) else {
                    return Err(Error::parse(Format::Top, i + 1, "molecule line needs name and count"));
                };
                let count = count
                    .parse::<usize>()
                    .map_err(|_| Error::parse(Format::Top, i + 1, "invalid molecule count"))?;
                top.molecules.push((name.to_string(), count));
                continue;
            }
            _ => {}
        }
        if !in_table {
            top.lines.push(line);
        }
    }

    Ok(top)
}

impl TopFile {
    /// Number of molecules of `name` declared in the molecule table.
    pub fn count_of(&self, name: &str) -> usize {
        self.molecules
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, c)| c)
            .sum()
    }

    /// Species whose declared count differs from `topology`, as
    /// `(name, declared, found)`.
    pub fn mismatches(&self, topology: &Topology) -> Vec<(String, usize, usize)> {
        let mut names: Vec<&str> = self.molecules.iter().map(|(n, _)| n.as_str()).collect();
        for name in topology.molecule_types() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
            .into_iter()
            .filter_map(|name| {
                let declared = self.count_of(name);
                let found = topology.molecules_named(name).count();
                (declared != found).then(|| (name.to_string(), declared, found))
            })
            .collect()
    }

    /// Writes the file back with the molecule table replaced by the species
    /// counts of `topology`, in order of first appearance.
    pub fn write<W: Write>(&self, mut writer: W, topology: &Topology) -> Result<(), Error> {
        for line in &self.lines {
            writeln!(writer, "{}", line)?;
            if directive_of(line.split(';').next().unwrap_or("")) == Some(Directive::Molecules) {
                for name in topology.molecule_types() {
                    writeln!(writer, "{:<5} {}", name, topology.molecules_named(name).count())?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}
