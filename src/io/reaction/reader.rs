use crate::io::{Format, error::Error};
use crate::model::atom::Atom;
use crate::reaction::{AtomRef, Criterion, CriterionKind, ReactionTemplate};
use std::io::BufRead;
use std::str::SplitWhitespace;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Name,
    Reactants,
    Products,
    Criteria,
    Translations,
    Energy,
    Activation,
    Rate,
    Unknown,
}

impl Directive {
    fn from_name(name: &str) -> Self {
        match name {
            "name" => Directive::Name,
            "reactants" => Directive::Reactants,
            "products" => Directive::Products,
            "criteria" => Directive::Criteria,
            "translations" => Directive::Translations,
            "energy" => Directive::Energy,
            "activation" => Directive::Activation,
            "rate" => Directive::Rate,
            _ => Directive::Unknown,
        }
    }
}

/// Parses a reaction file without checking the template's consistency.
pub fn read<R: BufRead>(reader: R) -> Result<ReactionTemplate, Error> {
    let lines = collect_lines(reader)?;

    let mut template = ReactionTemplate::default();
    let mut rate = Vec::new();
    let mut directive: Option<Directive> = None;

    for (ln, raw) in &lines {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        if let Some(start) = content.find('[') {
            let end = content
                .find(']')
                .ok_or_else(|| Error::parse(Format::Reaction, *ln, "missing closing ']' of directive"))?;
            let name = content.get(start + 1..end).unwrap_or("").trim();
            let parsed = Directive::from_name(name);
            if parsed == Directive::Unknown {
                warn!(line = *ln, directive = name, "ignoring unknown directive");
            }
            directive = Some(parsed);
            continue;
        }

        let mut fields = Fields::new(content, *ln);
        match directive {
            Some(Directive::Name) => template.name = content.to_string(),
            Some(Directive::Reactants) => {
                let molecule = fields.index("molecule number")?;
                let name = fields.word("molecule name")?;
                let atom_name = fields.word("atom name")?;
                let atom = fields.index("atom number")?;
                template
                    .get_or_add_reactant(molecule + 1, name)
                    .add_atom(Atom::new(atom + 1, atom_name, [0.0; 3]));
            }
            Some(Directive::Products) => {
                let molecule = fields.index("molecule number")?;
                let name = fields.word("molecule name")?;
                let atom_name = fields.word("atom name")?;
                let atom = fields.index("atom number")?;
                let from_molecule = fields.index("origin molecule number")?;
                let from_atom = fields.index("origin atom number")?;
                template
                    .get_or_add_product(molecule + 1, name)
                    .add_atom(Atom::new(atom + 1, atom_name, [0.0; 3]));
                template.add_transition(
                    AtomRef::new(from_molecule, from_atom),
                    AtomRef::new(molecule, atom),
                );
            }
            Some(Directive::Criteria) => {
                let keyword = fields.word("criterion type")?;
                let kind = CriterionKind::from_keyword(keyword).ok_or_else(|| {
                    Error::parse(
                        Format::Reaction,
                        *ln,
                        format!("unknown criterion type '{keyword}', expected dist, ang or dih"),
                    )
                })?;
                let atoms = (0..kind.arity())
                    .map(|_| fields.atom_ref())
                    .collect::<Result<Vec<_>, _>>()?;
                let min = fields.number("minimum value")?;
                let max = fields.number("maximum value")?;
                let criterion = Criterion::new(kind, atoms, min, max)
                    .map_err(|e| Error::parse(Format::Reaction, *ln, e.to_string()))?;
                template.add_criterion(criterion);
            }
            Some(Directive::Translations) => {
                let atom = fields.atom_ref()?;
                let towards = fields.atom_ref()?;
                let value = fields.number("translation value")?;
                template.add_translation(atom, towards, value);
            }
            Some(Directive::Energy) => template.reaction_energy = fields.number("reaction energy")?,
            Some(Directive::Activation) => {
                template.activation_energy = fields.number("activation energy")?
            }
            Some(Directive::Rate) => {
                let distance = fields.number("rate distance")?;
                let value = fields.number("rate value")?;
                rate.push((distance, value));
            }
            Some(Directive::Unknown) => {}
            None => {
                return Err(Error::parse(
                    Format::Reaction,
                    *ln,
                    "content before the first directive",
                ));
            }
        }
    }

    template.set_rate(rate);
    Ok(template)
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| {
            line.map(|v| (i + 1, v))
                .map_err(|e| Error::Io { source: e })
        })
        .collect()
}

struct Fields<'a> {
    parts: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(content: &'a str, line: usize) -> Self {
        Self {
            parts: content.split_whitespace(),
            line,
        }
    }

    fn word(&mut self, what: &str) -> Result<&'a str, Error> {
        self.parts
            .next()
            .ok_or_else(|| Error::parse(Format::Reaction, self.line, format!("missing {what}")))
    }

    fn number(&mut self, what: &str) -> Result<f64, Error> {
        let word = self.word(what)?;
        word.parse::<f64>()
            .map_err(|_| Error::parse(Format::Reaction, self.line, format!("invalid {what} '{word}'")))
    }

    /// Reads a 1-based number and returns it as a 0-based index.
    fn index(&mut self, what: &str) -> Result<usize, Error> {
        let word = self.word(what)?;
        word.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| {
                Error::parse(
                    Format::Reaction,
                    self.line,
                    format!("invalid {what} '{word}', numbers start at 1"),
                )
            })
    }

    fn atom_ref(&mut self) -> Result<AtomRef, Error> {
        let molecule = self.index("molecule number")?;
        let atom = self.index("atom number")?;
        Ok(AtomRef::new(molecule, atom))
    }
}
