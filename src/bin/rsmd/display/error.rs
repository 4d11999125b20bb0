use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let title = if crate::is_fatal(err) { "✗ Fatal error" } else { "✗ Error" };

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  {:<59} ║", title);
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self {
            hints: Vec::new(),
            has_typed_hints: false,
        };

        // engine errors wrap io errors, so the outermost typed error wins
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<rsmd::engine::Error>() {
                collector.collect_engine_hints(e);
            } else if let Some(e) = cause.downcast_ref::<rsmd::io::Error>() {
                collector.collect_io_hints(e);
            } else if let Some(e) = cause.downcast_ref::<rsmd::reaction::Error>() {
                collector.collect_reaction_hints(e);
            } else if let Some(e) = cause.downcast_ref::<rsmd::config::Error>() {
                collector.collect_config_hints(e);
            }
            if collector.has_typed_hints {
                break;
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_engine_hints(&mut self, err: &rsmd::engine::Error) {
        use rsmd::engine::Error as EngineError;

        match err {
            EngineError::RelaxationFailed { cycle } => {
                self.mark_typed();
                self.add(format!("The relaxation command of cycle {cycle} exited with an error"));
                self.add("Inspect the MD engine log of the reacted snapshot");
                self.add("Products placed too close to neighbours often blow up; check the translations");
                self.add("The on-disk state is not resumable from this cycle");
            }

            EngineError::MoleculeNotFound { .. } | EngineError::RecordNotFound { .. } => {
                self.mark_typed();
                self.add("The snapshot lost track of a reacted molecule");
                self.add("Check that the relaxation writes every molecule back in order");
                self.add("Please report this if the input files are consistent");
            }

            EngineError::InvalidGrid(_) => {
                self.mark_typed();
                self.add("Set cell_counts in [simulation] to at least 1 per axis");
                self.add("Check the box line at the end of the GRO snapshot");
            }

            EngineError::MdEngine { step, .. } => {
                self.mark_typed();
                self.add(format!("The '{step}' command failed"));
                self.add("Run the command by hand in the working directory to see its output");
                self.add(format!("Set it under [engine.commands] as '{step}'"));
            }

            EngineError::Statistics(source) => {
                self.mark_typed();
                self.add("The statistics table could not be written");
                self.collect_std_io_hints(source);
            }

            // fall through to the wrapped error
            EngineError::Reaction(_) | EngineError::Persistence(_) => {}
        }
    }

    fn collect_io_hints(&mut self, err: &rsmd::io::Error) {
        use rsmd::io::{Error as IoError, Format};

        self.mark_typed();

        match err {
            IoError::Io { source } | IoError::Open { source, .. } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} format",
                    line, format
                ));
                self.add("Inspect the file around that line for malformed entries");
                match format {
                    Format::Gro => {
                        self.add("GRO: coordinates are fixed-width, 8 columns each starting at column 21");
                        self.add("GRO: the atom count on line 2 must match the atom lines");
                    }
                    Format::Top => {
                        self.add("TOP: [ molecules ] lines are 'name count'");
                    }
                    Format::Reaction => {
                        self.add("Molecule and atom numbers in reaction files start at 1");
                        self.add("Run 'rsmd example' for an annotated reaction file");
                    }
                }
            }

            IoError::Template { source, .. } => {
                self.collect_reaction_hints(source);
            }
        }
    }

    fn collect_reaction_hints(&mut self, err: &rsmd::reaction::Error) {
        use rsmd::reaction::Error as ReactionError;

        self.mark_typed();

        match err {
            ReactionError::NoReactants { .. } | ReactionError::NoProducts { .. } => {
                self.add("Every reaction needs [reactants] and [products] sections");
            }

            ReactionError::UnsupportedReactantCount { count, .. } => {
                self.add(format!("{count} reactant molecules were declared"));
                self.add("Split the reaction into steps with 2 to 4 reactants each");
            }

            ReactionError::MissingAtom { directive, .. } => {
                self.add(format!("Check the atom numbers in [{directive}]"));
                self.add("Atoms are numbered within their molecule, starting at 1");
            }

            ReactionError::InvertedThresholds { .. } => {
                self.add("Criteria are written 'kind atoms... min max'");
            }

            ReactionError::CriterionArity { .. } => {
                self.add("dist takes 2 atoms, ang takes 3 and dih takes 4");
            }

            ReactionError::AtomOutOfRange { .. } => {
                self.add("A reactant template has more atoms than the molecule it matched");
                self.add("Check that the reactant names match the residue names of the snapshot");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &rsmd::config::Error) {
        use rsmd::config::Error as ConfigError;

        self.mark_typed();

        match err {
            ConfigError::Io { source, .. } => self.collect_std_io_hints(source),
            ConfigError::Parse(_) => {
                self.add("The run configuration has invalid TOML or an unknown key");
                self.add("Sections are [simulation], [reaction] and [engine]");
            }
            ConfigError::Serialize(_) => {
                self.add("The restart configuration could not be rendered");
            }
            ConfigError::Invalid(_) => {
                self.add("Fix the reported value in the run configuration");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Relative paths in the configuration are resolved against its directory");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no reaction") {
            self.add("List reaction files under [reaction] files");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
