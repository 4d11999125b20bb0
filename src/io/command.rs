use std::path::PathBuf;
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::expand;
use crate::engine::{Error, MdEngine};

/// Shell commands that drive the external MD engine.
///
/// Each command is run through `sh -c` in the working directory after
/// `{cycle}`, `{last}` and `{previous}` are substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Commands {
    pub initial: Option<String>,
    pub md: Option<String>,
    pub md_appending: Option<String>,
    pub relaxation: Option<String>,
}

/// [`MdEngine`] that runs configured shell commands.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    dir: PathBuf,
    commands: Commands,
}

impl CommandEngine {
    pub fn new(dir: impl Into<PathBuf>, commands: Commands) -> Self {
        Self {
            dir: dir.into(),
            commands,
        }
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    fn spawn(&self, step: &'static str, template: Option<&str>, cycle: usize, last: usize) -> Result<Output, Error> {
        let template = template.ok_or_else(|| Error::md_engine(step, cycle, "no command configured"))?;
        let line = expand(template, cycle, last);
        info!(step, cycle, command = %line, "running MD engine");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&line)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| Error::md_engine(step, cycle, format!("couldn't start '{line}': {e}")))?;
        debug!(step, cycle, status = %output.status, "MD engine finished");
        Ok(output)
    }

    fn run(&self, step: &'static str, template: Option<&str>, cycle: usize, last: usize) -> Result<(), Error> {
        let output = self.spawn(step, template, cycle, last)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::md_engine(step, cycle, failure_details(&output)))
        }
    }
}

fn failure_details(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(line) => format!("{} ({})", output.status, line.trim()),
        None => output.status.to_string(),
    }
}

impl MdEngine for CommandEngine {
    fn run_initial(&mut self) -> Result<(), Error> {
        self.run("initial", self.commands.initial.as_deref(), 0, 0)
    }

    fn run_md(&mut self, cycle: usize) -> Result<(), Error> {
        self.run("md", self.commands.md.as_deref(), cycle, cycle)
    }

    fn run_md_appending(&mut self, cycle: usize, last: usize) -> Result<(), Error> {
        self.run("md_appending", self.commands.md_appending.as_deref(), cycle, last)
    }

    fn run_relaxation(&mut self, cycle: usize) -> Result<bool, Error> {
        let output = self.spawn("relaxation", self.commands.relaxation.as_deref(), cycle, cycle)?;
        if !output.status.success() {
            warn!(cycle, details = %failure_details(&output), "relaxation command failed");
        }
        Ok(output.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_engine(dir: &std::path::Path, commands: Commands) -> CommandEngine {
        CommandEngine::new(dir, commands)
    }

    #[test]
    fn commands_run_in_workdir_with_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = make_engine(
            dir.path(),
            Commands {
                md_appending: Some("echo {cycle} {last} {previous} > appended.txt".into()),
                ..Default::default()
            },
        );
        engine.run_md_appending(5, 2).unwrap();
        let text = fs::read_to_string(dir.path().join("appended.txt")).unwrap();
        assert_eq!(text.trim(), "5 2 4");
    }

    #[test]
    fn failing_md_is_an_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = make_engine(
            dir.path(),
            Commands {
                md: Some("echo boom >&2; exit 3".into()),
                ..Default::default()
            },
        );
        let err = engine.run_md(1).unwrap_err();
        assert!(matches!(err, Error::MdEngine { step: "md", cycle: 1, .. }));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn failing_relaxation_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = make_engine(
            dir.path(),
            Commands {
                relaxation: Some("test {cycle} -eq 2".into()),
                ..Default::default()
            },
        );
        assert!(engine.run_relaxation(2).unwrap());
        assert!(!engine.run_relaxation(3).unwrap());
    }

    #[test]
    fn missing_command_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = make_engine(dir.path(), Commands::default());
        let err = engine.run_initial().unwrap_err();
        assert!(err.to_string().contains("no command configured"));
    }
}
