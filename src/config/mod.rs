//! Run configuration loaded from TOML.
//!
//! ```toml
//! [simulation]
//! cycles = 100
//! seed = 42
//! cell_counts = [3, 3, 3]
//! statistics = "statistics.dat"
//!
//! [reaction]
//! files = ["dimerization.rsmd"]
//! frequency = 0.5
//!
//! [engine]
//! workdir = "run"
//!
//! [engine.commands]
//! md = "gmx mdrun -deffnm {cycle}-md"
//! md_appending = "gmx mdrun -deffnm {last}-md -append"
//! relaxation = "gmx mdrun -deffnm {cycle}-rs"
//! ```
//!
//! Every field has a default. Relative paths are resolved against the
//! directory of the configuration file by [`RunConfig::load`].

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, NeighborWrap};
use crate::io::{Commands, SnapshotFiles};

pub use error::Error;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub simulation: SimulationSection,
    pub reaction: ReactionSection,
    pub engine: EngineSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Last cycle to run.
    #[serde(default = "default_cycles")]
    pub cycles: usize,
    #[serde(default)]
    pub restart: bool,
    /// Cycle to resume at.
    #[serde(default)]
    pub restart_cycle: Option<usize>,
    /// Last reactive cycle before the restart, which names the MD files to
    /// continue from.
    #[serde(default)]
    pub restart_cycle_files: Option<usize>,
    /// Seed of the random source; 0 draws one from the operating system.
    #[serde(default)]
    pub seed: u64,
    /// Path of the statistics table.
    #[serde(default)]
    pub statistics: Option<PathBuf>,
    #[serde(default = "default_cell_counts")]
    pub cell_counts: [usize; 3],
    #[serde(default)]
    pub neighbor_wrap: NeighborWrap,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReactionSection {
    /// Reaction template files, in template order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Directory holding the snapshots, where MD commands are run.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
    #[serde(default)]
    pub commands: Commands,
    #[serde(default)]
    pub files: SnapshotFiles,
}

fn default_cycles() -> usize {
    1
}
fn default_cell_counts() -> [usize; 3] {
    [1, 1, 1]
}
fn default_frequency() -> f64 {
    1.0
}
fn default_workdir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            restart: false,
            restart_cycle: None,
            restart_cycle_files: None,
            seed: 0,
            statistics: None,
            cell_counts: default_cell_counts(),
            neighbor_wrap: NeighborWrap::default(),
        }
    }
}

impl Default for ReactionSection {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            frequency: default_frequency(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            commands: Commands::default(),
            files: SnapshotFiles::default(),
        }
    }
}

impl RunConfig {
    /// Parses and validates a configuration. Paths are kept as written.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file and resolves its relative paths against
    /// the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.reaction.files.iter_mut().for_each(resolve);
        if let Some(statistics) = self.simulation.statistics.as_mut() {
            resolve(statistics);
        }
        resolve(&mut self.engine.workdir);
    }

    pub fn validate(&self) -> Result<(), Error> {
        let sim = &self.simulation;
        if sim.cell_counts.contains(&0) {
            return Err(Error::invalid(format!(
                "cell_counts must be at least 1 along every axis, got {:?}",
                sim.cell_counts
            )));
        }
        if !self.reaction.frequency.is_finite() || self.reaction.frequency < 0.0 {
            return Err(Error::invalid(format!(
                "frequency must be a non-negative number, got {}",
                self.reaction.frequency
            )));
        }
        if sim.restart {
            let (Some(cycle), Some(files)) = (sim.restart_cycle, sim.restart_cycle_files) else {
                return Err(Error::invalid(
                    "restart requires both restart_cycle and restart_cycle_files",
                ));
            };
            if cycle == 0 || files >= cycle {
                return Err(Error::invalid(format!(
                    "restart_cycle_files ({files}) must be below restart_cycle ({cycle}), and restart_cycle at least 1"
                )));
            }
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cycles: self.simulation.cycles,
            frequency: self.reaction.frequency,
            cell_counts: self.simulation.cell_counts,
            neighbor_wrap: self.simulation.neighbor_wrap,
        }
    }

    /// First cycle to run and the last reactive cycle before it.
    pub fn start(&self) -> (usize, usize) {
        match (
            self.simulation.restart,
            self.simulation.restart_cycle,
            self.simulation.restart_cycle_files,
        ) {
            (true, Some(cycle), Some(files)) => (cycle, files),
            _ => (1, 0),
        }
    }

    /// This configuration set to resume at `cycle` with `last` as the last
    /// reactive cycle.
    pub fn restart_at(&self, cycle: usize, last: usize) -> Self {
        let mut config = self.clone();
        config.simulation.restart = true;
        config.simulation.restart_cycle = Some(cycle);
        config.simulation.restart_cycle_files = Some(last);
        config
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }
}
