use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::Error;
use super::top::TopFile;
use super::{expand, gro, ndx, top};
use crate::engine::{self, TopologyStore};
use crate::model::topology::Topology;

/// File name patterns of the snapshots, relative to the working directory.
///
/// `{cycle}` is replaced by the cycle number. The MD snapshot is addressed
/// by the last reactive cycle, since trajectories are named after the cycle
/// they started from. An empty pattern disables an optional file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotFiles {
    pub coordinates: String,
    pub reacted: String,
    pub relaxed: String,
    /// GROMACS topology accompanying each snapshot. Its molecule table is
    /// checked on read and rewritten on write.
    pub topology: String,
    /// Index groups of reacted atoms written next to the reacted snapshot.
    pub reactant_index: String,
    pub product_index: String,
}

impl Default for SnapshotFiles {
    fn default() -> Self {
        Self {
            coordinates: "{cycle}-md.gro".into(),
            reacted: "{cycle}-rs.gro".into(),
            relaxed: "{cycle}-rs.gro".into(),
            topology: "{cycle}.top".into(),
            reactant_index: "{cycle}.reactants.ndx".into(),
            product_index: "{cycle}.products.ndx".into(),
        }
    }
}

fn enabled(pattern: &str) -> Option<&str> {
    (!pattern.is_empty()).then_some(pattern)
}

/// Snapshot persistence over GRO coordinate files.
#[derive(Debug)]
pub struct GroStore {
    dir: PathBuf,
    files: SnapshotFiles,
    title: String,
    top: Option<TopFile>,
}

impl GroStore {
    pub fn new(dir: impl Into<PathBuf>, files: SnapshotFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
            title: String::from("rsmd"),
            top: None,
        }
    }

    pub fn path(&self, pattern: &str, cycle: usize) -> PathBuf {
        self.dir.join(expand(pattern, cycle, cycle))
    }

    fn read_snapshot(&mut self, pattern: &str, cycle: usize) -> Result<Topology, Error> {
        let path = self.path(pattern, cycle);
        debug!(path = %path.display(), "reading snapshot");
        let file = File::open(&path).map_err(|e| Error::open(&path, e))?;
        let (title, topology) = gro::read_with_title(BufReader::new(file))?;
        if !title.is_empty() {
            self.title = title;
        }
        self.check_top(cycle, &topology)?;
        Ok(topology)
    }

    fn check_top(&mut self, cycle: usize, topology: &Topology) -> Result<(), Error> {
        let Some(pattern) = enabled(&self.files.topology) else {
            return Ok(());
        };
        let path = self.path(pattern, cycle);
        let file = File::open(&path).map_err(|e| Error::open(&path, e))?;
        let top = top::read(BufReader::new(file))?;
        for (name, declared, found) in top.mismatches(topology) {
            warn!(
                path = %path.display(),
                molecule = %name,
                declared,
                found,
                "topology and coordinates disagree on molecule count"
            );
        }
        self.top = Some(top);
        Ok(())
    }

    fn create(&self, pattern: &str, cycle: usize) -> Result<BufWriter<File>, Error> {
        let path = self.path(pattern, cycle);
        debug!(path = %path.display(), "writing");
        let file = File::create(&path).map_err(|e| Error::open(&path, e))?;
        Ok(BufWriter::new(file))
    }

    fn write_snapshot(&self, topology: &Topology, cycle: usize) -> Result<(), Error> {
        gro::write(self.create(&self.files.reacted, cycle)?, topology, &self.title)?;

        if let (Some(pattern), Some(top)) = (enabled(&self.files.topology), &self.top) {
            top.write(self.create(pattern, cycle)?, topology)?;
        }
        if let (Some(reactants), Some(products)) = (
            enabled(&self.files.reactant_index),
            enabled(&self.files.product_index),
        ) {
            ndx::write(
                self.create(reactants, cycle)?,
                self.create(products, cycle)?,
                topology,
            )?;
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TopologyStore for GroStore {
    fn read(&mut self, last_reactive_cycle: usize) -> Result<Topology, engine::Error> {
        let pattern = self.files.coordinates.clone();
        Ok(self.read_snapshot(&pattern, last_reactive_cycle)?)
    }

    fn read_relaxed(&mut self, cycle: usize) -> Result<Topology, engine::Error> {
        let pattern = self.files.relaxed.clone();
        Ok(self.read_snapshot(&pattern, cycle)?)
    }

    fn write(&mut self, topology: &Topology, cycle: usize) -> Result<(), engine::Error> {
        Ok(self.write_snapshot(topology, cycle)?)
    }
}
