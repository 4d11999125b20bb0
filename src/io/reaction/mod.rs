//! Reaction template files.
//!
//! A file is split into `[directive]` sections; `#` starts a comment and
//! blank lines are ignored. Molecule and atom numbers are 1-based in the
//! file and 0-based in [`ReactionTemplate`](crate::reaction::ReactionTemplate).

mod example;
mod reader;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::io::error::Error;
use crate::reaction::ReactionTemplate;

pub use example::example_reaction_file;
pub use reader::read;

/// Reads and consistency-checks the template stored at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ReactionTemplate, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let template = read(BufReader::new(file))?;
    template.consistency_check().map_err(|source| Error::Template {
        path: path.display().to_string(),
        source,
    })?;
    Ok(template)
}
