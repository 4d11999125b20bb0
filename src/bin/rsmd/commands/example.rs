use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use rsmd::io::reaction::example_reaction_file;

use crate::cli::ExampleArgs;

pub fn run_example(args: ExampleArgs) -> Result<()> {
    let text = example_reaction_file();
    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write example to '{}'", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
