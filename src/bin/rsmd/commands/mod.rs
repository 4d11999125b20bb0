mod check;
mod example;
mod run;

use check::run_check;
use example::run_example;
use run::run_simulation;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Run(args) => run_simulation(args, ctx),
        Command::Check(args) => run_check(args, ctx),
        Command::Example(args) => run_example(args),
    }
}
