use std::process::ExitCode;

mod cli;
mod commands;
mod display;
mod io;
mod logging;
mod util;

/// Exit status after a structural failure that leaves the run unrecoverable.
const FATAL_EXIT: u8 = 70;

fn main() -> ExitCode {
    let cli = cli::parse();
    let ctx = display::Context::detect().with_quiet(cli.log.quiet);

    logging::init(&cli.log, ctx);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            if is_fatal(&e) {
                ExitCode::from(FATAL_EXIT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<rsmd::engine::Error>())
        .any(|e| e.is_fatal())
}
