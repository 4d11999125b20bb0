use tracing_subscriber::EnvFilter;

use crate::cli::LogOptions;
use crate::display::Context;

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the
/// level chosen from the command line.
pub fn init(opts: &LogOptions, ctx: Context) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rsmd={}", default_level(opts, ctx))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ctx.interactive)
        .init();
}

// progress bars report cycles on a terminal, so only warnings interrupt them
fn default_level(opts: &LogOptions, ctx: Context) -> &'static str {
    if opts.quiet {
        return "error";
    }
    let base = if ctx.interactive { 0 } else { 1 };
    match base + opts.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
