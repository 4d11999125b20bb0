use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use rsmd::engine::{NullSink, StatisticsSink, TableWriter};
use rsmd::io::{CommandEngine, GroStore, reaction};
use rsmd::{AcceptanceEngine, ReactionTemplate, RunConfig, Simulator};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::display::{
    Context as DisplayContext, CycleProgress, Progress, print_run_settings, print_run_summary,
    print_templates,
};

const TOTAL_STEPS: u8 = 3;

// conventional status for termination by SIGINT
const INTERRUPT_EXIT: i32 = 130;

pub fn run_simulation(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading configuration");
    let config = load_config(&args)?;
    let (first, last) = config.start();
    progress.complete_step(
        "Loading configuration",
        &[&*args.config.to_string_lossy()],
    );

    progress.step("Reading reaction templates");
    let templates = load_templates(&config)?;
    let names: Vec<String> = templates.iter().map(|t| t.name.clone()).collect();
    let names_ref: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Reading reaction templates", &names_ref);

    progress.step("Preparing collaborators");
    let stats = open_statistics(&config, first, &names_ref)?;
    let shutdown = install_shutdown_handler()?;
    let store = GroStore::new(&config.engine.workdir, config.engine.files.clone());
    let md = CommandEngine::new(&config.engine.workdir, config.engine.commands.clone());
    let acceptance = AcceptanceEngine::seeded(
        config.reaction.frequency,
        templates.len(),
        config.simulation.seed,
    );
    progress.complete_step(
        "Preparing collaborators",
        &[
            format!("Snapshots in {}", config.engine.workdir.display()).as_str(),
            if first > 1 { "Restarting" } else { "Fresh run" },
        ],
    );

    if ctx.interactive {
        print_templates(&templates);
        print_run_settings(&config, first, templates.len());
    }

    let mut simulator = Simulator::new(config.engine_config(), templates, store, md, stats, acceptance);
    if first > 1 {
        simulator = simulator.starting_at(first, last);
    }

    let mut cycles = CycleProgress::new(ctx.interactive, first, config.simulation.cycles);
    let result = simulator.run(&shutdown, |report| cycles.observe(report));
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            cycles.finish(true);
            return Err(e).with_context(|| format!("Run stopped in cycle {}", simulator.current_cycle()));
        }
    };
    cycles.finish(summary.interrupted);

    if summary.interrupted {
        write_restart(&config, &args.restart_file, summary.next_cycle, summary.last_reactive_cycle)?;
    }
    if ctx.interactive {
        print_run_summary(&summary);
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = RunConfig::load(&args.config)
        .with_context(|| format!("Failed to load run configuration '{}'", args.config.display()))?;

    if let Some(cycles) = args.cycles {
        config.simulation.cycles = cycles;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(frequency) = args.frequency {
        config.reaction.frequency = frequency;
    }
    if let Some(path) = &args.statistics {
        config.simulation.statistics = Some(path.clone());
    }
    config.validate().context("Invalid command line override")?;
    Ok(config)
}

fn load_templates(config: &RunConfig) -> Result<Vec<ReactionTemplate>> {
    if config.reaction.files.is_empty() {
        bail!("No reaction files configured under [reaction] files");
    }
    config
        .reaction
        .files
        .iter()
        .map(|path| {
            reaction::load(path)
                .with_context(|| format!("Failed to load reaction file '{}'", path.display()))
        })
        .collect()
}

/// Opens the statistics table; a restarted run appends to an existing one.
fn open_statistics(
    config: &RunConfig,
    first: usize,
    names: &[&str],
) -> Result<Box<dyn StatisticsSink>> {
    let Some(path) = &config.simulation.statistics else {
        return Ok(Box::new(NullSink));
    };

    if first > 1 && path.exists() {
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open statistics '{}'", path.display()))?;
        return Ok(Box::new(TableWriter::without_header(BufWriter::new(file))));
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create statistics '{}'", path.display()))?;
    let table = TableWriter::new(BufWriter::new(file), names)
        .with_context(|| format!("Failed to write statistics header to '{}'", path.display()))?;
    Ok(Box::new(table))
}

fn install_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let requested = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&requested);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            warn!("second interrupt, exiting without a restart file");
            std::process::exit(INTERRUPT_EXIT);
        }
        warn!("shutdown requested, the current cycle will be finished");
    })
    .context("Failed to install the interrupt handler")?;
    Ok(requested)
}

fn write_restart(config: &RunConfig, path: &Path, cycle: usize, last: usize) -> Result<()> {
    let text = config.restart_at(cycle, last).to_toml()?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write restart configuration '{}'", path.display()))?;
    info!(path = %path.display(), cycle, last, "restart configuration written");
    Ok(())
}
