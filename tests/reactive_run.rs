use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rsmd::engine::{CycleStatistics, NullSink};
use rsmd::io::{CommandEngine, GroStore};
use rsmd::{AcceptanceEngine, Atom, CycleReport, Molecule, ReactionTemplate, RunConfig, Simulator, Topology};

const DIMERIZATION: &str = "\
[name]
dimerization

[reactants]
1 MON C1 1
2 MON C1 1

[products]
1 DIM C1 1 1 1
1 DIM C2 2 2 1

[criteria]
dist 1 1 2 1 0.0 0.5

[rate]
0.0 1.0
";

const CONFIG: &str = r#"
[simulation]
cycles = 3
seed = 11

[reaction]
frequency = 1.0

[engine.commands]
initial = "touch initial.done"
md = "cp {cycle}-rs.gro {cycle}-md.gro && echo md {cycle} >> md.log"
md_appending = "echo append {cycle} {last} >> md.log"
relaxation = "test -s {cycle}-rs.gro"
"#;

fn monomer(id: usize, position: [f64; 3]) -> Molecule {
    Molecule::with_atoms(id, "MON", vec![Atom::new(id, "C1", position)])
}

fn write_initial_snapshot(dir: &Path) {
    let mut topology = Topology::new([4.0; 3], [1, 1, 1]);
    topology.add_molecule(monomer(1, [1.0, 1.0, 1.0]));
    topology.add_molecule(monomer(2, [1.3, 1.0, 1.0]));
    topology.add_molecule(monomer(3, [3.0, 1.0, 3.0]));
    topology.add_molecule(monomer(4, [3.3, 1.0, 3.0]));

    let file = BufWriter::new(File::create(dir.join("0-md.gro")).unwrap());
    rsmd::io::gro::write(file, &topology, "monomers").unwrap();
    fs::write(
        dir.join("0.top"),
        "[ system ]\nmonomers\n\n[ molecules ]\nMON 4\n",
    )
    .unwrap();
}

fn load_templates() -> Vec<ReactionTemplate> {
    let template = rsmd::io::reaction::read(DIMERIZATION.as_bytes()).unwrap();
    template.consistency_check().unwrap();
    vec![template]
}

fn make_config(dir: &Path) -> RunConfig {
    let mut config = RunConfig::from_toml(CONFIG).unwrap();
    config.engine.workdir = dir.to_path_buf();
    config
}

fn make_simulator(
    config: &RunConfig,
) -> Simulator<GroStore, CommandEngine, Vec<CycleStatistics>> {
    let store = GroStore::new(&config.engine.workdir, config.engine.files.clone());
    let md = CommandEngine::new(&config.engine.workdir, config.engine.commands.clone());
    let acceptance = AcceptanceEngine::seeded(config.reaction.frequency, 1, config.simulation.seed);
    Simulator::new(config.engine_config(), load_templates(), store, md, Vec::new(), acceptance)
}

#[test]
fn monomers_dimerize_in_the_first_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_initial_snapshot(dir.path());
    let config = make_config(dir.path());
    let mut simulator = make_simulator(&config);

    let mut reports: Vec<CycleReport> = Vec::new();
    let summary = simulator
        .run(&AtomicBool::new(false), |report| reports.push(report.clone()))
        .unwrap();

    assert_eq!(summary.cycles_completed, 3);
    assert_eq!(summary.cycles_with_reaction, 1);
    assert_eq!(summary.cycles_without_reaction, 2);
    assert_eq!(summary.last_reactive_cycle, 1);
    assert_eq!(summary.next_cycle, 4);
    assert!(!summary.interrupted);

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].statistics.candidates, 2);
    assert_eq!(reports[0].statistics.accepted, vec![2]);
    assert_eq!(reports[0].reactions.len(), 2);
    assert_eq!(reports[0].anomalies(), 0);
    assert_eq!(reports[1].statistics.candidates, 0);
    assert!(!reports[2].reacted());

    let dimers = rsmd::io::gro::read(File::open(dir.path().join("1-md.gro")).map(std::io::BufReader::new).unwrap()).unwrap();
    assert_eq!(dimers.molecule_count(), 2);
    assert!(dimers.iter().all(|m| m.name == "DIM" && m.atom_count() == 2));
    assert_eq!(dimers.atom_count(), 4);

    let top = fs::read_to_string(dir.path().join("1.top")).unwrap();
    assert!(top.contains("[ molecules ]\nDIM   2\n"));
    assert!(dir.path().join("1.reactants.ndx").exists());
    assert!(dir.path().join("initial.done").exists());

    let log = fs::read_to_string(dir.path().join("md.log")).unwrap();
    assert_eq!(log, "md 1\nappend 2 1\nappend 3 1\n");
}

#[test]
fn interrupted_run_resumes_from_restart_configuration() {
    let dir = tempfile::tempdir().unwrap();
    write_initial_snapshot(dir.path());
    let config = make_config(dir.path());

    let shutdown = AtomicBool::new(false);
    let summary = make_simulator(&config)
        .run(&shutdown, |_| shutdown.store(true, Ordering::SeqCst))
        .unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.cycles_completed, 1);
    assert_eq!((summary.next_cycle, summary.last_reactive_cycle), (2, 1));

    let restart = config
        .restart_at(summary.next_cycle, summary.last_reactive_cycle)
        .to_toml()
        .unwrap();
    let resumed = RunConfig::from_toml(&restart).unwrap();
    let (first, last) = resumed.start();

    fs::remove_file(dir.path().join("initial.done")).unwrap();
    let summary = make_simulator(&resumed)
        .starting_at(first, last)
        .run(&AtomicBool::new(false), |_| {})
        .unwrap();

    assert_eq!(summary.cycles_completed, 2);
    assert_eq!(summary.cycles_without_reaction, 2);
    assert_eq!(summary.next_cycle, 4);
    assert!(!dir.path().join("initial.done").exists());
    let log = fs::read_to_string(dir.path().join("md.log")).unwrap();
    assert_eq!(log, "md 1\nappend 2 1\nappend 3 1\n");
}

#[test]
fn failed_relaxation_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_initial_snapshot(dir.path());
    let mut config = make_config(dir.path());
    config.engine.commands.relaxation = Some("exit 1".into());

    let store = GroStore::new(dir.path(), config.engine.files.clone());
    let md = CommandEngine::new(dir.path(), config.engine.commands.clone());
    let acceptance = AcceptanceEngine::seeded(1.0, 1, 5);
    let mut simulator = Simulator::new(config.engine_config(), load_templates(), store, md, NullSink, acceptance);

    let err = simulator.run(&AtomicBool::new(false), |_| {}).unwrap_err();
    assert!(err.is_fatal());
    assert!(!dir.path().join("1-md.gro").exists());
}
