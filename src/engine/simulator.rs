use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, instrument};

use super::acceptance::AcceptanceEngine;
use super::apply::{ReactionOutcome, react};
use super::cell_list::SpatialIndex;
use super::config::EngineConfig;
use super::error::Error;
use super::movement::{Displacement, MovementValidator, Severity};
use super::ports::{MdEngine, TopologyStore};
use super::search::find_candidates;
use super::shuffle::weighted_shuffle;
use super::stats::{CycleStatistics, StatisticsSink};
use crate::reaction::ReactionTemplate;

/// What happened in one reactive cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub statistics: CycleStatistics,
    pub reactions: Vec<ReactionOutcome>,
    /// Displacements of reacted atoms during relaxation. Empty when nothing
    /// reacted.
    pub displacements: Vec<Displacement>,
}

impl CycleReport {
    #[inline]
    pub fn cycle(&self) -> usize {
        self.statistics.cycle
    }

    #[inline]
    pub fn reacted(&self) -> bool {
        !self.reactions.is_empty()
    }

    /// Number of displacements classified as medium or high.
    pub fn anomalies(&self) -> usize {
        self.displacements
            .iter()
            .filter(|d| d.severity > Severity::Info)
            .count()
    }
}

/// Totals of a finished or interrupted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub cycles_completed: usize,
    pub cycles_with_reaction: usize,
    pub cycles_without_reaction: usize,
    /// Cycle the run would continue with.
    pub next_cycle: usize,
    pub last_reactive_cycle: usize,
    pub interrupted: bool,
}

/// Alternates reactive steps with molecular dynamics.
///
/// Each cycle reads the current MD snapshot (*old*), searches reaction
/// candidates on it, and applies accepted ones to a working copy (*new*).
/// If anything reacted, *new* is written, relaxed by the MD engine and read
/// back (*relaxed*) for the displacement check. The MD sequence of the cycle
/// then starts a fresh trajectory after a reaction, or extends the running
/// one otherwise.
pub struct Simulator<S, M, W, R = StdRng> {
    config: EngineConfig,
    templates: Vec<ReactionTemplate>,
    store: S,
    md: M,
    stats: W,
    acceptance: AcceptanceEngine<R>,
    current_cycle: usize,
    last_reactive_cycle: usize,
    cycles_completed: usize,
    cycles_with_reaction: usize,
    cycles_without_reaction: usize,
}

impl<S, M, W, R> Simulator<S, M, W, R>
where
    S: TopologyStore,
    M: MdEngine,
    W: StatisticsSink,
    R: Rng,
{
    pub fn new(
        config: EngineConfig,
        templates: Vec<ReactionTemplate>,
        store: S,
        md: M,
        stats: W,
        acceptance: AcceptanceEngine<R>,
    ) -> Self {
        Self {
            config,
            templates,
            store,
            md,
            stats,
            acceptance,
            current_cycle: 1,
            last_reactive_cycle: 0,
            cycles_completed: 0,
            cycles_with_reaction: 0,
            cycles_without_reaction: 0,
        }
    }

    /// Continues an earlier run at `cycle`, whose MD trajectory started
    /// after reactive cycle `last_reactive_cycle`.
    pub fn starting_at(mut self, cycle: usize, last_reactive_cycle: usize) -> Self {
        info!(cycle, last_reactive_cycle, "restarting simulation");
        self.current_cycle = cycle;
        self.last_reactive_cycle = last_reactive_cycle;
        self
    }

    #[inline]
    pub fn current_cycle(&self) -> usize {
        self.current_cycle
    }

    #[inline]
    pub fn last_reactive_cycle(&self) -> usize {
        self.last_reactive_cycle
    }

    pub fn templates(&self) -> &[ReactionTemplate] {
        &self.templates
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn summary(&self, interrupted: bool) -> RunSummary {
        RunSummary {
            cycles_completed: self.cycles_completed,
            cycles_with_reaction: self.cycles_with_reaction,
            cycles_without_reaction: self.cycles_without_reaction,
            next_cycle: self.current_cycle,
            last_reactive_cycle: self.last_reactive_cycle,
            interrupted,
        }
    }

    /// Runs cycles up to the configured last cycle, calling `observer` after
    /// every reactive step.
    ///
    /// `shutdown` is polled before each cycle; a cycle that has started is
    /// always finished, MD sequence included.
    ///
    /// # Errors
    ///
    /// Stops at the first error. Errors for which [`Error::is_fatal`] holds
    /// leave the on-disk state unusable for continuing the run.
    pub fn run<F>(&mut self, shutdown: &AtomicBool, mut observer: F) -> Result<RunSummary, Error>
    where
        F: FnMut(&CycleReport),
    {
        if self.current_cycle == 1 {
            info!("running initial MD sequence");
            self.md.run_initial()?;
        }

        let mut interrupted = false;
        while self.current_cycle <= self.config.cycles {
            if shutdown.load(Ordering::SeqCst) {
                info!(cycle = self.current_cycle, "shutdown requested, stopping before cycle");
                interrupted = true;
                break;
            }

            let report = self.reactive_step()?;
            observer(&report);
            self.md_sequence()?;

            self.current_cycle += 1;
            self.cycles_completed += 1;
        }

        let summary = self.summary(interrupted);
        info!(
            completed = summary.cycles_completed,
            with_reaction = summary.cycles_with_reaction,
            without_reaction = summary.cycles_without_reaction,
            "simulation finished"
        );
        Ok(summary)
    }

    /// Runs the MD of the current cycle: a fresh trajectory from the relaxed
    /// snapshot if this cycle reacted, otherwise an extension of the running
    /// trajectory.
    pub fn md_sequence(&mut self) -> Result<(), Error> {
        if self.last_reactive_cycle == self.current_cycle {
            self.md.run_md(self.current_cycle)
        } else {
            self.md.run_md_appending(self.current_cycle, self.last_reactive_cycle)
        }
    }

    /// Searches, accepts and applies reactions for the current cycle, then
    /// relaxes and validates the result if anything reacted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelaxationFailed`] if the MD engine reports a failed
    /// relaxation; nothing is read back in that case.
    #[instrument(skip_all, name = "reactive_step", fields(cycle = self.current_cycle))]
    pub fn reactive_step(&mut self) -> Result<CycleReport, Error> {
        let cycle = self.current_cycle;

        let mut old = self.store.read(self.last_reactive_cycle)?;
        old.cell_counts = self.config.cell_counts;
        old.clear_reaction_records();
        let mut new = old.clone();
        self.acceptance.reset_counts();

        let index = SpatialIndex::build(&old, self.config.cell_counts, self.config.neighbor_wrap)?;
        let found = find_candidates(&index, &self.templates, old.dimensions)?;
        let candidate_count = found.len();
        info!(candidates = candidate_count, "found reaction candidates");

        // rates are only known per candidate during acceptance, so the
        // ordering is uniform
        let candidates = weighted_shuffle(found, &[], self.acceptance.rng_mut());

        let mut accepted = Vec::new();
        let mut reactions = Vec::new();
        for mut candidate in candidates {
            if !candidate.reactants().iter().all(|r| new.contains(r)) {
                debug!(candidate = %candidate, "candidate is no longer available");
                continue;
            }

            let template = candidate.template_index();
            self.acceptance.record_attempt(template);
            if !self.acceptance.accept(template, candidate.current_rate()) {
                continue;
            }

            reactions.push(react(&mut new, &mut candidate)?);
            accepted.push(candidate);
        }

        let statistics = CycleStatistics {
            cycle,
            candidates: candidate_count,
            accepted: self.acceptance.accepted().to_vec(),
            attempted: self.acceptance.attempted().to_vec(),
        };
        self.stats.record(&statistics).map_err(Error::Statistics)?;

        if accepted.is_empty() {
            info!("no candidates were accepted");
            self.cycles_without_reaction += 1;
            return Ok(CycleReport {
                statistics,
                reactions,
                displacements: Vec::new(),
            });
        }

        info!(
            accepted = statistics.total_accepted(),
            attempted = statistics.total_attempted(),
            candidates = candidate_count,
            "reacted candidates, relaxing"
        );
        new.sort();
        self.store.write(&new, cycle)?;

        if !self.md.run_relaxation(cycle)? {
            error!(cycle, "relaxation failed");
            return Err(Error::RelaxationFailed { cycle });
        }
        info!("relaxation succeeded");
        self.last_reactive_cycle = cycle;
        self.cycles_with_reaction += 1;

        let relaxed = self.store.read_relaxed(cycle)?;
        let validator = MovementValidator::new(&new);
        let mut displacements = Vec::new();
        for candidate in &accepted {
            displacements.extend(validator.check(&new, &relaxed, candidate)?);
        }

        Ok(CycleReport {
            statistics,
            reactions,
            displacements,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;

    use super::*;
    use crate::engine::stats::NullSink;
    use crate::model::atom::Atom;
    use crate::model::molecule::Molecule;
    use crate::model::topology::Topology;
    use crate::reaction::AtomRef;

    #[derive(Debug, Default)]
    struct MemoryStore {
        md: HashMap<usize, Topology>,
        written: Vec<(usize, Topology)>,
        relaxed: HashMap<usize, Topology>,
    }

    impl TopologyStore for MemoryStore {
        fn read(&mut self, last_reactive_cycle: usize) -> Result<Topology, Error> {
            self.md
                .get(&last_reactive_cycle)
                .cloned()
                .ok_or(Error::md_engine("read", last_reactive_cycle, "no snapshot"))
        }

        fn read_relaxed(&mut self, cycle: usize) -> Result<Topology, Error> {
            self.relaxed
                .get(&cycle)
                .cloned()
                .ok_or(Error::md_engine("read_relaxed", cycle, "no snapshot"))
        }

        fn write(&mut self, topology: &Topology, cycle: usize) -> Result<(), Error> {
            self.written.push((cycle, topology.clone()));
            // relaxation leaves positions untouched and MD continues from it
            self.relaxed.insert(cycle, topology.clone());
            self.md.insert(cycle, topology.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct ScriptedEngine {
        calls: Vec<String>,
        fail_relaxation: bool,
    }

    impl MdEngine for ScriptedEngine {
        fn run_initial(&mut self) -> Result<(), Error> {
            self.calls.push("initial".into());
            Ok(())
        }

        fn run_md(&mut self, cycle: usize) -> Result<(), Error> {
            self.calls.push(format!("md {cycle}"));
            Ok(())
        }

        fn run_md_appending(&mut self, cycle: usize, last: usize) -> Result<(), Error> {
            self.calls.push(format!("append {cycle} {last}"));
            Ok(())
        }

        fn run_relaxation(&mut self, cycle: usize) -> Result<bool, Error> {
            self.calls.push(format!("relax {cycle}"));
            Ok(!self.fail_relaxation)
        }
    }

    fn make_template(rate: f64) -> ReactionTemplate {
        let mut t = ReactionTemplate::new("join");
        t.add_reactant("A", &["A1"]);
        t.add_reactant("B", &["B1"]);
        t.add_product("AB", &["A1", "B1"]);
        t.add_transition(AtomRef::new(0, 0), AtomRef::new(0, 0));
        t.add_transition(AtomRef::new(1, 0), AtomRef::new(0, 1));
        t.set_rate(vec![(0.0, rate)]);
        t
    }

    fn make_store(topology: Topology) -> MemoryStore {
        let mut store = MemoryStore::default();
        store.md.insert(0, topology);
        store
    }

    fn pair_topology() -> Topology {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(Molecule::with_atoms(1, "A", vec![Atom::new(1, "A1", [1.0, 1.0, 1.0])]));
        top.add_molecule(Molecule::with_atoms(2, "B", vec![Atom::new(2, "B1", [2.0, 1.0, 1.0])]));
        top.add_molecule(Molecule::with_atoms(3, "S", vec![Atom::new(3, "S1", [5.0; 3])]));
        top
    }

    fn make_simulator(
        store: MemoryStore,
        engine: ScriptedEngine,
        rate: f64,
        cycles: usize,
    ) -> Simulator<MemoryStore, ScriptedEngine, Vec<CycleStatistics>> {
        let config = EngineConfig {
            cycles,
            ..Default::default()
        };
        Simulator::new(
            config,
            vec![make_template(rate)],
            store,
            engine,
            Vec::new(),
            AcceptanceEngine::new(1.0, 1, StdRng::seed_from_u64(9)),
        )
    }

    #[test]
    fn cycle_without_candidates_skips_relaxation() {
        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        top.add_molecule(Molecule::with_atoms(1, "S", vec![Atom::new(1, "S1", [1.0; 3])]));
        let mut sim = make_simulator(make_store(top), ScriptedEngine::default(), 1.0, 1);

        let report = sim.reactive_step().unwrap();

        assert_eq!(report.statistics.candidates, 0);
        assert_eq!(report.statistics.accepted, vec![0]);
        assert!(!report.reacted());
        assert_eq!(sim.stats.len(), 1);
        assert_eq!(sim.stats[0].candidates, 0);
        assert!(sim.md.calls.is_empty());
        assert!(sim.store.written.is_empty());
        assert_eq!(sim.summary(false).cycles_without_reaction, 1);
    }

    #[test]
    fn rejected_candidates_count_as_no_reaction() {
        let mut sim = make_simulator(make_store(pair_topology()), ScriptedEngine::default(), 0.0, 1);

        let report = sim.reactive_step().unwrap();

        assert_eq!(report.statistics.candidates, 1);
        assert_eq!(report.statistics.attempted, vec![1]);
        assert_eq!(report.statistics.accepted, vec![0]);
        assert!(sim.store.written.is_empty());
        assert_eq!(sim.last_reactive_cycle(), 0);
    }

    #[test]
    fn accepted_reaction_is_written_relaxed_and_validated() {
        let mut sim = make_simulator(make_store(pair_topology()), ScriptedEngine::default(), 1.0, 1);

        let report = sim.reactive_step().unwrap();

        assert!(report.reacted());
        assert_eq!(report.reactions[0].reactant_ids, vec![1, 2]);
        assert_eq!(report.displacements.len(), 2);
        assert_eq!(report.anomalies(), 0);
        assert_eq!(sim.md.calls, vec!["relax 1"]);
        assert_eq!(sim.last_reactive_cycle(), 1);

        let (cycle, written) = &sim.store.written[0];
        assert_eq!(*cycle, 1);
        let names: Vec<&str> = written.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["AB", "S"]);
        let ids: Vec<usize> = written.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn consumed_reactants_skip_later_candidates() {
        let mut t = ReactionTemplate::new("dimer");
        t.add_reactant("M", &["C"]);
        t.add_reactant("M", &["C"]);
        t.add_product("D", &["C", "C"]);
        t.add_transition(AtomRef::new(0, 0), AtomRef::new(0, 0));
        t.add_transition(AtomRef::new(1, 0), AtomRef::new(0, 1));
        t.set_rate(vec![(0.0, 1.0)]);

        let mut top = Topology::new([10.0; 3], [1, 1, 1]);
        for id in 1..=3 {
            let x = id as f64;
            top.add_molecule(Molecule::with_atoms(id, "M", vec![Atom::new(id, "C", [x, 1.0, 1.0])]));
        }
        let mut sim = Simulator::new(
            EngineConfig::default(),
            vec![t],
            make_store(top),
            ScriptedEngine::default(),
            Vec::new(),
            AcceptanceEngine::new(1.0, 1, StdRng::seed_from_u64(5)),
        );

        let report = sim.reactive_step().unwrap();

        assert_eq!(report.statistics.candidates, 3);
        assert_eq!(report.statistics.attempted, vec![1]);
        assert_eq!(report.statistics.accepted, vec![1]);
        assert_eq!(report.reactions.len(), 1);

        let (_, written) = &sim.store.written[0];
        let names: Vec<&str> = written.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["D", "M"]);
    }

    #[test]
    fn failed_relaxation_is_fatal() {
        let engine = ScriptedEngine {
            fail_relaxation: true,
            ..Default::default()
        };
        let mut sim = make_simulator(make_store(pair_topology()), engine, 1.0, 3);

        let err = sim.run(&AtomicBool::new(false), |_| {}).unwrap_err();

        assert!(matches!(err, Error::RelaxationFailed { cycle: 1 }));
        assert!(err.is_fatal());
        assert_eq!(sim.md.calls, vec!["initial", "relax 1"]);
        assert_eq!(sim.store.written.len(), 1);
        assert_eq!(sim.last_reactive_cycle(), 0);
    }

    #[test]
    fn run_alternates_reactions_and_md() {
        let mut sim = make_simulator(make_store(pair_topology()), ScriptedEngine::default(), 1.0, 3);
        let mut seen = Vec::new();

        let summary = sim.run(&AtomicBool::new(false), |r| seen.push(r.reacted())).unwrap();

        assert_eq!(seen, vec![true, false, false]);
        assert_eq!(
            sim.md.calls,
            vec!["initial", "relax 1", "md 1", "append 2 1", "append 3 1"]
        );
        assert_eq!(summary.cycles_completed, 3);
        assert_eq!(summary.cycles_with_reaction, 1);
        assert_eq!(summary.cycles_without_reaction, 2);
        assert_eq!(summary.next_cycle, 4);
        assert!(!summary.interrupted);
    }

    #[test]
    fn shutdown_stops_before_next_cycle() {
        let mut sim = make_simulator(make_store(pair_topology()), ScriptedEngine::default(), 1.0, 5);
        let summary = sim.run(&AtomicBool::new(true), |_| {}).unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.cycles_completed, 0);
        assert_eq!(summary.next_cycle, 1);
        assert_eq!(sim.md.calls, vec!["initial"]);
    }

    #[test]
    fn restart_skips_initial_md() {
        let mut store = MemoryStore::default();
        store.md.insert(4, pair_topology());
        let sim = make_simulator(store, ScriptedEngine::default(), 0.0, 6);
        let mut sim = sim.starting_at(5, 4);

        let summary = sim.run(&AtomicBool::new(false), |_| {}).unwrap();

        assert_eq!(sim.md.calls, vec!["append 5 4", "append 6 4"]);
        assert_eq!(summary.cycles_completed, 2);
    }

    #[test]
    fn null_sink_runs() {
        let mut sim = Simulator::new(
            EngineConfig::default(),
            vec![make_template(1.0)],
            make_store(pair_topology()),
            ScriptedEngine::default(),
            NullSink,
            AcceptanceEngine::new(1.0, 1, StdRng::seed_from_u64(1)),
        );
        assert!(sim.reactive_step().unwrap().reacted());
    }
}
