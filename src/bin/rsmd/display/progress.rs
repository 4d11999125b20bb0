use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use rsmd::CycleReport;

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        Self {
            bar: None,
            step: 0,
            total_steps,
            step_start: Instant::now(),
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));

        self.bar = Some(bar);
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );

        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
        }
    }
}

/// Setup steps before the run starts. Silent when not on a terminal.
pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, substeps);
        }
    }
}

/// Bar over the cycles of a run, with a running count of reactions.
pub struct CycleProgress {
    bar: Option<ProgressBar>,
    reactions: usize,
    start: Instant,
}

impl CycleProgress {
    pub fn new(interactive: bool, first: usize, last: usize) -> Self {
        let bar = interactive.then(|| {
            let total = (last + 1).saturating_sub(first) as u64;
            let bar = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} cycles {msg} ({elapsed})")
            {
                bar.set_style(style.progress_chars("█▓░"));
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Self {
            bar,
            reactions: 0,
            start: Instant::now(),
        }
    }

    pub fn observe(&mut self, report: &CycleReport) {
        self.reactions += report.reactions.len();
        if let Some(bar) = &self.bar {
            bar.set_message(format!("· cycle {} · {} reactions", report.cycle(), self.reactions));
            bar.inc(1);
        }
    }

    pub fn finish(self, interrupted: bool) {
        let Some(bar) = self.bar else {
            return;
        };
        bar.finish_and_clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
        );
        let _ = writeln!(stderr);
        let (mark, label) = if interrupted {
            ("\x1b[33m■\x1b[0m", "Run interrupted")
        } else {
            ("\x1b[32m✓\x1b[0m", "Run complete")
        };
        let _ = writeln!(
            stderr,
            "  {} {:<16} {:>34}",
            mark,
            label,
            format!("Total: {:.2}s", self.start.elapsed().as_secs_f64())
        );
        let _ = writeln!(stderr);
    }
}
