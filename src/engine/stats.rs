//! Per-cycle reaction statistics and the sinks that receive them.

use std::io::{self, Write};

/// Counters of one reactive cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStatistics {
    pub cycle: usize,
    pub candidates: usize,
    /// Accepted reactions per template, in template order.
    pub accepted: Vec<usize>,
    /// Attempted reactions per template, in template order.
    pub attempted: Vec<usize>,
}

impl CycleStatistics {
    pub fn total_accepted(&self) -> usize {
        self.accepted.iter().sum()
    }

    pub fn total_attempted(&self) -> usize {
        self.attempted.iter().sum()
    }
}

/// Append-only receiver of per-cycle statistics.
pub trait StatisticsSink {
    fn record(&mut self, stats: &CycleStatistics) -> io::Result<()>;
}

impl StatisticsSink for Vec<CycleStatistics> {
    fn record(&mut self, stats: &CycleStatistics) -> io::Result<()> {
        self.push(stats.clone());
        Ok(())
    }
}

impl<S: StatisticsSink + ?Sized> StatisticsSink for Box<S> {
    fn record(&mut self, stats: &CycleStatistics) -> io::Result<()> {
        (**self).record(stats)
    }
}

/// Discards all statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatisticsSink for NullSink {
    fn record(&mut self, _stats: &CycleStatistics) -> io::Result<()> {
        Ok(())
    }
}

const CYCLE_WIDTH: usize = 10;
const COLUMN_WIDTH: usize = 15;

/// Fixed-width text table: one line per cycle with the cycle number, the
/// candidate count, then accepted and attempted counts per template.
#[derive(Debug)]
pub struct TableWriter<W: Write> {
    out: W,
}

impl<W: Write> TableWriter<W> {
    /// Writes the header naming each template's columns.
    pub fn new(mut out: W, templates: &[&str]) -> io::Result<Self> {
        write!(out, "{:>CYCLE_WIDTH$}{:>COLUMN_WIDTH$}", "# cycle", "# candidates")?;
        for name in templates {
            write!(out, "{:>COLUMN_WIDTH$}", format!("# acc {name}"))?;
        }
        for name in templates {
            write!(out, "{:>COLUMN_WIDTH$}", format!("# att {name}"))?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(Self { out })
    }

    /// Appends to a table whose header has already been written.
    pub fn without_header(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatisticsSink for TableWriter<W> {
    fn record(&mut self, stats: &CycleStatistics) -> io::Result<()> {
        write!(
            self.out,
            "{:>CYCLE_WIDTH$}{:>COLUMN_WIDTH$}",
            stats.cycle, stats.candidates
        )?;
        for count in stats.accepted.iter().chain(&stats.attempted) {
            write!(self.out, "{count:>COLUMN_WIDTH$}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stats() -> CycleStatistics {
        CycleStatistics {
            cycle: 4,
            candidates: 12,
            accepted: vec![1, 0],
            attempted: vec![3, 2],
        }
    }

    #[test]
    fn table_has_header_and_fixed_width_rows() {
        let mut table = TableWriter::new(Vec::new(), &["ab", "bb"]).unwrap();
        table.record(&make_stats()).unwrap();
        let text = String::from_utf8(table.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   # cycle   # candidates"));
        assert!(lines[0].contains("# acc ab"));
        assert!(lines[0].ends_with("       # att bb"));
        assert_eq!(lines[1].len(), CYCLE_WIDTH + 5 * COLUMN_WIDTH);
        let columns: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(columns, vec!["4", "12", "1", "0", "3", "2"]);
    }

    #[test]
    fn zero_counts_are_written() {
        let mut table = TableWriter::without_header(Vec::new());
        table
            .record(&CycleStatistics {
                cycle: 1,
                candidates: 0,
                accepted: vec![0],
                attempted: vec![0],
            })
            .unwrap();
        let text = String::from_utf8(table.into_inner()).unwrap();
        assert_eq!(text.split_whitespace().collect::<Vec<_>>(), vec!["1", "0", "0", "0"]);
    }

    #[test]
    fn totals_sum_over_templates() {
        let stats = make_stats();
        assert_eq!(stats.total_accepted(), 1);
        assert_eq!(stats.total_attempted(), 5);
    }
}
