use std::io::{self, Write};

use rsmd::{ReactionTemplate, RunConfig, RunSummary};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_run_settings(config: &RunConfig, first_cycle: usize, templates: usize) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let sim = &config.simulation;

    let mut rows = vec![
        ("Cycles", format!("{} → {}", first_cycle, sim.cycles)),
        ("Templates", templates.to_string()),
        ("Frequency", format!("{}", config.reaction.frequency)),
        (
            "Cell Grid",
            format!("{} × {} × {}", sim.cell_counts[0], sim.cell_counts[1], sim.cell_counts[2]),
        ),
        ("Neighbor Wrap", sim.neighbor_wrap.to_string()),
        (
            "Seed",
            if sim.seed == 0 {
                "random".to_string()
            } else {
                sim.seed.to_string()
            },
        ),
        ("Working Dir", config.engine.workdir.display().to_string()),
    ];
    if let Some(path) = &sim.statistics {
        rows.push(("Statistics", path.display().to_string()));
    }

    print_kv_table(&mut out, "Run Settings", &rows);
}

pub fn print_run_summary(summary: &RunSummary) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Cycles Run", summary.cycles_completed.to_string()),
        ("With Reaction", summary.cycles_with_reaction.to_string()),
        ("Without Reaction", summary.cycles_without_reaction.to_string()),
        ("Last Reactive", summary.last_reactive_cycle.to_string()),
    ];
    if summary.interrupted {
        rows.push(("Resume At", summary.next_cycle.to_string()));
    }

    print_kv_table(&mut out, "Run Summary", &rows);
}

pub fn print_templates(templates: &[ReactionTemplate]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let count_w = 4usize;
    let sep_overhead = 15;
    let name_w = 14usize;
    let species_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + 3 * count_w + sep_overhead);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(name_w + 2),
            "─".repeat(species_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(count_w + 2),
        )
    };

    let _ = writeln!(out, "{}┌─ Reaction Templates ─┐", INDENT);
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:<species_w$} │ {:>count_w$} │ {:>count_w$} │ {:>count_w$} │",
        INDENT, "Name", "Reactants → Products", "Crit", "Mov", "Rate",
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for t in templates {
        let reactants: Vec<&str> = t.reactants.iter().map(|m| m.name.as_str()).collect();
        let products: Vec<&str> = t.products.iter().map(|m| m.name.as_str()).collect();
        let species = format!("{} → {}", reactants.join(" + "), products.join(" + "));
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:<species_w$} │ {:>count_w$} │ {:>count_w$} │ {:>count_w$} │",
            INDENT,
            truncate(&t.name, name_w),
            truncate(&species, species_w),
            t.criteria.len(),
            t.translations.len(),
            t.rate().len(),
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}
