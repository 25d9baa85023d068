//! Result rendering: aligned text columns or JSON.

use chem_infer_core::{Letter, SolveReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    unparsed: usize,
    settled: BTreeMap<Letter, String>,
    #[serde(flatten)]
    report: &'a SolveReport,
}

pub fn render_json(report: &SolveReport, unparsed: usize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        unparsed,
        settled: report.settled(),
        report,
    })
}

/// Text summary: counters, solution count, unparsed lines, then the solutions
/// with letters that never vary pulled out into their own list.
pub fn render_text(report: &SolveReport, unparsed: usize, max_display: usize) -> String {
    let mut out = String::new();
    let stats = &report.stats;
    let total = report.solutions.len();

    let _ = writeln!(
        out,
        "propagation work {}, neighbour checks {}, nodes visited {}",
        stats.propagation_work, stats.neighbor_checks, stats.nodes_visited
    );
    let _ = write!(out, "{total} solution{}", if total == 1 { "" } else { "s" });
    if total > max_display {
        let _ = write!(out, ", showing the first {max_display}");
    }
    out.push('\n');
    if unparsed > 0 {
        let _ = writeln!(out, "{unparsed} condition(s) not understood");
    }

    let settled = if total > 1 {
        report.settled()
    } else {
        BTreeMap::new()
    };
    if !settled.is_empty() {
        out.push_str("\nsettled:\n");
        for (letter, formula) in &settled {
            let _ = writeln!(out, "{letter}: {formula}");
        }
    }
    if total > 1 {
        out.push_str("\npossible combinations:\n");
    }

    let shown = &report.solutions[..total.min(max_display)];
    let mut widths: BTreeMap<Letter, usize> = BTreeMap::new();
    for solution in shown {
        for (letter, formula) in solution {
            let width = widths.entry(*letter).or_default();
            *width = (*width).max(formula.len());
        }
    }

    for solution in shown {
        let mut row = String::new();
        for (letter, formula) in solution {
            if settled.contains_key(letter) {
                continue;
            }
            let width = widths.get(letter).copied().unwrap_or(0);
            let _ = write!(row, "{letter}:{formula:<width$} ");
        }
        let _ = writeln!(out, "{}", row.trim_end());
    }

    out
}
