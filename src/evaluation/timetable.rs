use std::time::Duration;

use hrsw::Stopwatch;

use crate::algorithms::backtracking::BacktrackOutcome;
use crate::algorithms::backtracking::BacktrackingConfig;
use crate::algorithms::backtracking::is_complete_and_consistent;
use crate::algorithms::backtracking::solve;
use crate::chart::BarChart;
use crate::chart::Figure;
use crate::problems::timetable::Timetable;

/// The compared backtracking setups.
pub const METHODS: [(&str, BacktrackingConfig); 2] = [
    (
        "Backtracking + Heuristics",
        BacktrackingConfig {
            mrv: true,
            lcv: true,
            forward_checking: false,
        },
    ),
    (
        "Backtracking + Forward Checking",
        BacktrackingConfig {
            mrv: true,
            lcv: true,
            forward_checking: true,
        },
    ),
];

#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentRow {
    pub method: &'static str,
    pub elapsed: Duration,
    pub outcome: BacktrackOutcome,
    /// Whether the solution, if any, satisfies every constraint.
    pub valid: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentReport {
    pub rows: Vec<ExperimentRow>,
}

impl ExperimentReport {
    pub fn write_solutions<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        for row in &self.rows {
            match &row.outcome.solution {
                Some(solution) => writeln!(out, "{}: {solution}", row.method)?,
                None => writeln!(out, "{}: None", row.method)?,
            }
        }
        Ok(())
    }

    pub fn write_table<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(
            out,
            "{:<35} {:<10} {:<10} {:<10}",
            "Method", "Time(s)", "Nodes", "Backtracks"
        )?;
        for row in &self.rows {
            writeln!(
                out,
                "{:<35} {:<10.4} {:<10} {:<10}",
                row.method,
                row.elapsed.as_secs_f64(),
                row.outcome.nodes,
                row.outcome.backtracks
            )?;
        }
        Ok(())
    }

    pub fn figure(&self) -> Figure {
        let mut time = BarChart::new("Execution Time Comparison", "Seconds");
        let mut backtracks = BarChart::new("Backtracks Comparison", "Count");
        for row in &self.rows {
            time = time.bar(row.method, Some(row.elapsed.as_secs_f64()));
            backtracks = backtracks.bar(row.method, Some(row.outcome.backtracks as f64));
        }
        Figure::new(vec![time, backtracks])
    }
}

/// Solves a freshly built `problem()` once per method.
pub fn run_experiment_with<F>(problem: F) -> ExperimentReport
where
    F: Fn() -> Timetable,
{
    let rows = METHODS
        .iter()
        .map(|&(method, config)| {
            let timetable = problem();
            let mut stopwatch = Stopwatch::new_started();
            let outcome = solve(&timetable, config);
            stopwatch.stop();

            let valid = outcome
                .solution
                .as_ref()
                .is_none_or(|s| is_complete_and_consistent(timetable.variables(), s));
            if !valid {
                log::error!("{method} returned an inconsistent timetable");
            }
            ExperimentRow {
                method,
                elapsed: stopwatch.elapsed(),
                outcome,
                valid,
            }
        })
        .collect();

    ExperimentReport { rows }
}

/// Compares both methods on the standard timetable.
pub fn run_experiment() -> ExperimentReport {
    run_experiment_with(Timetable::standard)
}
