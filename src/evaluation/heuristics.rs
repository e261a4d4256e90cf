use std::time::Duration;

use hrsw::Stopwatch;

use crate::algorithms::astar::astar_with_stats;
use crate::algorithms::bfs::bfs;
use crate::chart::BarChart;
use crate::chart::Figure;
use crate::heuristics::Heuristic;
use crate::problems::grid_2d::DEFAULT_OBSTACLE_PROBABILITY;
use crate::problems::grid_2d::GridProblem;

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationConfig {
    pub num_tests: usize,
    pub grid_size: usize,
    pub obstacle_prob: f64,
    pub heuristics: Vec<Heuristic>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            num_tests: 10,
            grid_size: 20,
            obstacle_prob: DEFAULT_OBSTACLE_PROBABILITY,
            heuristics: Heuristic::ALL.to_vec(),
        }
    }
}

/// One A* run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trial {
    pub elapsed: Duration,
    /// Cells in the path, both ends included. `None` when there's no path.
    pub path_len: Option<usize>,
    pub expanded: usize,
}

/// Aggregated trials of a single heuristic.
#[derive(Clone, Debug, PartialEq)]
pub struct HeuristicSummary {
    pub heuristic: Heuristic,
    pub trials: Vec<Trial>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl HeuristicSummary {
    /// Mean wall-clock time in seconds.
    pub fn mean_time(&self) -> Option<f64> {
        mean(self.trials.iter().map(|t| t.elapsed.as_secs_f64()))
    }
    /// Mean path length over the trials that found a path.
    pub fn mean_path_len(&self) -> Option<f64> {
        mean(self.trials.iter().filter_map(|t| t.path_len.map(|l| l as f64)))
    }
    pub fn mean_expanded(&self) -> Option<f64> {
        mean(self.trials.iter().map(|t| t.expanded as f64))
    }
    pub fn solved(&self) -> usize {
        self.trials.iter().filter(|t| t.path_len.is_some()).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeuristicReport {
    pub config: EvaluationConfig,
    pub summaries: Vec<HeuristicSummary>,
    /// Trials where BFS found a path.
    pub reachable: usize,
    /// Runs whose path was longer than the shortest one, or missing.
    pub suboptimal: usize,
}

impl HeuristicReport {
    pub fn figure(&self) -> Figure {
        let mut time = BarChart::new("Average Computation Time (s)", "Time (s)");
        let mut length = BarChart::new("Average Path Length", "Steps");
        for s in &self.summaries {
            time = time.bar(s.heuristic.to_string(), s.mean_time());
            length = length.bar(s.heuristic.to_string(), s.mean_path_len());
        }
        Figure::new(vec![time, length])
    }

    pub fn write_table<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        let optional = |v: Option<f64>, precision: usize| {
            v.map_or("n/a".to_string(), |v| format!("{v:.precision$}"))
        };

        writeln!(
            out,
            "{:<12} {:<12} {:<12} {:<12} {:<8}",
            "Heuristic", "Time(s)", "Length", "Expanded", "Solved"
        )?;
        for s in &self.summaries {
            writeln!(
                out,
                "{:<12} {:<12} {:<12} {:<12} {:<8}",
                s.heuristic.to_string(),
                optional(s.mean_time(), 6),
                optional(s.mean_path_len(), 2),
                optional(s.mean_expanded(), 1),
                format!("{}/{}", s.solved(), s.trials.len()),
            )?;
        }
        Ok(())
    }
}

/// Runs A* with every configured heuristic on `config.num_tests` random grids.
///
/// All heuristics share the instance of each trial.
pub fn evaluate_heuristics<R: rand::Rng>(r: &mut R, config: &EvaluationConfig) -> HeuristicReport {
    let mut summaries: Vec<HeuristicSummary> = config
        .heuristics
        .iter()
        .map(|&heuristic| HeuristicSummary {
            heuristic,
            trials: Vec::with_capacity(config.num_tests),
        })
        .collect();
    let mut reachable = 0;
    let mut suboptimal = 0;

    for trial in 0..config.num_tests {
        let problem = GridProblem::random(r, config.grid_size, config.obstacle_prob);
        let shortest = bfs(&problem.grid, problem.start, problem.goal).map(|p| p.len());
        if shortest.is_some() {
            reachable += 1;
        }

        for summary in summaries.iter_mut() {
            let mut stopwatch = Stopwatch::new_started();
            let (path, stats) =
                astar_with_stats(&problem.grid, problem.start, problem.goal, summary.heuristic);
            stopwatch.stop();

            let path_len = path.map(|p| p.len());
            if path_len != shortest {
                suboptimal += 1;
                log::warn!(
                    "Trial {trial}: {} found {:?} cells where the shortest path has {:?}",
                    summary.heuristic,
                    path_len,
                    shortest
                );
            }
            summary.trials.push(Trial {
                elapsed: stopwatch.elapsed(),
                path_len,
                expanded: stats.expanded,
            });
        }
    }

    HeuristicReport {
        config: config.clone(),
        summaries,
        reachable,
        suboptimal,
    }
}
