//! Compares A* heuristics on random grids.

use std::path::PathBuf;
use std::time::Duration;

use anstream::println;
use clap::Parser;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing_subscriber::EnvFilter;

use search_lab::evaluation::heuristics::EvaluationConfig;
use search_lab::evaluation::heuristics::evaluate_heuristics;
use search_lab::heuristics::Heuristic;
use search_lab::problems::grid_2d::DEFAULT_OBSTACLE_PROBABILITY;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = search_lab::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Random grids to try.
    #[arg(short, long, default_value_t = 10usize)]
    pub num_tests: usize,
    /// Side of the square grids.
    #[arg(short, long, default_value_t = 20usize)]
    pub grid_size: usize,
    #[arg(long, default_value_t = DEFAULT_OBSTACLE_PROBABILITY)]
    pub obstacle_prob: f64,
    #[arg(short, long, env = "SEARCH_LAB_SEED", default_value_t = 0u64)]
    pub seed: u64,

    /// Heuristics to compare. All of them when empty.
    #[arg(long = "heuristic", value_enum)]
    pub heuristics: Vec<Heuristic>,

    /// Also render the charts into this image.
    #[arg(short, long)]
    pub plot: Option<PathBuf>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.color.write_global();
    if args.grid_size == 0 {
        return Err("--grid-size must be positive".into());
    }
    if !(0.0..=1.0).contains(&args.obstacle_prob) {
        return Err("--obstacle-prob must be within [0, 1]".into());
    }

    let config = EvaluationConfig {
        num_tests: args.num_tests,
        grid_size: args.grid_size,
        obstacle_prob: args.obstacle_prob,
        heuristics: if args.heuristics.is_empty() {
            Heuristic::ALL.to_vec()
        } else {
            args.heuristics.clone()
        },
    };
    println!(
        "Running {} trials on {}x{} grids (seed {})",
        config.num_tests.yellow(),
        config.grid_size,
        config.grid_size,
        args.seed.yellow()
    );

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let report = evaluate_heuristics(&mut rng, &config);

    println!();
    report.write_table(anstream::stdout())?;
    println!(
        "Reachable goals: {}/{}",
        report.reachable, config.num_tests
    );
    if report.suboptimal > 0 {
        println!(
            "{}",
            format!("{} runs missed the shortest path", report.suboptimal).red()
        );
    }
    for s in &report.summaries {
        let total: Duration = s.trials.iter().map(|t| t.elapsed).sum();
        println!("  - {}: {}", s.heuristic, human_duration(&total));
    }

    println!();
    let figure = report.figure();
    figure.write_text(anstream::stdout())?;
    if let Some(p) = &args.plot {
        figure.save(p)?;
        println!("Charts saved to {:?}", p.green());
    }

    Ok(())
}
