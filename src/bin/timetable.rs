//! Compares backtracking with and without forward checking on a timetable.

use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use search_lab::evaluation::timetable::run_experiment;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = search_lab::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
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

    let report = run_experiment();

    println!("\n=== {} ===", "Timetable Solutions".bold());
    report.write_solutions(anstream::stdout())?;
    println!("\n=== {} ===", "Performance Comparison".bold());
    report.write_table(anstream::stdout())?;

    println!();
    let figure = report.figure();
    figure.write_text(anstream::stdout())?;
    if let Some(p) = &args.plot {
        figure.save(p)?;
        println!("Charts saved to {:?}", p.green());
    }

    Ok(())
}
