//! strokebench - line drawing throughput benchmark

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;

use strokebench::app::StrokeBenchApp;
use strokebench::bench::run_headless;
use strokebench::config::{BenchConfig, DEFAULT_PARTICLE_COUNT};
use strokebench::strategies::{NoAcceleration, StrategyKind};

#[derive(Parser)]
#[command(name = "strokebench")]
#[command(about = "Compare line drawing strategies over a shared particle workload", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of particles in the pool
    #[arg(long, default_value_t = DEFAULT_PARTICLE_COUNT)]
    particles: usize,

    /// Strategy active at startup (none, baseline, immutable, batched,
    /// retained, pixel-buffer, accelerated)
    #[arg(long, default_value = "none")]
    strategy: StrategyKind,

    /// Fixed random seed for a reproducible workload
    #[arg(long)]
    seed: Option<u64>,

    /// Run every strategy without a window and print the frame rates
    #[arg(long)]
    headless: bool,

    /// Seconds per strategy in headless mode
    #[arg(long, default_value_t = 3)]
    duration_secs: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = BenchConfig::default()
        .with_particle_count(cli.particles)
        .with_strategy(cli.strategy)
        .with_seed(cli.seed);

    if cli.headless {
        let duration = Duration::from_secs(cli.duration_secs);
        info!(
            "Headless run: {} particles, {}s per strategy",
            config.particle_count,
            duration.as_secs()
        );
        let reports = run_headless(&config, Arc::new(NoAcceleration), duration)?;
        for report in reports {
            match &report.setup_error {
                Some(err) => println!("{:<22} skipped: {err}", report.strategy.as_str()),
                None => println!(
                    "{:<22} {:>9.1} fps  {:>6} draw calls  {:>6} segments",
                    report.strategy.as_str(),
                    report.fps,
                    report.last_frame.draw_calls,
                    report.last_frame.segments
                ),
            }
        }
        return Ok(());
    }

    StrokeBenchApp::new(config)?.run()
}
