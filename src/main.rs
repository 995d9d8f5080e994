use anyhow::{Context, Result};
use clap::Parser;
use evolve::app::{App, StatsWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Maximum number of ticks to simulate
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,

    /// RNG seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write population statistics as JSON lines to this file
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Ticks between two statistics lines
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Write the final world snapshot as JSON to this file
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = App::load_config(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }
    tracing::info!(
        seed = ?config.world.seed,
        ticks = args.ticks,
        fingerprint = %config.fingerprint(),
        "Starting headless run"
    );

    let mut app = App::new(config)?;

    let summary = match &args.stats_out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating stats file {}", path.display()))?;
            let mut writer = StatsWriter::new(BufWriter::new(file), args.report_every);
            let summary = app.run_headless(args.ticks, Some(&mut writer))?;
            writer.finish()?;
            summary
        }
        None => app.run_headless::<BufWriter<File>>(args.ticks, None)?,
    };

    if let Some(path) = &args.snapshot_out {
        let json = app.snapshot().to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
