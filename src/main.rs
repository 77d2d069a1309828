mod adler32;
mod buzhash;
mod driver;
mod error;
mod masks;
mod rabinkarp;
mod rolling_hash;
mod source;
mod stats;
mod units;

use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::{debug, info, Level};

use crate::driver::{DisplayMode, RunConfig, Summary, DEFAULT_BUFFER_SIZE};
use crate::rolling_hash::{Algorithm, Roller, RollingHash, DEFAULT_WINDOW_SIZE};
use crate::source::{RandomSource, ReaderSource};

#[derive(Parser)]
#[command(
    name = "rollstat",
    version,
    about = "Measure how often rolling checksums hit chunk-boundary masks"
)]
struct Cli {
    /// Rolling checksum: adler32, rabinkarp32, buzhash32 or buzhash64
    #[arg(long, default_value = "adler32")]
    sum: String,
    /// Print the per-mask frequency table after every buffer
    #[arg(long)]
    stats: bool,
    /// How much data to roll (e.g. 256M, 1.5G)
    #[arg(long, default_value = "256M")]
    size: String,
    /// Window length in bytes
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: usize,
    /// Working buffer size [default: 1M]
    #[arg(long)]
    buffer_size: Option<String>,
    /// Read data from this file instead of generating it
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Seed the generated data for a repeatable run
    #[arg(long, conflicts_with = "input")]
    seed: Option<u64>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let algorithm: Algorithm = cli.sum.parse()?;
    let target = units::parse_size(&cli.size).context("Invalid --size")?;
    let buffer_size = match cli.buffer_size.as_deref() {
        Some(size) => {
            let bytes = units::parse_size(size).context("Invalid --buffer-size")?;
            usize::try_from(bytes).context("--buffer-size does not fit in memory")?
        }
        None => DEFAULT_BUFFER_SIZE,
    };
    let display = if cli.stats {
        DisplayMode::Stats
    } else {
        DisplayMode::Progress
    };

    let mut hasher = Roller::new(algorithm, cli.window)?;
    let config = RunConfig {
        target,
        buffer_size,
        display,
    };
    config.validate(hasher.window_size())?;

    info!(%algorithm, target = %units::format_size(target), "configured");

    let input = cli.input;
    let seed = cli.seed;
    let summary = tokio::task::spawn_blocking(move || -> anyhow::Result<Summary> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        let summary = match input {
            Some(path) => {
                let file = std::fs::File::open(&path)
                    .with_context(|| format!("Failed to open input: {}", path.display()))?;
                driver::run(&config, &mut hasher, &mut ReaderSource::new(file), &mut out)?
            }
            None => {
                let mut source = match seed {
                    Some(seed) => RandomSource::seeded(seed),
                    None => RandomSource::from_entropy(),
                };
                driver::run(&config, &mut hasher, &mut source, &mut out)?
            }
        };

        driver::write_summary(&mut out, &summary).context("Failed to write summary")?;
        Ok(summary)
    })
    .await??;

    debug!(hits = ?summary.hits.hits(), "final mask tally");
    if summary.exhausted {
        info!(
            bytes = summary.bytes,
            "input ended before the requested size"
        );
    }

    Ok(())
}
