use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, EngineError, SourceError};
use crate::rolling_hash::RollingHash;
use crate::source::ByteSource;
use crate::stats::{self, HitCounter};
use crate::units;

pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";
const CLEAR_LINE: &str = "\x1b[2K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// One overwritten line with the running byte count.
    Progress,
    /// Full per-mask frequency table on every report.
    Stats,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Bytes to roll through the hash.
    pub target: u64,
    pub buffer_size: usize,
    pub display: DisplayMode,
}

impl RunConfig {
    pub fn validate(&self, window_size: usize) -> Result<(), ConfigError> {
        if self.buffer_size < window_size {
            return Err(ConfigError::BufferTooSmall {
                buffer: self.buffer_size,
                window: window_size,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub bytes: u64,
    pub elapsed: Duration,
    pub hits: HitCounter,
    /// The source ran out before the target was reached.
    pub exhausted: bool,
}

impl Summary {
    pub fn throughput(&self) -> Option<u64> {
        throughput(self.bytes, self.elapsed)
    }
}

/// Bytes per second as `bytes * 1e9 / elapsed_ns`, in integer arithmetic.
///
/// `None` when nothing was processed or no time was measured.
pub fn throughput(bytes: u64, elapsed: Duration) -> Option<u64> {
    let nanos = elapsed.as_nanos();
    if bytes == 0 || nanos == 0 {
        return None;
    }
    let rate = bytes as u128 * 1_000_000_000 / nanos;
    Some(u64::try_from(rate).unwrap_or(u64::MAX))
}

/// Refill `buf`, returning how many leading bytes are valid and whether the
/// source is now exhausted.
fn fill<S: ByteSource>(source: &mut S, buf: &mut [u8]) -> Result<(usize, bool), SourceError> {
    match source.refill(buf) {
        Ok(()) => Ok((buf.len(), false)),
        Err(SourceError::EndOfSource { filled }) => {
            warn!(filled, "input exhausted");
            Ok((filled, true))
        }
        Err(e) => Err(e),
    }
}

fn report<W: Write>(
    out: &mut W,
    display: DisplayMode,
    bytes: u64,
    hits: &HitCounter,
    width: u32,
) -> std::io::Result<()> {
    let status = format!("Byte count: {}", units::format_size(bytes));
    match display {
        DisplayMode::Stats => {
            write!(out, "{CLEAR_SCREEN}")?;
            writeln!(out, "{status}")?;
            hits.write_table(out, bytes, width)?;
        }
        DisplayMode::Progress => {
            write!(out, "{CLEAR_LINE}{status}\r")?;
        }
    }
    out.flush()
}

/// Roll `config.target` bytes from `source` through `hasher`.
///
/// The hasher is initialized from the first window of the first buffer and
/// then rolled over every byte from the start of that buffer. A report goes
/// to `out` each time a full buffer has been consumed. A finite source that
/// runs dry ends the run early with whatever was rolled.
pub fn run<H, S, W>(
    config: &RunConfig,
    hasher: &mut H,
    source: &mut S,
    out: &mut W,
) -> Result<Summary, EngineError>
where
    H: RollingHash,
    S: ByteSource,
    W: Write,
{
    let window = hasher.window_size();
    config.validate(window)?;
    let width = hasher.width();
    let collect = config.display == DisplayMode::Stats;

    info!(
        target_bytes = config.target,
        buffer_size = config.buffer_size,
        window,
        width,
        "starting run"
    );

    let start = Instant::now();
    let mut buf = vec![0u8; config.buffer_size];
    let (mut limit, mut exhausted) = fill(source, &mut buf)?;
    let mut hits = HitCounter::new();
    let mut sum = Vec::with_capacity(8);

    if limit < window {
        warn!(available = limit, window, "input shorter than one window");
        return Ok(Summary {
            bytes: 0,
            elapsed: start.elapsed(),
            hits,
            exhausted: true,
        });
    }
    hasher.initialize(&buf[..window])?;

    let mut n: u64 = 0;
    let mut k: usize = 0;
    let mut reported: u64 = 0;

    while n < config.target {
        if k == limit {
            if exhausted {
                break;
            }
            (limit, exhausted) = fill(source, &mut buf)?;
            k = 0;
            debug!(bytes = n, "buffer refilled");
            if limit == 0 {
                break;
            }
        }

        hasher.roll(buf[k]);
        if collect {
            sum.clear();
            hasher.sum_bytes(&mut sum);
            hits.record(stats::pack_be(&sum));
        }
        k += 1;
        n += 1;

        if k == buf.len() {
            report(out, config.display, n, &hits, width).map_err(EngineError::Output)?;
            reported = n;
        }
    }

    if collect && n > reported {
        report(out, config.display, n, &hits, width).map_err(EngineError::Output)?;
    }

    let summary = Summary {
        bytes: n,
        elapsed: start.elapsed(),
        hits,
        exhausted: exhausted && n < config.target,
    };
    info!(
        bytes = summary.bytes,
        elapsed = ?summary.elapsed,
        exhausted = summary.exhausted,
        "run finished"
    );
    Ok(summary)
}

/// Final one-line report: volume, duration and throughput.
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> std::io::Result<()> {
    let rate = match summary.throughput() {
        Some(rate) => format!("{}/s", units::format_size(rate)),
        None => "throughput n/a".to_string(),
    };
    writeln!(
        out,
        "{CLEAR_LINE}Rolled {} of data in {:?} ({}).",
        units::format_size(summary.bytes),
        summary.elapsed,
        rate
    )?;
    out.flush()
}
