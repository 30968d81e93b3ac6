//! Minimal logger.
//!
//! The logger prints `[elapsed LEVEL] message` to stderr with a simple
//! elapsed-time prefix, or one JSON object per line when [`LogFormat::Json`]
//! is selected. Use `init_with_level` to install it once at startup.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Shape of the lines written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `[  0.012s  INFO] message`
    #[default]
    Text,
    /// `{"elapsed_s":0.012,"level":"INFO","target":"...","message":"..."}`
    Json,
}

struct SimpleLogger {
    level: LevelFilter,
    format: LogFormat,
    started: Instant,
}

/// Render one log line (without the trailing newline).
fn format_line(
    format: LogFormat,
    elapsed: f64,
    level: Level,
    target: &str,
    message: &str,
) -> String {
    match format {
        LogFormat::Text => format!("[{:7.3}s {:>5}] {}", elapsed, level, message),
        LogFormat::Json => serde_json::json!({
            "elapsed_s": elapsed,
            "level": level.as_str(),
            "target": target,
            "message": message,
        })
        .to_string(),
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(
            self.format,
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        let _ = writeln!(std::io::stderr(), "{line}");
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<SimpleLogger> = OnceLock::new();

/// Install the simple logger with the provided level filter and line format.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter, format: LogFormat) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| SimpleLogger {
            level,
            format,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Map `-q`/`-v` style command line counters to a level filter.
///
/// The baseline is `Warn`; every `-v` raises it one step, `quiet` silences
/// everything but errors.
pub fn level_from_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `EnvFilter` directive used when `RUST_LOG` is unset.
#[cfg(feature = "tracing")]
fn default_directive(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install a `tracing-subscriber` formatter; `log` records are bridged into it.
///
/// `RUST_LOG` takes precedence over `level`.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
    match format {
        LogFormat::Json => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true)
                .finish()
                .try_init();
        }
        LogFormat::Text => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_timer(fmt::time::Uptime::default())
                .with_writer(std::io::stderr)
                .finish()
                .try_init();
        }
    }
}
