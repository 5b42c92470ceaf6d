use std::io::Write;
use std::time::Instant;

use log::{Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;

struct CliLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    start: Instant,
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("[{}] {}", record.level(), record.args());

        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Parse a `RUST_LOG` style level, falling back to `Warn`.
#[must_use]
pub fn level_filter(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::LevelFilter::Warn)
}

/// Install the global logger, writing to stderr and optionally to `log_file`.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(log_file: Option<std::fs::File>) -> Result<(), SetLoggerError> {
    let filter = level_filter(std::env::var("RUST_LOG").ok().as_deref());

    let logger = CliLogger {
        file: log_file.map(Mutex::new),
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}
