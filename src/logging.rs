//! File-backed log sink.
//!
//! The terminal interface owns stdout, so log records are appended to a file chosen on the command
//! line instead. Without `--log-file` no logger is installed and every `log` macro is a no-op.

use std::{
    fs::{File, OpenOptions},
    io::Write as _,
    path::Path,
    sync::Mutex,
    time::Instant,
};

use color_eyre::eyre::Result;
use log::{LevelFilter, Log, Metadata, Record};

/// Logger appending one line per record to a file.
#[derive(Debug)]
struct FileLogger {
    /// Destination file.
    file: Mutex<File>,
    /// Most verbose level that gets written.
    level: LevelFilter,
    /// Reference point for the relative timestamps.
    started: Instant,
}

impl FileLogger {
    /// Wraps an open file.
    fn new(file: File, level: LevelFilter) -> Self {
        Self {
            file: Mutex::new(file),
            level,
            started: Instant::now(),
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Ok(mut file) = self.file.lock() {
            // A failed write has nowhere else to be reported.
            #[expect(
                clippy::let_underscore_must_use,
                reason = "Logging must never take the application down."
            )]
            let _ = writeln!(
                file,
                "[{:>10.3}s {:<5} {}] {}",
                self.started.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            #[expect(
                clippy::let_underscore_must_use,
                reason = "Logging must never take the application down."
            )]
            let _ = file.flush();
        }
    }
}

/// Installs the file logger as the global `log` backend.
///
/// # Errors
///
/// This function may return errors if:
/// - The log file cannot be opened for appending
/// - A global logger was already installed
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    log::set_boxed_logger(Box::new(FileLogger::new(file, level)))?;
    log::set_max_level(level);
    log::info!("logging to {} at level {level}", path.display());

    Ok(())
}
