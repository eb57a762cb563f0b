//! Declarative logging for the portal gate
//!
//! Built on the standard `log` crate: library code uses `log::info!` and
//! friends, and an application installs the backend once.
//!
//! # Example
//!
//! ```rust,no_run
//! use portal_rbac::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::production()
//!     .with_file_output("./logs/portal.log")
//!     .with_context_field("service", "intranet-portal");
//!
//! init_logging(&config).unwrap();
//! log::info!("Portal gate ready");
//! ```

pub mod config;
pub mod destinations;
pub mod formatter;

pub use config::{LogLevel, LoggingConfig};
pub use destinations::{LogEntry, LogOutput};
pub use formatter::LogFormat;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, Once, PoisonError};

static INIT: Once = Once::new();

/// Install the portal logger
///
/// Only the first call installs a logger; later calls are no-ops. Fails if
/// a file output cannot be opened or another logger is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = init_logging_internal(config);
    });
    result
}

fn init_logging_internal(config: &LoggingConfig) -> anyhow::Result<()> {
    let logger = PortalLogger::new(config.clone())?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level.into());
    Ok(())
}

struct PortalLogger {
    config: LoggingConfig,
    writers: Vec<Box<dyn LogWriter>>,
}

impl PortalLogger {
    fn new(config: LoggingConfig) -> anyhow::Result<Self> {
        let mut writers: Vec<Box<dyn LogWriter>> = Vec::new();

        for output in &config.outputs {
            match output {
                LogOutput::Stdout { format } => {
                    let format = format.clone().unwrap_or_else(|| config.format.clone());
                    writers.push(Box::new(StreamWriter { format, stderr: false }));
                }
                LogOutput::Stderr { format } => {
                    let format = format.clone().unwrap_or_else(|| config.format.clone());
                    writers.push(Box::new(StreamWriter { format, stderr: true }));
                }
                LogOutput::File { path, format } => {
                    let format = format.clone().unwrap_or_else(|| config.format.clone());
                    writers.push(Box::new(FileWriter::open(path, format)?));
                }
            }
        }

        if writers.is_empty() {
            writers.push(Box::new(StreamWriter { format: config.format.clone(), stderr: true }));
        }

        Ok(Self { config, writers })
    }
}

impl log::Log for PortalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.config.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_log_record(record, &self.config);
        for writer in &self.writers {
            let _ = writer.write_log(&entry);
        }
    }

    fn flush(&self) {
        for writer in &self.writers {
            let _ = writer.flush();
        }
    }
}

trait LogWriter: Send + Sync {
    fn write_log(&self, entry: &LogEntry) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;
}

struct StreamWriter {
    format: LogFormat,
    stderr: bool,
}

impl LogWriter for StreamWriter {
    fn write_log(&self, entry: &LogEntry) -> io::Result<()> {
        let line = self.format.format_entry(entry);
        if self.stderr {
            writeln!(io::stderr().lock(), "{}", line)
        } else {
            writeln!(io::stdout().lock(), "{}", line)
        }
    }

    fn flush(&self) -> io::Result<()> {
        if self.stderr {
            io::stderr().flush()
        } else {
            io::stdout().flush()
        }
    }
}

struct FileWriter {
    file: Mutex<File>,
    format: LogFormat,
}

impl FileWriter {
    fn open(path: &str, format: LogFormat) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Mutex::new(file), format })
    }
}

impl LogWriter for FileWriter {
    fn write_log(&self, entry: &LogEntry) -> io::Result<()> {
        let line = self.format.format_entry(entry);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(file, "{}", line)
    }

    fn flush(&self) -> io::Result<()> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}
