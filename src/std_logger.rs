use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;
use log::{max_level, Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Target used by the access log middleware.
pub const ACCESS_LOG_TARGET: &str = "access";

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub struct StdLogger {
    banner: Vec<String>,
    clear_every: u64,
    access_count: AtomicU64,
}

impl StdLogger {
    /// `clear_every == 0` never clears the terminal.
    pub fn new(banner: Vec<String>, clear_every: u64) -> Self {
        Self {
            banner,
            clear_every,
            access_count: AtomicU64::new(0),
        }
    }

    pub fn install(self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }

    pub fn print_banner(&self) {
        let _ = self.write_banner(&mut std::io::stdout().lock());
    }

    fn write_banner(&self, out: &mut impl Write) -> std::io::Result<()> {
        for line in &self.banner {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "\n{}\n", "-".repeat(50))
    }

    /// Writes an optional screen reset plus banner and then the record line,
    /// all through the one handle so concurrent workers cannot interleave.
    fn write_entry(&self, out: &mut impl Write, clear: bool, line: Option<&str>) -> std::io::Result<()> {
        if clear {
            write!(out, "{}", CLEAR_SCREEN)?;
            self.write_banner(out)?;
        }
        if let Some(line) = line {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Counts one access record, returns whether the screen has to be cleared first.
    fn count_access(&self) -> bool {
        let count = self.access_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.clear_every != 0 && count % self.clear_every == 0
    }
}

impl log::Log for StdLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let clear = record.target() == ACCESS_LOG_TARGET && self.count_access();
            let time_str = Local::now().format("%Y-%m-%dT%H:%M:%S");
            let line = format!("{0} {1:<8}: {2}", time_str, record.level(), record.args());

            match record.level() {
                Level::Error | Level::Warn => {
                    if clear {
                        let _ = self.write_entry(&mut std::io::stdout().lock(), true, None);
                    }
                    let _ = self.write_entry(&mut std::io::stderr().lock(), false, Some(&line));
                }
                _ => {
                    let _ = self.write_entry(&mut std::io::stdout().lock(), clear, Some(&line));
                }
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}
