//! Minimal stderr backend for the `log` facade used by the core crate.

use std::io::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(io::stderr().lock(), "[{:<5}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// `-v` count to level: none shows warnings, then info, debug, trace.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8) {
    // A second init only happens in tests; keeping the first logger is fine.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for_verbosity(verbose));
    }
}
