//! Partitions accepted records into fixed-size batches and writes one pretty
//! JSON file per batch.
//!
//! Writes are synchronous. [`BatchWriter::write`] returns only after every
//! batch has either landed on disk or failed, and a failed batch never stops
//! its siblings from being written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;

use crate::record::MapRecord;
use crate::settings::Settings;

/// Consecutive slice of the record list, numbered from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch<'a, T> {
    pub index: usize,
    pub items: &'a [T],
}

/// Splits `items` into `ceil(len / batch_size)` batches in order. A zero
/// batch size is treated as one.
pub fn partition<T>(items: &[T], batch_size: usize) -> Vec<Batch<'_, T>> {
    items
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, items)| Batch { index, items })
        .collect()
}

#[derive(Serialize)]
struct BatchFile<'a> {
    map_list: &'a [MapRecord],
}

#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub path: PathBuf,
    pub error: io::Error,
}

#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<BatchFailure>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchWriter {
    output_dir: PathBuf,
    prefix: String,
    batch_size: usize,
}

impl BatchWriter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self { output_dir: output_dir.into(), prefix: prefix.into(), batch_size }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.paths.raw, &settings.paths.prefix, settings.batch.size)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn batch_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}{index}.json", self.prefix))
    }

    /// Creates the output directory and, when `clean` is set, removes the
    /// batch files a previous run wrote there. Anything else is left alone.
    pub fn prepare(&self, clean: bool) -> io::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        if clean {
            self.remove_previous_batches()?;
        }
        Ok(())
    }

    fn remove_previous_batches(&self) -> io::Result<()> {
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_str().is_some_and(|name| self.is_batch_file_name(name)) {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Matches `{prefix}{index}.json`, the names [`BatchWriter::batch_path`] produces.
    fn is_batch_file_name(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(".json"))
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Writes every batch. Only a failure to create the output directory is
    /// returned as an error; per-batch failures are logged and reported.
    pub fn write(&self, records: &[MapRecord]) -> io::Result<WriteReport> {
        fs::create_dir_all(&self.output_dir)?;

        let mut report = WriteReport::default();
        for batch in partition(records, self.batch_size) {
            let path = self.batch_path(batch.index);
            match write_batch(&path, batch.items) {
                Ok(()) => {
                    info!("wrote {} maps to {}", batch.items.len(), path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    error!("failed to write batch {} to {}: {e}", batch.index, path.display());
                    report.failed.push(BatchFailure { index: batch.index, path, error: e });
                }
            }
        }
        Ok(report)
    }
}

fn write_batch(path: &Path, records: &[MapRecord]) -> io::Result<()> {
    let json =
        serde_json::to_string_pretty(&BatchFile { map_list: records }).map_err(io::Error::other)?;
    fs::write(path, json)
}
