//! Settings record loaded once at startup and passed explicitly to the batch
//! loop and the writer.
//!
//! The on-disk format is TOML. Every table is optional:
//!
//! ```toml
//! [paths]
//! raw = "data/raw"
//! prefix = "rawMaps"
//! clean = true
//!
//! [batch]
//! size = 100
//!
//! [limits]
//! invoke_failure_ceiling = 10
//! search_attempts_per_step = 3
//! accept_attempt_ceiling = 1000
//! max_errors = 100
//!
//! [generator]
//! retry = 100
//! special = false
//! seed = 42
//!
//! [sizes.small]
//! map_min = 12
//! map_max = 20
//! room_min = 3
//! room_max = 6
//! room_ideal = 4
//! retry = 100
//! ```

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::invoker::DEFAULT_FAILURE_CEILING;
use crate::search::DEFAULT_ATTEMPTS_PER_STEP;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_ERRORS: u32 = 100;
pub const DEFAULT_ACCEPT_ATTEMPT_CEILING: u32 = 1000;
pub const DEFAULT_GENERATOR_RETRY: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub paths: PathSettings,
    pub batch: BatchSettings,
    pub limits: LimitSettings,
    pub generator: GeneratorSettings,
    pub sizes: BTreeMap<String, SizeProfile>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    /// Output directory for batch files.
    pub raw: PathBuf,
    pub prefix: String,
    /// Empty the output directory before writing.
    pub clean: bool,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self { raw: PathBuf::from("data/raw"), prefix: "rawMaps".to_string(), clean: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    pub size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { size: DEFAULT_BATCH_SIZE }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitSettings {
    pub invoke_failure_ceiling: u32,
    pub search_attempts_per_step: u32,
    pub accept_attempt_ceiling: u32,
    pub max_errors: u32,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            invoke_failure_ceiling: DEFAULT_FAILURE_CEILING,
            search_attempts_per_step: DEFAULT_ATTEMPTS_PER_STEP,
            accept_attempt_ceiling: DEFAULT_ACCEPT_ATTEMPT_CEILING,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Placement attempts inside a single generator call.
    pub retry: u32,
    pub special: bool,
    pub seed: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self { retry: DEFAULT_GENERATOR_RETRY, special: false, seed: 42 }
    }
}

/// Generation bounds for one size category, e.g. `small` or `large`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeProfile {
    pub map_min: usize,
    pub map_max: usize,
    pub room_min: usize,
    pub room_max: usize,
    pub room_ideal: usize,
    pub retry: u32,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)
            .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn profile(&self, label: &str) -> Result<&SizeProfile, SettingsError> {
        self.sizes.get(label).ok_or_else(|| SettingsError::MissingProfile(label.to_string()))
    }

    /// Rejects settings that could never make progress. Zero error ceilings
    /// are allowed and mean "stop at the first failure".
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.batch.size == 0 {
            return Err(SettingsError::Invalid("batch.size must be positive".to_string()));
        }
        if self.generator.retry == 0 {
            return Err(SettingsError::Invalid("generator.retry must be positive".to_string()));
        }
        if self.limits.search_attempts_per_step == 0 || self.limits.accept_attempt_ceiling == 0 {
            return Err(SettingsError::Invalid(
                "search and accept attempt limits must be positive".to_string(),
            ));
        }
        if self.paths.prefix.contains(['/', '\\']) {
            return Err(SettingsError::Invalid(format!(
                "paths.prefix {:?} must not contain path separators",
                self.paths.prefix
            )));
        }
        for (label, profile) in &self.sizes {
            profile.validate().map_err(|reason| {
                SettingsError::Invalid(format!("sizes.{label}: {reason}"))
            })?;
        }
        Ok(())
    }
}

impl SizeProfile {
    fn validate(&self) -> Result<(), String> {
        if self.map_min == 0 || self.map_min > self.map_max {
            return Err(format!("map range {}..={} is empty", self.map_min, self.map_max));
        }
        if self.room_min == 0 || self.room_min > self.room_max {
            return Err(format!("room range {}..={} is empty", self.room_min, self.room_max));
        }
        if self.room_ideal == 0 || self.retry == 0 {
            return Err("room_ideal and retry must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
    Invalid(String),
    MissingProfile(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read settings file {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "malformed settings: {e}"),
            Self::Invalid(reason) => write!(f, "invalid settings: {reason}"),
            Self::MissingProfile(label) => write!(f, "no [sizes.{label}] profile configured"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) | Self::MissingProfile(_) => None,
        }
    }
}
