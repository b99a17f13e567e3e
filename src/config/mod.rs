/// Unknown-field warnings for configuration files.
pub mod validator;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension watched when neither the CLI nor the config file names one.
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Seconds between two reconciliation cycles.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Seconds to wait after a failed cycle before retrying.
pub const DEFAULT_ERROR_BACKOFF_SECS: f64 = 5.0;

/// Where scanning starts for a file the first time it is noticed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPosition {
    /// Skip the lines present at first sight; only appended lines are reported.
    #[default]
    End,
    /// Report every line of a newly tracked file, including pre-existing ones.
    Beginning,
}

/// Contents of an optional TOML configuration file.
///
/// Every field is optional; command-line flags take precedence over the file,
/// and the file takes precedence over built-in defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// `[watch]` section
    #[serde(default)]
    pub watch: WatchConfig,
}

/// `[watch]` section of the configuration file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct WatchConfig {
    /// File extension filter
    #[serde(default)]
    pub extension: Option<String>,
    /// Poll interval in seconds
    #[serde(default)]
    pub interval: Option<f64>,
    /// Backoff after a failed cycle, in seconds
    #[serde(default)]
    pub error_backoff: Option<f64>,
    /// Initial progress policy for new files
    #[serde(default)]
    pub start_position: Option<StartPosition>,
}

impl Config {
    /// Load configuration from a file
    ///
    /// Unknown fields are reported as warnings, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML or values of the wrong type
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        validator::ConfigValidator::new().warn_unknown_fields(&content, path);

        Ok(config)
    }
}

/// Settings a watch session runs under. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTarget {
    /// Directory whose top-level entries are watched.
    pub directory: PathBuf,
    /// Suffix a file name must end with to be tracked (e.g. ".txt").
    pub extension: String,
    /// Case-sensitive text searched for on every scanned line.
    pub magic: String,
    /// Sleep between successful cycles.
    pub interval: Duration,
    /// Sleep after a failed cycle.
    pub error_backoff: Duration,
    /// Initial progress policy for newly tracked files.
    pub start_position: StartPosition,
}

impl WatchTarget {
    /// Creates a target with default extension, interval, backoff and start position.
    ///
    /// # Errors
    ///
    /// Returns an error if the magic text is empty.
    pub fn new(directory: impl Into<PathBuf>, magic: impl Into<String>) -> Result<Self> {
        let target = Self {
            directory: directory.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            magic: magic.into(),
            interval: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
            error_backoff: Duration::from_secs_f64(DEFAULT_ERROR_BACKOFF_SECS),
            start_position: StartPosition::End,
        };
        target.validate()?;
        Ok(target)
    }

    /// Builds the target from parsed command-line arguments.
    ///
    /// The config file (explicit flag or `DIRWATCHER_CONFIG`) is loaded first,
    /// then every flag given on the command line overrides it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or a resulting value
    /// is invalid (non-positive interval, empty magic text).
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Config::load(path)?.watch,
            None => WatchConfig::default(),
        };

        let interval = cli
            .interval
            .or(file.interval)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        let error_backoff = cli
            .backoff
            .or(file.error_backoff)
            .unwrap_or(DEFAULT_ERROR_BACKOFF_SECS);
        let start_position = if cli.from_start {
            StartPosition::Beginning
        } else {
            file.start_position.unwrap_or_default()
        };

        let target = Self {
            directory: cli.path.clone(),
            extension: cli
                .ext
                .clone()
                .or(file.extension)
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            magic: cli.magic.clone(),
            interval: seconds("interval", interval)?,
            error_backoff: seconds("error backoff", error_backoff)?,
            start_position,
        };
        target.validate()?;
        Ok(target)
    }

    /// Returns true if `name` passes the extension filter.
    #[must_use]
    pub fn matches_extension(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
    }

    fn validate(&self) -> Result<()> {
        if self.magic.is_empty() {
            bail!("Magic text must not be empty");
        }
        if self.interval.is_zero() {
            bail!("Poll interval must be greater than zero");
        }
        Ok(())
    }
}

/// Converts a seconds value into a duration, rejecting negative, zero and non-finite input.
fn seconds(what: &str, value: f64) -> Result<Duration> {
    if !value.is_finite() || value <= 0.0 {
        bail!("Invalid {what}: {value} (must be a positive number of seconds)");
    }
    Duration::try_from_secs_f64(value).with_context(|| format!("Invalid {what}: {value}"))
}
