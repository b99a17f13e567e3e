//! Logging setup for the dirwatcher binary.
//!
//! All output goes through `tracing`; this module installs a timestamped
//! stderr subscriber whose level follows the `-v`/`-q` flags unless
//! `RUST_LOG` says otherwise.

use anyhow::{Result, anyhow};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Verbosity level selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet,
    /// Tracking changes, matches, errors and the shutdown summary.
    #[default]
    Normal,
    /// Also per-cycle and per-file progress details.
    Verbose,
}

impl Verbosity {
    /// Map the `-v`/`-q` flags; `-v` wins.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub const fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "dirwatcher=warn",
            Self::Normal => "dirwatcher=info",
            Self::Verbose => "dirwatcher=debug",
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity: Verbosity) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, false, Verbosity::Normal, "dirwatcher=info")]
    #[case(true, false, Verbosity::Verbose, "dirwatcher=debug")]
    #[case(false, true, Verbosity::Quiet, "dirwatcher=warn")]
    fn test_verbosity_from_flags(
        #[case] verbose: bool,
        #[case] quiet: bool,
        #[case] expected: Verbosity,
        #[case] filter: &str,
    ) {
        let verbosity = Verbosity::from_flags(verbose, quiet);
        assert_eq!(verbosity, expected);
        assert_eq!(verbosity.default_filter(), filter);
    }
}
