//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use infrastructure::AppConfig;

/// Campus weather CLI
#[derive(Debug, Parser)]
#[command(name = "weather")]
#[command(author, version, about = "Current weather at the campus station", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Accept stored readings up to this many seconds old
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_age: Option<u64>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print current conditions (default)
    Current,

    /// Print the last 24 hours in 3-hour slots
    Report,

    /// Print current conditions as API JSON
    Api,
}

impl Cli {
    /// Subcommand to run, `current` when none was given
    #[must_use]
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Current)
    }

    /// Apply command-line overrides on top of the loaded configuration
    ///
    /// The configured log filter is kept unless `-v` was given.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(filter) = log_filter_from_verbosity(self.verbose) {
            config.logging.filter = filter.to_string();
        }
        if let Some(secs) = self.max_age {
            config.freshness.page_max_age_secs = secs;
            config.freshness.api_max_age_secs = secs;
        }
    }
}

/// Log filter requested by the verbosity count, if any
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(255), Some("trace"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
