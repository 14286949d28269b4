//! Command-line interface

pub mod output;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Runs the project's QA tools as configured in ci-runner.config.yaml
#[derive(Debug, Parser, Clone)]
#[command(name = "ci-runner")]
#[command(version)]
#[command(about = "Runs the project's QA tools as configured in ci-runner.config.yaml", long_about = None)]
pub struct Cli {
    /// Skip every step that can modify files (formatters, refactorers)
    #[arg(long)]
    pub no_mods: bool,

    /// Path to the config file instead of searching parent directories
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Arguments passed through by wrapper scripts; only `--no-mods` is honoured
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<OsString>,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Whether `--no-mods` appeared anywhere in the arguments
    pub fn no_mods_requested(&self) -> bool {
        self.no_mods || self.rest.iter().any(|arg| arg == "--no-mods")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ci-runner"]).unwrap();
        assert!(!cli.no_mods);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.report.is_none());
        assert!(!cli.no_mods_requested());
    }

    #[test]
    fn test_no_mods_anywhere_in_args() {
        let cli = Cli::try_parse_from(["ci-runner", "-v", "--no-mods"]).unwrap();
        assert!(cli.no_mods_requested());

        let cli = Cli::try_parse_from(["ci-runner", "--no-mods", "--config", "ci.yaml"]).unwrap();
        assert!(cli.no_mods_requested());
        assert_eq!(cli.config, Some(PathBuf::from("ci.yaml")));
    }

    #[test]
    fn test_no_mods_after_extra_arguments() {
        let cli = Cli::try_parse_from(["ci-runner", "extra", "--no-mods"]).unwrap();
        assert!(cli.no_mods_requested());
        assert_eq!(cli.rest, vec![OsString::from("extra"), OsString::from("--no-mods")]);
    }

    #[test]
    fn test_unknown_flags_are_passed_over() {
        let cli = Cli::try_parse_from(["ci-runner", "--no-mods", "--ansi"]).unwrap();
        assert!(cli.no_mods_requested());

        let cli = Cli::try_parse_from(["ci-runner", "--", "--no-mods"]).unwrap();
        assert!(cli.no_mods_requested());

        let cli = Cli::try_parse_from(["ci-runner", "--ansi", "extra"]).unwrap();
        assert!(!cli.no_mods_requested());
    }
}
