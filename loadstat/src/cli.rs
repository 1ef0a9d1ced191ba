//! Command-line interface for loadstat.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loadstat")]
#[command(about = "Statistically rigorous A/B comparison of page-load trial batches")]
#[command(version)]
pub struct Cli {
    /// Directory containing trial record JSON files
    #[arg(short, long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Baseline batch label to compare against
    #[arg(short, long)]
    pub baseline: String,

    /// Candidate batch label to test
    #[arg(short, long)]
    pub candidate: String,

    /// Confidence level for the ratio interval (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit the comparison as JSON instead of a terminal table
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(confidence_level) = self.confidence_level {
            config.stats.confidence_level = confidence_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from([
            "loadstat",
            "--results-dir",
            "trials",
            "--baseline",
            "b1",
            "--candidate",
            "b2",
            "--confidence-level",
            "0.9",
            "--verbose",
        ]);

        assert_eq!(cli.results_dir, PathBuf::from("trials"));
        assert_eq!(cli.baseline, "b1");
        assert_eq!(cli.candidate, "b2");
        assert_eq!(cli.confidence_level, Some(0.9));
        assert!(cli.verbose);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::parse_from(["loadstat", "--baseline", "b1", "--candidate", "b2"]);

        assert_eq!(cli.results_dir, PathBuf::from("results"));
        assert_eq!(cli.confidence_level, None);
        assert_eq!(cli.config, None);
        assert!(!cli.no_color);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_apply_to_config_with_override() {
        let cli = Cli::parse_from([
            "loadstat",
            "--baseline",
            "b1",
            "--candidate",
            "b2",
            "--confidence-level",
            "0.99",
        ]);

        let mut config = Config::default();
        cli.apply_to_config(&mut config);
        assert_eq!(config.stats.confidence_level, 0.99);
    }

    #[test]
    fn test_apply_to_config_without_override() {
        let cli = Cli::parse_from(["loadstat", "--baseline", "b1", "--candidate", "b2"]);

        let mut config = Config::default();
        let original = config.stats.confidence_level;
        cli.apply_to_config(&mut config);
        assert_eq!(config.stats.confidence_level, original);
    }
}
