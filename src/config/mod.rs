pub mod toml_config;

pub use toml_config::MatcherConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "identity-match")]
#[command(about = "Estimates the probability that two person records describe the same identity")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with cache, lookup and strategy settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "JSON file holding an array of persons to load")]
    pub people: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compare two persons by their position in the people file
    Compare {
        first: usize,
        second: usize,
        #[arg(long, default_value = "Default")]
        strategy: String,
    },
    /// List the rule types that strategies can use
    Rules,
    /// List the configured strategies
    Strategies,
    /// List the loaded persons with their positions
    People,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_matcher_config(&self) -> crate::Result<MatcherConfig> {
        match &self.config {
            Some(path) => MatcherConfig::from_file(path),
            None => Ok(MatcherConfig::default()),
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare() {
        let cli = CliConfig::try_parse_from([
            "identity-match",
            "--people",
            "people.json",
            "compare",
            "0",
            "1",
            "--strategy",
            "Strict",
        ])
        .unwrap();

        assert_eq!(cli.people, Some(PathBuf::from("people.json")));
        match cli.command {
            Command::Compare {
                first,
                second,
                strategy,
            } => {
                assert_eq!((first, second), (0, 1));
                assert_eq!(strategy, "Strict");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let cli = CliConfig::try_parse_from(["identity-match", "rules"]).unwrap();
        let config = cli.load_matcher_config().unwrap();
        assert!(config.strategies.is_empty());
        assert!(!cli.verbose);
    }
}
