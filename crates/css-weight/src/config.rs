//! Run Configuration

use std::path::PathBuf;

use crate::{CssWeightError, Result};

/// Log file written next to the working directory
pub const LOG_FILE_NAME: &str = "log.txt";

/// Report file used when no output name is given
pub const DEFAULT_OUTPUT_FILE: &str = "complexity.json";

/// Command line usage
pub const USAGE: &str = "\
Usage: css-weight <input.css> [output-name] [options]

Arguments:
  <input.css>     Stylesheet to score
  [output-name]   Write to <output-name>.complexity.json instead of complexity.json

Options:
  --compact       Write single-line JSON
  --breakdown     Add a per-selector score breakdown
  --no-log-file   Log to stderr only
  -h, --help      Print this help";

/// Options for one scoring run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Stylesheet to read
    pub input: Option<PathBuf>,

    /// Output name, see [`crate::Outputter::output_path`]
    pub output_name: Option<String>,

    /// Default report file
    pub output_file: PathBuf,

    /// Log file, `None` logs to stderr
    pub log_file: Option<PathBuf>,

    /// Pretty-print the JSON report
    pub pretty: bool,

    /// Include the per-selector breakdown
    pub breakdown: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output_name: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            log_file: Some(PathBuf::from(LOG_FILE_NAME)),
            pretty: true,
            breakdown: false,
        }
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigRequest {
    Run(Config),
    Help,
}

impl Config {
    /// Parse arguments, program name excluded
    pub fn from_args<I, S>(args: I) -> Result<ConfigRequest>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut positionals = Vec::new();

        for arg in args.into_iter().map(Into::into) {
            match arg.as_str() {
                "-h" | "--help" => return Ok(ConfigRequest::Help),
                "--compact" => config.pretty = false,
                "--breakdown" => config.breakdown = true,
                "--no-log-file" => config.log_file = None,
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(CssWeightError::InvalidInput(format!("unknown option {flag}")));
                }
                _ => positionals.push(arg),
            }
        }

        let mut positionals = positionals.into_iter();
        let input = positionals
            .next()
            .ok_or_else(|| CssWeightError::InvalidInput("no input file given".to_string()))?;
        config.input = Some(PathBuf::from(input));
        config.output_name = positionals.next();

        if let Some(extra) = positionals.next() {
            return Err(CssWeightError::InvalidInput(format!("unexpected argument {extra}")));
        }

        Ok(ConfigRequest::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config(args: &[&str]) -> Config {
        match Config::from_args(args.iter().copied()).unwrap() {
            ConfigRequest::Run(config) => config,
            ConfigRequest::Help => panic!("expected a run request"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_file, PathBuf::from("complexity.json"));
        assert_eq!(config.log_file, Some(PathBuf::from("log.txt")));
        assert!(config.pretty);
        assert!(!config.breakdown);
    }

    #[test]
    fn test_input_only() {
        let config = run_config(&["styles.css"]);
        assert_eq!(config.input, Some(PathBuf::from("styles.css")));
        assert_eq!(config.output_name, None);
    }

    #[test]
    fn test_output_name_and_flags() {
        let config = run_config(&["--compact", "styles.css", "home", "--no-log-file"]);
        assert_eq!(config.output_name.as_deref(), Some("home"));
        assert!(!config.pretty);
        assert!(config.log_file.is_none());
        assert!(!config.breakdown);
        assert!(run_config(&["styles.css", "--breakdown"]).breakdown);
    }

    #[test]
    fn test_help() {
        assert_eq!(Config::from_args(["styles.css", "--help"]).unwrap(), ConfigRequest::Help);
        assert_eq!(Config::from_args(["-h"]).unwrap(), ConfigRequest::Help);
    }

    #[test]
    fn test_invalid_arguments() {
        let empty: [&str; 0] = [];
        assert!(matches!(Config::from_args(empty), Err(CssWeightError::InvalidInput(_))));
        assert!(matches!(
            Config::from_args(["a.css", "b", "c"]),
            Err(CssWeightError::InvalidInput(_))
        ));
        assert!(matches!(
            Config::from_args(["a.css", "--verbose"]),
            Err(CssWeightError::InvalidInput(_))
        ));
    }
}
