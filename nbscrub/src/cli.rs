// nbscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the nbscrub
//! application and its arguments.

use clap::Parser;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "nbscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Repair malformed Unicode in notebook files",
    long_about = "nbscrub removes unpaired surrogates, invalid UTF-8 and replacement characters from the text fields of a notebook (cell sources, output text and output data) and writes it back as clean UTF-8 JSON. Every other field is preserved as-is. The notebook is repaired in place unless an output path is given.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// The notebook to repair.
    #[arg(value_name = "INPUT", help = "Path to the notebook to repair.")]
    pub input: PathBuf,

    /// Where to write the repaired notebook. Defaults to INPUT.
    #[arg(value_name = "OUTPUT", help = "Write the repaired notebook here instead of overwriting INPUT.")]
    pub output: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "NBSCRUB_CONFIG", help = "Path to a configuration file (YAML) merged over the defaults.")]
    pub config: Option<PathBuf>,

    /// Report whether the notebook needs repair without writing anything.
    #[arg(long = "check", help = "Do not write; exit with status 1 if the notebook would change.")]
    pub check: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long = "json", help = "Print the sanitization report as JSON instead of status messages.")]
    pub json: bool,

    /// Disable informational messages
    #[arg(long, short = 'q', conflicts_with = "debug", help = "Suppress status messages and logging.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this run)
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,
}

impl Cli {
    /// The path the repaired notebook is written to.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults_to_input() {
        let cli = Cli::try_parse_from(["nbscrub", "nb.ipynb"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("nb.ipynb"));
        assert!(!cli.check);
    }

    #[test]
    fn test_explicit_output() {
        let cli = Cli::try_parse_from(["nbscrub", "in.ipynb", "out.ipynb", "--check"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("out.ipynb"));
        assert!(cli.check);
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["nbscrub"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["nbscrub", "nb.ipynb", "-q", "-d"]).is_err());
    }
}
