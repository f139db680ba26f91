//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use minimind_format::HeadingStyle;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  minimind-format answer.md                   Format a file, print markup
  minimind-format < answer.md                 Read the answer from stdin
  minimind-format --class beginner answer.md  Wrap in the answer container
  minimind-format --json-input --panels a.json  Format a JSON array/object of answers
  minimind-format config                      Show config file and settings
  minimind-format completions bash            Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Format AI tutor answers into sanitized display markup",
    after_help = AFTER_HELP,
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file (omit or use '-' to read stdin)
    pub input: Option<PathBuf>,

    /// Wrap the markup in `<div class="formatted-text CLASS">`
    #[arg(long, value_name = "CLASS")]
    pub class: Option<String>,

    /// Print `{"markup": ...}` instead of raw markup
    #[arg(long)]
    pub json: bool,

    /// Parse input as a JSON value and coerce it to text
    #[arg(long)]
    pub json_input: bool,

    /// With --json-input: input is an array or object of answers, formatted in parallel
    #[arg(long, requires = "json_input")]
    pub panels: bool,

    /// Heading mapping: legacy (# -> h4) or standard (# -> h1)
    #[arg(long, value_name = "STYLE")]
    pub heading_style: Option<HeadingStyle>,

    /// Keep fenced code block interiors untouched by later passes
    #[arg(long)]
    pub protect_code: bool,

    /// Truncate input beyond this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<usize>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show config file path and effective settings
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_flags() {
        let args = Args::try_parse_from([
            "minimind-format",
            "--heading-style",
            "standard",
            "--protect-code",
            "--class",
            "story",
            "answer.md",
        ])
        .unwrap();
        assert_eq!(args.heading_style, Some(HeadingStyle::Standard));
        assert!(args.protect_code);
        assert_eq!(args.class.as_deref(), Some("story"));
        assert_eq!(args.input, Some(PathBuf::from("answer.md")));
        assert!(args.command.is_none());
    }

    #[test]
    fn rejects_unknown_heading_style() {
        assert!(Args::try_parse_from(["minimind-format", "--heading-style", "big"]).is_err());
    }

    #[test]
    fn panels_requires_json_input() {
        assert!(Args::try_parse_from(["minimind-format", "--panels"]).is_err());
    }

    #[test]
    fn config_subcommand() {
        let args = Args::try_parse_from(["minimind-format", "config"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Config)));
    }

    #[test]
    fn log_level_from_flags() {
        let quiet = Args::try_parse_from(["minimind-format", "-q"]).unwrap();
        assert_eq!(quiet.log_level(), "error");
        let debug = Args::try_parse_from(["minimind-format", "-vv"]).unwrap();
        assert_eq!(debug.log_level(), "debug");
    }
}
