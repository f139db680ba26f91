//! # minimind-format
//!
//! Command-line front end for the MiniMind answer formatter: reads a raw AI
//! answer from a file or stdin and prints sanitized display markup.
//!
//! ## Features
//! - Markup or JSON output, optional answer container
//! - JSON input with JavaScript-style coercion, batch formatting of mode panels
//! - Configuration from config.json, environment, and flags

mod cli;
mod run;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    if let Some(Commands::Completions { shell }) = &args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        cli::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    // Print user-friendly message; exit uses Display not Debug
    let config = run::resolve_config(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match args.command {
        Some(Commands::Config) => {
            minimind_format::core::cli::run_config(&config);
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
        None => run::run_format(&args, &config),
    }
}
