//! CLI binary for the ClickUp tools.
//!
//! This binary is a thin wrapper that parses arguments, loads settings, and
//! delegates to the library.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use clickup_tools::cli::{self, Cli};
use clickup_tools::config::Settings;
use clickup_tools::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("Warning: logging init failed: {e}");
        }
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {e}");
            return ExitCode::from(1);
        }
    };

    // Only read stdin for commands that need it (avoids blocking on terminal)
    let stdin = if cli.command.needs_stdin() { read_stdin() } else { String::new() };

    let output = cli::run(cli.command, &settings, &stdin);

    for msg in output.stdout {
        println!("{msg}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}

fn read_stdin() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error reading stdin: {e}");
    }
    input
}
