//! Main entry point for the `pi` CLI.
//!
//! `pi` drives the Predix Insights data-pipeline service: DAGs, dependencies,
//! flow templates, flows and their running instances. Run `pi configure -i`
//! once to store credentials; every other command reuses them.

use insights::config::catalog::builtin_registry;
use insights_cli::build_cli;
use insights_cli::commands;
use insights_cli::error::CliError;

fn main() {
    let registry = match builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            let e = CliError::from(e);
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };
    let matches = match build_cli(&registry).try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() {
                CliError::InvalidArguments(e.kind().to_string()).exit_code()
            } else {
                0
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    match commands::run(registry, &matches) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
