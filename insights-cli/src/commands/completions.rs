//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use std::io;

use clap::ArgMatches;
use clap_complete::{generate, Shell};
use insights::config::OptionRegistry;

use crate::cli::{build_cli, BIN_NAME};
use crate::error::CliError;

/// Prints install hints on stderr and the script on stdout.
pub fn execute(registry: &OptionRegistry, matches: &ArgMatches) -> Result<(), CliError> {
    let shell = *matches
        .get_one::<Shell>("shell")
        .ok_or_else(|| CliError::InvalidArguments("missing shell".into()))?;
    let mut cmd = build_cli(registry);

    eprintln!("# Generating {shell} completion script");
    eprintln!("# Run the following command to enable completions:");

    match shell {
        Shell::Bash => {
            eprintln!("#   pi completions bash > ~/.local/share/bash-completion/completions/pi");
            eprintln!("# Or source it directly in ~/.bashrc:");
            eprintln!("#   eval \"$(pi completions bash)\"");
        }
        Shell::Zsh => {
            eprintln!("#   pi completions zsh > ~/.zsh/completions/_pi");
            eprintln!("# Make sure ~/.zsh/completions is in your $fpath");
        }
        Shell::Fish => {
            eprintln!("#   pi completions fish > ~/.config/fish/completions/pi.fish");
        }
        Shell::PowerShell => {
            eprintln!("#   pi completions powershell | Out-String | Invoke-Expression");
        }
        _ => {}
    }

    eprintln!();

    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());

    Ok(())
}
