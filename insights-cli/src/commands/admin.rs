//! `pi admin`: service health and API version.

use insights::ConfigurationContext;

use crate::commands::unknown;
use crate::error::CliError;
use crate::utils::{client, connect};

/// Runs an `admin` subcommand.
pub fn execute(ctx: &mut ConfigurationContext, leaf: &str) -> Result<(), CliError> {
    match leaf {
        "health-check" => {
            connect(ctx)?.check_status()?;
            println!("Up and running!");
        }
        // The version endpoint is public.
        "version" => println!("{}", client(ctx)?.check_version()?),
        _ => return Err(unknown(&format!("admin {leaf}"))),
    }
    Ok(())
}
