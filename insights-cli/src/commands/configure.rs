//! `pi configure`: store the account credentials and verify them.
//!
//! The credentials are resolved like any other options, so they can come
//! from flags, environment, the config file or interactive prompts. A
//! successful login stores the fresh token next to them.

use insights::{Client, ConfigurationContext};

use crate::error::CliError;
use crate::utils::{read_credentials, CONFIGURE};

/// Logs in with the resolved credentials and records the token.
pub fn execute(ctx: &mut ConfigurationContext) -> Result<(), CliError> {
    let credentials = read_credentials(ctx, CONFIGURE)?;
    let mut client = Client::new(credentials, *ctx.logger())?;
    client.authenticate()?;

    ctx.set(CONFIGURE, "Token", client.token())?;
    println!("login success");
    Ok(())
}
