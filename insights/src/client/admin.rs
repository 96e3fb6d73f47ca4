//! Service health and version.

use reqwest::Method;

use super::{Client, Expect};
use crate::error::Result;

const STATUS_RESOURCE: &str = "/api/v1/status";
const VERSION_RESOURCE: &str = "/api/v1/version";

impl Client {
    /// Succeeds when the service answers its status endpoint with 200.
    ///
    /// # Errors
    ///
    /// Returns `Api` on any other status.
    pub fn check_status(&self) -> Result<()> {
        let builder = self.request(Method::GET, STATUS_RESOURCE);
        self.send("CheckStatus", builder, Expect::Status(200))
    }

    /// Returns the service version string.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn check_version(&self) -> Result<String> {
        let builder = self.request(Method::GET, VERSION_RESOURCE);
        let reply = self.execute("CheckVersion", builder, Expect::Status(200))?;
        Ok(reply.body.trim().to_string())
    }
}
