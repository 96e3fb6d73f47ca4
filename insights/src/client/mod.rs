//! Blocking REST client for the Predix Insights service.
//!
//! One [`Client`] talks to one tenant. It authenticates against UAA on
//! demand, then issues one request at a time with the tenant and token
//! headers every endpoint expects. There are no retries and no caching.
//!
//! Endpoint groups live in their own modules and extend [`Client`] with
//! `impl` blocks:
//!
//! - [`admin`]: health check and service version
//! - [`dags`]: DAG upload, deployment and run status
//! - [`dependencies`]: shared dependency files
//! - [`flow_templates`]: flow templates, template-scoped flows and tags
//! - [`flows`]: flows, direct uploads and config files
//! - [`instances`]: running instances, container logs and the Spark proxy
//!
//! # Examples
//!
//! ```no_run
//! use insights::client::{Client, Credentials};
//! use insights::Logger;
//!
//! let credentials = Credentials {
//!     api_host: "https://insights.example.com".into(),
//!     tenant_id: "tenant".into(),
//!     issuer_id: "https://uaa.example.com/oauth/token".into(),
//!     client_id: "app".into(),
//!     client_secret: "secret".into(),
//!     token: String::new(),
//! };
//! let mut client = Client::new(credentials, Logger::default())?;
//! client.authenticate()?;
//! let dags = client.list_dags()?;
//! println!("{dags}");
//! # Ok::<(), insights::Error>(())
//! ```

pub mod admin;
pub mod dags;
pub mod dependencies;
pub mod flow_templates;
pub mod flows;
pub mod instances;
pub mod upload;

use std::time::Duration;

use reqwest::blocking::{Request, RequestBuilder, Response};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::logging::Logger;

pub use dags::DagUpload;
pub use flow_templates::FlowTemplateUpload;
pub use flows::{DirectFlowUpload, DEFAULT_FLOW_PAGES};
pub use instances::ContainerLogSink;
pub use upload::{
    parse_tags, DagTemplate, EncapsulatedSparkArgs, FileDetails, SparkArguments, UploadMetadata,
};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Account and tenant settings written by `pi configure`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the Insights API.
    pub api_host: String,
    /// Tenant identifier, sent as `predix-zone-id`.
    pub tenant_id: String,
    /// UAA token endpoint.
    pub issuer_id: String,
    /// UAA client id.
    pub client_id: String,
    /// UAA client secret.
    pub client_secret: String,
    /// Current `bearer` token, empty before the first authentication.
    pub token: String,
}

impl Credentials {
    /// True when every setting except the token is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.api_host,
            &self.tenant_id,
            &self.issuer_id,
            &self.client_id,
            &self.client_secret,
        ]
        .iter()
        .all(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct UaaResponse {
    access_token: String,
}

/// Status codes a call accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// Exactly this code.
    Status(u16),
    /// Any of these codes.
    OneOf(&'static [u16]),
    /// Any 2xx code.
    Success,
    /// A create call: this code, or `AlreadyExists` on 409.
    Create(u16),
}

impl Expect {
    fn accepts(self, status: u16) -> bool {
        match self {
            Self::Status(code) | Self::Create(code) => status == code,
            Self::OneOf(codes) => codes.contains(&status),
            Self::Success => (200..300).contains(&status),
        }
    }
}

/// Maps a response status to the error the caller sees, if any.
pub(crate) fn check_status(operation: &str, expect: Expect, status: u16, body: &str) -> Result<()> {
    if expect.accepts(status) {
        return Ok(());
    }
    if matches!(expect, Expect::Create(_)) && status == 409 {
        return Err(Error::AlreadyExists {
            operation: operation.to_string(),
        });
    }
    Err(Error::Api {
        operation: operation.to_string(),
        status,
        body: body.to_string(),
    })
}

/// Parses a response body, treating an empty body as JSON `null`.
pub(crate) fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// A response after its status has been checked.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) body: String,
}

impl Reply {
    pub(crate) fn json(&self) -> Result<Value> {
        parse_body(&self.body)
    }
}

/// Predix Insights REST client.
#[derive(Debug)]
pub struct Client {
    credentials: Credentials,
    http: reqwest::blocking::Client,
    logger: Logger,
}

impl Client {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if a credential is missing and `Http` if the
    /// HTTP stack cannot be initialized.
    pub fn new(credentials: Credentials, logger: Logger) -> Result<Self> {
        if !credentials.is_complete() {
            return Err(Error::NotConfigured);
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            credentials,
            http,
            logger,
        })
    }

    /// The credentials in use, including the current token.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The current `bearer` token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.credentials.token
    }

    /// Fetches a fresh token with the client-credentials grant.
    ///
    /// # Errors
    ///
    /// Returns `Http` on transport failure, `Api` on a non-200 answer and
    /// `Json` if the answer has no access token.
    pub fn authenticate(&mut self) -> Result<()> {
        let url = format!("{}?grant_type=client_credentials", self.credentials.issuer_id);
        let builder = self.http.get(url).basic_auth(
            &self.credentials.client_id,
            Some(&self.credentials.client_secret),
        );
        let reply = self.execute("RefreshAuthToken", builder, Expect::Status(200))?;
        let uaa: UaaResponse = serde_json::from_str(&reply.body)?;
        self.credentials.token = format!("bearer {}", uaa.access_token);
        self.logger.debug("authenticated against UAA");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.credentials.api_host.trim_end_matches('/'))
    }

    /// Starts a request carrying the tenant and token headers.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("predix-zone-id", &self.credentials.tenant_id)
            .header("authorization", &self.credentials.token)
    }

    /// Starts a request with a JSON content type.
    pub(crate) fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .header("content-type", "application/json")
    }

    /// Sends a request, dumps it in verbose mode and checks the status.
    pub(crate) fn execute(
        &self,
        operation: &str,
        builder: RequestBuilder,
        expect: Expect,
    ) -> Result<Reply> {
        let request = builder.build()?;
        self.dump_request(&request);

        let response = self.http.execute(request)?;
        let status = response.status().as_u16();
        let dump = self.logger.is_verbose().then(|| response_head(&response));
        let body = response.text()?;
        if let Some(head) = dump {
            self.logger.dump("RESPONSE", &format!("{head}\n{body}"));
        }

        check_status(operation, expect, status, &body)?;
        Ok(Reply { body })
    }

    /// Sends a request and parses the JSON answer.
    pub(crate) fn fetch(&self, operation: &str, builder: RequestBuilder, expect: Expect) -> Result<Value> {
        self.execute(operation, builder, expect)?.json()
    }

    /// Sends a request and discards the answer.
    pub(crate) fn send(&self, operation: &str, builder: RequestBuilder, expect: Expect) -> Result<()> {
        self.execute(operation, builder, expect).map(|_| ())
    }

    fn dump_request(&self, request: &Request) {
        if !self.logger.is_verbose() {
            return;
        }
        let mut out = format!("{} {}", request.method(), request.url());
        for (name, value) in request.headers() {
            out.push_str(&format!("\n{name}: {}", value.to_str().unwrap_or("<binary>")));
        }
        match request.body().map(|b| b.as_bytes()) {
            Some(Some(bytes)) => {
                out.push_str("\n\n");
                out.push_str(&String::from_utf8_lossy(bytes));
            }
            Some(None) => out.push_str("\n\n<streamed body>"),
            None => {}
        }
        self.logger.dump("REQUEST", &out);
    }
}

fn response_head(response: &Response) -> String {
    let mut out = format!("{:?} {}", response.version(), response.status());
    for (name, value) in response.headers() {
        out.push_str(&format!("\n{name}: {}", value.to_str().unwrap_or("<binary>")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn credentials() -> Credentials {
        Credentials {
            api_host: "https://insights.example.com/".into(),
            tenant_id: "tenant-1".into(),
            issuer_id: "https://uaa.example.com/oauth/token".into(),
            client_id: "app".into(),
            client_secret: "secret".into(),
            token: "bearer abc".into(),
        }
    }

    #[test]
    fn test_incomplete_credentials_rejected() {
        let mut creds = credentials();
        creds.tenant_id.clear();
        assert!(!creds.is_complete());
        let err = Client::new(creds, Logger::default()).unwrap_err();
        assert!(matches!(err, Error::NotConfigured));
    }

    #[test]
    fn test_token_not_required() {
        let mut creds = credentials();
        creds.token.clear();
        assert!(creds.is_complete());
    }

    #[test]
    fn test_request_carries_tenant_headers() {
        let client = Client::new(credentials(), Logger::default()).unwrap();
        let request = client
            .json_request(Method::GET, "/api/v1/dags")
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://insights.example.com/api/v1/dags"
        );
        let headers = request.headers();
        assert_eq!(headers["predix-zone-id"], "tenant-1");
        assert_eq!(headers["authorization"], "bearer abc");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_check_status_accepts_expected() {
        assert!(check_status("GetDAG", Expect::Status(200), 200, "").is_ok());
        assert!(check_status("DeleteDAG", Expect::OneOf(&[200, 202, 204]), 204, "").is_ok());
        assert!(check_status("StopInstance", Expect::Success, 299, "").is_ok());
        assert!(check_status("PostDAG", Expect::Create(201), 201, "").is_ok());
    }

    #[test]
    fn test_check_status_conflict_on_create() {
        let err = check_status("PostDAG", Expect::Create(201), 409, "dup").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { ref operation } if operation == "PostDAG"));
    }

    #[test]
    fn test_check_status_conflict_elsewhere_is_api_error() {
        let err = check_status("DeployDAG", Expect::Status(202), 409, "busy").unwrap_err();
        match err {
            Error::Api {
                operation,
                status,
                body,
            } => {
                assert_eq!(operation, "DeployDAG");
                assert_eq!(status, 409);
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_success_range_excludes_300() {
        assert!(check_status("StopInstance", Expect::Success, 300, "").is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("  ").unwrap(), Value::Null);
        assert_eq!(parse_body(r#"{"id":"1"}"#).unwrap()["id"], "1");
        assert!(matches!(parse_body("<html>"), Err(Error::Json(_))));
    }
}
