#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # insights
//!
//! Configuration engine and REST client behind the `pi` command-line tool
//! for the Predix Insights data-pipeline service.
//!
//! Every `pi` command declares typed options. Before a command runs, each
//! option is resolved from the command line, the in-process value store,
//! an environment variable and the persisted config file, in that order.
//! Required options are enforced (or prompted for), and after the command
//! the resolved values are written back so the next invocation can reuse
//! them.
//!
//! ## Core Types
//!
//! - [`ConfigurationContext`]: registry, global flags, environment and config file
//! - [`OptionSpec`] and [`OptionRegistry`]: declared options per command
//! - [`Client`]: blocking REST client for DAGs, flows, templates and instances
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use insights::config::catalog::builtin_registry;
//! use insights::{ConfigurationContext, FlagValues, GlobalFlags, MapEnvironment, TerminalPrompter};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("config.json"), r#"{"dagName": "nightly"}"#).unwrap();
//!
//! let globals = GlobalFlags::new(false, false, dir.path().join("config.json")).unwrap();
//! let mut ctx = ConfigurationContext::new(builtin_registry().unwrap(), globals, MapEnvironment::new());
//!
//! let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
//! ctx.prepare("dag status", &FlagValues::new(), &mut prompter).unwrap();
//! assert_eq!(ctx.get_string("dag status", "dagName").unwrap(), "nightly");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

// Re-export key types at crate root for convenience
pub use client::{Client, Credentials};
pub use config::{
    ConfigurationContext, FlagValues, GlobalFlags, MapEnvironment, OptionKind, OptionRegistry,
    OptionSpec, OptionValue, Prompter, Provenance, TerminalPrompter,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
