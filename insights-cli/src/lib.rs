//! Library exports for insights-cli.
//!
//! The command tree is exported so tests and tooling can build it without
//! running the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::build_cli;
