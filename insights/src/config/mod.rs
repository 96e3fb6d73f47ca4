//! Configuration resolution engine for `pi`.
//!
//! Every command declares named, typed options. On each invocation the
//! options are resolved across layered sources, required fields are checked
//! (or prompted for in interactive mode), and the resolved values are
//! written back to the config file once the command is done.
//!
//! # Resolution Precedence
//!
//! Highest first:
//!
//! 1. Command-line flag given on this invocation
//! 2. Value already in the command's value store
//! 3. Environment variable alias (`DAG_NAME`, `FLOW_ID`, ...)
//! 4. Persisted config file (`~/.pi/config.json`)
//! 5. Declared default
//!
//! Empty strings count as absent at every layer.
//!
//! # Examples
//!
//! ```
//! use insights::config::{
//!     ConfigurationContext, FlagValues, GlobalFlags, MapEnvironment, TerminalPrompter,
//! };
//! use insights::config::catalog::builtin_registry;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let globals = GlobalFlags::new(false, false, dir.path().join("config.json")).unwrap();
//! let env = MapEnvironment::new().with("INSTANCE_ID", "i-42");
//! let mut ctx = ConfigurationContext::new(builtin_registry().unwrap(), globals, env);
//!
//! let mut prompter = TerminalPrompter::new("".as_bytes(), Vec::new());
//! ctx.prepare("instance stop", &FlagValues::new(), &mut prompter).unwrap();
//! assert_eq!(ctx.get_string("instance stop", "instanceID").unwrap(), "i-42");
//!
//! ctx.finish("instance stop").unwrap();
//! ```

pub mod catalog;
pub mod context;
pub mod enforcer;
pub mod environment;
pub mod loader;
pub mod option;
pub mod persist;
pub mod registry;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use context::{ConfigurationContext, GlobalFlags};
pub use enforcer::{
    confirm, EnforcementReport, FieldState, Prompter, RequiredFieldEnforcer, TerminalPrompter,
    MAX_CONFIRM_ATTEMPTS,
};
pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
pub use loader::{default_config_path, PersistedConfig};
pub use option::{OptionKind, OptionSpec, OptionValue};
pub use persist::PersistenceSink;
pub use registry::{CommandOptionSet, OptionRegistry};
pub use resolver::{FlagValues, PrecedenceResolver, Provenance, ResolutionReport};
pub use store::ValueStore;
