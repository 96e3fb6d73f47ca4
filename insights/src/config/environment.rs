//! Environment variable lookup for option aliases.
//!
//! Options may declare an environment alias (`DAG_NAME`, `FORCE`, ...).
//! Lookup goes through the [`Environment`] trait so tests can supply a fixed
//! map instead of mutating the process environment.

use std::collections::HashMap;
use std::env;

use crate::config::option::{OptionKind, OptionSpec, OptionValue};
use crate::error::{Error, Result};

/// Source of environment variables.
pub trait Environment {
    /// Returns the variable's value, or `None` when unset or not unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// A fixed, in-memory environment.
///
/// # Examples
///
/// ```
/// use insights::config::{Environment, MapEnvironment};
///
/// let env = MapEnvironment::new().with("DAG_NAME", "nightly");
/// assert_eq!(env.var("DAG_NAME").as_deref(), Some("nightly"));
/// assert_eq!(env.var("FLOW_ID"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets a variable in place.
    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Parses a boolean environment value.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
///
/// # Errors
///
/// Returns `Validation` for any other text.
pub fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::Validation {
            field: key.into(),
            message: format!("Invalid boolean value: {value}"),
        }),
    }
}

/// Reads an option's environment alias and converts it to the option's kind.
///
/// Unset and empty variables are treated as absent for every kind.
///
/// # Errors
///
/// Returns `Validation` if the variable is set but cannot be parsed as the
/// option's kind.
pub fn lookup_option(environment: &dyn Environment, spec: &OptionSpec) -> Result<Option<OptionValue>> {
    let Some(alias) = spec.env_alias() else {
        return Ok(None);
    };
    let Some(raw) = environment.var(alias) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let value = match spec.kind() {
        OptionKind::String => OptionValue::String(raw),
        OptionKind::Bool => OptionValue::Bool(parse_bool(alias, &raw)?),
        OptionKind::Int => OptionValue::Int(raw.trim().parse().map_err(|_| Error::Validation {
            field: alias.into(),
            message: format!("Must be an integer, got '{raw}'"),
        })?),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TEST", "true").unwrap());
        assert!(parse_bool("TEST", "TRUE").unwrap());
        assert!(parse_bool("TEST", "1").unwrap());
        assert!(parse_bool("TEST", "yes").unwrap());
        assert!(parse_bool("TEST", "on").unwrap());

        assert!(!parse_bool("TEST", "false").unwrap());
        assert!(!parse_bool("TEST", "0").unwrap());
        assert!(!parse_bool("TEST", "no").unwrap());
        assert!(!parse_bool("TEST", "off").unwrap());

        assert!(parse_bool("TEST", "invalid").is_err());
    }

    #[test]
    fn test_lookup_string_option() {
        let env = MapEnvironment::new().with("FLOW_ID", "f-1");
        let spec = OptionSpec::string("flowID", "Flow ID").env("FLOW_ID");
        assert_eq!(
            lookup_option(&env, &spec).unwrap(),
            Some(OptionValue::from("f-1"))
        );
    }

    #[test]
    fn test_empty_variable_is_absent() {
        let env = MapEnvironment::new().with("FLOW_ID", "");
        let spec = OptionSpec::string("flowID", "Flow ID").env("FLOW_ID");
        assert_eq!(lookup_option(&env, &spec).unwrap(), None);
    }

    #[test]
    fn test_option_without_alias_is_absent() {
        let env = MapEnvironment::new().with("flowID", "f-1");
        let spec = OptionSpec::string("flowID", "Flow ID");
        assert_eq!(lookup_option(&env, &spec).unwrap(), None);
    }

    #[test]
    fn test_lookup_typed_options() {
        let env = MapEnvironment::new()
            .with("TAIL", "yes")
            .with("CONTAINER_LOG_SINK", "0");
        let tail = OptionSpec::boolean("tail", "Tail").env("TAIL");
        let sink = OptionSpec::integer("containerLogSink", "Sink").env("CONTAINER_LOG_SINK");

        assert_eq!(lookup_option(&env, &tail).unwrap(), Some(OptionValue::Bool(true)));
        assert_eq!(lookup_option(&env, &sink).unwrap(), Some(OptionValue::Int(0)));
    }

    #[test]
    fn test_invalid_integer_is_validation_error() {
        let env = MapEnvironment::new().with("CONTAINER_LOG_SINK", "stdout");
        let sink = OptionSpec::integer("containerLogSink", "Sink").env("CONTAINER_LOG_SINK");
        let err = lookup_option(&env, &sink).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "CONTAINER_LOG_SINK"));
    }
}
