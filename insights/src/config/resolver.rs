//! Layered precedence resolution.
//!
//! Each option of a command resolves independently, highest layer first:
//!
//! 1. A flag given on this invocation's command line
//! 2. A value already in the command's value store (session)
//! 3. The option's environment alias
//! 4. The persisted config file
//! 5. The declared default
//!
//! For string options an empty string is absent at every layer, so an empty
//! flag does not hide a non-empty config-file value. Boolean and integer
//! values are final at the first layer that supplies one.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::environment::{lookup_option, Environment};
use crate::config::loader::PersistedConfig;
use crate::config::option::{OptionSpec, OptionValue};
use crate::config::registry::{check_kind, CommandOptionSet};
use crate::error::Result;

/// Flags that were explicitly given on the command line.
///
/// Only options the user actually typed belong here; defaults filled in by
/// an argument parser must be left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: BTreeMap<String, OptionValue>,
}

impl FlagValues {
    /// Creates an empty set of flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a flag in place.
    pub fn insert(&mut self, name: &str, value: impl Into<OptionValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Returns a flag's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Iterates over flag names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// The layer an option's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    /// An explicit command-line flag.
    Flag,
    /// A value already held by the value store.
    Session,
    /// An environment variable.
    Environment,
    /// The persisted config file.
    ConfigFile,
    /// The declared default.
    Default,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::Session => write!(f, "session"),
            Self::Environment => write!(f, "environment"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Where every option of one resolution came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    entries: Vec<(String, Provenance)>,
}

impl ResolutionReport {
    /// Returns the provenance of one option.
    #[must_use]
    pub fn provenance(&self, name: &str) -> Option<Provenance> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
    }

    /// Iterates over `(option, provenance)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Provenance)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), *p))
    }
}

/// Resolves option values across the five layers.
pub struct PrecedenceResolver<'a> {
    environment: &'a dyn Environment,
    persisted: &'a PersistedConfig,
}

impl<'a> PrecedenceResolver<'a> {
    /// Creates a resolver over an environment and a loaded config file.
    #[must_use]
    pub fn new(environment: &'a dyn Environment, persisted: &'a PersistedConfig) -> Self {
        Self {
            environment,
            persisted,
        }
    }

    /// Resolves every option of `set` and stores the results.
    ///
    /// # Errors
    ///
    /// - `UnknownOption` if `flags` names an option the command does not declare
    /// - `TypeMismatch` if a flag's value has the wrong kind
    /// - `Validation` if an environment value cannot be parsed
    ///
    /// On error the value store is left untouched.
    pub fn resolve(&self, set: &mut CommandOptionSet, flags: &FlagValues) -> Result<ResolutionReport> {
        for name in flags.names() {
            set.spec(name)?;
        }

        let mut resolved = Vec::with_capacity(set.options().len());
        for spec in set.options() {
            let (value, provenance) =
                self.resolve_option(spec, flags.get(spec.name()), set.store().get(spec.name()))?;
            log::debug!(
                "{} --{} resolved from {provenance}",
                set.command(),
                spec.name()
            );
            resolved.push((spec.name().to_string(), value, provenance));
        }

        let mut report = ResolutionReport::default();
        for (name, value, provenance) in resolved {
            set.set(&name, value)?;
            report.entries.push((name, provenance));
        }
        Ok(report)
    }

    /// Resolves a single option given its flag and session values.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for a mistyped flag or session value and
    /// `Validation` for an unparsable environment value.
    pub fn resolve_option(
        &self,
        spec: &OptionSpec,
        flag: Option<&OptionValue>,
        session: Option<&OptionValue>,
    ) -> Result<(OptionValue, Provenance)> {
        if let Some(value) = present(spec, flag)? {
            return Ok((value, Provenance::Flag));
        }
        if let Some(value) = present(spec, session)? {
            return Ok((value, Provenance::Session));
        }
        if let Some(value) = lookup_option(self.environment, spec)? {
            if !value.is_empty_string() {
                return Ok((value, Provenance::Environment));
            }
        }
        if let Some(value) = self.persisted.value_for(spec) {
            if !value.is_empty_string() {
                return Ok((value, Provenance::ConfigFile));
            }
        }
        Ok((spec.default().clone(), Provenance::Default))
    }
}

fn present(spec: &OptionSpec, value: Option<&OptionValue>) -> Result<Option<OptionValue>> {
    match value {
        Some(v) => {
            check_kind(spec.name(), spec.kind(), v)?;
            Ok((!v.is_empty_string()).then(|| v.clone()))
        }
        None => Ok(None),
    }
}

/// Convenience wrapper reporting `UnknownOption` for a name `set` lacks.
///
/// # Errors
///
/// Returns `UnknownOption` when `name` is not declared by `set`.
pub fn resolve_named(
    resolver: &PrecedenceResolver<'_>,
    set: &CommandOptionSet,
    name: &str,
    flags: &FlagValues,
) -> Result<OptionValue> {
    let spec = set.spec(name)?;
    resolver
        .resolve_option(spec, flags.get(name), set.store().get(name))
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::MapEnvironment;
    use crate::config::registry::OptionRegistry;
    use crate::error::Error;

    const COMMAND: &str = "instance list-container-logs";

    fn registry() -> OptionRegistry {
        let mut registry = OptionRegistry::new();
        registry
            .register_command(
                COMMAND,
                vec![
                    OptionSpec::string("instanceID", "Instance ID")
                        .required()
                        .env("INSTANCE_ID"),
                    OptionSpec::boolean("tail", "Tail").env("TAIL"),
                    OptionSpec::integer("containerLogSink", "Sink")
                        .env("CONTAINER_LOG_SINK")
                        .default_value(1),
                ],
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_flag_beats_every_layer() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        set.set("instanceID", OptionValue::from("session")).unwrap();
        let env = MapEnvironment::new().with("INSTANCE_ID", "env");
        let persisted = PersistedConfig::from_json(r#"{"instanceID": "file"}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let report = resolver
            .resolve(set, &FlagValues::new().with("instanceID", "flag"))
            .unwrap();

        assert_eq!(set.get_string("instanceID").unwrap(), "flag");
        assert_eq!(report.provenance("instanceID"), Some(Provenance::Flag));
    }

    #[test]
    fn test_session_beats_environment() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        set.set("instanceID", OptionValue::from("session")).unwrap();
        let env = MapEnvironment::new().with("INSTANCE_ID", "env");
        let persisted = PersistedConfig::default();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let report = resolver.resolve(set, &FlagValues::new()).unwrap();
        assert_eq!(set.get_string("instanceID").unwrap(), "session");
        assert_eq!(report.provenance("instanceID"), Some(Provenance::Session));
    }

    #[test]
    fn test_environment_beats_config_file() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new().with("INSTANCE_ID", "env");
        let persisted = PersistedConfig::from_json(r#"{"instanceID": "file"}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        resolver.resolve(set, &FlagValues::new()).unwrap();
        assert_eq!(set.get_string("instanceID").unwrap(), "env");
    }

    #[test]
    fn test_empty_flag_falls_through_to_config_file() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted = PersistedConfig::from_json(r#"{"instanceID": "X"}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let report = resolver
            .resolve(set, &FlagValues::new().with("instanceID", ""))
            .unwrap();
        assert_eq!(set.get_string("instanceID").unwrap(), "X");
        assert_eq!(report.provenance("instanceID"), Some(Provenance::ConfigFile));
    }

    #[test]
    fn test_empty_config_value_falls_to_default() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new().with("INSTANCE_ID", "");
        let persisted = PersistedConfig::from_json(r#"{"instanceID": ""}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let report = resolver.resolve(set, &FlagValues::new()).unwrap();
        assert_eq!(set.get_string("instanceID").unwrap(), "");
        assert_eq!(report.provenance("instanceID"), Some(Provenance::Default));
    }

    #[test]
    fn test_false_and_zero_flags_are_final() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new().with("TAIL", "true");
        let persisted = PersistedConfig::from_json(r#"{"containerLogSink": 1}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let flags = FlagValues::new()
            .with("tail", false)
            .with("containerLogSink", 0_i64);
        let report = resolver.resolve(set, &flags).unwrap();

        assert!(!set.get_bool("tail").unwrap());
        assert_eq!(set.get_int("containerLogSink").unwrap(), 0);
        assert_eq!(report.provenance("tail"), Some(Provenance::Flag));
    }

    #[test]
    fn test_typed_values_from_config_file() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted =
            PersistedConfig::from_json(r#"{"tail": true, "containerLogSink": 0}"#).unwrap();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        resolver.resolve(set, &FlagValues::new()).unwrap();
        assert!(set.get_bool("tail").unwrap());
        assert_eq!(set.get_int("containerLogSink").unwrap(), 0);
    }

    #[test]
    fn test_defaults_when_no_layer_supplies() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted = PersistedConfig::default();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let report = resolver.resolve(set, &FlagValues::new()).unwrap();
        assert_eq!(set.get_int("containerLogSink").unwrap(), 1);
        assert!(report.iter().all(|(_, p)| p == Provenance::Default));
    }

    #[test]
    fn test_unknown_flag_is_error() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted = PersistedConfig::default();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let err = resolver
            .resolve(set, &FlagValues::new().with("flowID", "f"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOption { .. }));
        assert!(set.store().is_empty());
    }

    #[test]
    fn test_mistyped_flag_is_error() {
        let mut registry = registry();
        let set = registry.lookup_mut(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted = PersistedConfig::default();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let err = resolver
            .resolve(set, &FlagValues::new().with("tail", "yes"))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_resolve_named_unknown_option() {
        let registry = registry();
        let set = registry.lookup(COMMAND).unwrap();
        let env = MapEnvironment::new();
        let persisted = PersistedConfig::default();
        let resolver = PrecedenceResolver::new(&env, &persisted);

        let err = resolve_named(&resolver, set, "dagName", &FlagValues::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { .. }));
        assert_eq!(
            resolve_named(&resolver, set, "containerLogSink", &FlagValues::new()).unwrap(),
            OptionValue::Int(1)
        );
    }
}
