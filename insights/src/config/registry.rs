//! Option registry and per-command option sets.
//!
//! The registry is built once at startup. Each registered command owns a
//! [`CommandOptionSet`]: its ordered option declarations plus the
//! [`ValueStore`] holding the values resolved for the current invocation.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::option::{OptionKind, OptionSpec, OptionValue};
use crate::config::store::ValueStore;
use crate::error::{Error, Result};

/// The declared options of one command together with its value store.
#[derive(Debug, Clone)]
pub struct CommandOptionSet {
    command: String,
    options: Vec<OptionSpec>,
    store: ValueStore,
    persist_path: Option<PathBuf>,
}

impl CommandOptionSet {
    fn new(command: &str, options: Vec<OptionSpec>) -> Self {
        Self {
            command: command.to_string(),
            options,
            store: ValueStore::new(),
            persist_path: None,
        }
    }

    /// The command identifier, such as `"dag create"`.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The declared options in registration order.
    #[must_use]
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// The current value store.
    #[must_use]
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Where the persistence sink last wrote this set, if anywhere.
    #[must_use]
    pub fn persist_path(&self) -> Option<&Path> {
        self.persist_path.as_deref()
    }

    pub(crate) fn set_persist_path(&mut self, path: PathBuf) {
        self.persist_path = Some(path);
    }

    /// True when the command declares an option called `name`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name() == name)
    }

    /// Looks up an option declaration.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` if the command does not declare `name`.
    pub fn spec(&self, name: &str) -> Result<&OptionSpec> {
        self.options
            .iter()
            .find(|o| o.name() == name)
            .ok_or_else(|| Error::UnknownOption {
                command: self.command.clone(),
                option: name.to_string(),
            })
    }

    /// Returns the effective value of an option.
    ///
    /// Falls back to the declared default when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` if the command does not declare `name`.
    pub fn value(&self, name: &str) -> Result<OptionValue> {
        let spec = self.spec(name)?;
        Ok(self
            .store
            .get(name)
            .cloned()
            .unwrap_or_else(|| spec.default().clone()))
    }

    /// Stores a value after checking it against the declared kind.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` for an undeclared name and `TypeMismatch` when
    /// the value's kind differs from the declaration.
    pub fn set(&mut self, name: &str, value: OptionValue) -> Result<()> {
        let kind = self.spec(name)?.kind();
        check_kind(name, kind, &value)?;
        self.store.insert(name, value);
        Ok(())
    }

    /// Forgets the stored value so the option falls back to lower layers.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` if the command does not declare `name`.
    pub fn clear(&mut self, name: &str) -> Result<()> {
        self.spec(name)?;
        self.store.remove(name);
        Ok(())
    }

    /// Returns a string option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` or `TypeMismatch`.
    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.value(name)? {
            OptionValue::String(s) => Ok(s),
            other => Err(mismatch(name, OptionKind::String, &other)),
        }
    }

    /// Returns a boolean option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` or `TypeMismatch`.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.value(name)? {
            OptionValue::Bool(b) => Ok(b),
            other => Err(mismatch(name, OptionKind::Bool, &other)),
        }
    }

    /// Returns an integer option.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOption` or `TypeMismatch`.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.value(name)? {
            OptionValue::Int(i) => Ok(i),
            other => Err(mismatch(name, OptionKind::Int, &other)),
        }
    }
}

pub(crate) fn check_kind(name: &str, expected: OptionKind, value: &OptionValue) -> Result<()> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(mismatch(name, expected, value))
    }
}

fn mismatch(name: &str, expected: OptionKind, found: &OptionValue) -> Error {
    Error::TypeMismatch {
        option: name.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Registry of every command's option set.
///
/// # Examples
///
/// ```
/// use insights::config::{OptionRegistry, OptionSpec};
///
/// let mut registry = OptionRegistry::new();
/// registry
///     .register_command("dag deploy", vec![OptionSpec::string("dagName", "DAG Name").required()])
///     .unwrap();
///
/// let set = registry.lookup("dag deploy").unwrap();
/// assert_eq!(set.options().len(), 1);
/// assert!(registry.lookup("dag explode").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    commands: BTreeMap<String, CommandOptionSet>,
}

impl OptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command and its options.
    ///
    /// # Errors
    ///
    /// - `DuplicateOption` if two options share a name
    /// - `TypeMismatch` if a default does not match its option's kind
    /// - `Validation` if the command was already registered
    pub fn register_command(&mut self, command: &str, options: Vec<OptionSpec>) -> Result<()> {
        if self.commands.contains_key(command) {
            return Err(Error::Validation {
                field: command.to_string(),
                message: "command is already registered".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.name()) {
                return Err(Error::DuplicateOption {
                    command: command.to_string(),
                    option: option.name().to_string(),
                });
            }
            check_kind(option.name(), option.kind(), option.default())?;
        }

        log::debug!("registered '{command}' with {} option(s)", options.len());
        self.commands
            .insert(command.to_string(), CommandOptionSet::new(command, options));
        Ok(())
    }

    /// Looks up a command's option set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` if the command was never registered.
    pub fn lookup(&self, command: &str) -> Result<&CommandOptionSet> {
        self.commands.get(command).ok_or_else(|| Error::UnknownCommand {
            command: command.to_string(),
        })
    }

    /// Mutable variant of [`lookup`](Self::lookup).
    ///
    /// # Errors
    ///
    /// Returns `UnknownCommand` if the command was never registered.
    pub fn lookup_mut(&mut self, command: &str) -> Result<&mut CommandOptionSet> {
        self.commands
            .get_mut(command)
            .ok_or_else(|| Error::UnknownCommand {
                command: command.to_string(),
            })
    }

    /// Iterates over all registered option sets in command order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandOptionSet> {
        self.commands.values()
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when no command is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
