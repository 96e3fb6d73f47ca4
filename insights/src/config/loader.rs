//! Persisted config store.
//!
//! The store is a single JSON object on disk, shared by every command. Keys
//! are option names and values are JSON scalars matching the option's kind.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::option::{OptionSpec, OptionValue};
use crate::error::{Error, Result};

/// Directory under the home directory holding the config file.
pub const CONFIG_DIR_NAME: &str = ".pi";

/// Name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns `<home>/.pi/config.json`.
///
/// # Errors
///
/// Returns `Validation` if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "Cannot determine home directory".into(),
    })?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// The loaded contents of the persisted config file.
///
/// # Examples
///
/// ```
/// use insights::config::{OptionSpec, OptionValue, PersistedConfig};
///
/// let config = PersistedConfig::from_json(r#"{"dagName": "nightly"}"#).unwrap();
/// let spec = OptionSpec::string("dagName", "DAG Name");
/// assert_eq!(config.value_for(&spec), Some(OptionValue::from("nightly")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedConfig {
    values: Map<String, Value>,
}

impl PersistedConfig {
    /// Loads the config file.
    ///
    /// A missing file and an empty (or whitespace-only) file both mean "no
    /// persisted values".
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the file exists but cannot be read, and
    /// `Validation` if it is not a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read configuration file: {e}"),
        })?;

        Self::from_json(&contents).map_err(|e| match e {
            Error::Validation { message, .. } => Error::Validation {
                field: format!("{}", path.display()),
                message,
            },
            other => other,
        })
    }

    /// Parses config file contents.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the text is not a JSON object.
    pub fn from_json(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(contents).map_err(|e| Error::Validation {
            field: CONFIG_FILE_NAME.into(),
            message: format!("Invalid JSON: {e}"),
        })?;

        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(Error::Validation {
                field: CONFIG_FILE_NAME.into(),
                message: format!("Expected a JSON object, found {other}"),
            }),
        }
    }

    /// Returns the raw JSON value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the persisted value for an option, converted to its kind.
    ///
    /// Entries of a different JSON type are ignored.
    #[must_use]
    pub fn value_for(&self, spec: &OptionSpec) -> Option<OptionValue> {
        let raw = self.values.get(spec.name())?;
        let value = OptionValue::from_json(spec.kind(), raw);
        if value.is_none() {
            log::debug!(
                "ignoring persisted '{}': expected {}, found {raw}",
                spec.name(),
                spec.kind()
            );
        }
        value
    }

    /// All persisted entries.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// True when nothing is persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
