//! Option declarations and typed option values.
//!
//! An [`OptionSpec`] describes one named parameter of a command: its type,
//! default, whether it is required, and the environment variable that can
//! supply it. Specs are built once at startup and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantic type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// A free-form string.
    String,
    /// A boolean switch.
    Bool,
    /// A signed integer.
    Int,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
        }
    }
}

/// A resolved option value.
///
/// Serializes as a bare JSON scalar so the persisted config file holds
/// `"name": "value"`, `"name": true` or `"name": 3`.
///
/// # Examples
///
/// ```
/// use insights::config::{OptionKind, OptionValue};
///
/// let value = OptionValue::from("my-dag");
/// assert_eq!(value.kind(), OptionKind::String);
/// assert_eq!(value.as_str(), Some("my-dag"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A string value.
    String(String),
}

impl OptionValue {
    /// Returns the zero value of a kind: `""`, `false` or `0`.
    #[must_use]
    pub fn zero(kind: OptionKind) -> Self {
        match kind {
            OptionKind::String => Self::String(String::new()),
            OptionKind::Bool => Self::Bool(false),
            OptionKind::Int => Self::Int(0),
        }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::Bool(_) => OptionKind::Bool,
            Self::Int(_) => OptionKind::Int,
            Self::String(_) => OptionKind::String,
        }
    }

    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// True for the empty string.
    ///
    /// Empty strings count as absent at every resolution layer.
    #[must_use]
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// True when the value equals the zero value of its kind.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
        }
    }

    /// Converts a JSON scalar into a value of the requested kind.
    ///
    /// Returns `None` when the JSON value has a different type.
    #[must_use]
    pub fn from_json(kind: OptionKind, value: &serde_json::Value) -> Option<Self> {
        match (kind, value) {
            (OptionKind::String, serde_json::Value::String(s)) => Some(Self::String(s.clone())),
            (OptionKind::Bool, serde_json::Value::Bool(b)) => Some(Self::Bool(*b)),
            (OptionKind::Int, serde_json::Value::Number(n)) => n.as_i64().map(Self::Int),
            _ => None,
        }
    }

    /// Converts the value into a JSON scalar.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Declaration of a single named option.
///
/// # Examples
///
/// ```
/// use insights::config::{OptionKind, OptionSpec, OptionValue};
///
/// let spec = OptionSpec::integer("containerLogSink", "Container Log Sink")
///     .env("CONTAINER_LOG_SINK")
///     .default_value(1);
///
/// assert_eq!(spec.kind(), OptionKind::Int);
/// assert_eq!(spec.default(), &OptionValue::Int(1));
/// assert!(!spec.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    kind: OptionKind,
    default: OptionValue,
    required: bool,
    env_alias: Option<String>,
    short: Option<char>,
    recorded: bool,
    description: String,
}

impl OptionSpec {
    fn new(name: &str, kind: OptionKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default: OptionValue::zero(kind),
            required: false,
            env_alias: None,
            short: None,
            recorded: false,
            description: description.to_string(),
        }
    }

    /// Declares a string option defaulting to `""`.
    #[must_use]
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, OptionKind::String, description)
    }

    /// Declares a boolean option defaulting to `false`.
    #[must_use]
    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, OptionKind::Bool, description)
    }

    /// Declares an integer option defaulting to `0`.
    #[must_use]
    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, OptionKind::Int, description)
    }

    /// Marks the option as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the environment variable that can supply the option.
    #[must_use]
    pub fn env(mut self, alias: &str) -> Self {
        self.env_alias = Some(alias.to_string());
        self
    }

    /// Sets a single-character shorthand flag.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Marks the option as recorded from a service response.
    ///
    /// Recorded options resolve and persist like any other but get no
    /// command-line flag.
    #[must_use]
    pub fn recorded(mut self) -> Self {
        self.recorded = true;
        self
    }

    /// Overrides the default value.
    ///
    /// The registry rejects a default whose kind differs from the option's.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = value.into();
        self
    }

    /// The option name, unique within a command.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The declared default.
    #[must_use]
    pub const fn default(&self) -> &OptionValue {
        &self.default
    }

    /// Whether the option must be non-empty before the command runs.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option is recorded rather than given on the command line.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.recorded
    }

    /// The environment variable alias, if any.
    #[must_use]
    pub fn env_alias(&self) -> Option<&str> {
        self.env_alias.as_deref()
    }

    /// The shorthand flag character, if any.
    #[must_use]
    pub const fn short_flag(&self) -> Option<char> {
        self.short
    }

    /// Human-readable description used for help text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_defaults() {
        let s = OptionSpec::string("dagName", "DAG Name");
        assert_eq!(s.default(), &OptionValue::String(String::new()));
        assert!(s.env_alias().is_none());

        let b = OptionSpec::boolean("force", "Force").short('f').env("FORCE");
        assert_eq!(b.default(), &OptionValue::Bool(false));
        assert_eq!(b.short_flag(), Some('f'));
        assert_eq!(b.env_alias(), Some("FORCE"));

        let i = OptionSpec::integer("containerLogSink", "Sink").default_value(1);
        assert_eq!(i.default(), &OptionValue::Int(1));
        assert!(!i.is_recorded());
    }

    #[test]
    fn test_recorded_builder() {
        let spec = OptionSpec::string("dagID", "DAG ID").env("DAG_ID").recorded();
        assert!(spec.is_recorded());
        assert!(!spec.is_required());
    }

    #[test]
    fn test_required_builder() {
        let s = OptionSpec::string("APIHost", "API host").required();
        assert!(s.is_required());
    }

    #[test]
    fn test_value_serializes_as_scalar() {
        assert_eq!(serde_json::to_string(&OptionValue::from("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&OptionValue::from(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&OptionValue::from(7_i64)).unwrap(), "7");

        let parsed: OptionValue = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, OptionValue::Int(12));
    }

    #[test]
    fn test_from_json_checks_kind() {
        let json = serde_json::json!("abc");
        assert_eq!(
            OptionValue::from_json(OptionKind::String, &json),
            Some(OptionValue::from("abc"))
        );
        assert_eq!(OptionValue::from_json(OptionKind::Bool, &json), None);

        let float = serde_json::json!(1.5);
        assert_eq!(OptionValue::from_json(OptionKind::Int, &float), None);
    }

    #[test]
    fn test_zero_values() {
        assert!(OptionValue::zero(OptionKind::String).is_zero());
        assert!(OptionValue::zero(OptionKind::Bool).is_zero());
        assert!(OptionValue::zero(OptionKind::Int).is_zero());
        assert!(!OptionValue::from(1_i64).is_zero());
        assert!(OptionValue::from("").is_empty_string());
        assert!(!OptionValue::from(false).is_empty_string());
    }
}
