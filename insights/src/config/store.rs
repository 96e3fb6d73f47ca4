//! Per-command value store.

use std::collections::BTreeMap;

use crate::config::option::OptionValue;

/// Mapping from option name to its currently resolved value.
///
/// A store is owned by exactly one command option set. It is repopulated on
/// every invocation of that command and is never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueStore {
    values: BTreeMap<String, OptionValue>,
}

impl ValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Stores a value, returning the previous one.
    ///
    /// Kind checking happens in [`crate::config::CommandOptionSet::set`].
    pub(crate) fn insert(&mut self, name: &str, value: OptionValue) -> Option<OptionValue> {
        self.values.insert(name.to_string(), value)
    }

    /// Removes a value, returning it.
    pub(crate) fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.values.remove(name)
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the store as a JSON object.
    #[must_use]
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}
