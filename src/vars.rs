//! The variable store shared by the manifest parser, the expander and the runner.

use indexmap::IndexMap;

use crate::constants::RESERVED_VARIABLES;
use crate::error::{YangError, YangResult};

/// Mapping from variable name to raw (unexpanded) value.
///
/// Keys are case-sensitive. Values are only ever overwritten, never removed,
/// and insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: IndexMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Sets a variable without checking reserved names.
    /// Used for built-ins and invocation seeds.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    /// Assigns a variable on behalf of a manifest directive.
    ///
    /// # Errors
    /// * `YangError::VariableError` if `key` is one of the reserved built-ins
    pub fn assign<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> YangResult<()> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(YangError::VariableError(format!(
                "redefinition of built-in variable '{}'",
                key
            )));
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = VariableStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_VARIABLES.contains(&key)
}

/// Splits an invocation flag into a variable seed.
///
/// `key:value` splits on the first `:` with both sides trimmed; a bare token
/// seeds the key with an empty value.
pub fn parse_seed(flag: &str) -> (String, String) {
    match flag.split_once(':') {
        Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
        None => (flag.trim().to_string(), String::new()),
    }
}
