//! Parameter sets fed to signing strategies

use std::collections::BTreeMap;

use serde_json::Value;

/// Named parameters, ordered by name.
///
/// Absent (`None`) and empty values are kept here so callers can round-trip
/// what they received; every strategy drops them before signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignParams {
    entries: BTreeMap<String, Option<String>>,
}

impl SignParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of a value that may be absent.
    #[must_use]
    pub fn with_optional(mut self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        self.entries.insert(name.into(), value.map(|v| v.to_string()));
        self
    }

    /// Set `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries.insert(name.into(), Some(value.to_string()));
        self
    }

    /// Remove `name`, returning its value if one was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name).flatten()
    }

    /// Value of `name`. Absent entries read as `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|value| value.as_deref())
    }

    /// Number of entries, absent ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries were set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Present, non-empty entries in name order, minus `excluded` names.
    pub(crate) fn signable<'a>(
        &'a self,
        excluded: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries.iter().filter_map(move |(name, value)| {
            let value = value.as_deref()?;
            if value.is_empty() || excluded.contains(&name.as_str()) {
                return None;
            }
            Some((name.as_str(), value))
        })
    }

    /// Build from a flat JSON object.
    ///
    /// Strings are taken verbatim, numbers and booleans are rendered, `null`
    /// becomes absent and nested values are kept as compact JSON text.
    /// Non-object input yields an empty set.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new();
        };
        let entries = object
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text.clone()),
                    other => Some(other.to_string()),
                };
                (name.clone(), rendered)
            })
            .collect();
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for SignParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
