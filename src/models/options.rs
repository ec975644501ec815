//! Option maps with an explicit flag/value distinction.
//!
//! mkvmerge options come in two shapes: bare switches (`--no-global-tags`)
//! and valued flags (`--title x`). Configuration files express the former
//! as `null` or a boolean and the latter as a string or number; internally
//! the two are kept apart as tagged variants so a bare switch can never be
//! confused with an empty value.

use std::fmt;

use serde::de::{Deserializer, Error as DeError, MapAccess, Visitor};
use serde::Deserialize;

/// Value side of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare switch, emitted as `--name` alone.
    Flag,
    /// Valued flag, emitted as `--name value` (or `--name id:value` in
    /// track position).
    Value(String),
}

impl OptionValue {
    pub fn value(v: impl Into<String>) -> Self {
        OptionValue::Value(v.into())
    }
}

/// Insertion-ordered option mapping.
///
/// Iteration follows declaration order so command generation stays
/// deterministic. `set` on an existing name replaces the value but keeps
/// the original position (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(String, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: OptionValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<const N: usize> From<[(&str, OptionValue); N]> for OptionMap {
    fn from(pairs: [(&str, OptionValue); N]) -> Self {
        let mut map = OptionMap::new();
        for (name, value) in pairs {
            map.set(name, value);
        }
        map
    }
}

impl<'de> Deserialize<'de> for OptionMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionMapVisitor;

        impl<'de> Visitor<'de> for OptionMapVisitor {
            type Value = OptionMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<OptionMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OptionMap::new();
                while let Some((name, raw)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    let value = match raw {
                        serde_json::Value::Null | serde_json::Value::Bool(_) => {
                            OptionValue::Flag
                        }
                        serde_json::Value::String(s) => OptionValue::Value(s),
                        serde_json::Value::Number(n) => OptionValue::Value(n.to_string()),
                        other => {
                            return Err(A::Error::custom(format!(
                                "option '{}' has unsupported value {}",
                                name, other
                            )))
                        }
                    };
                    map.set(name, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OptionMapVisitor)
    }
}
