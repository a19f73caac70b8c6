//! Node labels produced by a labeling run.
//!
//! Every value is kept as text, numeric ones included: the node-labeling
//! hook protocol only understands `name=value` strings.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Namespace prefixed to every label name.
pub const LABEL_NAMESPACE: &str = "gpu.intel.com/";
/// Dot-separated list of labeled cards, e.g. `card0.card1`.
pub const CARDS_LABEL: &str = "gpu.intel.com/cards";
/// Fleet-wide millicore capacity.
pub const MILLICORES_LABEL: &str = "gpu.intel.com/millicores";
/// Fleet-wide memory capacity in bytes.
pub const MEMORY_MAX_LABEL: &str = "gpu.intel.com/memory.max";
/// Generation reported by the last card that had one.
pub const PLATFORM_GEN_LABEL: &str = "gpu.intel.com/platform_gen";

/// Separator used by [`LabelMap::set_list`].
pub const LIST_SEPARATOR: &str = ".";

/// Name of the per-platform device counter label.
pub fn platform_count_label(platform: &str) -> String {
    format!("{}platform_{}.count", LABEL_NAMESPACE, platform)
}

/// Name of the per-platform presence label.
pub fn platform_present_label(platform: &str) -> String {
    format!("{}platform_{}.present", LABEL_NAMESPACE, platform)
}

/// Label name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: BTreeMap<String, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a label, overwriting any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(name.into(), value.into());
    }

    /// Adds `delta` to a numeric label.
    ///
    /// A missing or unparseable previous value counts as zero.
    pub fn add_numeric(&mut self, name: impl Into<String>, delta: i64) {
        let name = name.into();
        let current = self
            .labels
            .get(&name)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);
        self.labels
            .insert(name, current.saturating_add(delta).to_string());
    }

    /// Joins `items` with [`LIST_SEPARATOR`] and stores the result.
    pub fn set_list<I, S>(&mut self, name: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = items
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);
        self.labels.insert(name.into(), joined);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes one `name=value` line per label.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (name, value) in self.iter() {
            writeln!(out, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
