//! Capability labels from the i915 debugfs interface.
//!
//! `<debugfs>/dri/<N>/i915_capabilities` is a `key: value` text file whose
//! layout changes between driver versions. It is read on a best-effort basis:
//! a missing file or unknown layout simply yields fewer labels.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::traits::FileSystem;
use crate::labels::{LabelMap, PLATFORM_GEN_LABEL, platform_count_label, platform_present_label};

/// File name of the capability dump inside a card's debugfs directory.
pub const CAPABILITIES_FILE: &str = "i915_capabilities";

/// Scans `reader` for lines starting with one of the `patterns` prefixes.
///
/// For each matching line the first whitespace-delimited token after the
/// prefix is passed to `action` together with the pattern's key, and that
/// pattern is dropped from the search. A line satisfies at most one pattern.
/// Scanning stops once every pattern has fired or input ends; patterns that
/// never match are returned.
pub fn extract_prefixed<R, K, A>(mut reader: R, patterns: &[(&str, K)], mut action: A) -> Vec<K>
where
    R: BufRead,
    K: Copy,
    A: FnMut(K, &str),
{
    let mut active: Vec<(&str, K)> = patterns.to_vec();
    if active.is_empty() {
        return Vec::new();
    }

    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "stopped reading capabilities");
                break;
            }
        }

        // Bad bytes only cost the line they are on.
        let raw = String::from_utf8_lossy(&buf);
        let raw: &str = &raw;
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let hit = active.iter().enumerate().find_map(|(idx, (prefix, key))| {
            let token = line.strip_prefix(*prefix)?.split_whitespace().next()?;
            Some((idx, *key, token))
        });

        if let Some((idx, key, token)) = hit {
            action(key, token);
            active.remove(idx);
            if active.is_empty() {
                break;
            }
        }
    }

    active.into_iter().map(|(_, key)| key).collect()
}

/// Capability keys recognized in `i915_capabilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `platform: <NAME>`
    Platform,
    /// `gen: <N>`
    Gen,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Platform, Capability::Gen];

    /// Line prefix announcing this capability.
    pub fn prefix(self) -> &'static str {
        match self {
            Capability::Platform => "platform: ",
            Capability::Gen => "gen: ",
        }
    }
}

/// A capability value read from one card's debugfs file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityFact {
    pub capability: Capability,
    pub value: String,
}

impl CapabilityFact {
    /// Folds the fact into the label map.
    ///
    /// Platform facts bump the per-platform counter and set its presence
    /// flag; the generation label is overwritten by every card.
    pub fn apply(&self, labels: &mut LabelMap) {
        match self.capability {
            Capability::Platform => {
                labels.add_numeric(platform_count_label(&self.value), 1);
                labels.set(platform_present_label(&self.value), "true");
            }
            Capability::Gen => labels.set(PLATFORM_GEN_LABEL, self.value.as_str()),
        }
    }
}

/// Reader of per-card capability facts.
pub struct CapabilityCollector<F: FileSystem> {
    fs: F,
    debugfs_path: PathBuf,
}

impl<F: FileSystem> CapabilityCollector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation
    /// * `debugfs_path` - DRI debugfs root (usually "/sys/kernel/debug/dri")
    pub fn new(fs: F, debugfs_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            debugfs_path: debugfs_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the capability file for a card ordinal.
    pub fn capabilities_path(&self, ordinal: &str) -> PathBuf {
        self.debugfs_path.join(ordinal).join(CAPABILITIES_FILE)
    }

    /// Reads the capability facts of a card, in file order.
    ///
    /// Returns an empty list if the file can't be opened.
    pub fn collect(&self, ordinal: &str) -> Vec<CapabilityFact> {
        let path = self.capabilities_path(ordinal);
        let reader = match self.fs.open(&path) {
            Ok(r) => r,
            Err(e) => {
                // debugfs is not stable, so this is not worth a warning
                debug!(path = %path.display(), error = %e, "couldn't open capabilities file");
                return Vec::new();
            }
        };

        let patterns: Vec<(&str, Capability)> =
            Capability::ALL.iter().map(|c| (c.prefix(), *c)).collect();

        let mut facts = Vec::new();
        let missing = extract_prefixed(reader, &patterns, |capability, value| {
            facts.push(CapabilityFact {
                capability,
                value: value.to_string(),
            });
        });
        if !missing.is_empty() {
            debug!(path = %path.display(), ?missing, "capabilities not found");
        }
        facts
    }

    /// Adds the capability labels of a card to `labels`.
    pub fn enrich(&self, ordinal: &str, labels: &mut LabelMap) {
        for fact in self.collect(ordinal) {
            fact.apply(labels);
        }
    }
}
