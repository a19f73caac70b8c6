//! GPU local memory amount.
//!
//! The i915 driver does not expose local memory size yet, so the only source
//! is an operator-provided override applied to every card.

/// Environment variable holding the memory override in bytes.
pub const MEMORY_OVERRIDE_ENV: &str = "GPU_MEMORY_OVERRIDE";

/// Source of per-card memory amounts, in bytes.
pub trait MemorySource {
    /// Returns the memory amount of the card with the given ordinal.
    fn memory_amount(&self, ordinal: &str) -> u64;
}

/// Memory source returning the same configured amount for every card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryOverride {
    bytes: u64,
}

impl MemoryOverride {
    pub fn new(bytes: u64) -> Self {
        Self { bytes }
    }

    /// Parses a raw override value.
    ///
    /// Missing, empty or non-decimal values yield zero.
    pub fn from_value(value: Option<&str>) -> Self {
        let bytes = value
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        Self { bytes }
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl MemorySource for MemoryOverride {
    fn memory_amount(&self, _ordinal: &str) -> u64 {
        self.bytes
    }
}
