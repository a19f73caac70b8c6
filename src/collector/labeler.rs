//! Labeling run: discovery, enrichment and fleet-wide aggregation.

use tracing::debug;

use crate::collector::capabilities::CapabilityCollector;
use crate::collector::drm::{DrmScanner, card_ordinal};
use crate::collector::error::ScanError;
use crate::collector::memory::MemorySource;
use crate::collector::traits::FileSystem;
use crate::config::LabelerConfig;
use crate::labels::{CARDS_LABEL, LabelMap, MEMORY_MAX_LABEL, MILLICORES_LABEL};

/// Millicores granted to every labeled card.
pub const MILLICORES_PER_GPU: i64 = 1000;

/// Produces the node labels for all Intel GPUs on the host.
///
/// Each call to [`create_labels`](Self::create_labels) is an independent scan.
pub struct Labeler<F: FileSystem, M: MemorySource> {
    drm: DrmScanner<F>,
    capabilities: CapabilityCollector<F>,
    memory: M,
}

impl<F: FileSystem + Clone, M: MemorySource> Labeler<F, M> {
    /// Creates a labeler reading the roots of `config` through `fs`.
    pub fn new(fs: F, config: &LabelerConfig, memory: M) -> Self {
        Self {
            drm: DrmScanner::new(fs.clone(), &config.sysfs_dir, &config.devfs_dir),
            capabilities: CapabilityCollector::new(fs, &config.debugfs_dri_dir),
            memory,
        }
    }
}

impl<F: FileSystem, M: MemorySource> Labeler<F, M> {
    /// Scans the host and builds the label set.
    ///
    /// On error no labels are returned at all.
    pub fn create_labels(&self) -> Result<LabelMap, ScanError> {
        let cards = self.drm.scan()?;
        let mut labels = LabelMap::new();

        for card in &cards {
            let ordinal = card_ordinal(card)?;

            self.capabilities.enrich(ordinal, &mut labels);

            let memory = self.memory.memory_amount(ordinal);
            labels.add_numeric(MEMORY_MAX_LABEL, i64::try_from(memory).unwrap_or(i64::MAX));
        }

        labels.set_list(CARDS_LABEL, &cards);

        let gpu_count = i64::try_from(cards.len()).unwrap_or(i64::MAX);
        labels.add_numeric(MILLICORES_LABEL, MILLICORES_PER_GPU.saturating_mul(gpu_count));

        debug!(gpus = cards.len(), labels = labels.len(), "labeling done");
        Ok(labels)
    }
}
