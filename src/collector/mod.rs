//! Intel GPU discovery for node labeling.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Labeler                            │
//! │  ┌────────────────────┐  ┌──────────────────────────────┐    │
//! │  │     DrmScanner     │  │     CapabilityCollector      │    │
//! │  │  - /sys/class/drm  │  │  - debugfs i915_capabilities │    │
//! │  │  - /dev/dri        │  └──────────────┬───────────────┘    │
//! │  └─────────┬──────────┘                 │   MemorySource     │
//! │            └──────────────┬─────────────┘   (override)       │
//! │                    ┌──────▼──────┐                           │
//! │                    │  FileSystem │ (trait)                   │
//! │                    └──────┬──────┘                           │
//! └───────────────────────────┼──────────────────────────────────┘
//!                    ┌────────┴────────┐
//!             ┌──────▼──────┐   ┌──────▼──────┐
//!             │   RealFs    │   │   MockFs    │
//!             └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use gpu_nfdhook::collector::{Labeler, MemoryOverride, MockFs};
//! use gpu_nfdhook::config::LabelerConfig;
//!
//! let fs = MockFs::single_intel_gpu();
//! let labeler = Labeler::new(fs, &LabelerConfig::default(), MemoryOverride::new(0));
//! let labels = labeler.create_labels().unwrap();
//! assert_eq!(labels.get("gpu.intel.com/cards"), Some("card0"));
//! ```

pub mod capabilities;
pub mod drm;
mod error;
mod labeler;
pub mod memory;
pub mod mock;
pub mod traits;

pub use capabilities::{Capability, CapabilityCollector, CapabilityFact};
pub use drm::DrmScanner;
pub use error::ScanError;
pub use labeler::{Labeler, MILLICORES_PER_GPU};
pub use memory::{MemoryOverride, MemorySource};
pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
