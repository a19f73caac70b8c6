//! gpu-nfdhook - Intel GPU node-feature-discovery hook library.
//!
//! Provides:
//! - `collector` — GPU discovery over sysfs/devfs/debugfs and the labeling run
//! - `labels` — label map with the merge rules used by the run
//! - `config` — filesystem roots scanned by the labeler

pub mod collector;
pub mod config;
pub mod labels;
