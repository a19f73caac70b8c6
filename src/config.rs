//! Directory roots scanned by the labeler.

use std::path::{Path, PathBuf};

/// Default sysfs attribute tree of DRM devices.
pub const DEFAULT_SYSFS_DIR: &str = "/sys/class/drm";
/// Default device-node tree of DRM devices.
pub const DEFAULT_DEVFS_DIR: &str = "/dev/dri";
/// Default debugfs tree holding per-card i915 debug files.
pub const DEFAULT_DEBUGFS_DRI_DIR: &str = "/sys/kernel/debug/dri";

/// Filesystem roots used by [`Labeler`](crate::collector::Labeler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelerConfig {
    /// Attribute tree listing `card<N>` entries.
    pub sysfs_dir: PathBuf,
    /// Device-node tree whose entries prove a device is live.
    pub devfs_dir: PathBuf,
    /// Debugfs root containing `<N>/i915_capabilities`.
    pub debugfs_dri_dir: PathBuf,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            sysfs_dir: PathBuf::from(DEFAULT_SYSFS_DIR),
            devfs_dir: PathBuf::from(DEFAULT_DEVFS_DIR),
            debugfs_dri_dir: PathBuf::from(DEFAULT_DEBUGFS_DRI_DIR),
        }
    }
}

impl LabelerConfig {
    /// Overrides the sysfs root.
    pub fn with_sysfs_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sysfs_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the devfs root.
    pub fn with_devfs_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.devfs_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the debugfs root.
    pub fn with_debugfs_dri_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.debugfs_dri_dir = dir.as_ref().to_path_buf();
        self
    }
}
