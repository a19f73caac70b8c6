//! Pre-built mock filesystem scenarios for testing.
//!
//! Every scenario is laid out under the default roots from
//! [`LabelerConfig::default`](crate::config::LabelerConfig).

use super::filesystem::MockFs;
use crate::collector::drm::INTEL_VENDOR_ID;
use crate::config::{DEFAULT_DEBUGFS_DRI_DIR, DEFAULT_DEVFS_DIR, DEFAULT_SYSFS_DIR};

impl MockFs {
    /// One Intel GPU with a live render node and a full capability file.
    pub fn single_intel_gpu() -> Self {
        let mut fs = Self::new();
        fs.add_card(DEFAULT_SYSFS_DIR, "card0", INTEL_VENDOR_ID, &["card0"]);
        fs.add_dev_node(DEFAULT_DEVFS_DIR, "card0");
        fs.add_file(
            format!("{}/0/i915_capabilities", DEFAULT_DEBUGFS_DRI_DIR),
            "platform: new\ngen: 9",
        );
        fs
    }

    /// Two Intel GPUs with live nodes and no debugfs at all.
    pub fn dual_intel_gpu() -> Self {
        let mut fs = Self::new();
        for card in ["card0", "card1"] {
            fs.add_card(DEFAULT_SYSFS_DIR, card, INTEL_VENDOR_ID, &[card]);
            fs.add_dev_node(DEFAULT_DEVFS_DIR, card);
        }
        fs
    }

    /// A host mixing an Intel iGPU, a discrete GPU of another vendor,
    /// connector entries and non-card sysfs files.
    ///
    /// Only `card0` should be labeled.
    pub fn mixed_vendor_host() -> Self {
        let mut fs = Self::new();

        fs.add_card(
            DEFAULT_SYSFS_DIR,
            "card0",
            "0x8086\n",
            &["card0", "controlD64", "renderD128"],
        );
        fs.add_card(DEFAULT_SYSFS_DIR, "card1", "0x10de\n", &["card1", "renderD129"]);
        fs.add_dir(format!("{}/card0-HDMI-A-1", DEFAULT_SYSFS_DIR));
        fs.add_dir(format!("{}/card0-eDP-1", DEFAULT_SYSFS_DIR));
        fs.add_dir(format!("{}/renderD128", DEFAULT_SYSFS_DIR));
        fs.add_file(format!("{}/version", DEFAULT_SYSFS_DIR), "drm 1.1.0 20060810\n");

        for node in ["card0", "card1", "controlD64", "renderD128", "renderD129"] {
            fs.add_dev_node(DEFAULT_DEVFS_DIR, node);
        }

        fs.add_file(
            format!("{}/0/i915_capabilities", DEFAULT_DEBUGFS_DRI_DIR),
            "\
gen: 12
platform: TIGERLAKE
pch: 11
gen: 13
",
        );
        fs
    }
}
