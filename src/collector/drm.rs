//! Intel GPU discovery from the DRM sysfs and devfs trees.
//!
//! A card is labeled only when all of the following hold:
//! - its sysfs entry is named exactly `card<N>`
//! - `device/vendor` reads `0x8086`
//! - some non-control entry under `device/drm` exists in devfs

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::collector::error::ScanError;
use crate::collector::traits::FileSystem;

/// PCI vendor id of Intel.
pub const INTEL_VENDOR_ID: &str = "0x8086";

/// Returns `true` for names of the form `<prefix><digits>` with at least one digit.
fn has_numeric_suffix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns `true` if `name` is a primary card entry (`card0`, `card12`, ...).
pub fn is_card_name(name: &str) -> bool {
    has_numeric_suffix(name, "card")
}

/// Returns `true` if `name` is a DRM control node (`controlD64`, ...).
pub fn is_control_node_name(name: &str) -> bool {
    has_numeric_suffix(name, "controlD")
}

/// Extracts the ordinal from a card name (`card3` -> `3`).
pub fn card_ordinal(name: &str) -> Result<&str, ScanError> {
    name.strip_prefix("card")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ScanError::InvalidDeviceName(name.to_string()))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Scanner correlating sysfs card entries with live devfs nodes.
pub struct DrmScanner<F: FileSystem> {
    fs: F,
    sysfs_path: PathBuf,
    devfs_path: PathBuf,
}

impl<F: FileSystem> DrmScanner<F> {
    /// Creates a new scanner.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sysfs_path` - Attribute-tree root (usually "/sys/class/drm")
    /// * `devfs_path` - Device-node root (usually "/dev/dri")
    pub fn new(fs: F, sysfs_path: impl AsRef<Path>, devfs_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            sysfs_path: sysfs_path.as_ref().to_path_buf(),
            devfs_path: devfs_path.as_ref().to_path_buf(),
        }
    }

    /// Returns the names of confirmed Intel cards in sysfs listing order.
    ///
    /// Fails only when the sysfs root or the `device/drm` directory of an
    /// Intel card cannot be listed.
    pub fn scan(&self) -> Result<Vec<String>, ScanError> {
        let entries = self
            .fs
            .read_dir(&self.sysfs_path)
            .map_err(|source| ScanError::ReadSysfs {
                path: self.sysfs_path.clone(),
                source,
            })?;

        let mut cards = Vec::new();
        for entry in &entries {
            let Some(name) = file_name(entry) else {
                continue;
            };
            if !is_card_name(name) {
                trace!(entry = name, "not a compatible device");
                continue;
            }
            if !self.is_intel(name) {
                continue;
            }
            if self.has_live_node(name)? {
                debug!(card = name, "found Intel GPU");
                cards.push(name.to_string());
            } else {
                debug!(card = name, "no live device node, skipping");
            }
        }

        Ok(cards)
    }

    fn is_intel(&self, card: &str) -> bool {
        let vendor_path = self.sysfs_path.join(card).join("device/vendor");
        let vendor = match self.fs.read_to_string(&vendor_path) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %vendor_path.display(), error = %e, "skipping, can't read vendor file");
                return false;
            }
        };

        if vendor.trim() != INTEL_VENDOR_ID {
            debug!(card, vendor = vendor.trim(), "non-Intel GPU");
            return false;
        }
        true
    }

    /// Checks `device/drm` entries of a card against devfs, stopping at the
    /// first one that exists. Control nodes are never checked.
    fn has_live_node(&self, card: &str) -> Result<bool, ScanError> {
        let drm_path = self.sysfs_path.join(card).join("device/drm");
        let nodes = self
            .fs
            .read_dir(&drm_path)
            .map_err(|source| ScanError::ReadDrmDir {
                path: drm_path.clone(),
                source,
            })?;

        Ok(nodes
            .iter()
            .filter_map(|node| file_name(node))
            .filter(|node| !is_control_node_name(node))
            .any(|node| self.fs.exists(&self.devfs_path.join(node))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MockFs;
    use std::cell::RefCell;
    use std::io::{self, BufRead};

    const SYSFS: &str = "/sys/class/drm";
    const DEVFS: &str = "/dev/dri";

    fn scan(fs: &MockFs) -> Result<Vec<String>, ScanError> {
        DrmScanner::new(fs.clone(), SYSFS, DEVFS).scan()
    }

    #[test]
    fn test_name_patterns() {
        assert!(is_card_name("card0"));
        assert!(is_card_name("card15"));
        assert!(!is_card_name("card"));
        assert!(!is_card_name("card0-HDMI-A-1"));
        assert!(!is_card_name("xcard0"));
        assert!(!is_card_name("renderD128"));
        assert!(!is_card_name("card+1"));

        assert!(is_control_node_name("controlD64"));
        assert!(!is_control_node_name("controlD"));
        assert!(!is_control_node_name("controlD64a"));
        assert!(!is_control_node_name("card0"));
    }

    #[test]
    fn test_card_ordinal() {
        assert_eq!(card_ordinal("card0").unwrap(), "0");
        assert_eq!(card_ordinal("card12").unwrap(), "12");
        assert!(matches!(
            card_ordinal("card"),
            Err(ScanError::InvalidDeviceName(_))
        ));
        assert!(card_ordinal("renderD128").is_err());
    }

    #[test]
    fn test_single_gpu() {
        let fs = MockFs::single_intel_gpu();
        assert_eq!(scan(&fs).unwrap(), ["card0"]);
    }

    #[test]
    fn test_mixed_vendor_host() {
        let fs = MockFs::mixed_vendor_host();
        assert_eq!(scan(&fs).unwrap(), ["card0"]);
    }

    #[test]
    fn test_order_follows_listing() {
        let mut fs = MockFs::new();
        for card in ["card2", "card0", "card1"] {
            fs.add_card(SYSFS, card, INTEL_VENDOR_ID, &[card]);
            fs.add_dev_node(DEVFS, card);
        }
        assert_eq!(scan(&fs).unwrap(), ["card0", "card1", "card2"]);
    }

    #[test]
    fn test_empty_sysfs() {
        let mut fs = MockFs::new();
        fs.add_dir(SYSFS);
        assert!(scan(&fs).unwrap().is_empty());
    }

    #[test]
    fn test_missing_sysfs_is_fatal() {
        let fs = MockFs::new();
        assert!(matches!(scan(&fs), Err(ScanError::ReadSysfs { .. })));
    }

    #[test]
    fn test_unreadable_vendor_is_skipped() {
        let mut fs = MockFs::new();
        fs.add_dir(format!("{}/card0/device/drm/card0", SYSFS));
        fs.add_dev_node(DEVFS, "card0");
        fs.add_card(SYSFS, "card1", INTEL_VENDOR_ID, &["card1"]);
        fs.add_dev_node(DEVFS, "card1");

        assert_eq!(scan(&fs).unwrap(), ["card1"]);
    }

    #[test]
    fn test_vendor_is_trimmed_and_exact() {
        let mut fs = MockFs::new();
        fs.add_card(SYSFS, "card0", "  0x8086\n", &["card0"]);
        fs.add_card(SYSFS, "card1", "0x80861", &["card1"]);
        fs.add_card(SYSFS, "card2", "0X8086", &["card2"]);
        for node in ["card0", "card1", "card2"] {
            fs.add_dev_node(DEVFS, node);
        }

        assert_eq!(scan(&fs).unwrap(), ["card0"]);
    }

    #[test]
    fn test_unreadable_drm_dir_is_fatal() {
        let mut fs = MockFs::new();
        fs.add_file(format!("{}/card0/device/vendor", SYSFS), INTEL_VENDOR_ID);
        fs.add_unreadable_dir(format!("{}/card0/device/drm", SYSFS));

        assert!(matches!(scan(&fs), Err(ScanError::ReadDrmDir { .. })));
    }

    #[test]
    fn test_missing_drm_dir_is_fatal() {
        let mut fs = MockFs::new();
        fs.add_file(format!("{}/card0/device/vendor", SYSFS), INTEL_VENDOR_ID);

        assert!(matches!(scan(&fs), Err(ScanError::ReadDrmDir { .. })));
    }

    #[test]
    fn test_non_intel_drm_dir_is_not_read() {
        let mut fs = MockFs::new();
        fs.add_file(format!("{}/card0/device/vendor", SYSFS), "0x1002");
        fs.add_unreadable_dir(format!("{}/card0/device/drm", SYSFS));

        assert!(scan(&fs).unwrap().is_empty());
    }

    #[test]
    fn test_no_live_node_drops_card() {
        let mut fs = MockFs::new();
        fs.add_card(SYSFS, "card0", INTEL_VENDOR_ID, &["card0"]);
        fs.add_dir(DEVFS);

        assert!(scan(&fs).unwrap().is_empty());
    }

    #[test]
    fn test_control_node_never_confirms() {
        let mut fs = MockFs::new();
        fs.add_card(SYSFS, "card0", INTEL_VENDOR_ID, &["controlD64"]);
        fs.add_dev_node(DEVFS, "controlD64");

        assert!(scan(&fs).unwrap().is_empty());
    }

    #[test]
    fn test_render_node_confirms() {
        let mut fs = MockFs::new();
        fs.add_card(SYSFS, "card0", INTEL_VENDOR_ID, &["controlD64", "renderD128"]);
        fs.add_dev_node(DEVFS, "renderD128");

        assert_eq!(scan(&fs).unwrap(), ["card0"]);
    }

    /// Records every `exists` query made against the wrapped mock.
    struct RecordingFs {
        inner: MockFs,
        exists_calls: RefCell<Vec<PathBuf>>,
    }

    impl FileSystem for RecordingFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.inner.read_to_string(path)
        }

        fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
            self.inner.open(path)
        }

        fn exists(&self, path: &Path) -> bool {
            self.exists_calls.borrow_mut().push(path.to_path_buf());
            self.inner.exists(path)
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
            self.inner.read_dir(path)
        }
    }

    #[test]
    fn test_control_node_is_never_checked_and_first_hit_stops() {
        let mut inner = MockFs::new();
        inner.add_card(
            SYSFS,
            "card0",
            INTEL_VENDOR_ID,
            &["controlD64", "renderD128", "renderD129"],
        );
        for node in ["controlD64", "renderD128", "renderD129"] {
            inner.add_dev_node(DEVFS, node);
        }
        let fs = RecordingFs {
            inner,
            exists_calls: RefCell::new(Vec::new()),
        };

        let scanner = DrmScanner::new(fs, SYSFS, DEVFS);
        assert_eq!(scanner.scan().unwrap(), ["card0"]);
        assert_eq!(
            *scanner.fs.exists_calls.borrow(),
            [PathBuf::from("/dev/dri/renderD128")]
        );
    }
}
