//! In-memory mock filesystem for testing scanners without real sysfs.
//!
//! `MockFs` simulates the sysfs, devfs and debugfs trees in memory so the
//! whole labeling pipeline can be exercised on any host.

use crate::collector::traits::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, BufRead, Cursor};
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Files and directories are kept in ordered collections, so `read_dir`
/// lists children in lexical order just like `RealFs`.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: BTreeMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: BTreeSet<PathBuf>,
    /// Directories that exist but refuse to be listed.
    unreadable_dirs: BTreeSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a directory whose listing always fails with `PermissionDenied`.
    pub fn add_unreadable_dir(&mut self, path: impl AsRef<Path>) {
        self.add_dir(&path);
        self.unreadable_dirs.insert(path.as_ref().to_path_buf());
    }

    /// Adds a sysfs card entry with its `device/vendor` file and one
    /// `device/drm/<node>` entry per name in `drm_nodes`.
    ///
    /// # Arguments
    /// * `sysfs` - Attribute-tree root (usually "/sys/class/drm")
    /// * `card` - Card entry name, e.g. "card0"
    /// * `vendor` - Content of the vendor file, e.g. "0x8086\n"
    /// * `drm_nodes` - Names listed under `device/drm`
    pub fn add_card(
        &mut self,
        sysfs: impl AsRef<Path>,
        card: &str,
        vendor: &str,
        drm_nodes: &[&str],
    ) {
        let device = sysfs.as_ref().join(card).join("device");
        self.add_file(device.join("vendor"), vendor);
        self.add_dir(device.join("drm"));
        for node in drm_nodes {
            self.add_dir(device.join("drm").join(node));
        }
    }

    /// Adds a device node entry under a devfs root.
    pub fn add_dev_node(&mut self, devfs: impl AsRef<Path>, node: &str) {
        self.add_file(devfs.as_ref().join(node), "");
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let content = self.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })?;
        Ok(Box::new(Cursor::new(content.as_bytes())))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if self.unreadable_dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = BTreeSet::new();

        // Find all files and directories that are direct children
        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}
