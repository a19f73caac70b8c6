//! Abstractions for filesystem access to enable testing and mocking.
//!
//! GPU discovery only ever inspects three read-only trees (sysfs, devfs and
//! debugfs). The `FileSystem` trait lets the scanners run against the real
//! host or against an in-memory [`MockFs`](crate::collector::MockFs).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Abstraction for read-only filesystem operations.
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Opens a file for line-oriented reading.
    ///
    /// The returned reader owns the underlying handle; dropping it closes
    /// the file.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    ///
    /// # Returns
    /// Full paths of the direct children of `path`, ordered by file name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        // Kernel listing order is arbitrary; keep a snapshot stable.
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::write(&vendor, "0x8086\n").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_to_string(&vendor).unwrap(), "0x8086\n");
    }

    #[test]
    fn test_real_fs_open_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let caps = dir.path().join("i915_capabilities");
        std::fs::write(&caps, "platform: TIGERLAKE\ngen: 12\n").unwrap();

        let fs = RealFs::new();
        let mut content = String::new();
        fs.open(&caps).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_real_fs_open_missing() {
        let fs = RealFs::new();
        let err = fs.open(Path::new("/nonexistent/path/12345")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_real_fs_exists() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.exists(dir.path()));
        assert!(!fs.exists(Path::new("/nonexistent/path/12345")));
    }

    #[test]
    fn test_real_fs_read_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["card2", "card0", "renderD128", "card1"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        let fs = RealFs::new();
        let names: Vec<_> = fs
            .read_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["card0", "card1", "card2", "renderD128"]);
    }
}
