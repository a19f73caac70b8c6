//! Fatal errors of a labeling run.

use std::path::PathBuf;

/// Error type for discovery failures that abort the run.
///
/// Everything else (unreadable vendor files, missing debugfs, ...) is
/// logged and skipped by the scanners.
#[derive(Debug)]
pub enum ScanError {
    /// The sysfs attribute tree could not be listed.
    ReadSysfs { path: PathBuf, source: std::io::Error },
    /// The `device/drm` directory of an Intel card could not be listed.
    ReadDrmDir { path: PathBuf, source: std::io::Error },
    /// A confirmed card name carried no ordinal.
    InvalidDeviceName(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::ReadSysfs { path, source } => {
                write!(f, "can't read sysfs folder {}: {}", path.display(), source)
            }
            ScanError::ReadDrmDir { path, source } => {
                write!(f, "can't read device folder {}: {}", path.display(), source)
            }
            ScanError::InvalidDeviceName(name) => {
                write!(f, "gpu name parsing error: {:?}", name)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::ReadSysfs { source, .. } | ScanError::ReadDrmDir { source, .. } => {
                Some(source)
            }
            ScanError::InvalidDeviceName(_) => None,
        }
    }
}
