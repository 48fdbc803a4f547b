//! Function discovery under the functions root

use crate::packaging::PackageError;
use std::path::{Path, PathBuf};

/// List the function directories under `root`
///
/// Every immediate, non-hidden subdirectory is one function. The result is
/// sorted so rollouts visit functions in a stable order.
pub fn discover_functions(root: &Path) -> Result<Vec<PathBuf>, PackageError> {
    let discovery_error = |source: std::io::Error| PackageError::Discovery {
        path: root.to_path_buf(),
        source,
    };

    let mut directories = Vec::new();
    for entry in std::fs::read_dir(root).map_err(discovery_error)? {
        let entry = entry.map_err(discovery_error)?;
        if !entry.file_type().map_err(discovery_error)?.is_dir() {
            continue;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .map_or(true, |name| name.starts_with('.'));
        if hidden {
            continue;
        }
        directories.push(entry.path());
    }

    directories.sort();
    Ok(directories)
}
