use crate::error::ActionError;
use crate::resolver::PathTable;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Filesystem calls made by deletions. Swapped out in tests.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn remove_tree(&self, path: &Path) -> io::Result<()>;
}

pub struct RealFs;

impl Filesystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Cache folders offered for deletion, in display order. Every path is
/// `None` when the project path is not configured.
pub fn temp_folders(paths: &PathTable) -> Vec<(&'static str, Option<PathBuf>)> {
    let project = paths.get("unreal_project");
    let in_project = |name: &str| project.map(|p| p.join(name));
    let global_ddc = project.and_then(|_| {
        dirs::data_local_dir().map(|dir| dir.join("UnrealEngine/Common/DerivedDataCache"))
    });

    vec![
        ("Intermediate", in_project("Intermediate")),
        ("Saved", in_project("Saved")),
        ("DerivedDataCache", in_project("DerivedDataCache")),
        ("Binaries", in_project("Binaries")),
        (".vs", in_project(".vs")),
        ("Global DDC", global_ddc),
    ]
}

/// Removes the tree at `path`. Returns `Ok(false)` when there was nothing to remove.
pub fn delete_path(fs: &dyn Filesystem, path: &Path) -> Result<bool, ActionError> {
    info!("Attempting to delete folder: {}", path.display());
    if !fs.exists(path) {
        info!("Folder not found, nothing to delete: {}", path.display());
        return Ok(false);
    }

    fs.remove_tree(path).map_err(|source| ActionError::Delete {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Successfully deleted: {}", path.display());
    Ok(true)
}

/// Attempts every path in order regardless of earlier failures. Returns the
/// number of paths that could not be removed.
pub fn delete_all(fs: &dyn Filesystem, paths: &[PathBuf]) -> usize {
    let mut failures = 0;
    for path in paths {
        if let Err(e) = delete_path(fs, path) {
            error!("{}", e);
            failures += 1;
        }
    }
    failures
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Real filesystem except for paths listed as locked, which refuse removal.
    #[derive(Default)]
    pub struct LockingFs {
        pub locked: Vec<PathBuf>,
        pub removed: Mutex<Vec<PathBuf>>,
    }

    impl Filesystem for LockingFs {
        fn exists(&self, path: &Path) -> bool {
            path.exists()
        }

        fn remove_tree(&self, path: &Path) -> io::Result<()> {
            if self.locked.iter().any(|locked| locked == path) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "file in use",
                ));
            }
            RealFs.remove_tree(path)?;
            self.removed.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }
}
