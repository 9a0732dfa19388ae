use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{PathBuf, MAIN_SEPARATOR};

use crate::error::BridgeError;

/// Environment override for the storage root, for tests and scripting.
pub const STORAGE_DIR_ENV: &str = "WALLBRIDGE_STORAGE_DIR";

/// Mount state of the shared external storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageState {
    Mounted,
    MountedReadOnly,
    Unmounted,
}

impl StorageState {
    /// Storage is available to at least read.
    pub fn is_readable(self) -> bool {
        matches!(self, StorageState::Mounted | StorageState::MountedReadOnly)
    }
}

/// The shared external-storage area image files are read from.
pub trait ExternalStorage: Send + Sync {
    fn state(&self) -> StorageState;
    fn root(&self) -> Result<PathBuf>;
}

/// Desktop stand-in for the device's shared storage: the application data
/// directory, overridable through `WALLBRIDGE_STORAGE_DIR`.
pub struct DeviceStorage;

impl ExternalStorage for DeviceStorage {
    fn state(&self) -> StorageState {
        match self.root() {
            Ok(root) if root.is_dir() => StorageState::Mounted,
            _ => StorageState::Unmounted,
        }
    }

    fn root(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(STORAGE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let proj_dirs = ProjectDirs::from("com", "wallbridge", "wallbridge")
            .context("Failed to get project directories")?;
        let root = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(root)
    }
}

/// Join path segments with the platform separator. Segments arrive from the
/// shell relative to the storage root.
pub fn join_segments(segments: &[String]) -> String {
    segments.join(&MAIN_SEPARATOR.to_string())
}

/// Gate on the mount state, then resolve segments to an absolute path under
/// the storage root. Handlers call this before touching any file.
pub fn resolve(storage: &dyn ExternalStorage, segments: &[String]) -> Result<PathBuf, BridgeError> {
    if !storage.state().is_readable() {
        return Err(BridgeError::StorageUnavailable);
    }
    let root = storage
        .root()
        .map_err(|e| BridgeError::Platform(e.to_string()))?;
    Ok(root.join(join_segments(segments)))
}
