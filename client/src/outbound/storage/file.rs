//! File-backed identity store.
//!
//! One JSON file per storage key inside a single directory, written via a
//! temporary name and renamed into place so readers never observe a
//! half-written record.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde_json::Value;

use crate::domain::identity::StorageKey;
use crate::domain::ports::{IdentityStore, IdentityStoreError};

/// Identity store persisting each record under `<key>.json`.
#[derive(Debug)]
pub struct FileIdentityStore {
    dir: Dir,
}

impl FileIdentityStore {
    /// Open the store rooted at `path`, creating the directory if needed.
    pub fn open(path: &Path) -> Result<Self, IdentityStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|error| IdentityStoreError::backend(format!("{}: {error}", path.display())))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|error| IdentityStoreError::backend(format!("{}: {error}", path.display())))?;
        Ok(Self { dir })
    }

    fn file_name(key: StorageKey) -> String {
        format!("{}.json", key.as_str())
    }

    fn replace(&self, staged: &str, name: &str) -> Result<(), IdentityStoreError> {
        match self.dir.remove_file(name) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(IdentityStoreError::backend(format!("{name}: {error}")));
            }
        }
        self.dir
            .rename(staged, &self.dir, name)
            .map_err(|error| IdentityStoreError::backend(format!("{name}: {error}")))
    }
}

impl IdentityStore for FileIdentityStore {
    fn save(&self, key: StorageKey, value: &Value) -> Result<(), IdentityStoreError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|error| IdentityStoreError::serialize(error.to_string()))?;
        let name = Self::file_name(key);
        let staged = format!("{name}.tmp");
        self.dir
            .write(&staged, &bytes)
            .map_err(|error| IdentityStoreError::backend(format!("{staged}: {error}")))?;
        self.replace(&staged, &name)
    }

    fn load(&self, key: StorageKey) -> Result<Option<Value>, IdentityStoreError> {
        let name = Self::file_name(key);
        let bytes = match self.dir.read(&name) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(IdentityStoreError::backend(format!("{name}: {error}")));
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                // Unreadable records are dropped rather than wedging sign-in.
                tracing::warn!("discarding unreadable record {name}: {error}");
                let _ = self.dir.remove_file(&name);
                Ok(None)
            }
        }
    }

    fn remove(&self, key: StorageKey) -> Result<(), IdentityStoreError> {
        let name = Self::file_name(key);
        match self.dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(IdentityStoreError::backend(format!("{name}: {error}"))),
        }
    }
}
