//! Local file storage backend

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::backend::{TokenStorage, validate_key};
use crate::error::StorageError;

/// Local file storage backend
///
/// Stores each key as its own file: `<base_path>/<key>`. Writes go to a
/// temp file in the same directory and are renamed into place, so a crash
/// mid-write never leaves a truncated token behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage rooted at `base_path`, creating the
    /// directory if needed
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;

        info!("Initialized file storage at {:?}", base_path);

        Ok(Self { base_path })
    }

    /// Directory holding the stored keys
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        debug!("Reading key {} from {:?}", key, path);

        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        debug!("Writing key {} to {:?}", key, path);

        let temp_file = tempfile::NamedTempFile::new_in(&self.base_path)?;

        {
            let mut file = temp_file.as_file();
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }

        // Tokens are credentials: owner read/write only
        #[cfg(unix)]
        {
            let mut perms = temp_file.as_file().metadata()?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(temp_file.path(), perms)?;
        }

        temp_file
            .persist(&path)
            .map_err(|e| StorageError::Io(e.error))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        debug!("Removing key {} at {:?}", key, path);

        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(storage.get("token").unwrap(), None);

        storage.set("token", "T1").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("T1"));
        assert!(dir.path().join("token").exists());

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        assert!(!dir.path().join("token").exists());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.remove("token").unwrap();
        storage.remove("token").unwrap();
    }

    #[test]
    fn test_value_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();

        FileStorage::new(dir.path())
            .unwrap()
            .set("token", "persisted")
            .unwrap();

        let reopened = FileStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let storage = FileStorage::new(&nested).unwrap();
        storage.set("token", "x").unwrap();
        assert!(nested.join("token").exists());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let result = storage.set("../escape", "x");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set("token", "secret").unwrap();

        let mode = std::fs::metadata(dir.path().join("token"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
