//! Token storage trait

use crate::error::StorageError;

/// Key-value slot storage
///
/// Implementations hold small string values under short keys. The session
/// store only ever touches a single key, but backends make no assumption
/// about which one.
pub trait TokenStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Validate a storage key
///
/// Keys must be non-empty and consist of ASCII alphanumerics, `_`, `-` or
/// `.`, and may not start with `.`. File backends use the key as a file
/// name, so anything else is rejected.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }

    if key.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "key may not start with '.': {}",
            key
        )));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(StorageError::InvalidKey(format!(
            "key contains invalid characters: {}",
            key
        )));
    }

    Ok(())
}
