//! File-backed storage.
//!
//! One JSON document per key under the platform config directory, written
//! atomically and readable only by the owner (the state holds a bearer
//! token).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;
use crate::storage::Storage;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/Snowplan`
/// - Linux: `~/.config/snowplan`
/// - Windows: `%APPDATA%\snowplan`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("Snowplan"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("snowplan"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default state file path.
pub fn default_state_path() -> PathBuf {
    default_config_dir().join("state.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600); // Owner read/write only
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Storage
// ============================================================================

/// Storage backend keeping each key in its own file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates storage rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates storage rooted at the platform config directory.
    pub fn default_path() -> Self {
        Self::new(default_config_dir())
    }

    /// The file a key is stored in.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = %path.display(), "Read state file");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                debug!(path = %parent.display(), "Creating config directory");
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write atomically (write to temp file, then rename).
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        set_restrictive_permissions(&path).await?;

        debug!(path = %path.display(), "Wrote state file");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_path() {
        let path = default_state_path();
        assert!(path.ends_with("state.json"));
    }

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.write("snowplan-state", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            storage.read("snowplan-state").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        // No stray temp file left behind
        assert!(!dir.path().join("snowplan-state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("deeper"));

        storage.write("snowplan-state", "{}").await.unwrap();
        assert!(storage.read("snowplan-state").await.unwrap().is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_state_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write("snowplan-state", "{}").await.unwrap();

        let metadata = tokio::fs::metadata(dir.path().join("snowplan-state.json"))
            .await
            .unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }
}
