//! Persistence for the bearer token

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// A single key-value slot holding the raw bearer token.
///
/// Shared between the HTTP client, which reads it for every request, and the
/// auth store, which is the only writer. Implementations do not report write
/// failures; a failed write is logged and the slot keeps its previous value.
pub trait TokenStorage: Send + Sync + fmt::Debug {
    /// The stored token, `None` when the slot is empty
    fn get(&self) -> Option<String>;

    /// Replace the stored token
    fn set(&self, token: &str);

    /// Empty the slot
    fn clear(&self);
}

/// In-process token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds a token
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self) -> Option<String> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.clone()
    }

    fn set(&self, token: &str) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.to_string());
    }

    fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

/// Token storage backed by one file holding the raw token.
///
/// A missing or blank file reads as an empty slot.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("failed to read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = write_private(&self.path, token) {
            log::warn!("failed to write token file {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove token file {}: {}", self.path.display(), e),
        }
    }
}

/// Write `contents`, readable by the owner only on Unix
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // mode only applies on create; tighten a file left by an older run
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(contents.as_bytes())
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(contents.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slot_round_trip() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.get(), None);

        storage.set("abc");
        assert_eq!(storage.get().as_deref(), Some("abc"));

        storage.set("def");
        assert_eq!(storage.get().as_deref(), Some("def"));

        storage.clear();
        assert_eq!(storage.get(), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        FileTokenStorage::new(&path).set("persisted-token");
        let reopened = FileTokenStorage::new(&path);
        assert_eq!(reopened.get().as_deref(), Some("persisted-token"));

        reopened.clear();
        assert!(!path.exists());
        assert_eq!(reopened.get(), None);

        // clearing twice is fine
        reopened.clear();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStorage::new(&path).set("fresh");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn blank_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(FileTokenStorage::new(&path).get(), None);
    }
}
