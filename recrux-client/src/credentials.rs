//! Durable storage for the bearer token and the user it belongs to.
//!
//! The token and the serialized [`UserRecord`] live under two fixed keys and
//! are only ever written or cleared together through [`CredentialStore`].
//! Raw key access stays behind the [`KeyValueStorage`] trait.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use shared::models::UserRecord;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized user record.
pub const USER_KEY: &str = "user";

/// Failures of the credential backend.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The backend could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The user record could not be encoded.
    #[error("failed to serialize user record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A raw string key-value backend, the client-side analogue of browser local storage.
pub trait KeyValueStorage: Send + Sync + fmt::Debug {
    /// Reads a value; a missing key is `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;

    /// Removes a value; removing a missing key succeeds.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), CredentialError>;
}

/// Stores each key as its own file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`, created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, value.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process storage that disappears with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// The token and user record restored from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCredential {
    /// Bearer token.
    pub token: String,
    /// The user the token was issued to.
    pub user: UserRecord,
}

/// Pair-preserving access to the persisted credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    /// A store over any key-value backend.
    #[must_use]
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// A store backed by files in `dir`.
    #[must_use]
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(dir))
    }

    /// A store that lives only as long as the process.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Persists the token and user together, replacing any stored pair.
    ///
    /// The user is written first. If the token write then fails, the previous
    /// user entry is put back so the stored pair is the one that was there
    /// before the call. If even that fails, both entries are cleared.
    ///
    /// # Errors
    /// Returns an error when either value cannot be written.
    pub fn write_credential(&self, token: &str, user: &UserRecord) -> Result<(), CredentialError> {
        let serialized = serde_json::to_string(user)?;
        let previous_user = self.storage.get(USER_KEY)?;
        self.storage.set(USER_KEY, &serialized)?;

        if let Err(err) = self.storage.set(TOKEN_KEY, token) {
            let restored = match &previous_user {
                Some(previous) => self.storage.set(USER_KEY, previous),
                None => self.storage.remove(USER_KEY),
            };
            if let Err(rollback) = restored {
                warn!(error = %rollback, "failed to restore previous user entry; clearing credential");
                if let Err(clear) = self.clear_credential() {
                    warn!(error = %clear, "failed to clear credential after rollback failed");
                }
            }
            return Err(err);
        }

        debug!(email = %user.email, "credential persisted");
        Ok(())
    }

    /// Removes both entries. Both removals are attempted even if the first fails.
    ///
    /// # Errors
    /// Returns the first removal error.
    pub fn clear_credential(&self) -> Result<(), CredentialError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// Reads the credential pair.
    ///
    /// A lone token, a lone user, a blank token, or an unparseable user record
    /// all count as no credential.
    ///
    /// # Errors
    /// Returns an error only when the backend itself cannot be read.
    pub fn load(&self) -> Result<Option<PersistedCredential>, CredentialError> {
        let token = self
            .storage
            .get(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty());
        let user = self.storage.get(USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<UserRecord>(&user) {
                Ok(user) => Ok(Some(PersistedCredential { token, user })),
                Err(err) => {
                    warn!(error = %err, "stored user record is unreadable; ignoring credential");
                    Ok(None)
                }
            },
            (Some(_), None) => {
                warn!("stored token has no matching user record; ignoring credential");
                Ok(None)
            }
            (None, Some(_)) => {
                warn!("stored user record has no matching token; ignoring credential");
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> UserRecord {
        UserRecord {
            id: Some(1),
            email: "a@b.com".to_string(),
            role: "recruiter".to_string(),
            company_name: Some("TechFlow Inc.".to_string()),
        }
    }

    /// Accepts writes to every key except the token.
    #[derive(Debug, Default)]
    struct TokenWriteFails {
        inner: MemoryStorage,
    }

    impl KeyValueStorage for TokenWriteFails {
        fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
            if key == TOKEN_KEY {
                return Err(io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), CredentialError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let store = CredentialStore::memory();
        store.write_credential("t1", &user()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "t1");
        assert_eq!(loaded.user, user());
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CredentialStore {
            storage: storage.clone(),
        };
        store.write_credential("t1", &user()).unwrap();
        store.clear_credential().unwrap();

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_on_empty_store_succeeds() {
        CredentialStore::memory().clear_credential().unwrap();
    }

    #[test]
    fn test_lone_token_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t1").unwrap();
        assert!(CredentialStore::new(storage).load().unwrap().is_none());
    }

    #[test]
    fn test_lone_user_is_ignored() {
        let storage = MemoryStorage::new();
        storage
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        assert!(CredentialStore::new(storage).load().unwrap().is_none());
    }

    #[test]
    fn test_blank_token_or_corrupt_user_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "   ").unwrap();
        storage
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        assert!(CredentialStore::new(storage).load().unwrap().is_none());

        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t1").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();
        assert!(CredentialStore::new(storage).load().unwrap().is_none());
    }

    #[test]
    fn test_failed_token_write_rolls_back_user() {
        let storage = Arc::new(TokenWriteFails::default());
        let store = CredentialStore {
            storage: storage.clone(),
        };

        let err = store.write_credential("t1", &user()).unwrap_err();
        assert!(matches!(err, CredentialError::Io(_)));
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_overwrite_keeps_previous_pair() {
        let storage = Arc::new(TokenWriteFails::default());
        storage.inner.set(TOKEN_KEY, "old-token").unwrap();
        storage
            .inner
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        let store = CredentialStore {
            storage: storage.clone(),
        };
        let other = UserRecord {
            id: Some(2),
            email: "other@b.com".to_string(),
            role: "admin".to_string(),
            company_name: None,
        };

        store.write_credential("new-token", &other).unwrap_err();

        let kept = store.load().unwrap().unwrap();
        assert_eq!(kept.token, "old-token");
        assert_eq!(kept.user, user());
    }

    /// Fails every write after the first `allowed` ones.
    #[derive(Debug)]
    struct WritesRunOut {
        inner: MemoryStorage,
        allowed: Mutex<usize>,
    }

    impl KeyValueStorage for WritesRunOut {
        fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
            let mut allowed = self.allowed.lock().unwrap();
            if *allowed == 0 {
                return Err(io::Error::other("read-only").into());
            }
            *allowed -= 1;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), CredentialError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_rollback_clears_both_entries() {
        let inner = MemoryStorage::new();
        inner.set(TOKEN_KEY, "old-token").unwrap();
        inner
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        let storage = Arc::new(WritesRunOut {
            inner,
            allowed: Mutex::new(1),
        });
        let store = CredentialStore {
            storage: storage.clone(),
        };
        let other = UserRecord {
            email: "other@b.com".to_string(),
            ..user()
        };

        store.write_credential("new-token", &other).unwrap_err();

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("recrux");
        let store = CredentialStore::file(&dir);

        assert!(store.load().unwrap().is_none());
        store.write_credential("t1", &user()).unwrap();
        assert!(dir.join(TOKEN_KEY).exists());
        assert!(dir.join(USER_KEY).exists());

        let reopened = CredentialStore::file(&dir);
        assert_eq!(reopened.load().unwrap().unwrap().token, "t1");

        reopened.clear_credential().unwrap();
        assert!(!dir.join(TOKEN_KEY).exists());
        assert!(!dir.join(USER_KEY).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.set(TOKEN_KEY, "t1").unwrap();

        let mode = fs::metadata(temp_dir.path().join(TOKEN_KEY))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
