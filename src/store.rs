//! Credential storage for the access/refresh token pair.
//!
//! The API client reads the store at send time and writes it on the
//! login, refresh, and logout paths, so implementations use interior
//! mutability and hand out owned snapshots. The pair invariant holds
//! throughout: both tokens are stored together or not at all.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{from_reader, to_writer_pretty};

use crate::types::AuthTokens;

/// Storage for the credential pair.
///
/// Synchronous by contract: the client calls into the store inline on
/// every request and must observe the latest value, not a snapshot
/// from construction time.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored pair, if any.
    fn get(&self) -> Option<AuthTokens>;

    /// Replaces the stored pair.
    fn set(&self, access_token: &str, refresh_token: &str);

    /// Removes the stored pair.
    fn clear(&self);
}

/// In-memory credential store.
///
/// The browser client keeps tokens in local storage; for tests and
/// embedded use this is the equivalent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a token pair.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        store.set(access_token, refresh_token);
        store
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<AuthTokens> {
        self.tokens.lock().expect("store mutex poisoned").clone()
    }

    fn set(&self, access_token: &str, refresh_token: &str) {
        *self.tokens.lock().expect("store mutex poisoned") =
            Some(AuthTokens::new(access_token, refresh_token));
    }

    fn clear(&self) {
        *self.tokens.lock().expect("store mutex poisoned") = None;
    }
}

/// File-backed credential store for the console client.
///
/// The pair is cached in memory and written through to a JSON file
/// with the two camelCase fields; `clear` deletes the file. File I/O
/// failures are logged and the in-memory state stays authoritative,
/// matching how the console client treats its token file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tokens: Mutex<Option<AuthTokens>>,
}

impl FileStore {
    /// Opens a store backed by the given path, loading any previously
    /// saved pair.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let tokens = Self::read_file(&path);
        if tokens.is_some() {
            tracing::debug!(path = %path.display(), "loaded stored credentials");
        }
        Self {
            path,
            tokens: Mutex::new(tokens),
        }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Option<AuthTokens> {
        let file = File::open(path).ok()?;
        let reader = BufReader::new(file);
        match from_reader::<_, AuthTokens>(reader) {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed token file");
                None
            }
        }
    }

    fn write_file(&self, tokens: &AuthTokens) {
        let write = || -> std::io::Result<()> {
            let file = File::create(&self.path)?;
            let writer = BufWriter::new(file);
            to_writer_pretty(writer, tokens).map_err(std::io::Error::other)
        };
        if let Err(err) = write() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to save credentials");
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Option<AuthTokens> {
        self.tokens.lock().expect("store mutex poisoned").clone()
    }

    fn set(&self, access_token: &str, refresh_token: &str) {
        let tokens = AuthTokens::new(access_token, refresh_token);
        self.write_file(&tokens);
        *self.tokens.lock().expect("store mutex poisoned") = Some(tokens);
    }

    fn clear(&self) {
        *self.tokens.lock().expect("store mutex poisoned") = None;
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to delete token file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get().is_none());

        store.set("A1", "R1");
        let tokens = store.get().unwrap();
        assert_eq!(tokens.access_token, "A1");
        assert_eq!(tokens.refresh_token, "R1");

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn memory_store_set_replaces_pair() {
        let store = MemoryStore::with_tokens("A1", "R1");
        store.set("A2", "R1");
        let tokens = store.get().unwrap();
        assert_eq!(tokens.access_token, "A2");
        assert_eq!(tokens.refresh_token, "R1");
    }

    #[test]
    fn file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "tablemate-store-test-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let store = FileStore::open(&path);
        assert!(store.get().is_none());

        store.set("A1", "R1");
        assert!(path.exists());

        // A fresh store sees what the first one persisted.
        let reloaded = FileStore::open(&path);
        assert_eq!(reloaded.get().unwrap(), AuthTokens::new("A1", "R1"));

        store.clear();
        assert!(!path.exists());
        assert!(store.get().is_none());
    }

    #[test]
    fn file_store_ignores_malformed_file() {
        let path = std::env::temp_dir().join(format!(
            "tablemate-store-malformed-{}.json",
            std::process::id()
        ));
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get().is_none());

        let _ = fs::remove_file(&path);
    }
}
