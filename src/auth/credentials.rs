use std::sync::{Mutex, MutexGuard};

use keyring::Entry;
use thiserror::Error;

/// Keychain service identifier shared by all Worth secrets
const SERVICE_NAME: &str = "io.hiro.worth";

/// Keychain entry holding the short-lived bearer token
const ACCESS_TOKEN_ENTRY: &str = "access-token";

/// Keychain entry holding the longer-lived refresh token
const REFRESH_TOKEN_ENTRY: &str = "refresh-token";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keychain access failed: {0}")]
    Keyring(#[from] keyring::Error),
}

/// The token pair a successful sign-in yields.
///
/// A backend replying with the older cookie-based session shape provides no
/// refresh token; such a credential still authorizes requests but cannot be
/// refreshed after it expires.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Storage contract for the current token pair.
///
/// One store is constructed at process start and handed to the request
/// executor by reference; every outbound request reads the latest access
/// token through it. Implementations must tolerate concurrent readers and
/// writers (last write wins), and `store_pair` must never let an access
/// token from one refresh response end up next to a refresh token from
/// another.
pub trait CredentialStore: Send + Sync {
    fn access_token(&self) -> Result<Option<String>, CredentialError>;

    fn set_access_token(&self, token: &str) -> Result<(), CredentialError>;

    fn refresh_token(&self) -> Result<Option<String>, CredentialError>;

    fn set_refresh_token(&self, token: &str) -> Result<(), CredentialError>;

    /// Replaces both tokens in one guarded update.
    fn store_pair(&self, access_token: &str, refresh_token: &str) -> Result<(), CredentialError>;

    /// Removes both tokens; used at sign-out. Missing entries are not an
    /// error.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Durable credential storage in the OS keychain.
///
/// Each secret is its own keychain entry under a fixed service name, so the
/// pair survives application restarts. A process-local mutex serializes
/// writes; the keychain itself offers no multi-entry transaction.
pub struct KeyringStore {
    write_guard: Mutex<()>,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self { write_guard: Mutex::new(()) }
    }

    fn read(entry_name: &str) -> Result<Option<String>, CredentialError> {
        let entry = Entry::new(SERVICE_NAME, entry_name)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(entry_name: &str, secret: &str) -> Result<(), CredentialError> {
        let entry = Entry::new(SERVICE_NAME, entry_name)?;
        entry.set_password(secret)?;
        Ok(())
    }

    fn remove(entry_name: &str) -> Result<(), CredentialError> {
        let entry = Entry::new(SERVICE_NAME, entry_name)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn access_token(&self) -> Result<Option<String>, CredentialError> {
        Self::read(ACCESS_TOKEN_ENTRY)
    }

    fn set_access_token(&self, token: &str) -> Result<(), CredentialError> {
        let _guard = lock(&self.write_guard);
        Self::write(ACCESS_TOKEN_ENTRY, token)
    }

    fn refresh_token(&self) -> Result<Option<String>, CredentialError> {
        Self::read(REFRESH_TOKEN_ENTRY)
    }

    fn set_refresh_token(&self, token: &str) -> Result<(), CredentialError> {
        let _guard = lock(&self.write_guard);
        Self::write(REFRESH_TOKEN_ENTRY, token)
    }

    fn store_pair(&self, access_token: &str, refresh_token: &str) -> Result<(), CredentialError> {
        let _guard = lock(&self.write_guard);
        Self::write(ACCESS_TOKEN_ENTRY, access_token)?;
        Self::write(REFRESH_TOKEN_ENTRY, refresh_token)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let _guard = lock(&self.write_guard);
        Self::remove(ACCESS_TOKEN_ENTRY)?;
        Self::remove(REFRESH_TOKEN_ENTRY)
    }
}

/// In-process credential storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    tokens: Mutex<StoredTokens>,
}

#[derive(Default)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn access_token(&self) -> Result<Option<String>, CredentialError> {
        Ok(lock(&self.tokens).access.clone())
    }

    fn set_access_token(&self, token: &str) -> Result<(), CredentialError> {
        lock(&self.tokens).access = Some(token.to_string());
        Ok(())
    }

    fn refresh_token(&self) -> Result<Option<String>, CredentialError> {
        Ok(lock(&self.tokens).refresh.clone())
    }

    fn set_refresh_token(&self, token: &str) -> Result<(), CredentialError> {
        lock(&self.tokens).refresh = Some(token.to_string());
        Ok(())
    }

    fn store_pair(&self, access_token: &str, refresh_token: &str) -> Result<(), CredentialError> {
        let mut tokens = lock(&self.tokens);
        tokens.access = Some(access_token.to_string());
        tokens.refresh = Some(refresh_token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut tokens = lock(&self.tokens);
        tokens.access = None;
        tokens.refresh = None;
        Ok(())
    }
}

// A poisoned lock only means another writer panicked mid-update; the stored
// strings are still intact, so recover the guard instead of propagating.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
    }

    #[test]
    fn clear_removes_both_tokens() {
        let store = MemoryStore::new();
        store.store_pair("access", "refresh").unwrap();
        store.clear().unwrap();
        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
    }

    #[test]
    fn single_token_updates_leave_the_other_alone() {
        let store = MemoryStore::new();
        store.store_pair("access-1", "refresh-1").unwrap();
        store.set_access_token("access-2").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("access-2"));
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn concurrent_pair_writes_never_interleave() {
        let store = Arc::new(MemoryStore::new());

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for round in 0..200 {
                        let tag = format!("{writer}-{round}");
                        store
                            .store_pair(&format!("access-{tag}"), &format!("refresh-{tag}"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        // Whatever write landed last, the pair must come from one call.
        let access = store.access_token().unwrap().expect("access token present");
        let refresh = store.refresh_token().unwrap().expect("refresh token present");
        assert_eq!(
            access.strip_prefix("access-").unwrap(),
            refresh.strip_prefix("refresh-").unwrap()
        );
    }
}
