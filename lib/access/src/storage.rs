//! Persisted session state.
//!
//! Two opaque values survive a page reload: the bearer token and a
//! serialized identity snapshot. They are written together and always
//! cleared together.

use std::sync::{Arc, Mutex, PoisonError};

/// Key/value persistence for the session's two stored fields.
///
/// Implementations absorb their own failures; a value that cannot be read
/// is reported as absent.
pub trait SessionStorage {
    /// Returns the persisted bearer token.
    fn token(&self) -> Option<String>;

    /// Returns the persisted identity snapshot.
    fn identity_snapshot(&self) -> Option<String>;

    /// Persists a token together with its identity snapshot.
    fn save(&self, token: &str, identity_snapshot: &str);

    /// Replaces the identity snapshot, keeping the token.
    fn save_identity_snapshot(&self, identity_snapshot: &str);

    /// Removes both values.
    fn clear(&self);
}

#[derive(Debug, Default)]
struct Stored {
    token: Option<String>,
    identity_snapshot: Option<String>,
}

/// In-process storage. Clones share the same values.
///
/// Used on the server side of the app and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Stored>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage holding a previously persisted session.
    #[must_use]
    pub fn with_session(token: &str, identity_snapshot: &str) -> Self {
        let storage = Self::new();
        storage.save(token, identity_snapshot);
        storage
    }

    fn with_stored<T>(&self, f: impl FnOnce(&mut Stored) -> T) -> T {
        let mut stored = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stored)
    }
}

impl SessionStorage for MemoryStorage {
    fn token(&self) -> Option<String> {
        self.with_stored(|s| s.token.clone())
    }

    fn identity_snapshot(&self) -> Option<String> {
        self.with_stored(|s| s.identity_snapshot.clone())
    }

    fn save(&self, token: &str, identity_snapshot: &str) {
        self.with_stored(|s| {
            s.token = Some(token.to_string());
            s.identity_snapshot = Some(identity_snapshot.to_string());
        });
    }

    fn save_identity_snapshot(&self, identity_snapshot: &str) {
        self.with_stored(|s| s.identity_snapshot = Some(identity_snapshot.to_string()));
    }

    fn clear(&self) {
        self.with_stored(|s| *s = Stored::default());
    }
}

#[cfg(feature = "browser")]
pub use browser::BrowserStorage;

#[cfg(feature = "browser")]
mod browser {
    use super::SessionStorage;
    use crate::config::AccessConfig;
    use tracing::warn;

    /// Storage backed by the browser's `localStorage`.
    ///
    /// The storage handle is looked up on every call, so the type holds
    /// only the two keys.
    #[derive(Debug, Clone)]
    pub struct BrowserStorage {
        token_key: String,
        identity_key: String,
    }

    impl BrowserStorage {
        /// Creates storage using the keys from `config`.
        #[must_use]
        pub fn new(config: &AccessConfig) -> Self {
            Self {
                token_key: config.token_key().to_string(),
                identity_key: config.identity_key().to_string(),
            }
        }

        fn local_storage() -> Option<web_sys::Storage> {
            match web_sys::window()?.local_storage() {
                Ok(storage) => storage,
                Err(err) => {
                    warn!(error = ?err, "localStorage is unavailable");
                    None
                }
            }
        }

        fn get(&self, key: &str) -> Option<String> {
            Self::local_storage()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            if let Some(storage) = Self::local_storage()
                && let Err(err) = storage.set_item(key, value)
            {
                warn!(key, error = ?err, "failed to persist session value");
            }
        }

        fn remove(&self, key: &str) {
            if let Some(storage) = Self::local_storage()
                && let Err(err) = storage.remove_item(key)
            {
                warn!(key, error = ?err, "failed to remove session value");
            }
        }
    }

    impl SessionStorage for BrowserStorage {
        fn token(&self) -> Option<String> {
            self.get(&self.token_key)
        }

        fn identity_snapshot(&self) -> Option<String> {
            self.get(&self.identity_key)
        }

        fn save(&self, token: &str, identity_snapshot: &str) {
            self.set(&self.token_key, token);
            self.set(&self.identity_key, identity_snapshot);
        }

        fn save_identity_snapshot(&self, identity_snapshot: &str) {
            self.set(&self.identity_key, identity_snapshot);
        }

        fn clear(&self) {
            self.remove(&self.token_key);
            self.remove(&self.identity_key);
        }
    }
}
