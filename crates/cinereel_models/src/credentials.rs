//! API key selection.
//!
//! Video generation needs a billing-enabled key, so the selected key can be
//! replaced at runtime: the transport reads the current key on every request.

use async_trait::async_trait;
use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Source of the API key used for every Gemini request.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The currently selected key.
    fn api_key(&self) -> Option<String>;

    /// Pre-flight check before calls that require a key.
    fn has_credential(&self) -> bool {
        self.api_key().is_some_and(|k| !k.trim().is_empty())
    }

    /// Ask for a (new) key.
    ///
    /// Called when no key is selected, and once more when the video service
    /// rejects the current one.
    async fn select_credential(&self) -> CinereelResult<()>;
}

/// Shared, replaceable key slot.
///
/// # Examples
///
/// ```
/// use cinereel_models::CredentialStore;
///
/// let store = CredentialStore::default();
/// assert!(store.get().is_none());
/// store.set("AIza-test");
/// assert_eq!(store.get().as_deref(), Some("AIza-test"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    key: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Create a slot holding `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(key);
        store
    }

    /// Current key.
    pub fn get(&self) -> Option<String> {
        match self.key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the key. Blank keys clear the slot.
    pub fn set(&self, key: impl Into<String>) {
        let key = key.into();
        let value = if key.trim().is_empty() {
            None
        } else {
            Some(key.trim().to_string())
        };
        match self.key.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Forget the key.
    pub fn clear(&self) {
        self.set("");
    }
}

/// Key taken from the `GEMINI_API_KEY` environment variable.
///
/// Selecting a credential re-reads the variable, so a key exported after start
/// (or loaded from `.env`) is picked up.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    store: CredentialStore,
}

impl EnvCredentials {
    /// Read the key from the environment.
    pub fn new() -> Self {
        let store = CredentialStore::default();
        if let Ok(key) = std::env::var(GEMINI_API_KEY_VAR) {
            store.set(key);
        }
        Self { store }
    }

    /// Use an explicit key instead of the environment.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            store: CredentialStore::with_key(key),
        }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        self.store.get()
    }

    #[instrument(skip(self))]
    async fn select_credential(&self) -> CinereelResult<()> {
        let key = std::env::var(GEMINI_API_KEY_VAR)
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        self.store.set(key);
        debug!("Reloaded API key from environment");
        if self.has_credential() {
            Ok(())
        } else {
            Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into())
        }
    }
}
