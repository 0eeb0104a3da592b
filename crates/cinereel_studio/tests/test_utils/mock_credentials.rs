//! Credential provider that counts key prompts.

use async_trait::async_trait;
use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
use cinereel_models::{CredentialProvider, CredentialStore};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers key prompts from a scripted list.
#[derive(Default)]
pub struct MockCredentials {
    store: CredentialStore,
    next_keys: Mutex<Vec<String>>,
    selects: AtomicUsize,
}

impl MockCredentials {
    pub fn with_key(key: &str) -> Self {
        Self {
            store: CredentialStore::with_key(key),
            ..Self::default()
        }
    }

    /// No key selected; prompts hand out `keys` in order.
    pub fn without_key(keys: &[&str]) -> Self {
        Self {
            next_keys: Mutex::new(keys.iter().rev().map(|k| k.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Hand out `keys` in order on later prompts.
    pub fn then_keys(self, keys: &[&str]) -> Self {
        *self.next_keys.lock().unwrap() = keys.iter().rev().map(|k| k.to_string()).collect();
        self
    }

    pub fn select_calls(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<String> {
        self.store.get()
    }
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    fn api_key(&self) -> Option<String> {
        self.store.get()
    }

    async fn select_credential(&self) -> CinereelResult<()> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        match self.next_keys.lock().unwrap().pop() {
            Some(key) => {
                self.store.set(key);
                Ok(())
            }
            None => Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into()),
        }
    }
}
