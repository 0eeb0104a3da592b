//! Interactive API key selection.

use async_trait::async_trait;
use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
use cinereel_models::{CredentialProvider, CredentialStore, GEMINI_API_KEY_VAR};
use std::io::{BufRead, Write};
use tracing::{debug, instrument};

/// Starts from `GEMINI_API_KEY` and asks on the terminal when a new key is needed.
#[derive(Debug, Clone, Default)]
pub struct PromptCredentials {
    store: CredentialStore,
}

impl PromptCredentials {
    pub fn from_env() -> Self {
        let store = CredentialStore::default();
        if let Ok(key) = std::env::var(GEMINI_API_KEY_VAR) {
            store.set(key);
        }
        Self { store }
    }
}

fn read_key() -> std::io::Result<String> {
    let mut stderr = std::io::stderr();
    write!(
        stderr,
        "Video generation needs a Gemini API key from a billing-enabled project.\nAPI key: "
    )?;
    stderr.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[async_trait]
impl CredentialProvider for PromptCredentials {
    fn api_key(&self) -> Option<String> {
        self.store.get()
    }

    #[instrument(skip(self))]
    async fn select_credential(&self) -> CinereelResult<()> {
        let key = tokio::task::spawn_blocking(read_key)
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        if key.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }
        self.store.set(key);
        debug!("API key selected");
        Ok(())
    }
}
