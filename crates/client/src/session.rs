//! Explicit session context holding the bearer credential.
//!
//! The credential is shared mutable state with last-write-wins semantics:
//! requests read it once when building headers, so a request already in
//! flight keeps whatever it captured even if the session is cleared meanwhile.

use arc_swap::ArcSwapOption;
use pitchside_config::SessionConfig;
use pitchside_types::{CredentialStore, Navigator, traits::Result};
use std::sync::Arc;

pub struct Session {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    token: ArcSwapOption<String>,
    token_key: String,
    login_path: String,
}

impl Session {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            store,
            navigator,
            token: ArcSwapOption::empty(),
            token_key: config.token_key.clone(),
            login_path: config.login_path.clone(),
        }
    }

    /// Load the persisted credential into memory (startup).
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn restore(&self) -> Result<bool> {
        let token = self.store.get(&self.token_key).await?;
        let found = token.is_some();
        self.token.store(token.map(Arc::new));
        tracing::debug!(found, "session restored from credential store");
        Ok(found)
    }

    /// The current bearer credential, if any.
    #[must_use]
    pub fn token(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    /// Persist and activate a new credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store fails to persist the token;
    /// the in-memory credential is left unchanged in that case.
    pub async fn sign_in(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.set(&self.token_key, &token).await?;
        self.token.store(Some(Arc::new(token)));
        tracing::info!("session signed in");
        Ok(())
    }

    /// Clear the credential from memory and from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store fails to remove the token.
    /// The in-memory credential is cleared regardless.
    pub async fn sign_out(&self) -> Result<()> {
        self.token.store(None);
        self.store.remove(&self.token_key).await?;
        tracing::info!("session signed out");
        Ok(())
    }

    /// Authorization failure transition: sign out and redirect to login.
    ///
    /// Never fails; a store error is logged and the redirect still happens.
    pub async fn expire(&self) {
        if let Err(e) = self.sign_out().await {
            tracing::warn!(error = %e, "failed to remove stored credential during forced logout");
        }
        tracing::warn!(path = %self.login_path, "authorization failed, redirecting to login");
        self.navigator.redirect(&self.login_path);
    }

    /// The backing store, for workflows that persist auxiliary values.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}
