//! # Session Manager
//!
//! Owns the signed-in [`Identity`] and its lifecycle (restore, login, logout).
//! An identity whose delegation expired is dropped on the next read.

use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::{Caller, Identity};
use crate::core::service::IdentityProvider;
use lib_utils::time::now_utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    identity: RwLock<Option<Identity>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            identity: RwLock::new(None),
        }
    }

    /// Pick up a still-valid session without prompting the user.
    ///
    /// Idempotent: a present identity is returned as-is.
    pub async fn restore_session(&self) -> Option<Identity> {
        if let Some(identity) = self.current_identity() {
            return Some(identity);
        }

        let restored = self.provider.existing_session().await?;
        if restored.is_expired_at(now_utc()) {
            info!(principal = %restored.principal(), "Stored session has expired");
            return None;
        }

        info!(principal = %restored.principal(), "Session restored");
        *self.identity.write() = Some(restored.clone());
        Some(restored)
    }

    /// Run the provider's login handshake.
    pub async fn login(&self) -> OperationResult<Identity> {
        let pending = self.provider.begin_login().await.map_err(|e| {
            warn!(error = %e, "Could not start login");
            OperationError::LoginFailed
        })?;

        info!(login_id = %pending.id, url = %pending.authorize_url, "Waiting for identity provider");

        let identity = self.provider.on_result(&pending).await.map_err(|reason| {
            warn!(login_id = %pending.id, reason = %reason, "Login did not complete");
            OperationError::LoginFailed
        })?;

        if identity.is_expired_at(now_utc()) {
            warn!(login_id = %pending.id, "Identity provider returned an expired delegation");
            return Err(OperationError::LoginFailed);
        }

        info!(principal = %identity.principal(), "Logged in");
        *self.identity.write() = Some(identity.clone());
        Ok(identity)
    }

    /// The signed-in identity, if any and not expired.
    pub fn current_identity(&self) -> Option<Identity> {
        let identity = self.identity.read().clone()?;
        if identity.is_expired_at(now_utc()) {
            let mut slot = self.identity.write();
            if slot.as_ref() == Some(&identity) {
                *slot = None;
                info!(principal = %identity.principal(), "Session expired");
            }
            return None;
        }
        Some(identity)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_identity().is_some()
    }

    /// Calling context for remote calls: the identity, or anonymous before sign-in.
    pub fn caller(&self) -> Caller {
        self.current_identity()
            .map(Caller::Identity)
            .unwrap_or(Caller::Anonymous)
    }

    /// Drop the identity here and in the provider's store.
    ///
    /// Returns the identity that was signed in.
    pub async fn logout(&self) -> Option<Identity> {
        let previous = self.identity.write().take();
        self.provider.logout().await;
        if let Some(identity) = &previous {
            info!(principal = %identity.principal(), "Logged out");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::mocks::{test_identity, MockProvider};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_login_success() {
        let provider = Arc::new(MockProvider::default());
        *provider.login_result.lock() = Some(Ok(test_identity()));
        let session = SessionManager::new(provider);

        assert!(session.current_identity().is_none());
        assert!(session.caller().is_anonymous());

        let identity = session.login().await.unwrap();
        assert_eq!(session.current_identity(), Some(identity.clone()));
        assert_eq!(session.caller(), Caller::Identity(identity));
    }

    #[tokio::test]
    async fn test_login_cancelled() {
        let session = SessionManager::new(Arc::new(MockProvider::default()));
        assert_eq!(session.login().await, Err(OperationError::LoginFailed));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_begin_failure() {
        let provider = MockProvider {
            fail_begin: true,
            ..Default::default()
        };
        let session = SessionManager::new(Arc::new(provider));
        assert_eq!(session.login().await, Err(OperationError::LoginFailed));
    }

    #[tokio::test]
    async fn test_restore_is_idempotent() {
        let provider = Arc::new(MockProvider::default());
        *provider.stored.lock() = Some(test_identity());
        let session = SessionManager::new(provider.clone());

        let first = session.restore_session().await.unwrap();
        *provider.stored.lock() = None;
        let second = session.restore_session().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_restore_ignores_expired_session() {
        let provider = Arc::new(MockProvider::default());
        let expired = Identity::new(
            *test_identity().principal(),
            "old",
            Some(Utc::now() - Duration::minutes(1)),
        );
        *provider.stored.lock() = Some(expired);

        let session = SessionManager::new(provider);
        assert!(session.restore_session().await.is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout() {
        let provider = Arc::new(MockProvider::default());
        *provider.stored.lock() = Some(test_identity());
        let session = SessionManager::new(provider.clone());
        session.restore_session().await.unwrap();

        assert!(session.logout().await.is_some());
        assert!(session.current_identity().is_none());
        assert!(provider.stored.lock().is_none());
        assert_eq!(*provider.logouts.lock(), 1);
    }
}
