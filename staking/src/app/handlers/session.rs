//! # Session Handlers
//!
//! Login, restore, and logout, each followed by the cache work it implies.

use crate::app::state::AppState;
use crate::core::error::OperationResult;
use crate::core::identity::Identity;
use tracing::{info, warn};

/// Restore a stored session and load the selected pool's position for it.
///
/// Internal handler function - use [`crate::app::App::start`] instead.
pub(crate) async fn handle_start(state: &AppState) -> Option<Identity> {
    let identity = state.session.restore_session().await?;
    refresh_after_sign_in(state, &identity).await;
    Some(identity)
}

/// Run the interactive login.
///
/// Internal handler function - use [`crate::app::App::login`] instead.
pub(crate) async fn handle_login(state: &AppState) -> OperationResult<Identity> {
    let identity = state.session.login().await?;
    refresh_after_sign_in(state, &identity).await;
    Ok(identity)
}

/// Sign out and forget every cached position.
///
/// Internal handler function - use [`crate::app::App::logout`] instead.
pub(crate) async fn handle_logout(state: &AppState) {
    state.session.logout().await;
    state.clear_positions();
}

async fn refresh_after_sign_in(state: &AppState, identity: &Identity) {
    let pool = state.selected_pool();
    match state.refresh_position(&pool, identity).await {
        Ok(position) => info!(
            pool = pool.label,
            staked_balance = position.staked_balance,
            "Position loaded after sign-in"
        ),
        Err(e) => warn!(pool = pool.label, error = %e, "Could not load position after sign-in"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::mocks::{test_identity, MockLedger, MockProvider, MockStaking};
    use crate::core::error::OperationError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_refreshes_selected_pool() {
        let staking = Arc::new(MockStaking::default());
        let provider = Arc::new(MockProvider::default());
        *provider.login_result.lock() = Some(Ok(test_identity()));
        let state = AppState::new(staking.clone(), Arc::new(MockLedger::default()), provider).unwrap();

        let identity = handle_login(&state).await.unwrap();
        assert!(state.position(&state.selected_pool()).is_some());
        assert_eq!(staking.calls("balanceOf"), 1);
        assert_eq!(state.session.current_identity(), Some(identity));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_no_position() {
        let state = AppState::new(
            Arc::new(MockStaking::default()),
            Arc::new(MockLedger::default()),
            Arc::new(MockProvider::default()),
        )
        .unwrap();
        assert_eq!(handle_login(&state).await, Err(OperationError::LoginFailed));
        assert!(state.position(&state.selected_pool()).is_none());
    }

    #[tokio::test]
    async fn test_start_and_logout() {
        let provider = Arc::new(MockProvider::default());
        *provider.stored.lock() = Some(test_identity());
        let state = AppState::new(
            Arc::new(MockStaking::default()),
            Arc::new(MockLedger::default()),
            provider,
        )
        .unwrap();

        let identity = handle_start(&state).await.unwrap();
        let pool = state.selected_pool();
        assert!(state.positions.get(pool.label, identity.principal()).is_some());

        handle_logout(&state).await;
        assert!(state.session.current_identity().is_none());
        assert!(state.positions.get(pool.label, identity.principal()).is_none());
    }
}
