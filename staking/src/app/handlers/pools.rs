//! # Pool Handlers
//!
//! Pool selection and explicit refreshes of the selected pool.

use crate::app::metadata::Metadata;
use crate::app::pools::Pool;
use crate::app::position::Position;
use crate::app::state::AppState;
use crate::core::error::{OperationError, OperationResult};
use tracing::{info, warn};

/// Select `label` and load its caches.
///
/// The previous pool's metadata and positions are dropped. Refresh failures are
/// logged; the selection itself still succeeds.
///
/// Internal handler function - use [`crate::app::App::select_pool`] instead.
pub(crate) async fn handle_select_pool(state: &AppState, label: &str) -> OperationResult<Pool> {
    let (previous, pool) = state.registry.replace_selection(label)?;
    if previous.label == pool.label {
        return Ok(pool);
    }

    state.invalidate_pool(&previous);
    info!(from = previous.label, to = pool.label, "Pool selected");

    if let Err(e) = state.refresh_metadata(&pool).await {
        warn!(pool = pool.label, error = %e, "Could not load metadata for selected pool");
    }
    if let Some(identity) = state.session.current_identity() {
        if let Err(e) = state.refresh_position(&pool, &identity).await {
            warn!(pool = pool.label, error = %e, "Could not load position for selected pool");
        }
    }
    Ok(pool)
}

/// Re-read the selected pool's metadata.
///
/// Internal handler function - use [`crate::app::App::refresh_metadata`] instead.
pub(crate) async fn handle_refresh_metadata(state: &AppState) -> OperationResult<Metadata> {
    let pool = state.selected_pool();
    state.refresh_metadata(&pool).await
}

/// Re-read the signed-in user's position in the selected pool.
///
/// Internal handler function - use [`crate::app::App::refresh_position`] instead.
pub(crate) async fn handle_refresh_position(state: &AppState) -> OperationResult<Position> {
    let identity = state
        .session
        .current_identity()
        .ok_or(OperationError::NotAuthenticated)?;
    let pool = state.selected_pool();
    state.refresh_position(&pool, &identity).await
}
