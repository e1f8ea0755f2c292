//! # Browser Identity Provider
//!
//! Interactive login through an external identity provider:
//!
//! 1. [`begin_login`](IdentityProvider::begin_login) binds a callback listener on
//!    `127.0.0.1:{callback_port}` and opens
//!    `{identity_provider_url}/#authorize?callback=...&state=...` in the browser.
//! 2. The provider redirects back to `/callback` with either `principal`,
//!    `delegation`, and `expiration` (nanoseconds), or an `error`.
//! 3. [`on_result`](IdentityProvider::on_result) waits for that redirect, shuts
//!    the listener down, and persists the session as JSON so the next run can
//!    [`restore`](IdentityProvider::existing_session) it.
//!
//! A login whose result is never awaited to the end still stops its listener:
//! dropping the pending entry shuts it down, and the next `begin_login`
//! supersedes any entry left behind before binding the port again.

use crate::core::identity::Identity;
use crate::core::service::{IdentityProvider, PendingLogin, RemoteResult};
use crate::debug::task_tracker::spawn_tracked;
use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use lib_core::{AppError, Config};
use lib_utils::time::{nanos_to_utc, now_utc};
use parking_lot::Mutex;
use reqwest::Url;
use serde::Deserialize;
use shared::Principal;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

type LoginOutcome = Result<Identity, String>;

/// A started login waiting for its callback.
struct PendingCallback {
    result: oneshot::Receiver<LoginOutcome>,
    shutdown: Arc<Notify>,
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}

/// State shared with the callback route.
struct CallbackState {
    login_id: String,
    result: Mutex<Option<oneshot::Sender<LoginOutcome>>>,
    shutdown: Arc<Notify>,
}

/// Query parameters of the provider's redirect.
#[derive(Debug, Default, Deserialize)]
struct CallbackParams {
    state: Option<String>,
    principal: Option<String>,
    delegation: Option<String>,
    expiration: Option<u64>,
    error: Option<String>,
}

impl CallbackParams {
    fn into_outcome(self) -> LoginOutcome {
        if let Some(error) = self.error {
            return Err(error);
        }

        let principal = self
            .principal
            .ok_or_else(|| "callback is missing the principal".to_string())
            .and_then(|text| Principal::from_text(&text).map_err(|e| e.to_string()))?;
        let delegation = self
            .delegation
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "callback is missing the delegation".to_string())?;
        let expires_at = match self.expiration {
            Some(nanos) => Some(nanos_to_utc(nanos).ok_or_else(|| "expiration is out of range".to_string())?),
            None => None,
        };

        Ok(Identity::new(principal, delegation, expires_at))
    }
}

pub struct BrowserIdentityProvider {
    identity_provider_url: String,
    callback_port: u16,
    session_file: PathBuf,
    login_timeout: Duration,
    open_browser: bool,
    pending: Mutex<HashMap<String, PendingCallback>>,
    listeners: Mutex<Vec<(Arc<Notify>, JoinHandle<()>)>>,
}

impl BrowserIdentityProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            identity_provider_url: config.identity_provider_url.trim_end_matches('/').to_string(),
            callback_port: config.callback_port,
            session_file: config.session_file.clone(),
            login_timeout: Duration::from_secs(config.login_timeout_secs),
            open_browser: true,
            pending: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Do not launch a browser; the caller presents `authorize_url` itself.
    pub fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    fn authorize_url(&self, callback: &str, login_id: &str) -> Result<Url, AppError> {
        let mut url = Url::parse_with_params(
            &format!("{}/", self.identity_provider_url),
            &[("callback", callback), ("state", login_id)],
        )
        .map_err(|e| AppError::Config(format!("invalid identity provider URL: {}", e)))?;

        // The provider reads its parameters from the fragment.
        let params = url.query().unwrap_or_default().to_string();
        url.set_query(None);
        url.set_fragment(Some(&format!("authorize?{}", params)));
        Ok(url)
    }

    async fn save_session(&self, identity: &Identity) -> Result<(), AppError> {
        if let Some(parent) = self.session_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(identity)?;
        tokio::fs::write(&self.session_file, json).await?;
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<Identity>, AppError> {
        let bytes = match tokio::fs::read(&self.session_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn remove_session(&self) {
        match tokio::fs::remove_file(&self.session_file).await {
            Ok(()) => debug!(path = %self.session_file.display(), "Session file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.session_file.display(), error = %e, "Could not remove session file"),
        }
    }

    /// Shut down the listeners of earlier logins and wait until their port is free.
    ///
    /// A login still waiting in `on_result` ends with "listener stopped".
    async fn stop_stale_listeners(&self) {
        let stale: Vec<PendingCallback> = self.pending.lock().drain().map(|(_, callback)| callback).collect();
        if !stale.is_empty() {
            debug!(count = stale.len(), "Superseding abandoned logins");
        }
        drop(stale);

        let listeners = std::mem::take(&mut *self.listeners.lock());
        for (shutdown, listener) in listeners {
            shutdown.notify_one();
            if let Err(e) = listener.await {
                warn!(error = %e, "Login callback listener task failed");
            }
        }
    }
}

async fn handle_callback(
    State(state): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    if params.state.as_deref() != Some(state.login_id.as_str()) {
        warn!("Login callback with unknown state");
        return (StatusCode::BAD_REQUEST, "Unknown login attempt.");
    }

    let Some(sender) = state.result.lock().take() else {
        return (StatusCode::GONE, "This login has already completed.");
    };

    let outcome = params.into_outcome();
    let page = match &outcome {
        Ok(_) => (StatusCode::OK, "Login complete. You can close this window."),
        Err(_) => (StatusCode::OK, "Login failed. You can close this window and try again."),
    };

    let _ = sender.send(outcome);
    state.shutdown.notify_one();
    page
}

#[async_trait]
impl IdentityProvider for BrowserIdentityProvider {
    async fn existing_session(&self) -> Option<Identity> {
        let identity = match self.load_session().await {
            Ok(identity) => identity?,
            Err(e) => {
                warn!(path = %self.session_file.display(), error = %e, "Discarding unreadable session file");
                self.remove_session().await;
                return None;
            }
        };

        if identity.is_expired_at(now_utc()) {
            info!(principal = %identity.principal(), "Stored session expired");
            self.remove_session().await;
            return None;
        }
        Some(identity)
    }

    async fn begin_login(&self) -> RemoteResult<PendingLogin> {
        self.stop_stale_listeners().await;
        let login_id = Uuid::new_v4().to_string();

        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, self.callback_port))).await?;
        let port = listener.local_addr()?.port();
        let callback = format!("http://127.0.0.1:{}/callback", port);
        let authorize_url = self.authorize_url(&callback, &login_id)?;

        let (tx, rx) = oneshot::channel();
        let shutdown = Arc::new(Notify::new());
        let state = Arc::new(CallbackState {
            login_id: login_id.clone(),
            result: Mutex::new(Some(tx)),
            shutdown: shutdown.clone(),
        });

        let router = Router::new()
            .route("/callback", get(handle_callback))
            .with_state(state);

        let server_shutdown = shutdown.clone();
        let server = spawn_tracked("login_callback", async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_shutdown.notified().await })
                .await;
            if let Err(e) = served {
                warn!(error = %e, "Login callback listener failed");
            }
        });
        {
            let mut listeners = self.listeners.lock();
            listeners.retain(|(_, handle)| !handle.is_finished());
            listeners.push((shutdown.clone(), server));
        }

        self.pending.lock().insert(
            login_id.clone(),
            PendingCallback {
                result: rx,
                shutdown,
            },
        );

        if self.open_browser {
            if let Err(e) = open::that(authorize_url.as_str()) {
                warn!(error = %e, url = %authorize_url, "Could not open browser; open the URL manually");
            }
        }

        info!(login_id = %login_id, port, "Login started");
        Ok(PendingLogin {
            id: login_id,
            authorize_url: authorize_url.to_string(),
        })
    }

    async fn on_result(&self, pending: &PendingLogin) -> Result<Identity, String> {
        let mut callback = self
            .pending
            .lock()
            .remove(&pending.id)
            .ok_or_else(|| "unknown login attempt".to_string())?;

        let outcome = match tokio::time::timeout(self.login_timeout, &mut callback.result).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err("login callback listener stopped".to_string()),
            Err(_) => Err(format!("login timed out after {}s", self.login_timeout.as_secs())),
        };
        drop(callback);

        let identity = outcome?;
        if let Err(e) = self.save_session(&identity).await {
            warn!(path = %self.session_file.display(), error = %e, "Could not persist session");
        }
        Ok(identity)
    }

    async fn logout(&self) {
        self.remove_session().await;
    }
}
