//! Session management and authenticated requests
//!
//! The `Auth` handle owns the whole session lifecycle: the token store, the
//! proactive refresh timer, and the request wrapper that attaches the bearer
//! token and retries once on 401. Expected auth failures (undecodable
//! tokens, a rejected refresh) are absent values and `false` returns, not
//! errors; the only fatal path is a retry that still comes back 401 or a
//! scheduled refresh that fails, both of which clear the session and invoke
//! the redirect handler.

mod claims;
mod store;
mod types;

use reqwest::{Client, StatusCode};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use claims::{decode_claims, token_expiry};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::*;

use claims::{now_ms, refresh_delay, REFRESH_MARGIN_MS};

/// Navigation callback invoked with the login path when a session becomes
/// irrecoverable. Supplied by the embedding application; the core never
/// touches UI machinery itself.
pub type RedirectHandler = dyn Fn(&str) + Send + Sync;

struct AuthInner {
    /// The base URL of the IndiQuant API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,

    /// The session's token pair
    store: Arc<dyn TokenStore>,

    /// At most one pending proactive refresh; arming replaces and aborts
    refresh_timer: Mutex<Option<JoinHandle<()>>>,

    /// Serializes refresh round-trips so concurrent callers await one
    /// attempt instead of issuing duplicates
    refresh_gate: tokio::sync::Mutex<()>,

    on_redirect: Mutex<Option<Box<RedirectHandler>>>,
}

/// Client for IndiQuant authentication and session management
#[derive(Clone)]
pub struct Auth {
    inner: Arc<AuthInner>,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        options: ClientOptions,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                url: url.to_string(),
                client,
                options,
                store,
                refresh_timer: Mutex::new(None),
                refresh_gate: tokio::sync::Mutex::new(()),
                on_redirect: Mutex::new(None),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.url, path)
    }

    /// Install the navigation callback invoked with the login path when the
    /// session is torn down
    pub fn set_redirect_handler(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        let mut on_redirect = self.inner.on_redirect.lock().unwrap();
        *on_redirect = Some(Box::new(handler));
    }

    /// Arm the scheduler on startup if a prior session exists
    pub fn init(&self) {
        if self.inner.options.auto_refresh_token {
            self.schedule_refresh();
        }
    }

    /// Sign in with username and password
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<TokenPair, Error> {
        let signin_path = self.inner.options.signin_path.clone();
        self.token_request(&signin_path, username, password).await
    }

    /// Register a new account
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<TokenPair, Error> {
        let signup_path = self.inner.options.signup_path.clone();
        self.token_request(&signup_path, username, password).await
    }

    async fn token_request(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, Error> {
        let url = self.endpoint(path);
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = Fetch::post(&self.inner.client, &url)
            .json(&credentials)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::auth(format!(
                "request to {} failed with status {}: {}",
                path, status, text
            )));
        }

        let pair: TokenPair = response.json().await?;
        self.inner
            .store
            .save_tokens(&pair.access_token, &pair.refresh_token);
        if self.inner.options.auto_refresh_token {
            self.schedule_refresh();
        }
        Ok(pair)
    }

    /// Sign out locally: drop the stored tokens and cancel any pending
    /// refresh. Does not navigate anywhere.
    pub fn sign_out(&self) {
        self.cancel_refresh();
        self.inner.store.clear_tokens();
    }

    /// The currently stored access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.inner.store.access_token()
    }

    /// Whether a session is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.refresh_token().is_some() || self.inner.store.access_token().is_some()
    }

    /// Refresh the session if the access token is absent, undecodable, or
    /// expires within the next minute.
    ///
    /// Returns `true` when a usable token is in the store afterwards: the
    /// token was still fresh, or the refresh endpoint returned a new pair.
    /// Returns `false` when no refresh token exists or the refresh attempt
    /// failed; the caller decides whether that is fatal.
    pub async fn refresh_if_needed(&self) -> bool {
        if self.inner.store.refresh_token().is_none() {
            return false;
        }

        let _gate = self.inner.refresh_gate.lock().await;

        // Re-read under the gate: a concurrent caller may have refreshed
        // while this one waited.
        let Some(refresh_token) = self.inner.store.refresh_token() else {
            return false;
        };
        if let Some(expiry) = self.inner.store.access_token().as_deref().and_then(token_expiry) {
            if expiry - now_ms() >= REFRESH_MARGIN_MS {
                return true;
            }
        }

        match self.request_refresh(&refresh_token).await {
            Ok(pair) => {
                self.inner
                    .store
                    .save_tokens(&pair.access_token, &pair.refresh_token);
                if self.inner.options.auto_refresh_token {
                    self.schedule_refresh();
                }
                true
            }
            Err(e) => {
                warn!("token refresh failed: {}", e);
                false
            }
        }
    }

    /// One refresh round-trip; anything but HTTP 200 is a failure
    async fn request_refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let refresh_path = self.inner.options.refresh_path.clone();
        let url = self.endpoint(&refresh_path);

        let response = Fetch::post(&self.inner.client, &url)
            .form(vec![("refresh_token".to_string(), refresh_token.to_string())])
            .execute_raw()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::auth(format!(
                "refresh rejected with status {}",
                response.status()
            )));
        }

        Ok(response.json::<TokenPair>().await?)
    }

    /// Arm the proactive refresh timer one margin before the access token
    /// expires, with a 30 second floor.
    ///
    /// Any previously armed timer is canceled first; there is never more
    /// than one pending refresh. When the stored access token has no
    /// decodable expiry the scheduler stays idle and the session relies on
    /// reactive 401 handling alone.
    pub fn schedule_refresh(&self) {
        let mut timer = self.inner.refresh_timer.lock().unwrap();
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let Some(expiry) = self.inner.store.access_token().as_deref().and_then(token_expiry)
        else {
            debug!("no decodable token expiry; proactive refresh stays idle");
            return;
        };

        let delay = refresh_delay(expiry, now_ms());
        debug!("token refresh scheduled in {:?}", delay);

        let weak = Arc::downgrade(&self.inner);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // The timer fired; it is no longer pending.
            inner.refresh_timer.lock().unwrap().take();

            let auth = Auth { inner };
            if auth.refresh_if_needed().await {
                auth.schedule_refresh();
            } else {
                warn!("scheduled token refresh failed; clearing session");
                auth.expire_session();
            }
        }));
    }

    /// Whether a proactive refresh is currently armed
    pub fn has_pending_refresh(&self) -> bool {
        self.inner
            .refresh_timer
            .lock()
            .unwrap()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn cancel_refresh(&self) {
        if let Some(handle) = self.inner.refresh_timer.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Irrecoverable session teardown: clear tokens, cancel the timer and
    /// hand the login path to the redirect handler
    fn expire_session(&self) {
        self.cancel_refresh();
        self.inner.store.clear_tokens();

        let login_path = self.inner.options.login_path.clone();
        let on_redirect = self.inner.on_redirect.lock().unwrap();
        match on_redirect.as_ref() {
            Some(redirect) => redirect(&login_path),
            None => warn!("session expired; redirect to {} requested", login_path),
        }
    }

    /// Send a request with the session's bearer token, refreshing first
    /// when the token is stale and retrying exactly once on 401.
    ///
    /// A failed freshness refresh is not fatal here: the request proceeds
    /// with whatever token is stored. A 401 on the retry tears the session
    /// down. The final response is returned whatever its status.
    pub async fn execute_with_auth(
        &self,
        request: &FetchBuilder<'_>,
    ) -> Result<reqwest::Response, Error> {
        self.refresh_if_needed().await;
        let token = self.inner.store.access_token();
        let mut response = request.send_bearer(token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if self.refresh_if_needed().await {
                let token = self.inner.store.access_token();
                response = request.send_bearer(token.as_deref()).await?;
            }
            if response.status() == StatusCode::UNAUTHORIZED {
                self.expire_session();
            }
        }

        Ok(response)
    }
}
