//! Configuration options for the IndiQuant client

use std::time::Duration;

/// Configuration options for the IndiQuant client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether to automatically refresh the token
    pub auto_refresh_token: bool,

    /// Whether to persist the session across restarts
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Path of the token refresh endpoint
    pub refresh_path: String,

    /// Path of the password sign-in endpoint
    pub signin_path: String,

    /// Path of the sign-up endpoint
    pub signup_path: String,

    /// Login page the client is sent to when a session is irrecoverable
    pub login_path: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
            refresh_path: "/auth/refresh".to_string(),
            signin_path: "/auth/login".to_string(),
            signup_path: "/auth/signup".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set whether to automatically refresh the token
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the token refresh endpoint path
    pub fn with_refresh_path(mut self, value: &str) -> Self {
        self.refresh_path = value.to_string();
        self
    }

    /// Set the sign-in endpoint path
    pub fn with_signin_path(mut self, value: &str) -> Self {
        self.signin_path = value.to_string();
        self
    }

    /// Set the sign-up endpoint path
    pub fn with_signup_path(mut self, value: &str) -> Self {
        self.signup_path = value.to_string();
        self
    }

    /// Set the login page path used on irrecoverable auth failure
    pub fn with_login_path(mut self, value: &str) -> Self {
        self.login_path = value.to_string();
        self
    }
}
