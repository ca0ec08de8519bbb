//! IndiQuant Rust Client Library
//!
//! A Rust client for the IndiQuant tournament platform, covering
//! authentication and session refresh, leaderboards, tournaments,
//! prediction submissions and health checks.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod health;
pub mod leaderboard;
pub mod submissions;
pub mod tournaments;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::{Auth, FileTokenStore, MemoryTokenStore, TokenStore};
use crate::config::ClientOptions;
use crate::health::HealthClient;
use crate::leaderboard::LeaderboardClient;
use crate::submissions::SubmissionsClient;
use crate::tournaments::TournamentsClient;

/// The main entry point for the IndiQuant Rust client
pub struct IndiQuant {
    /// The base URL for the IndiQuant API
    pub url: String,

    /// HTTP client used for requests
    pub http_client: Client,

    /// Auth client for session management and authentication
    pub auth: Auth,

    /// Client options
    pub options: ClientOptions,
}

impl IndiQuant {
    /// Create a new IndiQuant client
    ///
    /// # Arguments
    ///
    /// * `api_url` - The base URL of the IndiQuant API
    ///
    /// # Example
    ///
    /// ```
    /// use indiquant_rust::IndiQuant;
    ///
    /// let indiquant = IndiQuant::new("https://api.indiquant.example");
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new IndiQuant client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use indiquant_rust::{config::ClientOptions, IndiQuant};
    ///
    /// let options = ClientOptions::default().with_auto_refresh_token(false);
    /// let indiquant = IndiQuant::new_with_options("https://api.indiquant.example", options);
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Self {
        let store: Arc<dyn TokenStore> = if options.persist_session {
            match FileTokenStore::default_path() {
                Some(path) => Arc::new(FileTokenStore::new(path)),
                None => Arc::new(MemoryTokenStore::new()),
            }
        } else {
            Arc::new(MemoryTokenStore::new())
        };
        Self::new_with_token_store(api_url, options, store)
    }

    /// Create a new IndiQuant client with a caller-supplied token store
    pub fn new_with_token_store(
        api_url: &str,
        options: ClientOptions,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let auth = Auth::new(api_url, http_client.clone(), options.clone(), store);

        Self {
            url: api_url.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// Get a reference to the auth client for session management
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Arm the refresh scheduler if a session survives from a prior run.
    /// Call once at application startup, inside the Tokio runtime.
    pub fn init_auth(&self) {
        self.auth.init();
    }

    /// Get a client for leaderboard queries
    pub fn leaderboard(&self) -> LeaderboardClient {
        LeaderboardClient::new(&self.url, self.http_client.clone(), self.auth.clone())
    }

    /// Get a client for tournament listings
    pub fn tournaments(&self) -> TournamentsClient {
        TournamentsClient::new(&self.url, self.http_client.clone())
    }

    /// Get a client for prediction submissions
    pub fn submissions(&self) -> SubmissionsClient {
        SubmissionsClient::new(&self.url, self.http_client.clone(), self.auth.clone())
    }

    /// Get a client for the backend health endpoint
    pub fn health(&self) -> HealthClient {
        HealthClient::new(&self.url, self.http_client.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::IndiQuant;
}
