//! Error handling for the IndiQuant Rust client

use std::fmt;
use thiserror::Error;

/// Unified error type for the IndiQuant Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Leaderboard query errors
    #[error("Leaderboard error: {0}")]
    Leaderboard(String),

    /// Tournament query errors
    #[error("Tournament error: {0}")]
    Tournament(String),

    /// Prediction submission errors
    #[error("Submission error: {0}")]
    Submission(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new leaderboard error
    pub fn leaderboard<T: fmt::Display>(msg: T) -> Self {
        Error::Leaderboard(msg.to_string())
    }

    /// Create a new tournament error
    pub fn tournament<T: fmt::Display>(msg: T) -> Self {
        Error::Tournament(msg.to_string())
    }

    /// Create a new submission error
    pub fn submission<T: fmt::Display>(msg: T) -> Self {
        Error::Submission(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
