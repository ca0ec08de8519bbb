//! Wire types for authentication

use serde::{Deserialize, Serialize};

/// Token pair returned by the sign-in, sign-up and refresh endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential attached to authenticated requests
    #[serde(rename = "access_token")]
    pub access_token: String,

    /// Longer-lived credential exchanged for a new pair
    #[serde(rename = "refresh_token")]
    pub refresh_token: String,
}

/// Password credentials for sign-in and sign-up
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// The account name
    pub username: String,

    /// The account password
    pub password: String,
}
