//! Leaderboard queries

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;

/// Client for the tournament leaderboard
pub struct LeaderboardClient {
    /// The base URL for the IndiQuant API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Session manager for authenticated endpoints
    auth: Auth,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Position on the board
    pub rank: u32,

    /// The participant
    #[serde(rename = "user_id")]
    pub user_id: String,

    /// The scored submission behind this row
    #[serde(rename = "submission_id")]
    pub submission_id: String,

    /// Current score
    pub score: f64,

    /// Percentile among all participants
    pub percentile: f64,

    /// How many submissions the participant has made
    #[serde(rename = "submissions_count")]
    pub submissions_count: u32,

    /// The participant's best score so far
    #[serde(rename = "best_score")]
    pub best_score: f64,

    /// Recent direction of the participant's score
    #[serde(rename = "performance_trend")]
    pub performance_trend: PerformanceTrend,
}

/// Direction of a participant's recent scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTrend {
    Up,
    Down,
    Stable,
}

/// Leaderboard endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    /// The ranked entries
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Per-user tournament statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    /// The participant
    #[serde(rename = "user_id")]
    pub user_id: String,

    /// Current rank, absent while unranked
    pub rank: Option<u32>,

    /// Current score, absent before the first scored submission
    pub score: Option<f64>,

    /// Percentile among all participants
    pub percentile: Option<f64>,

    /// How many submissions the participant has made
    #[serde(rename = "submissions_count", default)]
    pub submissions_count: u32,

    /// The participant's best score so far
    #[serde(rename = "best_score")]
    pub best_score: Option<f64>,
}

impl LeaderboardClient {
    /// Create a new LeaderboardClient
    pub(crate) fn new(url: &str, client: Client, auth: Auth) -> Self {
        Self {
            url: url.to_string(),
            client,
            auth,
        }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/api/v1/leaderboard{}", self.url, path)
    }

    /// Fetch the current leaderboard for a scoring period
    ///
    /// `period` is a window label such as `"7d"`; `top_n` caps the number
    /// of returned rows.
    pub async fn get(&self, period: &str, top_n: u32) -> Result<LeaderboardResponse, Error> {
        let url = self.get_url("");

        let mut params = HashMap::new();
        params.insert("period".to_string(), period.to_string());
        params.insert("top_n".to_string(), top_n.to_string());

        let response = Fetch::get(&self.client, &url)
            .query(params)
            .execute::<LeaderboardResponse>()
            .await?;

        Ok(response)
    }

    /// Fetch one participant's statistics (requires authentication)
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, Error> {
        let url = self.get_url(&format!("/user/{}", user_id));

        let request = Fetch::get(&self.client, &url);
        let response = self.auth.execute_with_auth(&request).await?;

        if !response.status().is_success() {
            return Err(Error::leaderboard(format!(
                "user stats request failed with status {}",
                response.status()
            )));
        }

        Ok(response.json::<UserStats>().await?)
    }
}
