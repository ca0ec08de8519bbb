//! Tournament listings

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;

/// Client for tournament information
pub struct TournamentsClient {
    /// The base URL for the IndiQuant API
    url: String,

    /// HTTP client used for requests
    client: Client,
}

/// A scoring tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// The tournament ID
    #[serde(rename = "tournament_id")]
    pub tournament_id: String,

    /// Display name
    pub name: String,

    /// Optional long description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: TournamentStatus,

    /// When scoring opens
    #[serde(rename = "start_date")]
    pub start_date: String,

    /// When scoring closes
    #[serde(rename = "end_date")]
    pub end_date: String,

    /// Per-user submission cap
    #[serde(rename = "max_submissions")]
    pub max_submissions: u32,

    /// Submissions received so far
    #[serde(rename = "total_submissions")]
    pub total_submissions: u32,

    /// Scoring method identifier
    #[serde(rename = "scoring_type")]
    pub scoring_type: String,

    /// The creation time
    #[serde(rename = "created_at")]
    pub created_at: String,

    /// The update time
    #[serde(rename = "updated_at")]
    pub updated_at: String,
}

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Created,
    Active,
    Completed,
    Cancelled,
}

impl TournamentsClient {
    /// Create a new TournamentsClient
    pub(crate) fn new(url: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    /// List tournaments currently open for submissions
    pub async fn active(&self) -> Result<Vec<Tournament>, Error> {
        let url = format!("{}/api/v1/tournaments/active", self.url);

        let tournaments = Fetch::get(&self.client, &url)
            .execute::<Vec<Tournament>>()
            .await?;

        Ok(tournaments)
    }
}
