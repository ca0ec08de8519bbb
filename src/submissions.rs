//! Prediction submissions and batch scoring status

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;

/// Client for prediction submissions
pub struct SubmissionsClient {
    /// The base URL for the IndiQuant API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Session manager for authenticated endpoints
    auth: Auth,
}

/// Receipt for an accepted upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// The submission ID
    pub id: String,

    /// When the file was received
    #[serde(rename = "created_at")]
    pub created_at: String,

    /// Whether the file passed validation
    #[serde(rename = "is_valid")]
    pub is_valid: bool,

    /// Validation detail when the file was rejected
    #[serde(rename = "error_message")]
    pub error_message: Option<String>,
}

/// State of the batch scoring pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatus {
    /// `"processing"` or `"ready"`
    pub status: String,

    /// Percent complete of the current run
    pub progress: f64,

    /// Human-readable pipeline step
    #[serde(rename = "current_step")]
    pub current_step: String,

    /// Predictions waiting for the next run
    #[serde(rename = "predictions_queued")]
    pub predictions_queued: u32,

    /// When the next run starts
    #[serde(rename = "next_batch_run")]
    pub next_batch_run: String,

    /// Results of the latest completed run, if any
    pub stats: Option<BatchStats>,
}

/// Aggregate results of a completed batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Predictions scored in the run
    #[serde(rename = "total_submissions")]
    pub total_submissions: u32,

    /// Predictions that beat the baseline
    pub profitable: u32,

    /// Predictions near the baseline
    pub neutral: u32,

    /// Predictions below the baseline
    pub trash: u32,

    /// Spearman correlation across all predictions
    #[serde(rename = "global_spearman")]
    pub global_spearman: f64,
}

impl SubmissionsClient {
    /// Create a new SubmissionsClient
    pub(crate) fn new(url: &str, client: Client, auth: Auth) -> Self {
        Self {
            url: url.to_string(),
            client,
            auth,
        }
    }

    /// Upload a CSV of predictions to a tournament (requires authentication)
    pub async fn submit(
        &self,
        tournament_id: &str,
        file_name: &str,
        csv: Vec<u8>,
    ) -> Result<SubmissionReceipt, Error> {
        let url = format!("{}/api/v1/submit/", self.url);

        let mut params = HashMap::new();
        params.insert("tournament_id".to_string(), tournament_id.to_string());

        let request = Fetch::post(&self.client, &url)
            .query(params)
            .multipart_file("file", file_name, "text/csv", csv);

        let response = self.auth.execute_with_auth(&request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::submission(format!(
                "upload failed with status {}: {}",
                status, text
            )));
        }

        Ok(response.json::<SubmissionReceipt>().await?)
    }

    /// Poll the batch scoring pipeline (requires authentication)
    pub async fn batch_status(&self) -> Result<BatchStatus, Error> {
        let url = format!("{}/api/v1/submit/batch/status", self.url);

        let request = Fetch::get(&self.client, &url);
        let response = self.auth.execute_with_auth(&request).await?;

        if !response.status().is_success() {
            return Err(Error::submission(format!(
                "batch status request failed with status {}",
                response.status()
            )));
        }

        Ok(response.json::<BatchStatus>().await?)
    }
}
