//! Remote draft saver: posts drafts to a site backend's `/drafts` endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{DraftPayload, DraftSaver, SaveReceipt};
use crate::error::PersistError;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`DraftSaver`] that calls a remote saveDraft endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDraftSaver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDraftSaver {
    /// `base_url` is the backend root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/drafts", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DraftSaver for HttpDraftSaver {
    async fn save_draft(&self, payload: DraftPayload) -> Result<SaveReceipt, PersistError> {
        debug!(endpoint = %self.endpoint, email = %payload.email, "posting draft");
        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(PersistError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<SaveReceipt>(&body)
            .map_err(|e| PersistError::InvalidResponse(e.to_string()))
    }
}
