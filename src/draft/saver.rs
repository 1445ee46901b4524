//! Draft save seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Body of a saveDraft call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPayload {
    /// Identifies the draft; one draft per email
    pub email: String,
    /// Payment transaction the intake belongs to, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paypal_transaction_id: Option<String>,
    /// Arbitrary in-progress form state
    pub form_data: serde_json::Value,
}

/// Acknowledgement of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub success: bool,
    /// Token that lets the user resume the draft later
    pub resume_token: String,
}

/// Persists a draft somewhere: in-process store, remote endpoint, test double.
#[async_trait]
pub trait DraftSaver: Send + Sync + 'static {
    async fn save_draft(&self, payload: DraftPayload) -> Result<SaveReceipt, PersistError>;
}
