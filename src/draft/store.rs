//! Draft Store
//!
//! Server side of saveDraft: one draft per email, resumable by token.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use super::{DraftPayload, DraftSaver, SaveReceipt};
use crate::error::{AppError, PersistError, Result};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A stored draft.
#[derive(Debug, Clone, Serialize)]
pub struct DraftRecord {
    pub email: String,
    pub paypal_transaction_id: Option<String>,
    /// Form data as serialized JSON
    pub form_data: String,
    pub resume_token: String,
    /// Set once the intake form has been submitted
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A draft as returned to a resuming client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub email: String,
    pub paypal_transaction_id: Option<String>,
    pub form_data: serde_json::Value,
}

#[derive(Debug, Default)]
struct Drafts {
    by_email: HashMap<String, DraftRecord>,
    /// resume token -> email
    tokens: HashMap<String, String>,
}

/// In-memory draft storage. Clones share the same drafts.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    drafts: Arc<RwLock<Drafts>>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 32 random bytes, hex encoded.
fn new_resume_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates the draft for `payload.email`.
    ///
    /// The resume token is issued on first save and kept on later saves.
    pub async fn save(&self, payload: DraftPayload) -> Result<SaveReceipt> {
        if !is_valid_email(&payload.email) {
            return Err(AppError::InvalidRequest(format!(
                "Invalid email address: {}",
                payload.email
            )));
        }

        let form_data = payload.form_data.to_string();
        let now = Utc::now();
        let mut drafts = self.drafts.write().await;

        if let Some(existing) = drafts.by_email.get_mut(&payload.email) {
            existing.form_data = form_data;
            // A save without a transaction id keeps the one already recorded
            if let Some(txn) = payload.paypal_transaction_id {
                existing.paypal_transaction_id = Some(txn);
            }
            existing.updated_at = now;
            return Ok(SaveReceipt {
                success: true,
                resume_token: existing.resume_token.clone(),
            });
        }

        let resume_token = new_resume_token();
        drafts
            .tokens
            .insert(resume_token.clone(), payload.email.clone());
        drafts.by_email.insert(
            payload.email.clone(),
            DraftRecord {
                email: payload.email.clone(),
                paypal_transaction_id: payload.paypal_transaction_id,
                form_data,
                resume_token: resume_token.clone(),
                completed: false,
                created_at: now,
                updated_at: now,
            },
        );
        info!(email = %payload.email, "created new intake draft");

        Ok(SaveReceipt {
            success: true,
            resume_token,
        })
    }

    /// Looks a draft up by its resume token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<StoredDraft>> {
        let drafts = self.drafts.read().await;
        let Some(record) = drafts
            .tokens
            .get(token)
            .and_then(|email| drafts.by_email.get(email))
        else {
            return Ok(None);
        };

        let form_data = serde_json::from_str(&record.form_data)
            .map_err(|e| AppError::Internal(format!("Corrupt draft form data: {}", e)))?;

        Ok(Some(StoredDraft {
            email: record.email.clone(),
            paypal_transaction_id: record.paypal_transaction_id.clone(),
            form_data,
        }))
    }

    /// Marks the draft for `email` as completed.
    ///
    /// Returns false when there is no draft for that email.
    pub async fn complete(&self, email: &str) -> Result<bool> {
        if !is_valid_email(email) {
            return Err(AppError::InvalidRequest(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let mut drafts = self.drafts.write().await;
        let Some(record) = drafts.by_email.get_mut(email) else {
            return Ok(false);
        };
        record.completed = true;
        record.updated_at = Utc::now();
        info!(email = %email, "intake draft completed");
        Ok(true)
    }

    /// Drafts that were never completed, oldest first.
    pub async fn incomplete(&self) -> Vec<DraftRecord> {
        let drafts = self.drafts.read().await;
        let mut records: Vec<DraftRecord> = drafts
            .by_email
            .values()
            .filter(|record| !record.completed)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        records
    }

    pub async fn get(&self, email: &str) -> Option<DraftRecord> {
        self.drafts.read().await.by_email.get(email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.by_email.is_empty()
    }
}

#[async_trait]
impl DraftSaver for DraftStore {
    async fn save_draft(&self, payload: DraftPayload) -> std::result::Result<SaveReceipt, PersistError> {
        Ok(self.save(payload).await?)
    }
}
