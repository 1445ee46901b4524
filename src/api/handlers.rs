//! API Handlers
//!
//! HTTP request handlers for the draft and cache diagnostics endpoints.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{keys, KeyPattern, TtlCache};
use crate::draft::{DraftPayload, DraftStore, SaveReceipt};
use crate::error::{AppError, Result};
use crate::models::{
    CompleteDraftRequest, HealthResponse, InvalidateRequest, InvalidateResponse, StatsResponse,
    SuccessResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache of JSON views, shared by every handler
    pub cache: TtlCache<Value>,
    /// Intake drafts
    pub drafts: DraftStore,
    /// TTL for cached draft lookups
    pub draft_cache_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: TtlCache<Value>, drafts: DraftStore, draft_cache_ttl: Duration) -> Self {
        Self {
            cache,
            drafts,
            draft_cache_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            TtlCache::new(config.default_ttl()),
            DraftStore::new(),
            config.draft_cache_ttl(),
        )
    }
}

/// Handler for POST /drafts
///
/// Creates or updates the caller's draft and drops cached draft lookups.
pub async fn save_draft_handler(
    State(state): State<AppState>,
    Json(payload): Json<DraftPayload>,
) -> Result<Json<SaveReceipt>> {
    let receipt = state.drafts.save(payload).await?;

    state
        .cache
        .invalidate_pattern(&KeyPattern::prefix(keys::DRAFT_NAMESPACE))
        .await;

    Ok(Json(receipt))
}

/// Handler for GET /drafts/:token
///
/// Resumes a draft by token. Lookups are cached; misses are not.
pub async fn get_draft_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>> {
    let key = keys::draft_by_token(&token);
    let drafts = state.drafts.clone();

    let draft = state
        .cache
        .get_or_compute(
            &key,
            || async move {
                let draft = drafts
                    .find_by_token(&token)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("No draft for token {}", token)))?;
                serde_json::to_value(draft).map_err(|e| AppError::Internal(e.to_string()))
            },
            Some(state.draft_cache_ttl),
        )
        .await?;

    Ok(Json(draft))
}

/// Handler for POST /drafts/complete
///
/// Completing an unknown email still succeeds.
pub async fn complete_draft_handler(
    State(state): State<AppState>,
    Json(req): Json<CompleteDraftRequest>,
) -> Result<Json<SuccessResponse>> {
    let found = state.drafts.complete(&req.email).await?;
    if found {
        state
            .cache
            .invalidate_pattern(&KeyPattern::prefix(keys::DRAFT_NAMESPACE))
            .await;
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// Handler for GET /drafts/incomplete
///
/// Lists drafts awaiting completion, for reminder emails.
pub async fn incomplete_drafts_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let drafts = state.drafts.clone();

    let list = state
        .cache
        .get_or_compute(
            &keys::incomplete_drafts(),
            || async move {
                serde_json::to_value(drafts.incomplete().await)
                    .map_err(|e| AppError::Internal(e.to_string()))
            },
            Some(state.draft_cache_ttl),
        )
        .await?;

    Ok(Json(list))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for DELETE /cache/:key
///
/// Removing an absent key is not an error.
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate(&key).await;
    Json(InvalidateResponse::new(usize::from(removed)))
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let pattern = req.to_pattern()?;
    let removed = state.cache.invalidate_pattern(&pattern).await;
    info!(pattern = %req.pattern, removed, "cache entries invalidated");

    Ok(Json(InvalidateResponse::new(removed)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.cache.clear().await;
    info!(removed, "cache cleared");
    Json(InvalidateResponse::new(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
