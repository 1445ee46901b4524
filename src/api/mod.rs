//! API Module
//!
//! HTTP handlers and routing for the draft and cache endpoints.
//!
//! # Endpoints
//! - `POST /drafts` - Save (create or update) an intake draft
//! - `GET /drafts/:token` - Resume a draft by token
//! - `GET /cache/stats` - Cache size, keys and hit counters
//! - `DELETE /cache/:key` - Invalidate one key
//! - `POST /cache/invalidate` - Invalidate keys matching a pattern
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
