//! Request and Response models for the site cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CompleteDraftRequest, InvalidateRequest, PatternKind};
pub use responses::{HealthResponse, InvalidateResponse, StatsResponse, SuccessResponse};
