//! Request DTOs for the site cache API
//!
//! Defines the structure of incoming HTTP request bodies. Draft saves use
//! [`crate::draft::DraftPayload`] directly.

use serde::Deserialize;

use crate::cache::KeyPattern;
use crate::error::{AppError, Result};

/// How `InvalidateRequest::pattern` is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Prefix,
    Substring,
    #[default]
    Regex,
}

/// Request body for POST /cache/invalidate
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Pattern matched against cache keys
    pub pattern: String,
    /// Pattern kind, regex when omitted
    #[serde(default)]
    pub kind: PatternKind,
}

impl InvalidateRequest {
    /// Validates the request and builds the key pattern.
    pub fn to_pattern(&self) -> Result<KeyPattern> {
        if self.pattern.is_empty() {
            return Err(AppError::InvalidRequest(
                "Pattern cannot be empty".to_string(),
            ));
        }
        match self.kind {
            PatternKind::Prefix => Ok(KeyPattern::prefix(self.pattern.clone())),
            PatternKind::Substring => Ok(KeyPattern::substring(self.pattern.clone())),
            PatternKind::Regex => KeyPattern::regex(&self.pattern),
        }
    }
}

/// Request body for POST /drafts/complete
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteDraftRequest {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_request_defaults_to_regex() {
        let req: InvalidateRequest = serde_json::from_str(r#"{"pattern": "^blog:"}"#).unwrap();
        assert_eq!(req.kind, PatternKind::Regex);
        let pattern = req.to_pattern().unwrap();
        assert!(pattern.matches("blog:post:a"));
        assert!(!pattern.matches("case-study:a"));
    }

    #[test]
    fn test_invalidate_request_prefix() {
        let req: InvalidateRequest =
            serde_json::from_str(r#"{"pattern": "case-study:", "kind": "prefix"}"#).unwrap();
        assert!(matches!(req.to_pattern().unwrap(), KeyPattern::Prefix(_)));
    }

    #[test]
    fn test_validate_empty_pattern() {
        let req = InvalidateRequest {
            pattern: String::new(),
            kind: PatternKind::Substring,
        };
        assert!(matches!(req.to_pattern(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_regex() {
        let req = InvalidateRequest {
            pattern: "[".to_string(),
            kind: PatternKind::Regex,
        };
        assert!(req.to_pattern().is_err());
    }
}
