//! Key Pattern Module
//!
//! Matchers used to bulk-invalidate every cached view of an entity type.

use regex::Regex;

use crate::error::{AppError, Result};

// == Key Pattern ==
/// Selects cache keys for bulk invalidation.
///
/// Keys are namespaced as `entity:discriminant`, so `Prefix("blog:")` drops
/// every cached blog view after a write.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Key starts with the given string
    Prefix(String),
    /// Key contains the given string anywhere
    Substring(String),
    /// Key matches the regular expression
    Regex(Regex),
}

impl KeyPattern {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(needle.into())
    }

    /// Compiles a regular expression pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid key pattern: {}", e)))
    }

    // == Matches ==
    /// Returns true if `key` is selected by this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Prefix(prefix) => key.starts_with(prefix.as_str()),
            KeyPattern::Substring(needle) => key.contains(needle.as_str()),
            KeyPattern::Regex(re) => re.is_match(key),
        }
    }
}
