//! Error types for the studentsim domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all studentsim operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Knowledge store errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Persistence errors ---
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    #[error("Knowledge component '{0}' must have at least one keyword")]
    EmptyKeywords(String),

    #[error("Knowledge component id must not be empty")]
    EmptyId,

    #[error("Unknown knowledge component: {0}")]
    UnknownComponent(String),

    #[error("Mastery {mastery} for '{id}' is outside 0..=100")]
    MasteryOutOfRange { id: String, mastery: i64 },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template resource not found: {0}")]
    Missing(String),

    #[error("Unknown placeholder '{{{name}}}' in {template}")]
    UnknownPlaceholder { template: String, name: String },

    #[error("Unbalanced brace at byte {offset} in {template}")]
    UnbalancedBrace { template: String, offset: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn template_error_names_placeholder() {
        let err = Error::Template(TemplateError::UnknownPlaceholder {
            template: "student_base_prompt.txt".into(),
            name: "student_name".into(),
        });
        let text = err.to_string();
        assert!(text.contains("{student_name}"));
        assert!(text.contains("student_base_prompt.txt"));
    }

    #[test]
    fn knowledge_error_displays_id() {
        let err = KnowledgeError::EmptyKeywords("fractions".into());
        assert!(err.to_string().contains("fractions"));
    }
}
