use thiserror::Error;

/// Validation and contract errors exposed by `trucktok-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("max_results must be greater than zero")]
    ZeroMaxResults,
}

/// Configuration loading errors. Missing credentials are not reported here;
/// they surface per request so the remaining providers keep working.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("setting '{key}' must be a positive integer: '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error(
        "invalid twitter auth mode '{value}', expected one of bearer, client_credentials, oauth1"
    )]
    InvalidTwitterAuth { value: String },

    #[error("twitter auth mode '{mode}' requires {missing}")]
    IncompleteTwitterAuth {
        mode: &'static str,
        missing: &'static str,
    },
}
