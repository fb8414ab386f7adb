//! Error Handling Module
//!
//! Defines the crate-wide error type (`EngineError`) and its coarse
//! classification (`ErrorCategory`). Message text is stable and matchable:
//! calling UI code pattern-matches on it (e.g. "Translation timeout",
//! "Unsupported language: X", "Input text cannot be empty").

use thiserror::Error;

/// Coarse error category used by the retry policy and by callers that only
/// care about the class of failure, not the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller-side input problems. Never retried.
    Validation,
    /// The engine call exceeded its configured duration. Retried.
    Timeout,
    /// Network failure, non-2xx HTTP, malformed frame, inline provider
    /// error. Retried with backoff.
    Transient,
    /// Misconfigured provider settings. Never retried.
    Configuration,
}

/// Unified error type for the translation engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Empty or whitespace-only input text.
    #[error("Input text cannot be empty")]
    EmptyInput,

    /// A language code outside the supported set.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The engine call exceeded the configured timeout.
    #[error("Translation timeout")]
    Timeout,

    /// Network-level or non-2xx HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A stream frame could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// An error reported inline by the provider.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// The SSE stream failed mid-flight.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Invalid or incomplete provider settings.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A bug in this crate.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    /// Classify this error for retry and presentation purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::UnsupportedLanguage(_) => ErrorCategory::Validation,
            Self::Timeout => ErrorCategory::Timeout,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::HttpError(_)
            | Self::ParseError(_)
            | Self::ProviderError(_)
            | Self::StreamError(_)
            | Self::InternalError(_) => ErrorCategory::Transient,
        }
    }

    /// Whether the façade should retry after this error.
    ///
    /// Validation and configuration errors are surfaced immediately;
    /// everything else is retried up to the configured maximum.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Configuration
        )
    }
}
