//! Errors raised while building or driving an adapter

use thiserror::Error;

/// Errors that can occur while composing or using an adapter.
///
/// None of these are recovered inside the crate. A misbehaving extension or
/// an unavailable session aborts construction entirely.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A required input is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The deferred function was called before middleware construction finished
    #[error(
        "calling the function before construction is complete is not allowed; \
         other middleware would not be applied to this call"
    )]
    PrematureInvocation,

    /// An enhancer handed back a class-style adapter object
    #[error(
        "an enhancer returned the adapter as a class-style object; \
         only plain adapter records are supported"
    )]
    NonPlainAdapter,

    /// A middleware did not produce a transformer
    #[error(
        "middleware at position {index} did not return a transformer \
         when called with the middleware API"
    )]
    MalformedMiddleware { index: usize },

    /// Upstream session, join or identity failure
    #[error("session error: {0}")]
    Session(String),

    #[error("egress is not available on this adapter")]
    EgressUnavailable,

    #[error("adapter closed")]
    Closed,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
