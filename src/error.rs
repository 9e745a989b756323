use std::sync::Arc;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while configuring the provider or loading flags from the store.
///
/// Flag resolution itself never fails with an `Error`: a missing, disabled or mistyped flag
/// falls back to the caller's default (see [`ResolutionError`](crate::ResolutionError)).
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The store reported an error while pages were being fetched.
    #[error("error fetching flag records: {0}")]
    StoreFetch(String),

    /// The store rejected the access token.
    #[error("unauthorized, access token is likely invalid")]
    Unauthorized,

    /// The base or table does not exist (or the token cannot see it).
    #[error("table {0:?} not found")]
    TableNotFound(String),

    /// Network error.
    #[error(transparent)]
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    Network(Arc<reqwest::Error>),

    /// Invalid base URL configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// A required environment variable is missing or empty.
    #[error("environment variable {0} is not set")]
    MissingEnvVar(&'static str),

    /// `initialize()` was called on a provider that already holds flags.
    #[error("provider is already initialized")]
    AlreadyInitialized,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}
