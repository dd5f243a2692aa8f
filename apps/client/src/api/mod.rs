//! Backend API access.

pub mod http;

use async_trait::async_trait;
use vocab_core::WordProgress;

pub use http::HttpBackend;

/// Backend API errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authorized - please log in again")]
    Unauthorized,

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Backend { status, .. } => *status >= 500 || *status == 429,
            Self::Unauthorized | Self::Parse(_) => false,
        }
    }
}

/// Progress endpoints the client depends on.
///
/// Credentials are attached by the implementation; callers only see
/// [`ApiError::Unauthorized`] when they are rejected.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Every progress record of the current learner, with word content.
    async fn fetch_all_progress(&self) -> Result<Vec<WordProgress>, ApiError>;

    /// Server-computed set of due records.
    async fn fetch_due_progress(&self) -> Result<Vec<WordProgress>, ApiError>;

    /// Store a record and return the server's canonical copy.
    async fn persist_progress(&self, progress: &WordProgress) -> Result<WordProgress, ApiError>;
}
