use thiserror::Error;

/// Errors a storage backend may return.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("submission not found: {0}")]
    SubmissionNotFound(u64),
    /// A backend-specific failure (connection, serialization, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}
