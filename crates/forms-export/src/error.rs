use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json write failed: {0}")]
    Json(#[from] serde_json::Error),
}
