use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid element id: {0:?}")]
    InvalidElementId(String),
    #[error("invalid choice value: {0:?}")]
    InvalidChoiceValue(String),
    #[error("submission already completed")]
    AlreadyCompleted,
}

pub type Result<T> = std::result::Result<T, ModelError>;
