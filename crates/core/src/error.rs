#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Pack not found: {0}")]
    PackNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
