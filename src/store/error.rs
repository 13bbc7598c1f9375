use thiserror::Error;

/// Outcome taxonomy for link store operations. `Conflict` is a defined
/// terminal state, not a retryable failure: the caller must come back with
/// either no write (cancel) or an explicit modify action.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed")]
    BadRequest,

    #[error("id already in use")]
    Conflict { existing_link: String },

    #[error("link not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
