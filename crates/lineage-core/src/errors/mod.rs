//! Error taxonomy: one enum per domain plus the top-level wrapper.
//!
//! Not-found conditions (untracked filename, absent brick, absent
//! collection) are `Ok(None)`/empty results, never errors.

mod history_error;
mod pipeline_error;
mod store_error;

pub use history_error::HistoryError;
pub use pipeline_error::PipelineError;
pub use store_error::StoreError;

/// Top-level error wrapping every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type LineageResult<T> = Result<T, LineageError>;
