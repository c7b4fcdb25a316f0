use domain::DraftId;
use thiserror::Error;

/// Typed errors for the fatal classes, with `anyhow::Error` reserved for the
/// `Internal` catch-all at the `generate()` boundary (see `crates/engine`).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("draft {0} not found")]
    DraftNotFound(DraftId),
    #[error("no active curriculum rows for draft {0}")]
    EmptyCurriculum(DraftId),
    #[error("repository error: {0}")]
    Repository(#[from] domain::RepositoryError),
}
