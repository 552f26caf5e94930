use clauseai_core::ClauseId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no clause with id {0}")]
    UnknownClause(ClauseId),
}
