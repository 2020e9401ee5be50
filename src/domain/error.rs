use thiserror::Error;

use super::posts::PostId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("data integrity violated: duplicate post id `{id}`")]
    DuplicateId { id: PostId },
    #[error("post id space exhausted")]
    IdSpaceExhausted,
}

impl DomainError {
    pub fn duplicate_id(id: PostId) -> Self {
        Self::DuplicateId { id }
    }
}
