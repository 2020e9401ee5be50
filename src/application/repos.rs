//! Repository trait describing the post persistence adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{error::DomainError, posts::Post};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("backing file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("backing file is not a valid post collection: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Integrity(#[from] DomainError),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Whole-collection storage for posts.
///
/// Every call reads or rewrites the complete collection. Implementations do
/// not lock: two callers that load, modify and save concurrently race, and
/// the last save wins.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Load every post in stored order, rejecting collections with duplicate ids.
    async fn load_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Replace the stored collection with `posts`, preserving their order.
    async fn save_all(&self, posts: &[Post]) -> Result<(), RepoError>;
}
