//! Post use cases on top of a [`PostStore`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    application::repos::{PostStore, RepoError},
    domain::{
        error::DomainError,
        posts::{self, Post, PostDraft, PostId},
    },
};

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post `{id}` not found")]
    NotFound { id: PostId },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Outcome of validating the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    pub count: usize,
    pub next_id: PostId,
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.store.load_all().await?)
    }

    /// Load and validate the collection without writing it back.
    pub async fn inspect(&self) -> Result<StoreSummary, PostError> {
        let posts = self.store.load_all().await?;
        let next_id = posts::next_id(&posts)?;
        Ok(StoreSummary {
            count: posts.len(),
            next_id,
        })
    }

    pub async fn find(&self, id: PostId) -> Result<Post, PostError> {
        let posts = self.store.load_all().await?;
        posts::find(&posts, id)
            .cloned()
            .ok_or(PostError::NotFound { id })
    }

    pub async fn create(&self, draft: PostDraft) -> Result<Post, PostError> {
        let mut posts = self.store.load_all().await?;
        let id = posts::allocate_id(&posts)?;
        let post = Post::from_draft(id, draft);

        posts.push(post.clone());
        self.store.save_all(&posts).await?;

        info!(
            target = "application::posts",
            op = "create",
            post_id = id,
            total = posts.len(),
            "post created"
        );
        Ok(post)
    }

    /// Remove the post with `id`. Absent ids are not an error; the collection
    /// is rewritten either way. Returns whether a post was removed.
    pub async fn delete(&self, id: PostId) -> Result<bool, PostError> {
        let mut posts = self.store.load_all().await?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        let removed = posts.len() != before;

        self.store.save_all(&posts).await?;

        info!(
            target = "application::posts",
            op = "delete",
            post_id = id,
            removed,
            "post delete processed"
        );
        Ok(removed)
    }

    /// Store `post` in place of the post with the same id.
    ///
    /// The collection is loaded afresh, so `post` normally comes from an
    /// earlier [`find`](Self::find). A writer that deletes the post in between
    /// wins: the replacement is dropped and the fresh collection is saved
    /// unchanged.
    pub async fn replace(&self, post: Post) -> Result<Post, PostError> {
        let id = post.id;
        let mut posts = self.store.load_all().await?;
        match posts.iter_mut().find(|existing| existing.id == id) {
            Some(slot) => *slot = post.clone(),
            None => warn!(
                target = "application::posts",
                op = "update",
                post_id = id,
                "post vanished between lookup and save; update dropped"
            ),
        }

        self.store.save_all(&posts).await?;

        info!(
            target = "application::posts",
            op = "update",
            post_id = id,
            "post updated"
        );
        Ok(post)
    }
}
