//! The post entity and the pure helpers that keep post ids unique.
//!
//! Ids are assigned densely from the current maximum, never reused while a
//! higher id exists, and must be unique across the whole collection. The
//! helpers here work on plain slices so the same rules apply to whatever the
//! storage adapter hands back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub type PostId = u64;

const FIRST_POST_ID: PostId = 1;

/// A single blog entry as persisted in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub title: String,
    pub content: String,
}

/// The editable part of a post, as submitted through the add/update forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub author: String,
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn from_draft(id: PostId, draft: PostDraft) -> Self {
        let PostDraft {
            author,
            title,
            content,
        } = draft;

        Self {
            id,
            author,
            title,
            content,
        }
    }

    /// Replace every editable field, keeping the id.
    pub fn apply(&mut self, draft: PostDraft) {
        self.author = draft.author;
        self.title = draft.title;
        self.content = draft.content;
    }
}

/// Next id to hand out: one past the highest existing id, or `1` when empty.
pub fn next_id(posts: &[Post]) -> Result<PostId, DomainError> {
    match posts.iter().map(|post| post.id).max() {
        Some(max) => max.checked_add(1).ok_or(DomainError::IdSpaceExhausted),
        None => Ok(FIRST_POST_ID),
    }
}

pub fn id_exists(id: PostId, posts: &[Post]) -> bool {
    posts.iter().any(|post| post.id == id)
}

/// Starting from [`next_id`], advance until no existing post holds the candidate.
pub fn allocate_id(posts: &[Post]) -> Result<PostId, DomainError> {
    let mut candidate = next_id(posts)?;
    while id_exists(candidate, posts) {
        candidate = candidate
            .checked_add(1)
            .ok_or(DomainError::IdSpaceExhausted)?;
    }
    Ok(candidate)
}

/// Reject a collection in which two posts share an id.
///
/// Reports the first id seen twice, in collection order.
pub fn ensure_unique_ids(posts: &[Post]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(posts.len());
    for post in posts {
        if !seen.insert(post.id) {
            return Err(DomainError::duplicate_id(post.id));
        }
    }
    Ok(())
}

pub fn find(posts: &[Post], id: PostId) -> Option<&Post> {
    posts.iter().find(|post| post.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: PostId) -> Post {
        Post {
            id,
            author: "Ada".to_string(),
            title: format!("Post {id}"),
            content: "Body".to_string(),
        }
    }

    #[test]
    fn next_id_starts_at_one_for_empty_collection() {
        assert_eq!(next_id(&[]), Ok(1));
    }

    #[test]
    fn next_id_is_one_past_the_maximum() {
        assert_eq!(next_id(&[post(1), post(5)]), Ok(6));
        assert_eq!(next_id(&[post(5), post(1)]), Ok(6));
    }

    #[test]
    fn next_id_reports_exhausted_id_space() {
        assert_eq!(
            next_id(&[post(PostId::MAX)]),
            Err(DomainError::IdSpaceExhausted)
        );
    }

    #[test]
    fn id_exists_scans_the_collection() {
        let posts = [post(1), post(5)];
        assert!(id_exists(5, &posts));
        assert!(!id_exists(2, &posts));
        assert!(!id_exists(1, &[]));
    }

    #[test]
    fn allocate_id_matches_next_id_for_valid_collections() {
        let posts = [post(2), post(7), post(3)];
        assert_eq!(allocate_id(&posts), Ok(8));
        assert_eq!(allocate_id(&[]), Ok(1));
    }

    #[test]
    fn ensure_unique_ids_flags_the_repeated_id() {
        let posts = [post(3), post(1), post(3)];
        assert_eq!(
            ensure_unique_ids(&posts),
            Err(DomainError::DuplicateId { id: 3 })
        );
        assert_eq!(ensure_unique_ids(&[post(1), post(2)]), Ok(()));
    }

    #[test]
    fn apply_replaces_fields_and_keeps_id() {
        let mut existing = post(4);
        existing.apply(PostDraft {
            author: "Grace".to_string(),
            title: "New".to_string(),
            content: "Rewritten".to_string(),
        });

        assert_eq!(existing.id, 4);
        assert_eq!(existing.author, "Grace");
        assert_eq!(existing.title, "New");
        assert_eq!(existing.content, "Rewritten");
    }
}
