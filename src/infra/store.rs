//! JSON flat-file post storage.
//!
//! The backing file holds one JSON array with every post. Reads parse the
//! whole file; writes serialize the whole collection into a temporary sibling
//! and rename it over the target, so a reader observes either the previous or
//! the new collection. There is no locking between writers.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Serializer, ser::PrettyFormatter};
use tokio::fs;
use tracing::debug;

use crate::{
    application::repos::{PostStore, RepoError},
    domain::posts::{self, Post},
};

const INDENT: &[u8] = b"    ";

/// Post store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PostStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<Post>, RepoError> {
        let bytes = fs::read(&self.path).await?;
        let posts: Vec<Post> = serde_json::from_slice(&bytes)?;
        posts::ensure_unique_ids(&posts)?;

        debug!(
            target = "infra::store",
            op = "load_all",
            path = %self.path.display(),
            count = posts.len(),
            "posts loaded"
        );
        Ok(posts)
    }

    async fn save_all(&self, posts: &[Post]) -> Result<(), RepoError> {
        let payload = encode_posts(posts)?;
        let path = self.path.clone();
        let bytes = payload.len();

        tokio::task::spawn_blocking(move || replace_file(&path, &payload))
            .await
            .map_err(RepoError::from_persistence)??;

        debug!(
            target = "infra::store",
            op = "save_all",
            path = %self.path.display(),
            count = posts.len(),
            bytes,
            "posts saved"
        );
        Ok(())
    }
}

/// Serialize posts as a JSON array indented by four spaces.
pub fn encode_posts(posts: &[Post]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    posts.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Resolve the file a save lands on. A symlinked data file is followed so the
/// link survives the rename; a file that does not exist yet is created at
/// `path` itself.
fn save_target(path: &Path) -> io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(err),
    }
}

fn replace_file(path: &Path, payload: &[u8]) -> Result<(), RepoError> {
    let target = save_target(path)?;
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".posts-")
        .suffix(".tmp")
        .tempfile_in(directory)?;
    staged.write_all(payload)?;

    // Staged files are private; carry over the mode of the file being replaced.
    match std::fs::metadata(&target) {
        Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    staged.as_file().sync_all()?;
    staged
        .persist(&target)
        .map_err(|err| RepoError::Io(err.error))?;
    Ok(())
}
