//! Provides asynchronous versions of the repository operations.
//!
//! Each call runs the blocking [`Repository`] operation on tokio's blocking
//! pool. Mutations issued through one `AsyncRepository` (or any of its clones)
//! are serialized, so for example a stage and a commit never interleave. This
//! holds even when a caller stops waiting on a mutation.

use crate::error::GitError;
use crate::models::{CommitRecord, DiffRecord, FileState};
use crate::repository::Repository;
use crate::types::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Represents a local Git working tree with async operations.
#[derive(Debug, Clone)]
pub struct AsyncRepository {
    inner: Repository,
    mutations: Arc<Mutex<()>>,
}

impl AsyncRepository {
    /// Wraps a synchronous repository.
    pub fn new(inner: Repository) -> AsyncRepository {
        AsyncRepository {
            inner,
            mutations: Arc::new(Mutex::new(())),
        }
    }

    pub fn work_dir(&self) -> &Path {
        self.inner.work_dir()
    }

    /// See [`Repository::status`].
    pub async fn status(&self) -> Result<Vec<FileState>> {
        self.blocking(|repo| repo.status()).await
    }

    /// See [`Repository::diff`].
    pub async fn diff(&self, staged: bool, paths: Vec<String>) -> Result<Vec<DiffRecord>> {
        self.blocking(move |repo| repo.diff(staged, paths.as_slice())).await
    }

    /// See [`Repository::untracked_diff`].
    pub async fn untracked_diff(&self, paths: Vec<String>) -> Result<Vec<DiffRecord>> {
        self.blocking(move |repo| repo.untracked_diff(paths.as_slice())).await
    }

    /// See [`Repository::history`].
    pub async fn history(&self, limit: usize) -> Result<Vec<CommitRecord>> {
        self.blocking(move |repo| repo.history(limit)).await
    }

    /// See [`Repository::stage`].
    pub async fn stage(&self, paths: Vec<String>) -> Result<()> {
        self.mutate(move |repo| repo.stage(paths.as_slice())).await
    }

    /// See [`Repository::unstage`].
    pub async fn unstage(&self, paths: Vec<String>) -> Result<()> {
        self.mutate(move |repo| repo.unstage(paths.as_slice())).await
    }

    /// See [`Repository::stage_all`].
    pub async fn stage_all(&self) -> Result<()> {
        self.mutate(|repo| repo.stage_all()).await
    }

    /// See [`Repository::commit`].
    pub async fn commit(&self, message: String) -> Result<()> {
        self.mutate(move |repo| repo.commit(&message)).await
    }

    /// See [`Repository::amend_commit`].
    pub async fn amend_commit(&self, message: String) -> Result<()> {
        self.mutate(move |repo| repo.amend_commit(&message)).await
    }

    /// See [`Repository::discard_changes`].
    pub async fn discard_changes(&self, path: String) -> Result<()> {
        self.mutate(move |repo| repo.discard_changes(&path)).await
    }

    /// Runs `f` while holding the mutation lock.
    ///
    /// The guard moves into the blocking task, so dropping the returned future
    /// does not release the lock before git has finished.
    async fn mutate<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Repository) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let guard = Arc::clone(&self.mutations).lock_owned().await;
        self.blocking(move |repo| {
            let _guard = guard;
            f(repo)
        })
        .await
    }

    async fn blocking<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Repository) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let repo = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&repo))
            .await
            .map_err(|e| GitError::Execution(std::io::Error::other(e.to_string())))?
    }
}

impl From<Repository> for AsyncRepository {
    fn from(inner: Repository) -> Self {
        AsyncRepository::new(inner)
    }
}
