//! Version-control synchronizer.
//!
//! Wraps a pluggable [`VersionControlProvider`] to clone, diff, and push the
//! serialized tree. Provider push failures never escape raw: they are
//! classified into [`PushOutcome`] so the caller can offer a force-push retry
//! exactly when the rejection was a non-fast-forward.

pub mod status;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub use status::{DiffSummary, FileStatus, StatusEntry, classify, summarize};

/// Fixed bot identity used for every commit.
pub const BOT_AUTHOR_NAME: &str = "Stratus Bot";
pub const BOT_AUTHOR_EMAIL: &str = "bot@stratus.dev";
const COMMIT_MESSAGE: &str = "Update project repository";

/// A provider operation failure. `non_fast_forward` is set only when a push
/// was rejected because the remote tip is not an ancestor of the local tip.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub non_fast_forward: bool,
}

impl ProviderError {
    pub fn other(message: impl Into<String>) -> Self {
        ProviderError {
            message: message.into(),
            non_fast_forward: false,
        }
    }

    pub fn non_fast_forward(message: impl Into<String>) -> Self {
        ProviderError {
            message: message.into(),
            non_fast_forward: true,
        }
    }
}

/// The version-control operations the synchronizer drives. The wire protocol
/// lives entirely behind this trait.
#[async_trait]
pub trait VersionControlProvider: Send + Sync {
    /// Fetch `remote_url` into `dest` and return the remote branch names.
    async fn clone_into(&self, remote_url: &str, dest: &Path) -> Result<Vec<String>, ProviderError>;

    async fn stage_all(&self, tree: &Path) -> Result<(), ProviderError>;

    async fn commit(
        &self,
        tree: &Path,
        author_name: &str,
        author_email: &str,
        message: &str,
    ) -> Result<(), ProviderError>;

    async fn push(&self, tree: &Path, branch: &str, force: bool) -> Result<(), ProviderError>;

    /// One `(head, workdir, stage)` tuple per changed path.
    async fn status_matrix(&self, tree: &Path) -> Result<Vec<StatusEntry>, ProviderError>;
}

/// A checked-out remote repository, rooted per project so concurrent projects
/// never share a tree.
#[derive(Debug, Clone)]
pub struct WorkingTree {
    pub project_id: String,
    pub root: PathBuf,
    pub branches: Vec<String>,
}

/// One classified row of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, Default)]
pub struct RepoDiff {
    pub files: Vec<ClassifiedEntry>,
    pub summary: DiffSummary,
}

/// Push classification surfaced to the caller. `UnableToFastForward` is the
/// only outcome that warrants a force-push affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Success,
    UnableToFastForward,
    Other(String),
}

pub struct Synchronizer<P> {
    provider: P,
    /// Parent directory under which per-project working trees are created.
    workspace: PathBuf,
}

impl<P: VersionControlProvider> Synchronizer<P> {
    pub fn new(provider: P, workspace: impl Into<PathBuf>) -> Self {
        Synchronizer {
            provider,
            workspace: workspace.into(),
        }
    }

    /// Clone `remote_url` into a fresh project-scoped working tree.
    pub async fn clone(
        &self,
        remote_url: &str,
        project_id: &str,
    ) -> Result<WorkingTree, ProviderError> {
        let root = self.workspace.join(project_id);
        let branches = self.provider.clone_into(remote_url, &root).await?;
        Ok(WorkingTree {
            project_id: project_id.to_string(),
            root,
            branches,
        })
    }

    /// Classify every changed path after a fresh serializer pass has
    /// overwritten the tree. Tuples outside the provider contract are
    /// dropped with a warning rather than miscounted.
    pub async fn diff(&self, tree: &WorkingTree) -> Result<RepoDiff, ProviderError> {
        let matrix = self.provider.status_matrix(&tree.root).await?;

        let mut files = Vec::with_capacity(matrix.len());
        for entry in matrix {
            match classify(entry.head, entry.workdir, entry.stage) {
                Some(status) => files.push(ClassifiedEntry {
                    path: entry.path,
                    status,
                }),
                None => {
                    warn!(
                        path = %entry.path,
                        head = entry.head,
                        workdir = entry.workdir,
                        stage = entry.stage,
                        "status tuple outside provider contract, skipping"
                    );
                }
            }
        }

        let summary = summarize(files.iter().map(|f| &f.status));
        Ok(RepoDiff { files, summary })
    }

    /// Stage everything, commit as the bot, push to `origin/<branch>`.
    /// Provider errors are converted here; this method never fails raw.
    pub async fn commit_and_push(
        &self,
        tree: &WorkingTree,
        branch: &str,
        force: bool,
    ) -> PushOutcome {
        if let Err(e) = self.provider.stage_all(&tree.root).await {
            return PushOutcome::Other(e.message);
        }
        if let Err(e) = self
            .provider
            .commit(&tree.root, BOT_AUTHOR_NAME, BOT_AUTHOR_EMAIL, COMMIT_MESSAGE)
            .await
        {
            return PushOutcome::Other(e.message);
        }

        match self.provider.push(&tree.root, branch, force).await {
            Ok(()) => PushOutcome::Success,
            Err(e) if e.non_fast_forward => PushOutcome::UnableToFastForward,
            Err(e) => PushOutcome::Other(e.message),
        }
    }
}
