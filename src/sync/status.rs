//! Status-matrix classification.
//!
//! The provider reports one `(head, workdir, stage)` tuple per changed path:
//! head ∈ {0,1} (absent/present in the last commit), workdir ∈ {0,1,2}
//! (absent/identical/different in the working tree), stage ∈ {0,1,2,3}
//! (absent/identical/different/different-again in the index). Exactly nine
//! tuples are defined; anything else is outside the provider contract.

use serde::Serialize;

/// Raw per-file tuple from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub head: u8,
    pub workdir: u8,
    pub stage: u8,
}

impl StatusEntry {
    pub fn new(path: impl Into<String>, head: u8, workdir: u8, stage: u8) -> Self {
        StatusEntry {
            path: path.into(),
            head,
            workdir,
            stage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileStatus {
    /// Untracked: present only in the working tree.
    New,
    /// Staged addition.
    Added,
    /// Staged addition with further unstaged edits on top.
    AddedWithUnstagedChanges,
    Unmodified,
    /// Edited in the working tree, not staged.
    Modified,
    /// Edited and staged.
    ModifiedStaged,
    /// Staged edit with further unstaged edits on top.
    ModifiedStagedWithUnstagedChanges,
    /// Removed from the working tree, removal not staged.
    Deleted,
    /// Staged removal.
    DeletedStaged,
}

/// Classify one tuple. `None` for tuples outside the provider contract.
pub fn classify(head: u8, workdir: u8, stage: u8) -> Option<FileStatus> {
    match (head, workdir, stage) {
        (0, 2, 0) => Some(FileStatus::New),
        (0, 2, 2) => Some(FileStatus::Added),
        (0, 2, 3) => Some(FileStatus::AddedWithUnstagedChanges),
        (1, 1, 1) => Some(FileStatus::Unmodified),
        (1, 2, 1) => Some(FileStatus::Modified),
        (1, 2, 2) => Some(FileStatus::ModifiedStaged),
        (1, 2, 3) => Some(FileStatus::ModifiedStagedWithUnstagedChanges),
        (1, 0, 1) => Some(FileStatus::Deleted),
        (1, 0, 0) => Some(FileStatus::DeletedStaged),
        _ => None,
    }
}

/// Aggregated counts for user-facing summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub new_files: usize,
    pub modified_files: usize,
    pub deleted_files: usize,
}

pub fn summarize<'a>(statuses: impl IntoIterator<Item = &'a FileStatus>) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for status in statuses {
        match status {
            FileStatus::New | FileStatus::Added | FileStatus::AddedWithUnstagedChanges => {
                summary.new_files += 1;
            }
            FileStatus::Modified
            | FileStatus::ModifiedStaged
            | FileStatus::ModifiedStagedWithUnstagedChanges => {
                summary.modified_files += 1;
            }
            FileStatus::Deleted | FileStatus::DeletedStaged => {
                summary.deleted_files += 1;
            }
            FileStatus::Unmodified => {}
        }
    }
    summary
}
