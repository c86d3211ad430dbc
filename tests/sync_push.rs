//! Synchronizer behavior against a scripted provider: diff classification
//! and push-outcome mapping.

mod helpers;

use stratus_compiler::sync::{FileStatus, PushOutcome, StatusEntry, Synchronizer};

use helpers::FakeProvider;

#[tokio::test]
async fn clone_scopes_the_tree_by_project_id() {
    let sync = Synchronizer::new(FakeProvider::new(), "/tmp/stratus-workspaces");
    let tree = sync.clone("https://example.com/repo.git", "proj-1").await.unwrap();
    assert!(tree.root.ends_with("proj-1"));
    assert_eq!(tree.branches, vec!["main".to_string()]);
}

#[tokio::test]
async fn diff_classifies_and_summarizes_mixed_rows() {
    let matrix = vec![
        StatusEntry::new("lambda/final/code.py", 0, 2, 0),
        StatusEntry::new("lambda/final/block.json", 1, 2, 1),
        StatusEntry::new("projects/p.json", 1, 1, 1),
        StatusEntry::new("shared-files/old.py", 1, 0, 1),
        // Outside the provider contract; must be skipped, not miscounted.
        StatusEntry::new("weird", 0, 0, 3),
    ];
    let sync = Synchronizer::new(FakeProvider::new().with_matrix(matrix), "/tmp/ws");
    let tree = sync.clone("https://example.com/repo.git", "p").await.unwrap();

    let diff = sync.diff(&tree).await.unwrap();
    assert_eq!(diff.files.len(), 4);
    assert_eq!(diff.files[0].status, FileStatus::New);
    assert_eq!(diff.files[1].status, FileStatus::Modified);
    assert_eq!(diff.files[2].status, FileStatus::Unmodified);
    assert_eq!(diff.files[3].status, FileStatus::Deleted);
    assert_eq!(diff.summary.new_files, 1);
    assert_eq!(diff.summary.modified_files, 1);
    assert_eq!(diff.summary.deleted_files, 1);
}

#[tokio::test]
async fn successful_push_reports_success() {
    let provider = FakeProvider::new();
    let sync = Synchronizer::new(provider, "/tmp/ws");
    let tree = sync.clone("https://example.com/repo.git", "p").await.unwrap();

    let outcome = sync.commit_and_push(&tree, "main", false).await;
    assert_eq!(outcome, PushOutcome::Success);
}

#[tokio::test]
async fn diverged_upstream_reports_unable_to_fast_forward() {
    let provider = FakeProvider::new().rejecting_push("remote contains work you do not have", true);
    let sync = Synchronizer::new(provider, "/tmp/ws");
    let tree = sync.clone("https://example.com/repo.git", "p").await.unwrap();

    let outcome = sync.commit_and_push(&tree, "main", false).await;
    assert_eq!(outcome, PushOutcome::UnableToFastForward);
}

#[tokio::test]
async fn any_other_provider_failure_reports_other() {
    let provider = FakeProvider::new().rejecting_push("connection reset", false);
    let sync = Synchronizer::new(provider, "/tmp/ws");
    let tree = sync.clone("https://example.com/repo.git", "p").await.unwrap();

    let outcome = sync.commit_and_push(&tree, "main", false).await;
    assert_eq!(outcome, PushOutcome::Other("connection reset".into()));
}
