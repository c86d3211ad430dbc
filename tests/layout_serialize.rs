//! Serializer layout checks: directory shapes, collision handling, and the
//! residual project descriptor.

mod helpers;

use std::path::PathBuf;

use stratus_compiler::layout::serialize_project;
use stratus_compiler::model::types::*;
use stratus_compiler::store::LocalFileStore;

use helpers::*;

#[tokio::test]
async fn single_python_block_lands_in_lambda_final() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new();

    let mut project = base_project("proj-1", "Demo");
    project.workflow_states = vec![WorkflowState::Lambda(compute_block(
        "8f14e45f-aaaa-bbbb-cccc-000000000001",
        "Final",
        Language::Python,
        "def main(event):\n    return event\n",
    ))];

    let block_dirs = serialize_project(&store, dir.path(), &project)
        .await
        .unwrap();
    assert_eq!(
        block_dirs["8f14e45f-aaaa-bbbb-cccc-000000000001"],
        PathBuf::from("lambda/final")
    );

    let code = std::fs::read_to_string(dir.path().join("lambda/final/code.py")).unwrap();
    assert!(code.starts_with("def main"));

    let descriptor: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("lambda/final/block.json")).unwrap())
            .unwrap();
    assert!(descriptor.get("code").is_none());
    assert_eq!(descriptor["language"], "python");
    assert_eq!(descriptor["name"], "Final");
}

#[tokio::test]
async fn residual_descriptor_holds_no_compute_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new();

    let mut project = base_project("proj-1", "Demo");
    project.workflow_states = vec![
        WorkflowState::Lambda(compute_block(
            "8f14e45f-aaaa-bbbb-cccc-000000000001",
            "Final",
            Language::Python,
            "pass",
        )),
        WorkflowState::Timer(TimerState {
            id: "timer-1".into(),
            name: "Nightly".into(),
            schedule_expression: "rate(1 day)".into(),
        }),
    ];

    serialize_project(&store, dir.path(), &project).await.unwrap();

    let residual: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("projects/proj-1.json")).unwrap(),
    )
    .unwrap();
    let states = residual["workflowStates"].as_array().unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0]["type"], "timer");
}

#[tokio::test]
async fn colliding_worker_names_get_distinct_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new();

    let mut project = base_project("proj-1", "Demo");
    project.workflow_states = vec![
        WorkflowState::Lambda(compute_block(
            "aaaa1111-0000-0000-0000-000000000001",
            "Worker",
            Language::Python,
            "pass",
        )),
        WorkflowState::Lambda(compute_block(
            "bbbb2222-0000-0000-0000-000000000002",
            "Worker",
            Language::Python,
            "pass",
        )),
    ];

    let block_dirs = serialize_project(&store, dir.path(), &project)
        .await
        .unwrap();
    assert_eq!(
        block_dirs["aaaa1111-0000-0000-0000-000000000001"],
        PathBuf::from("lambda/worker")
    );
    assert_eq!(
        block_dirs["bbbb2222-0000-0000-0000-000000000002"],
        PathBuf::from("lambda/worker-bbbb2222")
    );
    assert!(dir.path().join("lambda/worker/block.json").exists());
    assert!(dir.path().join("lambda/worker-bbbb2222/block.json").exists());
}

#[tokio::test]
async fn repeated_serialization_is_stable_and_replaces_stale_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new();

    let mut project = base_project("proj-1", "Demo");
    project.workflow_states = vec![
        WorkflowState::Lambda(compute_block(
            "aaaa1111-0000-0000-0000-000000000001",
            "Worker",
            Language::Python,
            "pass",
        )),
        WorkflowState::Lambda(compute_block(
            "bbbb2222-0000-0000-0000-000000000002",
            "Worker",
            Language::Python,
            "pass",
        )),
    ];

    let first = serialize_project(&store, dir.path(), &project).await.unwrap();

    // Drop the second block; its directory must not survive the next save.
    project.workflow_states.truncate(1);
    let second = serialize_project(&store, dir.path(), &project).await.unwrap();

    assert_eq!(
        first["aaaa1111-0000-0000-0000-000000000001"],
        second["aaaa1111-0000-0000-0000-000000000001"]
    );
    assert!(!dir.path().join("lambda/worker-bbbb2222").exists());
}

#[tokio::test]
async fn shared_files_and_links_are_materialized() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new();

    let mut project = base_project("proj-1", "Demo");
    project.workflow_states = vec![WorkflowState::Lambda(compute_block(
        "aaaa1111-0000-0000-0000-000000000001",
        "Worker",
        Language::Python,
        "pass",
    ))];
    project.workflow_files = vec![shared_file("file-1", "util.py", "def util():\n    pass\n")];
    project.workflow_file_links = vec![file_link(
        "link-1",
        "file-1",
        "aaaa1111-0000-0000-0000-000000000001",
    )];

    serialize_project(&store, dir.path(), &project).await.unwrap();

    let shared = dir.path().join("shared-files/util.py");
    assert!(shared.exists());

    let link = dir.path().join("lambda/worker/shared_files/util.py");
    let meta = std::fs::symlink_metadata(&link).unwrap();
    assert!(meta.file_type().is_symlink());
    // Following the link must land on the canonical shared file body.
    assert_eq!(
        std::fs::read_to_string(&link).unwrap(),
        "def util():\n    pass\n"
    );
}
