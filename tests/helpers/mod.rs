#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use stratus_compiler::model::types::*;
use stratus_compiler::sync::{ProviderError, StatusEntry, VersionControlProvider};

// =============================================================================
// Project builders
// =============================================================================

pub fn compute_block(id: &str, name: &str, language: Language, code: &str) -> ComputeBlock {
    ComputeBlock {
        id: id.into(),
        name: name.into(),
        code: code.into(),
        language,
        libraries: vec![],
        memory: 128,
        max_execution_time: 30,
        reserved_concurrency: None,
        layers: vec![],
    }
}

pub fn base_project(id: &str, name: &str) -> Project {
    Project {
        id: id.into(),
        name: name.into(),
        version: 1,
        workflow_states: vec![],
        workflow_relationships: vec![],
        workflow_files: vec![],
        workflow_file_links: vec![],
        config: ProjectConfig::default(),
    }
}

pub fn relationship(
    id: &str,
    source: &str,
    target: &str,
    transition_type: RelationshipType,
) -> WorkflowRelationship {
    WorkflowRelationship {
        id: id.into(),
        source: source.into(),
        target: target.into(),
        transition_type,
        expression: None,
    }
}

pub fn shared_file(id: &str, name: &str, body: &str) -> WorkflowFile {
    WorkflowFile {
        id: id.into(),
        name: name.into(),
        body: body.into(),
        version: "1.0.0".into(),
    }
}

pub fn file_link(id: &str, file_id: &str, node_id: &str) -> WorkflowFileLink {
    WorkflowFileLink {
        id: id.into(),
        file_id: file_id.into(),
        node_id: node_id.into(),
    }
}

pub fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Scripted version-control provider
// =============================================================================

/// In-memory provider returning canned data; push behavior is scripted so
/// the synchronizer's outcome classification can be exercised.
pub struct FakeProvider {
    pub branches: Vec<String>,
    pub matrix: Vec<StatusEntry>,
    /// `(message, non_fast_forward)`; `None` means the push succeeds.
    pub push_failure: Option<(String, bool)>,
    pub commits: Mutex<Vec<String>>,
    pub pushes: Mutex<Vec<(String, bool)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        FakeProvider {
            branches: vec!["main".into()],
            matrix: vec![],
            push_failure: None,
            commits: Mutex::new(vec![]),
            pushes: Mutex::new(vec![]),
        }
    }

    pub fn with_matrix(mut self, matrix: Vec<StatusEntry>) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn rejecting_push(mut self, message: &str, non_fast_forward: bool) -> Self {
        self.push_failure = Some((message.into(), non_fast_forward));
        self
    }
}

#[async_trait]
impl VersionControlProvider for FakeProvider {
    async fn clone_into(
        &self,
        _remote_url: &str,
        _dest: &Path,
    ) -> Result<Vec<String>, ProviderError> {
        Ok(self.branches.clone())
    }

    async fn stage_all(&self, _tree: &Path) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn commit(
        &self,
        _tree: &Path,
        author_name: &str,
        author_email: &str,
        message: &str,
    ) -> Result<(), ProviderError> {
        self.commits
            .lock()
            .unwrap()
            .push(format!("{} <{}>: {}", author_name, author_email, message));
        Ok(())
    }

    async fn push(&self, _tree: &Path, branch: &str, force: bool) -> Result<(), ProviderError> {
        self.pushes.lock().unwrap().push((branch.into(), force));
        match &self.push_failure {
            Some((message, true)) => Err(ProviderError::non_fast_forward(message.clone())),
            Some((message, false)) => Err(ProviderError::other(message.clone())),
            None => Ok(()),
        }
    }

    async fn status_matrix(&self, _tree: &Path) -> Result<Vec<StatusEntry>, ProviderError> {
        Ok(self.matrix.clone())
    }
}
