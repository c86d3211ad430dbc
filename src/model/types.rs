//! Core data model for a visual serverless application.
//!
//! These types are the serde target for every descriptor document the codec
//! reads or writes. The editor owns entity lifetimes; this subsystem only
//! generates fresh identifiers for entities discovered on disk without one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// PROJECT AGGREGATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Monotonically increasing save counter, bumped by the editor.
    pub version: u64,
    pub workflow_states: Vec<WorkflowState>,
    pub workflow_relationships: Vec<WorkflowRelationship>,
    pub workflow_files: Vec<WorkflowFile>,
    pub workflow_file_links: Vec<WorkflowFileLink>,
    #[serde(default)]
    pub config: ProjectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// BTreeMap so serialized descriptors list variables in a stable order.
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    #[default]
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

// =============================================================================
// WORKFLOW STATES: tagged union over the six block kinds
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowState {
    #[serde(rename = "lambda")]
    Lambda(ComputeBlock),
    #[serde(rename = "topic")]
    Topic(TopicState),
    #[serde(rename = "queue")]
    Queue(QueueState),
    #[serde(rename = "timer")]
    Timer(TimerState),
    #[serde(rename = "apiEndpoint")]
    ApiEndpoint(ApiEndpointState),
    #[serde(rename = "apiResponse")]
    ApiResponse(ApiResponseState),
}

/// A block that executes user code in response to input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeBlock {
    pub id: String,
    pub name: String,
    /// Source body. Lives in its own `code.<ext>` file on disk so diffs stay
    /// readable; empty here means "not yet merged from the code file".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub language: Language,
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Memory limit in megabytes.
    pub memory: u32,
    /// Execution time limit in seconds.
    pub max_execution_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_concurrency: Option<u32>,
    #[serde(default)]
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicState {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    pub id: String,
    pub name: String,
    /// Messages handed to the consuming block per invocation.
    pub batch_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub id: String,
    pub name: String,
    /// Rate or cron expression, e.g. `rate(5 minutes)` or `cron(0 12 * * ? *)`.
    pub schedule_expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointState {
    pub id: String,
    pub name: String,
    pub http_method: String,
    pub api_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseState {
    pub id: String,
    pub name: String,
}

impl WorkflowState {
    pub fn id(&self) -> &str {
        match self {
            WorkflowState::Lambda(s) => &s.id,
            WorkflowState::Topic(s) => &s.id,
            WorkflowState::Queue(s) => &s.id,
            WorkflowState::Timer(s) => &s.id,
            WorkflowState::ApiEndpoint(s) => &s.id,
            WorkflowState::ApiResponse(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WorkflowState::Lambda(s) => &s.name,
            WorkflowState::Topic(s) => &s.name,
            WorkflowState::Queue(s) => &s.name,
            WorkflowState::Timer(s) => &s.name,
            WorkflowState::ApiEndpoint(s) => &s.name,
            WorkflowState::ApiResponse(s) => &s.name,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            WorkflowState::Lambda(_) => StateKind::Lambda,
            WorkflowState::Topic(_) => StateKind::Topic,
            WorkflowState::Queue(_) => StateKind::Queue,
            WorkflowState::Timer(_) => StateKind::Timer,
            WorkflowState::ApiEndpoint(_) => StateKind::ApiEndpoint,
            WorkflowState::ApiResponse(_) => StateKind::ApiResponse,
        }
    }

    pub fn is_compute_block(&self) -> bool {
        matches!(self, WorkflowState::Lambda(_))
    }

    pub fn as_compute_block(&self) -> Option<&ComputeBlock> {
        match self {
            WorkflowState::Lambda(block) => Some(block),
            _ => None,
        }
    }
}

/// Fieldless kind tag, the key type of the transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    #[serde(rename = "lambda")]
    Lambda,
    #[serde(rename = "topic")]
    Topic,
    #[serde(rename = "queue")]
    Queue,
    #[serde(rename = "timer")]
    Timer,
    #[serde(rename = "apiEndpoint")]
    ApiEndpoint,
    #[serde(rename = "apiResponse")]
    ApiResponse,
}

impl StateKind {
    /// Filesystem directory name for states of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            StateKind::Lambda => "lambda",
            StateKind::Topic => "topic",
            StateKind::Queue => "queue",
            StateKind::Timer => "timer",
            StateKind::ApiEndpoint => "api-endpoint",
            StateKind::ApiResponse => "api-response",
        }
    }
}

// =============================================================================
// RELATIONSHIPS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRelationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub transition_type: RelationshipType,
    /// Guard expression, used only by `If`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "then")]
    Then,
    #[serde(rename = "if")]
    If,
    #[serde(rename = "else")]
    Else,
    #[serde(rename = "exception")]
    Exception,
    #[serde(rename = "fanOut")]
    FanOut,
    #[serde(rename = "fanIn")]
    FanIn,
}

// =============================================================================
// SHARED FILES
// =============================================================================

/// A named source artifact reusable by multiple Compute Blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowFile {
    pub id: String,
    pub name: String,
    pub body: String,
    pub version: String,
}

/// Ownership relation: "this block includes that shared file."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowFileLink {
    pub id: String,
    pub file_id: String,
    pub node_id: String,
}

// =============================================================================
// LANGUAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "nodejs")]
    Nodejs,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "php")]
    Php,
}

impl Language {
    /// File extension for the block's `code.<ext>` file.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Nodejs => "js",
            Language::Python => "py",
            Language::Go => "go",
            Language::Ruby => "rb",
            Language::Php => "php",
        }
    }

    /// Deployment runtime identifier. PHP has no runtime layer yet; the
    /// deploy compiler substitutes a placeholder shim for it.
    pub fn runtime(&self) -> Option<&'static str> {
        match self {
            Language::Nodejs => Some("nodejs12.x"),
            Language::Python => Some("python3.8"),
            Language::Go => Some("go1.x"),
            Language::Ruby => Some("ruby2.7"),
            Language::Php => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Language::Nodejs => "nodejs",
            Language::Python => "python",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Php => "php",
        };
        write!(f, "{}", tag)
    }
}
