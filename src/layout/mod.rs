//! Directory layout codec: Project ⇄ version-controlled directory tree.
//!
//! Layout relative to a project-scoped root:
//!
//! ```text
//! lambda/<name-slug>[-<id-fragment>]/
//!     block.json            block fields except code
//!     code.<ext>            source, ext from the language table
//!     shared_files/<name>   symlink → ../../../shared-files/<name>
//! shared-files/<name>       shared file bodies
//! projects/<projectId>.json residual project descriptor
//! ```

pub mod deserializer;
pub mod links;
pub mod naming;
pub mod serializer;

pub use deserializer::deserialize_project;
pub use serializer::serialize_project;

use serde::{Deserialize, Serialize};

use crate::model::types::{ComputeBlock, Language};

/// Directory holding shared file bodies, at the project root.
pub const SHARED_FILES_DIR: &str = "shared-files";
/// Directory inside a block's folder holding links to shared files.
pub const BLOCK_LINKS_DIR: &str = "shared_files";
/// Directory holding residual project descriptors.
pub const PROJECTS_CONFIG_DIR: &str = "projects";
/// Per-block descriptor document name.
pub const BLOCK_DESCRIPTOR_FILE: &str = "block.json";

pub fn code_file_name(language: Language) -> String {
    format!("code.{}", language.extension())
}

/// On-disk form of a Compute Block: everything except the source body, which
/// lives in its own code file. `id` and `language` are optional on the read
/// side so their absence maps to the structured errors rather than a parse
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default)]
    pub libraries: Vec<String>,
    pub memory: u32,
    pub max_execution_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_concurrency: Option<u32>,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl From<&ComputeBlock> for BlockDescriptor {
    fn from(block: &ComputeBlock) -> Self {
        BlockDescriptor {
            id: Some(block.id.clone()),
            name: block.name.clone(),
            language: Some(block.language),
            libraries: block.libraries.clone(),
            memory: block.memory,
            max_execution_time: block.max_execution_time,
            reserved_concurrency: block.reserved_concurrency,
            layers: block.layers.clone(),
        }
    }
}
