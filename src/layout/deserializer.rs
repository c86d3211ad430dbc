//! Directory layout deserializer: filesystem root + project id → Project.
//!
//! Read-only. Shared files are indexed before links are resolved; any step's
//! failure aborts the whole load with a structured error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::CompilerError;
use crate::model::types::{
    ComputeBlock, Project, ProjectConfig, StateKind, WorkflowFile, WorkflowFileLink,
    WorkflowRelationship, WorkflowState,
};
use crate::store::{EntryKind, FileStore};

use super::naming::id_fragment;
use super::{
    BLOCK_DESCRIPTOR_FILE, BLOCK_LINKS_DIR, BlockDescriptor, PROJECTS_CONFIG_DIR, SHARED_FILES_DIR,
    code_file_name, links,
};

/// Read side of the residual project descriptor. Every field is optional so
/// the merge step can distinguish "absent" from "present but empty".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDescriptor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    workflow_states: Vec<WorkflowState>,
    #[serde(default)]
    workflow_relationships: Vec<WorkflowRelationship>,
    #[serde(default)]
    workflow_files: Vec<WorkflowFile>,
    #[serde(default)]
    workflow_file_links: Vec<WorkflowFileLink>,
    #[serde(default)]
    config: Option<ProjectConfig>,
}

/// Fields forced onto the loaded project regardless of descriptor content.
struct ProjectOverrides {
    /// The caller's project id always wins, so a descriptor copied from
    /// another project cannot clobber this one's identity.
    id: String,
}

pub async fn deserialize_project<S: FileStore>(
    store: &S,
    root: &Path,
    project_id: &str,
) -> Result<Project, CompilerError> {
    let descriptor = read_project_descriptor(store, root, project_id).await?;

    let (shared_files, shared_by_path) = read_shared_files(store, root).await?;
    let (blocks, block_dirs) = read_compute_blocks(store, root).await?;
    let file_links = read_file_links(store, &block_dirs, &shared_by_path).await?;

    let defaults = Project {
        id: String::new(),
        name: format!("project-{}", id_fragment(project_id)),
        version: 1,
        workflow_states: Vec::new(),
        workflow_relationships: Vec::new(),
        workflow_files: Vec::new(),
        workflow_file_links: Vec::new(),
        config: ProjectConfig::default(),
    };
    let overrides = ProjectOverrides {
        id: project_id.to_string(),
    };

    let mut project = merge_project_defaults(defaults, descriptor, overrides);
    project
        .workflow_states
        .extend(blocks.into_iter().map(WorkflowState::Lambda));
    project.workflow_files.extend(shared_files);
    project.workflow_file_links.extend(file_links);

    Ok(project)
}

/// Explicit merge point for the three project sources. Precedence, lowest to
/// highest: built-in defaults, then parsed descriptor fields, then forced
/// overrides. Descriptor-embedded entity lists are kept (Compute Blocks
/// excluded; those are rebuilt from the tree) and the caller appends the
/// entities discovered on disk.
fn merge_project_defaults(
    defaults: Project,
    loaded: ProjectDescriptor,
    overrides: ProjectOverrides,
) -> Project {
    Project {
        id: overrides.id,
        name: loaded.name.unwrap_or(defaults.name),
        version: loaded.version.unwrap_or(defaults.version),
        workflow_states: loaded
            .workflow_states
            .into_iter()
            .filter(|s| !s.is_compute_block())
            .collect(),
        workflow_relationships: if loaded.workflow_relationships.is_empty() {
            defaults.workflow_relationships
        } else {
            loaded.workflow_relationships
        },
        workflow_files: loaded.workflow_files,
        workflow_file_links: loaded.workflow_file_links,
        config: loaded.config.unwrap_or(defaults.config),
    }
}

async fn read_project_descriptor<S: FileStore>(
    store: &S,
    root: &Path,
    project_id: &str,
) -> Result<ProjectDescriptor, CompilerError> {
    let path = root
        .join(PROJECTS_CONFIG_DIR)
        .join(format!("{}.json", project_id));

    if !store
        .exists(&path)
        .await
        .map_err(|e| CompilerError::io(&path, e))?
    {
        return Err(CompilerError::MissingDescriptor { path });
    }

    let raw = store
        .read_to_string(&path)
        .await
        .map_err(|e| CompilerError::io(&path, e))?;
    serde_json::from_str(&raw).map_err(|e| CompilerError::descriptor(&path, e))
}

/// List `shared-files/` and synthesize a [`WorkflowFile`] per entry. Also
/// builds the canonical-path lookup table used for link resolution; keys are
/// resolved absolute paths, not names, so suffixed or nested block folders
/// all land on the same file.
async fn read_shared_files<S: FileStore>(
    store: &S,
    root: &Path,
) -> Result<(Vec<WorkflowFile>, HashMap<PathBuf, String>), CompilerError> {
    let shared_dir = root.join(SHARED_FILES_DIR);
    let mut files = Vec::new();
    let mut by_path = HashMap::new();

    if !store
        .exists(&shared_dir)
        .await
        .map_err(|e| CompilerError::io(&shared_dir, e))?
    {
        return Ok((files, by_path));
    }

    let entries = store
        .read_dir(&shared_dir)
        .await
        .map_err(|e| CompilerError::io(&shared_dir, e))?;

    for entry in entries {
        if entry.kind != EntryKind::File {
            continue;
        }
        let path = shared_dir.join(&entry.name);
        let body = store
            .read_to_string(&path)
            .await
            .map_err(|e| CompilerError::io(&path, e))?;

        let file = WorkflowFile {
            id: Uuid::new_v4().to_string(),
            name: entry.name,
            body,
            version: "1.0.0".into(),
        };
        let canonical = store
            .canonicalize(&path)
            .await
            .map_err(|e| CompilerError::io(&path, e))?;
        by_path.insert(canonical, file.id.clone());
        files.push(file);
    }

    Ok((files, by_path))
}

/// List the Compute Block directory and rebuild one block per child folder.
async fn read_compute_blocks<S: FileStore>(
    store: &S,
    root: &Path,
) -> Result<(Vec<ComputeBlock>, Vec<(PathBuf, String)>), CompilerError> {
    let lambda_dir = root.join(StateKind::Lambda.dir_name());
    let mut blocks = Vec::new();
    let mut dirs = Vec::new();

    if !store
        .exists(&lambda_dir)
        .await
        .map_err(|e| CompilerError::io(&lambda_dir, e))?
    {
        return Ok((blocks, dirs));
    }

    let entries = store
        .read_dir(&lambda_dir)
        .await
        .map_err(|e| CompilerError::io(&lambda_dir, e))?;

    for entry in entries {
        if entry.kind != EntryKind::Dir {
            continue;
        }
        let block_dir = lambda_dir.join(&entry.name);
        let block = read_one_block(store, &block_dir).await?;
        dirs.push((block_dir, block.id.clone()));
        blocks.push(block);
    }

    Ok((blocks, dirs))
}

async fn read_one_block<S: FileStore>(
    store: &S,
    block_dir: &Path,
) -> Result<ComputeBlock, CompilerError> {
    let descriptor_path = block_dir.join(BLOCK_DESCRIPTOR_FILE);
    if !store
        .exists(&descriptor_path)
        .await
        .map_err(|e| CompilerError::io(&descriptor_path, e))?
    {
        return Err(CompilerError::MissingDescriptor {
            path: descriptor_path,
        });
    }

    let raw = store
        .read_to_string(&descriptor_path)
        .await
        .map_err(|e| CompilerError::io(&descriptor_path, e))?;
    let descriptor: BlockDescriptor =
        serde_json::from_str(&raw).map_err(|e| CompilerError::descriptor(&descriptor_path, e))?;

    let Some(language) = descriptor.language else {
        return Err(CompilerError::MissingLanguage {
            path: descriptor_path,
            descriptor: raw,
        });
    };

    let code_path = block_dir.join(code_file_name(language));
    let code = store
        .read_to_string(&code_path)
        .await
        .map_err(|e| CompilerError::io(&code_path, e))?;

    Ok(ComputeBlock {
        id: descriptor
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: descriptor.name,
        code,
        language,
        libraries: descriptor.libraries,
        memory: descriptor.memory,
        max_execution_time: descriptor.max_execution_time,
        reserved_concurrency: descriptor.reserved_concurrency,
        layers: descriptor.layers,
    })
}

/// Scan each block's `shared_files/` directory and resolve every symlink back
/// to an indexed shared file. A block without the directory simply has no
/// links.
async fn read_file_links<S: FileStore>(
    store: &S,
    block_dirs: &[(PathBuf, String)],
    shared_by_path: &HashMap<PathBuf, String>,
) -> Result<Vec<WorkflowFileLink>, CompilerError> {
    let mut file_links = Vec::new();

    for (block_dir, block_id) in block_dirs {
        let links_dir = block_dir.join(BLOCK_LINKS_DIR);
        if !store
            .exists(&links_dir)
            .await
            .map_err(|e| CompilerError::io(&links_dir, e))?
        {
            continue;
        }

        let entries = store
            .read_dir(&links_dir)
            .await
            .map_err(|e| CompilerError::io(&links_dir, e))?;

        for entry in entries {
            if entry.kind != EntryKind::Symlink {
                warn!(path = %links_dir.join(&entry.name).display(), "non-symlink entry in links directory, skipping");
                continue;
            }

            let resolved = links::resolve_link(store, &links_dir, &entry.name).await?;
            let Some(file_id) = shared_by_path.get(&resolved) else {
                return Err(CompilerError::UnresolvedSharedFileLink { path: resolved });
            };

            file_links.push(WorkflowFileLink {
                id: Uuid::new_v4().to_string(),
                file_id: file_id.clone(),
                node_id: block_id.clone(),
            });
        }
    }

    Ok(file_links)
}
