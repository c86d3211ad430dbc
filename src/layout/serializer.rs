//! Directory layout serializer: Project → filesystem writes under a
//! project-scoped root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::error::CompilerError;
use crate::model::types::Project;
use crate::store::{EntryKind, FileStore};

use super::naming::BlockDirAllocator;
use super::{
    BLOCK_DESCRIPTOR_FILE, BLOCK_LINKS_DIR, BlockDescriptor, PROJECTS_CONFIG_DIR, SHARED_FILES_DIR,
    code_file_name, links,
};

/// Serialize `project` under `root`, replacing any previous layout. Returns
/// the chosen directory per Compute Block, keyed by block id.
///
/// The whole save aborts on any file write failure; there is no
/// partial-success contract. Directory creation failures are logged with the
/// offending path, remaining independent entities are still attempted, and
/// the first such failure is surfaced once the pass completes.
pub async fn serialize_project<S: FileStore>(
    store: &S,
    root: &Path,
    project: &Project,
) -> Result<BTreeMap<String, PathBuf>, CompilerError> {
    // The stale tree must be fully gone before any fresh entry is written.
    clear_tree(store, root).await?;

    let mut deferred: Option<CompilerError> = None;
    let mut allocator = BlockDirAllocator::new();
    let mut block_dirs: BTreeMap<String, PathBuf> = BTreeMap::new();

    for state in &project.workflow_states {
        let Some(block) = state.as_compute_block() else {
            continue;
        };

        let rel_dir = allocator.allocate(block);
        let abs_dir = root.join(&rel_dir);
        if let Err(e) = store.create_dir_all(&abs_dir).await {
            error!(path = %abs_dir.display(), error = %e, "failed to create block directory");
            deferred.get_or_insert(CompilerError::io(&abs_dir, e));
            continue;
        }

        let code_path = abs_dir.join(code_file_name(block.language));
        write_file(store, &code_path, block.code.as_bytes()).await?;

        let descriptor = BlockDescriptor::from(block);
        let descriptor_path = abs_dir.join(BLOCK_DESCRIPTOR_FILE);
        let body = serde_json::to_vec_pretty(&descriptor)
            .map_err(|e| CompilerError::descriptor(&descriptor_path, e))?;
        write_file(store, &descriptor_path, &body).await?;

        block_dirs.insert(block.id.clone(), rel_dir);
    }

    let shared_dir = root.join(SHARED_FILES_DIR);
    if !project.workflow_files.is_empty() {
        if let Err(e) = store.create_dir_all(&shared_dir).await {
            error!(path = %shared_dir.display(), error = %e, "failed to create shared files directory");
            deferred.get_or_insert(CompilerError::io(&shared_dir, e));
        } else {
            for file in &project.workflow_files {
                write_file(store, &shared_dir.join(&file.name), file.body.as_bytes()).await?;
            }
        }
    }

    if store.supports_symlinks() {
        for link in &project.workflow_file_links {
            let Some(block_dir) = block_dirs.get(&link.node_id) else {
                warn!(link = %link.id, node = %link.node_id, "file link owner has no directory, skipping");
                continue;
            };
            let Some(file) = project.workflow_files.iter().find(|f| f.id == link.file_id) else {
                warn!(link = %link.id, file = %link.file_id, "file link references unknown shared file, skipping");
                continue;
            };
            links::create_link(store, root, block_dir, &file.name)
                .await
                .map_err(|e| {
                    let path = root.join(block_dir).join(BLOCK_LINKS_DIR).join(&file.name);
                    error!(path = %path.display(), error = %e, "failed to create shared file link");
                    CompilerError::io(path, e)
                })?;
        }
    } else if !project.workflow_file_links.is_empty() {
        warn!("file store has no symlink support, skipping shared file links");
    }

    write_project_descriptor(store, root, project).await?;

    match deferred {
        Some(err) => Err(err),
        None => Ok(block_dirs),
    }
}

/// Residual project descriptor: everything that does not live in its own
/// file. Compute Blocks, shared files, and file links are reconstructed from
/// the tree on load, so they are stripped here.
async fn write_project_descriptor<S: FileStore>(
    store: &S,
    root: &Path,
    project: &Project,
) -> Result<(), CompilerError> {
    let residual = Project {
        workflow_states: project
            .workflow_states
            .iter()
            .filter(|s| !s.is_compute_block())
            .cloned()
            .collect(),
        workflow_files: Vec::new(),
        workflow_file_links: Vec::new(),
        ..project.clone()
    };

    let config_dir = root.join(PROJECTS_CONFIG_DIR);
    store
        .create_dir_all(&config_dir)
        .await
        .map_err(|e| CompilerError::io(&config_dir, e))?;

    let path = config_dir.join(format!("{}.json", project.id));
    let body =
        serde_json::to_vec_pretty(&residual).map_err(|e| CompilerError::descriptor(&path, e))?;
    write_file(store, &path, &body).await
}

/// Remove every non-version-control entry under `root`, directories
/// deepest-first. Creates the root when it does not exist yet.
async fn clear_tree<S: FileStore>(store: &S, root: &Path) -> Result<(), CompilerError> {
    if !store
        .exists(root)
        .await
        .map_err(|e| CompilerError::io(root, e))?
    {
        return store
            .create_dir_all(root)
            .await
            .map_err(|e| CompilerError::io(root, e));
    }

    let entries = store
        .read_dir(root)
        .await
        .map_err(|e| CompilerError::io(root, e))?;

    for entry in entries {
        if entry.name == ".git" {
            continue;
        }
        let path = root.join(&entry.name);
        match entry.kind {
            EntryKind::Dir => {
                clear_dir(store, &path).await?;
                store
                    .remove_dir(&path)
                    .await
                    .map_err(|e| CompilerError::io(&path, e))?;
            }
            EntryKind::File | EntryKind::Symlink => {
                store
                    .remove_file(&path)
                    .await
                    .map_err(|e| CompilerError::io(&path, e))?;
            }
        }
    }
    Ok(())
}

async fn clear_dir<S: FileStore>(store: &S, dir: &Path) -> Result<(), CompilerError> {
    let entries = store
        .read_dir(dir)
        .await
        .map_err(|e| CompilerError::io(dir, e))?;

    for entry in entries {
        let path = dir.join(&entry.name);
        match entry.kind {
            EntryKind::Dir => {
                Box::pin(clear_dir(store, &path)).await?;
                store
                    .remove_dir(&path)
                    .await
                    .map_err(|e| CompilerError::io(&path, e))?;
            }
            EntryKind::File | EntryKind::Symlink => {
                store
                    .remove_file(&path)
                    .await
                    .map_err(|e| CompilerError::io(&path, e))?;
            }
        }
    }
    Ok(())
}

async fn write_file<S: FileStore>(
    store: &S,
    path: &Path,
    contents: &[u8],
) -> Result<(), CompilerError> {
    store.write(path, contents).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "write failed");
        CompilerError::io(path, e)
    })
}
