//! Shared-file link resolver: relative paths from a block's link directory to
//! the canonical shared-files root, and the reverse resolution on read.

use std::path::{Path, PathBuf};

use crate::error::CompilerError;
use crate::store::FileStore;

use super::{BLOCK_LINKS_DIR, SHARED_FILES_DIR};

/// Relative symlink target from `<block-dir>/shared_files/` back to
/// `shared-files/<file_name>` at the project root. Computed from the block
/// directory's depth, which varies with id-suffixing or nesting.
pub fn link_target(block_dir_rel: &Path, file_name: &str) -> PathBuf {
    // +1 for the shared_files directory the link itself lives in.
    let ups = block_dir_rel.components().count() + 1;
    let mut target = PathBuf::new();
    for _ in 0..ups {
        target.push("..");
    }
    target.push(SHARED_FILES_DIR);
    target.push(file_name);
    target
}

/// Create the symlink for one shared file inside the owning block's folder.
/// The caller has already checked [`FileStore::supports_symlinks`].
pub async fn create_link<S: FileStore>(
    store: &S,
    root: &Path,
    block_dir_rel: &Path,
    file_name: &str,
) -> std::io::Result<()> {
    let links_dir = root.join(block_dir_rel).join(BLOCK_LINKS_DIR);
    store.create_dir_all(&links_dir).await?;

    let target = link_target(block_dir_rel, file_name);
    store.symlink(&target, &links_dir.join(file_name)).await
}

/// Resolve a link entry back to the canonical absolute path of the shared
/// file it points at. A dangling or out-of-tree target is an unresolved link.
pub async fn resolve_link<S: FileStore>(
    store: &S,
    links_dir_abs: &Path,
    entry_name: &str,
) -> Result<PathBuf, CompilerError> {
    let link_path = links_dir_abs.join(entry_name);
    let target = store
        .read_link(&link_path)
        .await
        .map_err(|e| CompilerError::io(&link_path, e))?;

    let resolved = if target.is_absolute() {
        target
    } else {
        links_dir_abs.join(target)
    };

    store
        .canonicalize(&resolved)
        .await
        .map_err(|_| CompilerError::UnresolvedSharedFileLink { path: resolved })
}
