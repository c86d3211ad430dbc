//! Filesystem provider abstraction consumed by the layout codec.
//!
//! The codec never touches `tokio::fs` directly; it goes through [`FileStore`]
//! so the backing store can be swapped (local disk, virtual tree). Directory
//! absence is established with an explicit [`FileStore::exists`] check, never
//! by swallowing read errors.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Idempotent; succeeding on an already-existing directory is not an error.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Removes an empty directory.
    async fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Whether [`FileStore::symlink`] can succeed on this store. Stores
    /// without symlink support cause link creation to be skipped, not to fail.
    fn supports_symlinks(&self) -> bool;

    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`FileStore`] backed by the local filesystem via `tokio::fs`.
#[derive(Debug, Default, Clone)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        LocalFileStore
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry { name, kind });
        }
        // read_dir order is platform-dependent; sort for deterministic walks.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_dir(path).await
    }

    fn supports_symlinks(&self) -> bool {
        cfg!(unix)
    }

    #[cfg(unix)]
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        tokio::fs::symlink(target, link).await
    }

    #[cfg(not(unix))]
    async fn symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::read_link(path).await
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exists_and_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new();
        let file = dir.path().join("a.txt");

        assert!(!store.exists(&file).await.unwrap());
        store.write(&file, b"hello").await.unwrap();
        assert!(store.exists(&file).await.unwrap());
        assert_eq!(store.read_to_string(&file).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn read_dir_reports_kinds_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new();
        store.write(&dir.path().join("b.txt"), b"x").await.unwrap();
        store
            .create_dir_all(&dir.path().join("a-dir"))
            .await
            .unwrap();

        let entries = store.read_dir(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a-dir");
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[1].name, "b.txt");
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new();
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link.txt");

        store.write(&target, b"data").await.unwrap();
        store
            .symlink(Path::new("target.txt"), &link)
            .await
            .unwrap();

        assert!(store.supports_symlinks());
        assert_eq!(
            store.read_link(&link).await.unwrap(),
            PathBuf::from("target.txt")
        );
        let entries = store.read_dir(dir.path()).await.unwrap();
        let link_entry = entries.iter().find(|e| e.name == "link.txt").unwrap();
        assert_eq!(link_entry.kind, EntryKind::Symlink);
    }
}
