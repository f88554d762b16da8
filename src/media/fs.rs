use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::media::path::PathContainer;

/// What a directory entry is, as reported by the directory read itself.
/// Symlinks are never followed and surface as `Other`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// One immediate child of a library directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl LibraryEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

pub trait FileReader: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> FileReader for T {}

/// A file opened for streaming, with its total size in bytes.
pub struct OpenedFile {
    pub reader: Box<dyn FileReader>,
    pub len: u64,
    /// Last modification time, when the backing store knows it.
    pub modified: Option<SystemTime>,
}

impl std::fmt::Debug for OpenedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedFile")
            .field("len", &self.len)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

/// Read access to a directory tree that cannot reach above its root.
///
/// Paths are library-relative strings as received from clients. Every
/// implementation applies the [`PathContainer`] clamp before resolving them.
#[async_trait]
pub trait LibraryFs: Send + Sync {
    /// List the immediate children of the directory at `path`.
    async fn read_dir(&self, path: &str) -> io::Result<Vec<LibraryEntry>>;

    /// Open the regular file at `path`. Anything that is not a regular file
    /// is reported as [`io::ErrorKind::NotFound`].
    async fn open(&self, path: &str) -> io::Result<OpenedFile>;
}

/// [`LibraryFs`] backed by the real disk.
#[derive(Debug, Clone)]
pub struct OsLibraryFs {
    container: PathContainer,
}

impl OsLibraryFs {
    pub fn new(container: PathContainer) -> Self {
        Self { container }
    }

    /// Resolve `path` and make sure symlinks along the way did not lead
    /// out of the root.
    async fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let joined = self.container.join(path);
        let canonical = tokio::fs::canonicalize(&joined).await?;
        let root = tokio::fs::canonicalize(self.container.root()).await?;
        if !canonical.starts_with(&root) {
            tracing::warn!(
                "Refusing {} -> {}: outside of {}",
                path,
                canonical.display(),
                root.display()
            );
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path} resolves outside of the library root"),
            ));
        }
        Ok(canonical)
    }
}

#[async_trait]
impl LibraryFs for OsLibraryFs {
    async fn read_dir(&self, path: &str) -> io::Result<Vec<LibraryEntry>> {
        let dir = self.resolve(path).await?;
        let mut reader = tokio::fs::read_dir(&dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            match entry.file_name().into_string() {
                Ok(name) => entries.push(LibraryEntry { name, kind }),
                Err(raw) => {
                    tracing::debug!("Skipping non UTF-8 entry {:?} in {}", raw, dir.display());
                }
            }
        }
        Ok(entries)
    }

    async fn open(&self, path: &str) -> io::Result<OpenedFile> {
        let resolved = self.resolve(path).await?;
        let file = tokio::fs::File::open(&resolved).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a regular file", resolved.display()),
            ));
        }
        Ok(OpenedFile {
            reader: Box::new(file),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}
