use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::media::fs::{EntryKind, LibraryEntry, LibraryFs, OpenedFile};
use crate::media::path::normalize;

/// In-memory [`LibraryFs`]: a map of library-relative file paths to their
/// contents. Parent directories are implied by the files they hold.
///
/// Keys go through the same lexical clamp as real paths, so `".."` reads
/// the root here too.
#[derive(Debug, Clone)]
pub struct MemoryLibraryFs {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    unreadable: BTreeSet<String>,
    modified: Option<SystemTime>,
}

impl Default for MemoryLibraryFs {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            dirs: BTreeSet::from([".".to_string()]),
            unreadable: BTreeSet::new(),
            modified: None,
        }
    }
}

impl MemoryLibraryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let path = normalize(path);
        self.add_parents(&path);
        self.files.insert(path, contents.into());
        self
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        let path = normalize(path);
        self.add_parents(&path);
        self.dirs.insert(path);
        self
    }

    /// Make reads of `path` fail with `PermissionDenied`.
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(normalize(path));
        self
    }

    /// Report `time` as the modification time of every file.
    pub fn with_modified(mut self, time: SystemTime) -> Self {
        self.modified = Some(time);
        self
    }

    fn add_parents(&mut self, path: &str) {
        let mut current = parent_of(path);
        while current != "." {
            self.dirs.insert(current.to_string());
            current = parent_of(current);
        }
    }

    fn check_readable(&self, path: &str) -> io::Result<()> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path}: permission denied"),
            ));
        }
        Ok(())
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or(".")
}

fn name_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(_, name)| name).unwrap_or(path)
}

#[async_trait]
impl LibraryFs for MemoryLibraryFs {
    async fn read_dir(&self, path: &str) -> io::Result<Vec<LibraryEntry>> {
        let path = normalize(path);
        self.check_readable(&path)?;
        if !self.dirs.contains(&path) {
            let kind = if self.files.contains_key(&path) {
                io::ErrorKind::Other
            } else {
                io::ErrorKind::NotFound
            };
            return Err(io::Error::new(kind, format!("{path}: not a directory")));
        }

        let dirs = self
            .dirs
            .iter()
            .filter(|dir| dir.as_str() != "." && parent_of(dir) == path)
            .map(|dir| LibraryEntry::new(name_of(dir), EntryKind::Directory));
        let files = self
            .files
            .keys()
            .filter(|file| parent_of(file) == path)
            .map(|file| LibraryEntry::new(name_of(file), EntryKind::File));
        Ok(dirs.chain(files).collect())
    }

    async fn open(&self, path: &str) -> io::Result<OpenedFile> {
        let path = normalize(path);
        self.check_readable(&path)?;
        let contents = self.files.get(&path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path}: no such file"))
        })?;
        Ok(OpenedFile {
            reader: Box::new(Cursor::new(contents.clone())),
            len: contents.len() as u64,
            modified: self.modified,
        })
    }
}
