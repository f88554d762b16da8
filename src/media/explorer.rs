use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::media::fs::{EntryKind, LibraryFs};
use crate::media::mime::is_song;
use crate::media::path::{child, normalize};

/// Public URI prefix songs are served under.
pub const DEFAULT_MOUNT: &str = "/music";

/// A sub-directory of the listed folder. Its own contents need another listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Basename, e.g. `"Dark Passion Play"`.
    pub name: String,
    /// Path from the library root, e.g. `"Nightwish/Dark Passion Play"`.
    pub path: String,
}

/// A playable audio file of the listed folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongEntry {
    /// File name, extension included. Tags are not read.
    pub title: String,
    /// Where to fetch the song, e.g. `"/music/Nightwish/7 Days to the Wolves.ogg"`.
    pub uri: String,
}

/// Everything a folder listing returns. Order follows the directory read
/// and is not stable across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderContents {
    pub folders: Vec<FolderEntry>,
    pub songs: Vec<SongEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExploreError {
    #[error("could not read the {folder} directory: {source}")]
    ReadDir {
        folder: String,
        #[source]
        source: io::Error,
    },
}

impl ExploreError {
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            ExploreError::ReadDir { source, .. } => source.kind(),
        }
    }
}

/// Lists library folders and sorts their children into folders and songs.
///
/// Containment is the injected [`LibraryFs`]'s job; the explorer only
/// normalizes the folder path so the paths it reports match what was read.
#[derive(Clone)]
pub struct LibraryExplorer {
    fs: Arc<dyn LibraryFs>,
    mount: String,
}

impl LibraryExplorer {
    /// `mount` is the URI prefix songs are served under. It always ends up
    /// with one leading slash and no trailing one.
    pub fn new(fs: Arc<dyn LibraryFs>, mount: &str) -> Self {
        let mount = format!("/{}", mount.trim_matches('/'));
        Self { fs, mount }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// List the immediate children of `folder_path`. `"."` (or `""`) is the
    /// library root.
    ///
    /// Either the whole listing succeeds or an error comes back; there are no
    /// partial results.
    pub async fn list_contents(&self, folder_path: &str) -> Result<FolderContents, ExploreError> {
        let folder = normalize(folder_path);
        let entries = self
            .fs
            .read_dir(&folder)
            .await
            .map_err(|source| ExploreError::ReadDir {
                folder: folder.clone(),
                source,
            })?;

        let mut contents = FolderContents::default();
        for entry in entries {
            let path = child(&folder, &entry.name);
            match entry.kind {
                EntryKind::Directory => contents.folders.push(FolderEntry {
                    name: entry.name,
                    path,
                }),
                EntryKind::File if is_song(&entry.name) => {
                    let uri = format!("{}/{}", self.mount, path);
                    contents.songs.push(SongEntry {
                        title: entry.name,
                        uri,
                    });
                }
                _ => tracing::trace!("Skipping {}", path),
            }
        }

        tracing::debug!(
            "Listed {}: {} folders, {} songs",
            folder,
            contents.folders.len(),
            contents.songs.len()
        );
        Ok(contents)
    }
}
