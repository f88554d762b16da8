//! The music library: path containment, filesystem access and folder listings.

pub mod explorer;
pub mod fs;
pub mod memory;
pub mod mime;
pub mod path;

pub use explorer::{ExploreError, FolderContents, FolderEntry, LibraryExplorer, SongEntry};
pub use fs::{EntryKind, LibraryEntry, LibraryFs, OpenedFile, OsLibraryFs};
pub use memory::MemoryLibraryFs;
pub use path::{LibraryRoot, PathContainer};
