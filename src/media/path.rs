use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The directory every library path resolves under.
///
/// Built once at startup and shared read-only by every component that needs
/// it. The path is always absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoot(PathBuf);

#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("library root must be an absolute path: {0}")]
    NotAbsolute(PathBuf),
    #[error("cannot access library root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("library root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl LibraryRoot {
    /// Wrap an absolute path without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RootError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(RootError::NotAbsolute(path));
        }
        Ok(Self(path))
    }

    /// Canonicalize `path` and check that it names an existing directory.
    /// Used at startup, where the root comes from configuration.
    pub fn discover(path: &Path) -> Result<Self, RootError> {
        let canonical = std::fs::canonicalize(path).map_err(|source| RootError::Io {
            path: path.to_owned(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(RootError::NotADirectory(canonical));
        }
        Ok(Self(canonical))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Joins untrusted relative paths onto a [`LibraryRoot`].
///
/// The join is purely lexical: no I/O, no symlink resolution. Any input that
/// would climb above the root is clamped to the root itself rather than
/// rejected, so [`PathContainer::join`] cannot fail.
#[derive(Debug, Clone)]
pub struct PathContainer {
    root: Arc<LibraryRoot>,
}

impl PathContainer {
    pub fn new(root: Arc<LibraryRoot>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Resolve `relative` under the root. The result is the root or one of
    /// its descendants, never an ancestor or a sibling.
    pub fn join(&self, relative: &str) -> PathBuf {
        let mut resolved = self.root.path().to_path_buf();
        if let Some(segments) = clean_segments(relative) {
            resolved.extend(segments);
        }
        resolved
    }
}

/// Lexically clean `relative` into its segments, collapsing `.` and `..`.
/// Returns `None` when the cleaned path still starts by ascending, which is
/// the case the container clamps to the root.
fn clean_segments(relative: &str) -> Option<Vec<&str>> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    if segments.first() == Some(&"..") {
        return None;
    }
    Some(segments)
}

/// The clamped, cleaned form of `relative` as a library-relative string.
/// The root itself is `"."`.
pub fn normalize(relative: &str) -> String {
    match clean_segments(relative) {
        Some(segments) if !segments.is_empty() => segments.join("/"),
        _ => ".".to_string(),
    }
}

/// Library-relative path of `name` inside the already normalized `folder`.
pub fn child(folder: &str, name: &str) -> String {
    if folder == "." {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_inner_ascension() {
        assert_eq!(clean_segments("a/b/../c"), Some(vec!["a", "c"]));
        assert_eq!(clean_segments("./a//b/./"), Some(vec!["a", "b"]));
    }

    #[test]
    fn clean_reports_escape() {
        assert_eq!(clean_segments(".."), None);
        assert_eq!(clean_segments("../../x"), None);
        assert_eq!(clean_segments("a/../../b"), None);
    }

    #[test]
    fn leading_slash_is_relative() {
        assert_eq!(clean_segments("/etc/passwd"), Some(vec!["etc", "passwd"]));
    }
}
