use std::path::{Path, PathBuf};
use std::sync::Arc;

use mike::media::path::{child, normalize};
use mike::media::{LibraryRoot, PathContainer};

const ROOT: &str = "/path/to/app/assets";

fn container() -> PathContainer {
    PathContainer::new(Arc::new(LibraryRoot::new(ROOT).unwrap()))
}

#[test]
fn joins_relative_paths_under_the_root() {
    assert_eq!(container().join("./style.css"), PathBuf::from("/path/to/app/assets/style.css"));
}

#[test]
fn joins_nested_paths_under_the_root() {
    assert_eq!(
        container().join("./sub/dir/style.css"),
        PathBuf::from("/path/to/app/assets/sub/dir/style.css")
    );
}

#[test]
fn single_ascension_clamps_to_the_root() {
    assert_eq!(container().join("../style.css"), PathBuf::from(ROOT));
}

#[test]
fn ascension_after_subdirectories_clamps_to_the_root() {
    assert_eq!(container().join("./sub/dir/../../../style.css"), PathBuf::from(ROOT));
}

#[test]
fn deeper_and_bare_ascensions_clamp_to_the_root() {
    assert_eq!(container().join(".."), PathBuf::from(ROOT));
    assert_eq!(container().join("../../etc/passwd"), PathBuf::from(ROOT));
    assert_eq!(container().join("a/../../b"), PathBuf::from(ROOT));
}

#[test]
fn empty_and_dot_resolve_to_the_root() {
    assert_eq!(container().join(""), PathBuf::from(ROOT));
    assert_eq!(container().join("."), PathBuf::from(ROOT));
}

#[test]
fn absolute_input_is_treated_as_relative() {
    assert_eq!(container().join("/etc/passwd"), PathBuf::from("/path/to/app/assets/etc/passwd"));
}

#[test]
fn resolved_paths_never_leave_the_root() {
    let inputs = [
        "Yoko Kanno/Cowboy Bebop/Tank!.flac",
        "a/./b/../c",
        "./../x",
        "x/../../../..",
        "x/y/../../..//z",
        "...",
        "..a/b",
        "/",
        "//..//..",
    ];
    let root = Path::new(ROOT);
    for input in inputs {
        let resolved = container().join(input);
        assert!(resolved.starts_with(root), "{input} resolved to {}", resolved.display());
    }
}

#[test]
fn dotted_names_are_not_ascensions() {
    assert_eq!(container().join("..."), PathBuf::from("/path/to/app/assets/..."));
    assert_eq!(container().join("..a/b"), PathBuf::from("/path/to/app/assets/..a/b"));
}

#[test]
fn library_root_must_be_absolute() {
    assert!(LibraryRoot::new("relative/music").is_err());
}

#[test]
fn normalize_reports_root_as_dot() {
    assert_eq!(normalize(""), ".");
    assert_eq!(normalize("./"), ".");
    assert_eq!(normalize("../Sub Folder"), ".");
    assert_eq!(normalize("Sub Folder/./against/"), "Sub Folder/against");
}

#[test]
fn child_of_root_is_a_bare_name() {
    assert_eq!(child(".", "ability"), "ability");
    assert_eq!(child("Sub Folder", "against"), "Sub Folder/against");
}
