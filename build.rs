use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let version = describe().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=GIT_VERSION={version}");
}

/// `git describe` output with the leading `v` of release tags dropped.
/// Untagged checkouts report `<pkg version>+g<hash>`.
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags", "--match", "v[0-9]*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let raw = String::from_utf8(output.stdout).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.strip_prefix('v') {
        Some(tagged) => Some(tagged.to_string()),
        None => Some(format!("{}+g{raw}", env!("CARGO_PKG_VERSION"))),
    }
}
