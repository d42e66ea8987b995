//! Traversal check for names coming out of an untrusted index
//!
//! A name is only written below the destination root if all of these hold:
//!
//! - no `..` segment, with either `/` or `\` as separator
//! - not absolute on either convention (leading `/`, leading `\`, drive prefix)
//! - the lexically normalized `root/name` still starts with the normalized root
//!
//! The check never touches the filesystem.

use std::path::{Component, Path, PathBuf};

pub fn is_safe(root: &Path, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    if name.split(['/', '\\']).any(|segment| segment == "..") {
        return false;
    }

    if name.starts_with(['/', '\\']) || Path::new(name).has_root() || has_drive_prefix(name) {
        return false;
    }

    let Ok(root) = std::path::absolute(root) else {
        return false;
    };
    let root = normalize(&root);
    let target = normalize(&root.join(name));

    target != root && target.starts_with(&root)
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
        || Path::new(name)
            .components()
            .any(|component| matches!(component, Component::Prefix(_)))
}

/// Resolve `.` and `..` without following symlinks
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}
