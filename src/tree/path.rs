//! Path resolution over the folder tree
//!
//! Two policies, matching how the desktop applications address the store:
//!
//! - **Create-path resolution** walks the path from the root and creates any
//!   missing intermediate folder on the way down. Used by the creating
//!   operations.
//! - **Locate-path resolution** walks all but the last segment and fails
//!   with `NotFound` when an intermediate segment is missing. Used by
//!   delete, rename and content updates.

use crate::config::LimitsConfig;
use crate::error::{Error, Result};
use crate::tree::node::{File, Folder, Node};
use tracing::debug;

/// Render a path for error messages and logs
pub fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", path.join("/"))
    }
}

/// Validate a single item name against the configured limits
pub fn validate_name(name: &str, limits: &LimitsConfig) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("name must not be empty".to_string()));
    }

    if name.len() > limits.max_name_len {
        return Err(Error::InvalidName(format!(
            "'{}' exceeds {} bytes",
            name, limits.max_name_len
        )));
    }

    if name.contains('/') || name.contains('\0') {
        return Err(Error::InvalidName(format!(
            "'{}' contains a reserved character",
            name
        )));
    }

    Ok(())
}

/// Validate every segment of a path and its depth
pub fn validate_path(path: &[String], limits: &LimitsConfig) -> Result<()> {
    if path.len() > limits.max_path_depth {
        return Err(Error::PathDepth {
            depth: path.len(),
            max: limits.max_path_depth,
        });
    }

    for segment in path {
        validate_name(segment, limits)?;
    }

    Ok(())
}

/// Create-path resolution: descend from `root`, creating missing folders.
///
/// Fails with `NotAFolder` when a segment names an existing file. A file can
/// only occupy a segment on the pre-existing prefix of the path, so no
/// folder has been created yet when that error is returned and the tree is
/// unchanged.
pub fn resolve_create<'a>(
    root: &'a mut Folder,
    path: &[String],
    limits: &LimitsConfig,
) -> Result<&'a mut Folder> {
    validate_path(path, limits)?;

    let mut current = root;
    for segment in path {
        let idx = match current.child_index(segment) {
            Some(idx) => idx,
            None => {
                debug!(folder = %segment, "auto-creating intermediate folder");
                current
                    .children
                    .push(Node::Folder(Folder::new(segment.clone())));
                current.children.len() - 1
            }
        };

        let folder = current;
        current = match folder.children.get_mut(idx) {
            Some(Node::Folder(next)) => next,
            _ => return Err(Error::NotAFolder(segment.clone())),
        };
    }

    Ok(current)
}

/// Locate-path resolution: walk all but the last segment.
///
/// Returns the parent folder and the final segment. The empty path (the
/// root itself) has no parent and is reported as `NotFound`; the root is
/// never deleted or renamed.
pub fn locate_parent<'a, 'p>(
    root: &'a mut Folder,
    path: &'p [String],
) -> Result<(&'a mut Folder, &'p str)> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| Error::NotFound("/".to_string()))?;

    let mut current = root;
    for segment in parents {
        let idx = current
            .child_index(segment)
            .ok_or_else(|| Error::NotFound(display_path(path)))?;

        let folder = current;
        current = match folder.children.get_mut(idx) {
            Some(Node::Folder(next)) => next,
            _ => return Err(Error::NotFound(display_path(path))),
        };
    }

    Ok((current, last.as_str()))
}

/// Read-only resolution of a folder by full path
pub fn locate_folder<'a>(root: &'a Folder, path: &[String]) -> Result<&'a Folder> {
    let mut current = root;
    for segment in path {
        current = match current.child(segment) {
            Some(Node::Folder(next)) => next,
            Some(Node::File(_)) => return Err(Error::NotAFolder(display_path(path))),
            None => return Err(Error::NotFound(display_path(path))),
        };
    }

    Ok(current)
}

/// Read-only resolution of a file by full path
pub fn locate_file<'a>(root: &'a Folder, path: &[String]) -> Result<&'a File> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| Error::NotAFile("/".to_string()))?;

    let folder = locate_folder(root, parents)?;
    match folder.child(last) {
        Some(Node::File(file)) => Ok(file),
        Some(Node::Folder(_)) => Err(Error::NotAFile(display_path(path))),
        None => Err(Error::NotFound(display_path(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("a.txt", &limits()).is_ok());
        assert!(validate_name("", &limits()).is_err());
        assert!(validate_name("a/b", &limits()).is_err());
        assert!(validate_name("a\0b", &limits()).is_err());
    }

    #[test]
    fn test_validate_name_length() {
        let tight = LimitsConfig {
            max_name_len: 4,
            ..limits()
        };
        assert!(validate_name("abcd", &tight).is_ok());
        assert!(validate_name("abcde", &tight).is_err());
    }

    #[test]
    fn test_validate_path_depth() {
        let tight = LimitsConfig {
            max_path_depth: 2,
            ..limits()
        };
        assert!(validate_path(&seg(&["a", "b"]), &tight).is_ok());
        assert!(matches!(
            validate_path(&seg(&["a", "b", "c"]), &tight),
            Err(Error::PathDepth { depth: 3, max: 2 })
        ));
    }

    #[test]
    fn test_resolve_create_vivifies_missing_folders() {
        let mut root = Folder::new("root");
        let target = resolve_create(&mut root, &seg(&["a", "b"]), &limits()).unwrap();
        assert_eq!(target.name, "b");

        let a = root.child("a").unwrap().as_folder().unwrap();
        assert!(a.has_child("b"));
    }

    #[test]
    fn test_resolve_create_reuses_existing_folders() {
        let mut root = Folder::new("root");
        resolve_create(&mut root, &seg(&["a"]), &limits()).unwrap();
        resolve_create(&mut root, &seg(&["a", "b"]), &limits()).unwrap();

        // "a" must not be duplicated by the second walk
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_resolve_create_rejects_file_segment() {
        let mut root = Folder::new("root");
        root.children.push(Node::File(File::new("a", "")));

        let result = resolve_create(&mut root, &seg(&["a", "b"]), &limits());
        assert!(matches!(result, Err(Error::NotAFolder(_))));
        // No folder was created before the conflict was detected
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_locate_parent_missing_intermediate() {
        let mut root = Folder::new("root");
        let path = seg(&["x", "y"]);
        let result = locate_parent(&mut root, &path);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_locate_parent_empty_path_is_not_found() {
        let mut root = Folder::new("root");
        assert!(matches!(
            locate_parent(&mut root, &[]),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_locate_folder_and_file() {
        let mut root = Folder::new("root");
        let docs = resolve_create(&mut root, &seg(&["docs"]), &limits()).unwrap();
        docs.children.push(Node::File(File::new("a.txt", "hi")));

        assert_eq!(locate_folder(&root, &seg(&["docs"])).unwrap().name, "docs");
        assert_eq!(
            locate_file(&root, &seg(&["docs", "a.txt"])).unwrap().content,
            "hi"
        );
        assert!(matches!(
            locate_file(&root, &seg(&["docs"])),
            Err(Error::NotAFile(_))
        ));
        assert!(matches!(
            locate_folder(&root, &seg(&["docs", "a.txt"])),
            Err(Error::NotAFolder(_))
        ));
    }
}
