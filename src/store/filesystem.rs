//! File store operations
//!
//! The operation set consumed by the desktop applications: the explorer and
//! editor go through the create/rename/update surface, the terminal through
//! `list_dir` and `read_file`, and the lock screen through `set_encryption`.
//!
//! Every mutation either succeeds or leaves the store observably unchanged.
//! The one nuance is create-path auto-vivification: a creating operation may
//! only fail after validation and before any folder is inserted (see
//! `tree::path::resolve_create`), or on a duplicate final name, which can
//! only happen when the whole path pre-existed.

use crate::config::Config;
use crate::crypto::{self, CipherKey, SALT_SIZE};
use crate::error::{Error, Result};
use crate::tree::path::{self, display_path};
use crate::tree::{File, Folder, Node, NodeKind};
use tracing::{debug, info};

/// Directory entry returned by `list_dir`, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Item name
    pub name: String,
    /// File or folder
    pub kind: NodeKind,
}

/// Active encryption state: the derived key (if locked) plus the KDF salt
struct EncryptionState {
    key: Option<CipherKey>,
    salt: [u8; SALT_SIZE],
}

/// In-memory hierarchical file store for one desktop session
pub struct FileStore {
    config: Config,
    root: Folder,
    encryption: EncryptionState,
}

impl FileStore {
    /// Create an empty store (a root folder with no children)
    ///
    /// The KDF salt is taken from the configuration when set, otherwise
    /// generated fresh for the session.
    pub fn new(config: Config) -> Self {
        let salt = if config.encryption.salt.len() >= SALT_SIZE {
            let mut salt = [0u8; SALT_SIZE];
            salt.copy_from_slice(&config.encryption.salt[..SALT_SIZE]);
            salt
        } else {
            crypto::generate_salt()
        };

        FileStore {
            config,
            root: Folder::new("root"),
            encryption: EncryptionState { key: None, salt },
        }
    }

    /// Whether a content key is currently active
    pub fn is_encrypted(&self) -> bool {
        self.encryption.key.is_some()
    }

    /// Create an empty file named `name` under `path`
    ///
    /// Missing intermediate folders are created on the way down. Rejects a
    /// sibling name collision with `DuplicateName`.
    pub fn create_file(&mut self, path: &[String], name: &str) -> Result<()> {
        path::validate_name(name, &self.config.limits)?;
        let content = crypto::encrypt_text(self.encryption.key.as_ref(), "")?;

        let folder = path::resolve_create(&mut self.root, path, &self.config.limits)?;
        if folder.has_child(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        folder.children.push(Node::File(File::new(name, content)));
        debug!(path = %display_path(path), name, "created file");
        Ok(())
    }

    /// Create an empty folder named `name` under `path`
    pub fn create_folder(&mut self, path: &[String], name: &str) -> Result<()> {
        path::validate_name(name, &self.config.limits)?;

        let folder = path::resolve_create(&mut self.root, path, &self.config.limits)?;
        if folder.has_child(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }

        folder.children.push(Node::Folder(Folder::new(name)));
        debug!(path = %display_path(path), name, "created folder");
        Ok(())
    }

    /// Remove the item addressed by `path`
    ///
    /// Removing a folder discards all of its descendants.
    pub fn delete_item(&mut self, path: &[String]) -> Result<()> {
        let (parent, last) = path::locate_parent(&mut self.root, path)?;
        let idx = parent
            .child_index(last)
            .ok_or_else(|| Error::NotFound(display_path(path)))?;

        parent.children.remove(idx);
        debug!(path = %display_path(path), "deleted item");
        Ok(())
    }

    /// Rename the item addressed by `path` in place
    ///
    /// Children of a renamed folder are untouched. Rejects a sibling name
    /// collision with `DuplicateName`; renaming an item to its own name is a
    /// no-op.
    pub fn rename_item(&mut self, path: &[String], new_name: &str) -> Result<()> {
        path::validate_name(new_name, &self.config.limits)?;

        let (parent, last) = path::locate_parent(&mut self.root, path)?;
        if new_name != last && parent.has_child(new_name) {
            return Err(Error::DuplicateName(new_name.to_string()));
        }

        let child = parent
            .child_mut(last)
            .ok_or_else(|| Error::NotFound(display_path(path)))?;
        child.set_name(new_name);
        debug!(path = %display_path(path), new_name, "renamed item");
        Ok(())
    }

    /// Replace the content of the file addressed by `path`
    ///
    /// The plaintext is stored in the representation of the currently active
    /// key. Addressing a folder is `NotAFile`.
    pub fn update_file_content(&mut self, path: &[String], content: &str) -> Result<()> {
        let stored = crypto::encrypt_text(self.encryption.key.as_ref(), content)?;

        let (parent, last) = path::locate_parent(&mut self.root, path)?;
        match parent.child_mut(last) {
            Some(Node::File(file)) => {
                file.content = stored;
                debug!(path = %display_path(path), "updated file content");
                Ok(())
            }
            Some(Node::Folder(_)) => Err(Error::NotAFile(display_path(path))),
            None => Err(Error::NotFound(display_path(path))),
        }
    }

    /// Read the file addressed by `path`, decrypted with the active key
    pub fn read_file(&self, path: &[String]) -> Result<String> {
        let file = path::locate_file(&self.root, path)?;
        crypto::decrypt_text(self.encryption.key.as_ref(), &file.content)
    }

    /// List the children of the folder addressed by `path`, in display order
    pub fn list_dir(&self, path: &[String]) -> Result<Vec<DirEntry>> {
        let folder = path::locate_folder(&self.root, path)?;
        Ok(folder
            .children
            .iter()
            .map(|child| DirEntry {
                name: child.name().to_string(),
                kind: child.kind(),
            })
            .collect())
    }

    /// Deep-cloned view of the whole tree for rendering
    ///
    /// File contents appear in their stored representation. The clone shares
    /// nothing with the live tree, so later mutations never alias into a
    /// snapshot.
    pub fn snapshot(&self) -> Folder {
        self.root.clone()
    }

    /// Change the active encryption key and re-key every file
    ///
    /// Derives the new key from `passphrase` (or clears it for `None`),
    /// then rebuilds the tree with every file's content transcoded
    /// `encrypt(new, decrypt(old, content))` — each file visited exactly
    /// once, meaning preserved. The rebuilt root is swapped in only when the
    /// whole pass succeeded; any decrypt failure leaves the store unchanged.
    pub fn set_encryption(&mut self, passphrase: Option<&str>) -> Result<()> {
        let new_key = match passphrase {
            Some(passphrase) => Some(crypto::derive_key(
                passphrase,
                &self.encryption.salt,
                &self.config.encryption,
            )?),
            None => None,
        };

        info!(
            files = self.root.file_count(),
            locked = new_key.is_some(),
            "re-keying file store"
        );

        let old_key = self.encryption.key.as_ref();
        let root = rekey_folder(&self.root, old_key, new_key.as_ref())?;

        self.root = root;
        self.encryption.key = new_key;
        info!("re-key complete");
        Ok(())
    }
}

/// Rebuild a folder with every file transcoded from `old` to `new`
fn rekey_folder(
    folder: &Folder,
    old: Option<&CipherKey>,
    new: Option<&CipherKey>,
) -> Result<Folder> {
    let mut children = Vec::with_capacity(folder.children.len());
    for child in &folder.children {
        children.push(match child {
            Node::File(file) => {
                let plaintext = crypto::decrypt_text(old, &file.content)?;
                let content = crypto::encrypt_text(new, &plaintext)?;
                Node::File(File::new(file.name.clone(), content))
            }
            Node::Folder(sub) => Node::Folder(rekey_folder(sub, old, new)?),
        });
    }

    Ok(Folder {
        name: folder.name.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        // Low-cost Argon2 for testing
        config.encryption.argon2_memory_kib = 1024;
        config.encryption.argon2_iterations = 1;
        config.encryption.argon2_parallelism = 1;
        config
    }

    fn store() -> FileStore {
        FileStore::new(test_config())
    }

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_file_auto_vivifies() {
        let mut fs = store();
        fs.create_file(&seg(&["a", "b"]), "f.txt").unwrap();

        let snapshot = fs.snapshot();
        let a = snapshot.child("a").unwrap().as_folder().unwrap();
        let b = a.child("b").unwrap().as_folder().unwrap();
        let file = b.child("f.txt").unwrap().as_file().unwrap();
        assert_eq!(file.content, "");
    }

    #[test]
    fn test_create_folder_then_file() {
        let mut fs = store();
        fs.create_folder(&[], "docs").unwrap();
        fs.create_file(&seg(&["docs"]), "a.txt").unwrap();

        let entries = fs.list_dir(&seg(&["docs"])).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, NodeKind::File);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut fs = store();
        fs.create_file(&[], "a").unwrap();
        assert!(matches!(
            fs.create_file(&[], "a"),
            Err(Error::DuplicateName(_))
        ));
        assert!(matches!(
            fs.create_folder(&[], "a"),
            Err(Error::DuplicateName(_))
        ));
    }

    #[test]
    fn test_delete_missing_path_leaves_store_unchanged() {
        let mut fs = store();
        fs.create_file(&[], "keep.txt").unwrap();
        let before = fs.snapshot();

        assert!(matches!(
            fs.delete_item(&seg(&["x", "y"])),
            Err(Error::NotFound(_))
        ));
        assert_eq!(fs.snapshot(), before);
    }

    #[test]
    fn test_delete_folder_discards_descendants() {
        let mut fs = store();
        fs.create_file(&seg(&["docs", "sub"]), "deep.txt").unwrap();
        fs.delete_item(&seg(&["docs"])).unwrap();

        assert!(fs.list_dir(&[]).unwrap().is_empty());
        assert!(fs.read_file(&seg(&["docs", "sub", "deep.txt"])).is_err());
    }

    #[test]
    fn test_rename_preserves_children() {
        let mut fs = store();
        fs.create_file(&seg(&["docs"]), "a.txt").unwrap();
        fs.create_file(&seg(&["docs"]), "b.txt").unwrap();

        fs.rename_item(&seg(&["docs"]), "papers").unwrap();

        let entries = fs.list_dir(&seg(&["papers"])).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_rename_collision_rejected() {
        let mut fs = store();
        fs.create_file(&[], "a").unwrap();
        fs.create_file(&[], "b").unwrap();

        assert!(matches!(
            fs.rename_item(&seg(&["a"]), "b"),
            Err(Error::DuplicateName(_))
        ));
        // Renaming to the same name is a no-op, not a collision
        fs.rename_item(&seg(&["a"]), "a").unwrap();
    }

    #[test]
    fn test_update_on_folder_is_not_a_file() {
        let mut fs = store();
        fs.create_folder(&[], "docs").unwrap();
        assert!(matches!(
            fs.update_file_content(&seg(&["docs"]), "text"),
            Err(Error::NotAFile(_))
        ));
    }

    #[test]
    fn test_update_and_read_plaintext_mode() {
        let mut fs = store();
        fs.create_file(&seg(&["docs"]), "a.txt").unwrap();
        fs.update_file_content(&seg(&["docs", "a.txt"]), "hello").unwrap();

        assert_eq!(fs.read_file(&seg(&["docs", "a.txt"])).unwrap(), "hello");
        // Plaintext mode stores the content verbatim
        let snapshot = fs.snapshot();
        let docs = snapshot.child("docs").unwrap().as_folder().unwrap();
        assert_eq!(docs.child("a.txt").unwrap().as_file().unwrap().content, "hello");
    }

    #[test]
    fn test_update_while_locked_stores_ciphertext() {
        let mut fs = store();
        fs.create_file(&[], "a.txt").unwrap();
        fs.set_encryption(Some("k1")).unwrap();
        fs.update_file_content(&seg(&["a.txt"]), "secret").unwrap();

        let snapshot = fs.snapshot();
        let stored = &snapshot.child("a.txt").unwrap().as_file().unwrap().content;
        assert_ne!(stored, "secret");
        assert_eq!(fs.read_file(&seg(&["a.txt"])).unwrap(), "secret");
    }

    #[test]
    fn test_rekey_preserves_meaning() {
        let mut fs = store();
        fs.create_file(&seg(&["docs"]), "a.txt").unwrap();
        fs.update_file_content(&seg(&["docs", "a.txt"]), "hello").unwrap();

        fs.set_encryption(Some("k1")).unwrap();
        assert_eq!(fs.read_file(&seg(&["docs", "a.txt"])).unwrap(), "hello");

        fs.set_encryption(Some("k2")).unwrap();
        assert_eq!(fs.read_file(&seg(&["docs", "a.txt"])).unwrap(), "hello");

        // Back to plaintext
        fs.set_encryption(None).unwrap();
        assert!(!fs.is_encrypted());
        let snapshot = fs.snapshot();
        let docs = snapshot.child("docs").unwrap().as_folder().unwrap();
        assert_eq!(docs.child("a.txt").unwrap().as_file().unwrap().content, "hello");
    }

    #[test]
    fn test_rekey_touches_nested_files() {
        let mut fs = store();
        fs.create_file(&seg(&["a", "b", "c"]), "deep.txt").unwrap();
        fs.update_file_content(&seg(&["a", "b", "c", "deep.txt"]), "buried")
            .unwrap();
        fs.create_file(&[], "top.txt").unwrap();
        fs.update_file_content(&seg(&["top.txt"]), "surface").unwrap();

        fs.set_encryption(Some("k1")).unwrap();

        assert_eq!(
            fs.read_file(&seg(&["a", "b", "c", "deep.txt"])).unwrap(),
            "buried"
        );
        assert_eq!(fs.read_file(&seg(&["top.txt"])).unwrap(), "surface");
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut fs = store();
        fs.create_folder(&[], "docs").unwrap();
        fs.create_file(&seg(&["docs"]), "a.txt").unwrap();

        fs.set_encryption(Some("k1")).unwrap();
        fs.update_file_content(&seg(&["docs", "a.txt"]), "hello").unwrap();

        fs.set_encryption(Some("k2")).unwrap();
        assert_eq!(fs.read_file(&seg(&["docs", "a.txt"])).unwrap(), "hello");
    }

    #[test]
    fn test_snapshot_does_not_alias_live_tree() {
        let mut fs = store();
        fs.create_file(&[], "a.txt").unwrap();
        let snapshot = fs.snapshot();

        fs.delete_item(&seg(&["a.txt"])).unwrap();
        assert!(snapshot.has_child("a.txt"));
        assert!(fs.list_dir(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_root_cannot_be_deleted_or_renamed() {
        let mut fs = store();
        assert!(fs.delete_item(&[]).is_err());
        assert!(fs.rename_item(&[], "other").is_err());
    }

    #[test]
    fn test_create_file_while_locked_reads_back_empty() {
        let mut fs = store();
        fs.set_encryption(Some("k1")).unwrap();
        fs.create_file(&[], "new.txt").unwrap();
        assert_eq!(fs.read_file(&seg(&["new.txt"])).unwrap(), "");
    }
}
