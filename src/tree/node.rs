//! Node types: files and folders
//!
//! The serialized shape matches the desktop's JSON model: a file is
//! `{ "name": .., "content": .. }` and a folder is
//! `{ "name": .., "children": [..] }`, distinguished by which field is
//! present.

use serde::{Deserialize, Serialize};

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Leaf node with content
    File,
    /// Interior node with children
    Folder,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::File => f.write_str("file"),
            NodeKind::Folder => f.write_str("folder"),
        }
    }
}

/// A tree node: either a file or a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Interior node
    Folder(Folder),
    /// Leaf node
    File(File),
}

/// Leaf node holding a name and content string
///
/// `content` always holds the representation produced by the cipher under
/// the currently active key: ciphertext when a key is set, plaintext
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Item name, unique among siblings
    pub name: String,
    /// Stored content (cipher representation)
    pub content: String,
}

/// Interior node holding an ordered sequence of children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Item name, unique among siblings
    pub name: String,
    /// Children in insertion order (display order)
    pub children: Vec<Node>,
}

impl Node {
    /// The node's name
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => &file.name,
            Node::Folder(folder) => &folder.name,
        }
    }

    /// Rename the node in place
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Node::File(file) => file.name = name.into(),
            Node::Folder(folder) => folder.name = name.into(),
        }
    }

    /// The node's kind
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Folder(_) => NodeKind::Folder,
        }
    }

    /// True for folders
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    /// Borrow as a folder
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }

    /// Borrow as a file
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }
}

impl File {
    /// Create a file with the given stored content
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        File {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl Folder {
    /// Create an empty folder
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Index of the child with the given name
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name() == name)
    }

    /// Borrow the child with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Mutably borrow the child with the given name
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name() == name)
    }

    /// Whether a child with the given name exists
    pub fn has_child(&self, name: &str) -> bool {
        self.child_index(name).is_some()
    }

    /// Total number of files reachable from this folder
    pub fn file_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::File(_) => 1,
                Node::Folder(folder) => folder.file_count(),
            })
            .sum()
    }
}
