//! Tree model for the virtual file store
//!
//! Folders own their children in insertion order; files are leaves holding a
//! name and a content string in whatever representation the active cipher
//! produces.

mod node;
pub(crate) mod path;

pub use node::{File, Folder, Node, NodeKind};
