//! deskfs - In-memory encrypted virtual file store
//!
//! This library provides the hierarchical file store backing a simulated
//! desktop environment: a tree of named folders and files addressed by
//! ordered path, mutated through a small CRUD surface, with an optional
//! symmetric-encryption layer applied uniformly to all file contents.

pub mod config;
pub mod crypto;
pub mod error;
pub mod store;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::store::{DirEntry, FileStore, SharedStore};
    pub use crate::tree::{File, Folder, Node, NodeKind};
}
