//! The virtual file store
//!
//! `FileStore` owns the tree and the encryption state and enforces the
//! single-writer model through `&mut self`; `SharedStore` wraps it for
//! multi-threaded embeddings.

mod filesystem;
mod shared;

pub use filesystem::{DirEntry, FileStore};
pub use shared::SharedStore;
