//! Error types for deskfs

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by the file store and its supporting layers
#[derive(Debug, Error)]
pub enum Error {
    /// An item name failed validation (empty, too long, reserved character)
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A path exceeded the configured depth limit
    #[error("path depth {depth} exceeds maximum of {max}")]
    PathDepth { depth: usize, max: usize },

    /// Locate-path resolution failed: no such file or folder
    #[error("no such file or folder: {0}")]
    NotFound(String),

    /// A sibling with the same name already exists
    #[error("an item named '{0}' already exists in this folder")]
    DuplicateName(String),

    /// The addressed item is a folder where a file was expected
    #[error("not a file: {0}")]
    NotAFile(String),

    /// A path segment is occupied by a file where a folder was expected
    #[error("not a folder: {0}")]
    NotAFolder(String),

    /// AEAD sealing failed
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// AEAD opening failed (wrong key, corrupted or malformed ciphertext)
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// Argon2 key derivation failed
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Configuration could not be read or written
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration contents are invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}
