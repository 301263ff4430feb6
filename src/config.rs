//! Configuration management for deskfs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum path depth (segments from root)
pub const DEFAULT_MAX_PATH_DEPTH: usize = 64;

/// Default maximum item name length in bytes
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tree shape limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Encryption configuration
    #[serde(default)]
    pub encryption: EncryptionConfig,
}

/// Limits on names and paths
///
/// The reference desktop imposed no limits at all; these bound caller-supplied
/// strings to keep resolution and display sane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of path segments from the root
    pub max_path_depth: usize,

    /// Maximum item name length in bytes
    pub max_name_len: usize,
}

/// Encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_iterations: u32,

    /// Argon2 parallelism
    pub argon2_parallelism: u32,

    /// Salt for key derivation (generated per session if not set)
    #[serde(with = "hex_serde", default)]
    pub salt: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            limits: LimitsConfig::default(),
            encryption: EncryptionConfig::default(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        EncryptionConfig {
            argon2_memory_kib: 65536, // 64 MiB
            argon2_iterations: 3,
            argon2_parallelism: 4,
            salt: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file, with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(depth) = std::env::var("DESKFS_MAX_PATH_DEPTH") {
            if let Ok(depth) = depth.trim().parse::<usize>() {
                self.limits.max_path_depth = depth;
            }
        }

        if let Ok(len) = std::env::var("DESKFS_MAX_NAME_LEN") {
            if let Ok(len) = len.trim().parse::<usize>() {
                self.limits.max_name_len = len;
            }
        }

        if let Ok(memory) = std::env::var("DESKFS_ARGON2_MEMORY_KIB") {
            if let Ok(memory) = memory.trim().parse::<u32>() {
                self.encryption.argon2_memory_kib = memory;
            }
        }

        if let Ok(iterations) = std::env::var("DESKFS_ARGON2_ITERATIONS") {
            if let Ok(iterations) = iterations.trim().parse::<u32>() {
                self.encryption.argon2_iterations = iterations;
            }
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_path_depth == 0 {
            return Err(Error::InvalidConfig(
                "Maximum path depth must be greater than 0".to_string(),
            ));
        }

        if self.limits.max_name_len == 0 {
            return Err(Error::InvalidConfig(
                "Maximum name length must be greater than 0".to_string(),
            ));
        }

        if self.encryption.argon2_memory_kib == 0
            || self.encryption.argon2_iterations == 0
            || self.encryption.argon2_parallelism == 0
        {
            return Err(Error::InvalidConfig(
                "Argon2 parameters must be greater than 0".to_string(),
            ));
        }

        if !self.encryption.salt.is_empty()
            && self.encryption.salt.len() < crate::crypto::SALT_SIZE
        {
            return Err(Error::InvalidConfig(format!(
                "Salt must be at least {} bytes",
                crate::crypto::SALT_SIZE
            )));
        }

        Ok(())
    }
}

/// Hex serialization for byte arrays
mod hex_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Vec::new());
        }
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
