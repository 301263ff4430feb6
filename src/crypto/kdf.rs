//! Key derivation using Argon2id
//!
//! Passphrases supplied through the desktop's lock dialog are stretched into
//! AES keys with Argon2id, which resists both side-channel and GPU attacks.
//! Derivation is deterministic for a given (passphrase, salt, parameters)
//! triple, so re-deriving the same passphrase within a session yields the
//! same key.

use crate::config::EncryptionConfig;
use crate::crypto::{CipherKey, KEY_SIZE, SALT_SIZE};
use crate::error::{Error, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

/// Derive a content key from a passphrase using Argon2id
///
/// # Arguments
/// * `passphrase` - The passphrase to derive from
/// * `salt` - Salt bytes (at least `SALT_SIZE` long)
/// * `config` - Encryption configuration with Argon2 parameters
pub fn derive_key(passphrase: &str, salt: &[u8], config: &EncryptionConfig) -> Result<CipherKey> {
    if salt.len() < SALT_SIZE {
        return Err(Error::KeyDerivation(format!(
            "Salt too short: {} bytes, need {}",
            salt.len(),
            SALT_SIZE
        )));
    }

    let params = Params::new(
        config.argon2_memory_kib,
        config.argon2_iterations,
        config.argon2_parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| Error::KeyDerivation(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key_bytes = Zeroizing::new([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt[..SALT_SIZE], key_bytes.as_mut())
        .map_err(|e| Error::KeyDerivation(format!("Key derivation failed: {}", e)))?;

    Ok(CipherKey::from_bytes(*key_bytes))
}

/// Generate a random salt
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
