//! Cryptography for file contents
//!
//! File contents are sealed with AES-256-GCM under a key derived from the
//! user's passphrase (see [`kdf`]). Ciphertext travels as
//! base64(nonce || ciphertext || tag) so it fits in the same string slot a
//! plaintext would occupy. With no key set, both directions are the identity
//! transform.
//!
//! Authentication means a wrong key or corrupted blob is always reported as
//! [`Error::Decrypt`], never returned as garbage plaintext. The re-key pass
//! relies on this.

mod kdf;

pub use kdf::{derive_key, generate_salt};

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use zeroize::Zeroizing;

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// GCM nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// KDF salt size in bytes
pub const SALT_SIZE: usize = 16;

/// A symmetric content key (zeroized on drop)
#[derive(Clone)]
pub struct CipherKey {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl CipherKey {
    /// Wrap raw key material
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        CipherKey {
            key: Zeroizing::new(bytes),
        }
    }

    /// Get the key bytes
    pub(crate) fn bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.write_str("CipherKey(..)")
    }
}

/// Encrypted blob: nonce + ciphertext (tag appended by GCM)
pub struct EncryptedBlob {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Serialize as raw bytes (nonce || ciphertext)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse from raw bytes (nonce || ciphertext)
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        if raw.len() < NONCE_SIZE {
            return Err(Error::Decrypt(format!(
                "Ciphertext too short: {} bytes, need at least {}",
                raw.len(),
                NONCE_SIZE
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&raw[..NONCE_SIZE]);

        Ok(EncryptedBlob {
            nonce,
            ciphertext: raw[NONCE_SIZE..].to_vec(),
        })
    }

    /// Serialize as a base64 text blob
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Parse from a base64 text blob
    pub fn from_base64(s: &str) -> Result<Self> {
        let raw = BASE64
            .decode(s)
            .map_err(|e| Error::Decrypt(format!("Invalid base64 ciphertext: {}", e)))?;
        Self::from_bytes(&raw)
    }
}

/// Encrypt raw bytes under a key with a fresh random nonce
pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Result<EncryptedBlob> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.bytes())
        .map_err(|_| Error::Encrypt("Invalid key length".to_string()))?;
    let sealing = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    sealing
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| Error::Encrypt("AEAD seal failed".to_string()))?;

    Ok(EncryptedBlob {
        nonce: nonce_bytes,
        ciphertext: in_out,
    })
}

/// Decrypt an encrypted blob
pub fn decrypt(key: &CipherKey, blob: &EncryptedBlob) -> Result<Vec<u8>> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.bytes())
        .map_err(|_| Error::Decrypt("Invalid key length".to_string()))?;
    let opening = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(blob.nonce);
    let mut in_out = blob.ciphertext.clone();
    let plaintext = opening
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            Error::Decrypt("Authentication failed (wrong key or corrupted data)".to_string())
        })?;

    Ok(plaintext.to_vec())
}

/// Encrypt a text blob under an optional key
///
/// Identity when no key is set.
pub fn encrypt_text(key: Option<&CipherKey>, plaintext: &str) -> Result<String> {
    match key {
        None => Ok(plaintext.to_string()),
        Some(key) => Ok(encrypt(key, plaintext.as_bytes())?.to_base64()),
    }
}

/// Decrypt a stored text blob under an optional key
///
/// Identity when no key is set.
pub fn decrypt_text(key: Option<&CipherKey>, stored: &str) -> Result<String> {
    match key {
        None => Ok(stored.to_string()),
        Some(key) => {
            let blob = EncryptedBlob::from_base64(stored)?;
            let plaintext = decrypt(key, &blob)?;
            String::from_utf8(plaintext)
                .map_err(|e| Error::Decrypt(format!("Plaintext is not valid UTF-8: {}", e)))
        }
    }
}
