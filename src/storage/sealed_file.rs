// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed secure store with AES-256-GCM sealed values.
//!
//! Each value is sealed with a fresh random nonce and the storage key as
//! associated data, so a ciphertext copied under a different key fails to
//! open. The file holds `base64(nonce || ciphertext || tag)` per key.

use super::{SecureStore, StoreError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: FILE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Secure store persisted as a single sealed JSON file.
pub struct SealedFileStore {
    path: PathBuf,
    key: LessSafeKey,
    rng: SystemRandom,
    /// Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl SealedFileStore {
    /// Open (or lazily create) a store at `path` sealed with a 32-byte key.
    pub fn new(path: impl Into<PathBuf>, key: &[u8]) -> Result<Self, StoreError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| StoreError::Crypto("store key must be 32 bytes".to_string()))?;

        Ok(Self {
            path: path.into(),
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };

        let file: StoreFile = serde_json::from_str(&raw)?;
        if file.version != FILE_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported store version {}",
                file.version
            )));
        }
        Ok(file)
    }

    fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(file)?)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn seal(&self, key: &str, value: &str) -> Result<String, StoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StoreError::Crypto("failed to generate nonce".to_string()))?;

        let mut in_out = value.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(key.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| StoreError::Crypto("seal failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(sealed))
    }

    fn open(&self, key: &str, sealed_b64: &str) -> Result<String, StoreError> {
        let sealed = BASE64
            .decode(sealed_b64)
            .map_err(|e| StoreError::Corrupt(format!("{key}: {e}")))?;
        if sealed.len() < NONCE_LEN {
            return Err(StoreError::Corrupt(format!("{key}: value too short")));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StoreError::Corrupt(format!("{key}: bad nonce")))?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(key.as_bytes()), &mut in_out)
            .map_err(|_| StoreError::Crypto(format!("{key}: authentication failed")))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| StoreError::Corrupt(format!("{key}: {e}")))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

impl SecureStore for SealedFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let file = self.load()?;
        file.entries
            .get(key)
            .map(|sealed| self.open(key, sealed))
            .transpose()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.load()?;
        file.entries.insert(key.to_string(), self.seal(key, value)?);
        self.save(&file)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.load()?;
        if file.entries.remove(key).is_some() {
            self.save(&file)?;
        }
        Ok(())
    }
}
