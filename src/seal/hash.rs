use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{SealError, SealResult};

/// Length of the vault bucket prefix, in hex characters.
pub const BUCKET_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashInfo {
    pub algorithm: String,
    pub value: String,
}

impl HashInfo {
    /// Calculate SHA-256 hash of a file, streaming its full byte content.
    ///
    /// The digest depends only on the bytes, never on filesystem metadata.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SealResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SealError::FileNotFound(path.to_path_buf())
            } else {
                SealError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = file.read(&mut buffer).map_err(|source| SealError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Self {
            algorithm: "SHA-256".to_string(),
            value: hex::encode(hasher.finalize()),
        })
    }

    /// Calculate SHA-256 hash of data in memory
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            algorithm: "SHA-256".to_string(),
            value: hex::encode(hasher.finalize()),
        }
    }

    /// Recompute the file's hash and compare against this value
    pub fn verify_file<P: AsRef<Path>>(&self, path: P) -> SealResult<bool> {
        let computed = Self::from_file(path)?;
        Ok(computed.value == self.value)
    }

    /// Leading hex characters used as the vault bucket name
    pub fn bucket_prefix(&self) -> &str {
        &self.value[..BUCKET_PREFIX_LEN.min(self.value.len())]
    }
}
