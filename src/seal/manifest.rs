use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::hash::HashInfo;
use super::signature::{KeyManager, SignatureInfo};
use super::timestamp::TimestampProof;
use crate::error::{SealError, SealResult};

/// Manifest format version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Custody role recorded for the sealing operator
pub const ROLE_CUSTODIAN: &str = "CUSTODIAN";

/// Custody action recorded at seal time
pub const ACTION_SEALED: &str = "SEALED";

/// Closed set of declared artifact types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Screenshot,
    Video,
    Audio,
    Document,
    Log,
    Dataset,
    Other,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Screenshot => "SCREENSHOT",
            FileType::Video => "VIDEO",
            FileType::Audio => "AUDIO",
            FileType::Document => "DOCUMENT",
            FileType::Log => "LOG",
            FileType::Dataset => "DATASET",
            FileType::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> SealResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "SCREENSHOT" => Ok(FileType::Screenshot),
            "VIDEO" => Ok(FileType::Video),
            "AUDIO" => Ok(FileType::Audio),
            "DOCUMENT" => Ok(FileType::Document),
            "LOG" => Ok(FileType::Log),
            "DATASET" => Ok(FileType::Dataset),
            "OTHER" => Ok(FileType::Other),
            other => Err(SealError::Validation(format!(
                "unknown file type '{}' (expected one of SCREENSHOT, VIDEO, AUDIO, DOCUMENT, LOG, DATASET, OTHER)",
                other
            ))),
        }
    }
}

/// Closed set of sensitivity levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensitivityLevel {
    Public,
    Internal,
    Confidential,
    Restricted,
    Secret,
}

impl SensitivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityLevel::Public => "PUBLIC",
            SensitivityLevel::Internal => "INTERNAL",
            SensitivityLevel::Confidential => "CONFIDENTIAL",
            SensitivityLevel::Restricted => "RESTRICTED",
            SensitivityLevel::Secret => "SECRET",
        }
    }

    pub fn parse(s: &str) -> SealResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "PUBLIC" => Ok(SensitivityLevel::Public),
            "INTERNAL" => Ok(SensitivityLevel::Internal),
            "CONFIDENTIAL" => Ok(SensitivityLevel::Confidential),
            "RESTRICTED" => Ok(SensitivityLevel::Restricted),
            "SECRET" => Ok(SensitivityLevel::Secret),
            other => Err(SealError::Validation(format!(
                "unknown sensitivity level '{}' (expected one of PUBLIC, INTERNAL, CONFIDENTIAL, RESTRICTED, SECRET)",
                other
            ))),
        }
    }
}

impl Default for SensitivityLevel {
    fn default() -> Self {
        SensitivityLevel::Restricted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub file_type: FileType,
    pub original_filename: String,
    pub byte_size: u64,
    pub capture_date: DateTime<Utc>,
    pub capture_operator: String,
    pub sensitivity_level: SensitivityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustodyEvent {
    pub party: String,
    pub role: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Append-only custody log. Entries are never removed or reordered;
/// `current_custodian` always mirrors the party of the final entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyRecord {
    pub chain: Vec<CustodyEvent>,
    pub current_custodian: String,
}

impl CustodyRecord {
    /// Single-entry chain recording the sealing operator
    pub fn initial(operator: &str, notes: Option<String>) -> Self {
        let event = CustodyEvent {
            party: operator.to_string(),
            role: ROLE_CUSTODIAN.to_string(),
            action: ACTION_SEALED.to_string(),
            timestamp: Utc::now(),
            notes,
        };
        Self {
            current_custodian: event.party.clone(),
            chain: vec![event],
        }
    }

    /// Append a later custody event, keeping `current_custodian` in sync
    pub fn append(&mut self, event: CustodyEvent) {
        self.current_custodian = event.party.clone();
        self.chain.push(event);
    }

    pub fn is_consistent(&self) -> bool {
        match self.chain.last() {
            Some(last) => last.party == self.current_custodian,
            None => false,
        }
    }
}

/// The signed, hashed, timestamped record describing a sealed artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactManifest {
    pub schema_version: String,
    #[serde(rename = "stableID")]
    pub stable_id: String,
    pub content_hash: HashInfo,
    pub metadata: ArtifactMetadata,
    pub custody: CustodyRecord,
    pub signature: SignatureInfo,
    pub timestamp: TimestampProof,
}

impl ArtifactManifest {
    /// Canonical bytes covered by the signature: the manifest with the
    /// signature and timestamp fields zeroed. The timestamp proof is issued
    /// after signing (over the signed manifest's digest), so it cannot be
    /// part of the signed content.
    pub fn signable_data(&self) -> SealResult<Vec<u8>> {
        let mut copy = self.clone();
        copy.signature = SignatureInfo::placeholder();
        copy.timestamp = TimestampProof::unsigned_placeholder();
        Ok(serde_json::to_vec(&copy)?)
    }

    /// Sign the manifest on behalf of the named signer
    pub fn sign(&mut self, key_manager: &KeyManager, signer: &str) -> SealResult<()> {
        let data = self.signable_data()?;
        self.signature = key_manager.sign(&data, signer);
        Ok(())
    }

    /// Verify the manifest signature
    pub fn verify_signature(&self) -> SealResult<bool> {
        if self.signature.is_placeholder() {
            return Ok(false);
        }
        let data = self.signable_data()?;
        KeyManager::verify(&self.signature.public_key, &self.signature.value, &data)
    }

    /// SHA-256 digest of the signed manifest bytes (signature included,
    /// timestamp zeroed) — the input to the timestamp authority.
    pub fn signed_digest(&self) -> SealResult<[u8; 32]> {
        let mut copy = self.clone();
        copy.timestamp = TimestampProof::unsigned_placeholder();
        let bytes = serde_json::to_vec(&copy)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hasher.finalize().into())
    }

    /// Save the manifest as pretty JSON. Written to a temporary sibling and
    /// renamed into place so a partial manifest is never observable.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SealResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp_path = std::path::PathBuf::from(tmp);

        fs::write(&tmp_path, json).map_err(|source| SealError::WriteFailed {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| SealError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Load a manifest from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> SealResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SealError::FileNotFound(path.to_path_buf())
            } else {
                SealError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
