use chrono::{DateTime, Utc};

use super::hash::HashInfo;
use super::manifest::{
    ArtifactManifest, ArtifactMetadata, CustodyRecord, FileType, SensitivityLevel, SCHEMA_VERSION,
};
use super::signature::SignatureInfo;
use super::stable_id::derive_stable_id;
use super::timestamp::TimestampProof;
use crate::error::{SealError, SealResult};

/// Builder for constructing ArtifactManifest instances with a fluent API
///
/// Produces an unsigned, untimestamped manifest; signing and timestamping
/// are explicit later steps.
pub struct ArtifactManifestBuilder {
    namespace: String,
    content_hash: Option<HashInfo>,
    file_type: Option<FileType>,
    original_filename: Option<String>,
    byte_size: Option<u64>,
    capture_date: Option<DateTime<Utc>>,
    operator: Option<String>,
    sensitivity: SensitivityLevel,
    description: Option<String>,
    capture_device: Option<String>,
    tags: Option<Vec<String>>,
    custody_notes: Option<String>,
}

impl ArtifactManifestBuilder {
    pub fn new() -> Self {
        Self {
            namespace: "artifact".to_string(),
            content_hash: None,
            file_type: None,
            original_filename: None,
            byte_size: None,
            capture_date: None,
            operator: None,
            sensitivity: SensitivityLevel::default(),
            description: None,
            capture_device: None,
            tags: None,
            custody_notes: None,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn content_hash(mut self, hash: HashInfo) -> Self {
        self.content_hash = Some(hash);
        self
    }

    pub fn file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn original_filename(mut self, name: impl Into<String>) -> Self {
        self.original_filename = Some(name.into());
        self
    }

    pub fn byte_size(mut self, size: u64) -> Self {
        self.byte_size = Some(size);
        self
    }

    pub fn capture_date(mut self, date: DateTime<Utc>) -> Self {
        self.capture_date = Some(date);
        self
    }

    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn sensitivity(mut self, level: SensitivityLevel) -> Self {
        self.sensitivity = level;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn capture_device(mut self, device: impl Into<String>) -> Self {
        self.capture_device = Some(device.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = if tags.is_empty() { None } else { Some(tags) };
        self
    }

    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        match &mut self.tags {
            Some(tags) => tags.push(tag),
            None => self.tags = Some(vec![tag]),
        }
        self
    }

    pub fn custody_notes(mut self, notes: impl Into<String>) -> Self {
        self.custody_notes = Some(notes.into());
        self
    }

    /// Build the ArtifactManifest instance
    ///
    /// # Errors
    /// Returns `SealError::Validation` if required fields are missing or invalid
    pub fn build(self) -> SealResult<ArtifactManifest> {
        let content_hash = self
            .content_hash
            .ok_or_else(|| SealError::Validation("content_hash is required".to_string()))?;
        let file_type = self
            .file_type
            .ok_or_else(|| SealError::Validation("file_type is required".to_string()))?;
        let original_filename = self
            .original_filename
            .ok_or_else(|| SealError::Validation("original_filename is required".to_string()))?;
        let byte_size = self
            .byte_size
            .ok_or_else(|| SealError::Validation("byte_size is required".to_string()))?;
        let operator = self
            .operator
            .ok_or_else(|| SealError::Validation("operator is required".to_string()))?;

        if operator.trim().is_empty() {
            return Err(SealError::Validation(
                "operator must be non-empty".to_string(),
            ));
        }
        if self.namespace.trim().is_empty() {
            return Err(SealError::Validation(
                "namespace must be non-empty".to_string(),
            ));
        }

        let stable_id = derive_stable_id(&self.namespace, file_type, &content_hash.value);
        let custody = CustodyRecord::initial(&operator, self.custody_notes);

        Ok(ArtifactManifest {
            schema_version: SCHEMA_VERSION.to_string(),
            stable_id,
            content_hash,
            metadata: ArtifactMetadata {
                file_type,
                original_filename,
                byte_size,
                capture_date: self.capture_date.unwrap_or_else(Utc::now),
                capture_operator: operator,
                sensitivity_level: self.sensitivity,
                description: self.description,
                capture_device: self.capture_device,
                tags: self.tags,
            },
            custody,
            signature: SignatureInfo::placeholder(),
            timestamp: TimestampProof::unsigned_placeholder(),
        })
    }
}

impl Default for ArtifactManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
