use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::hash::HashInfo;
use super::manifest::ArtifactManifest;
use super::stable_id::{derive_stable_id, split_stable_id};
use crate::error::SealResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub verification: VerificationInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationInfo {
    pub timestamp: DateTime<Utc>,
    pub status: VerificationStatus,
    pub checks: VerificationChecks,
    pub artifact_info: ArtifactInfoSummary,
    pub signature_info: SignatureInfoSummary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Verified,
    Failed,
    /// All checks pass but the manifest carries no real timestamp proof
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChecks {
    pub manifest_structure: CheckResult,
    pub signature_valid: CheckResult,
    pub hash_match: CheckResult,
    pub custody_consistent: CheckResult,
    pub stable_id_match: CheckResult,
    pub timestamp_present: CheckResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckResult {
    Pass,
    Fail,
    Skip,
}

impl CheckResult {
    fn from_bool(ok: bool) -> Self {
        if ok {
            CheckResult::Pass
        } else {
            CheckResult::Fail
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfoSummary {
    #[serde(rename = "stableID")]
    pub stable_id: String,
    pub original_filename: String,
    pub byte_size: u64,
    pub sealed_at: DateTime<Utc>,
    pub operator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfoSummary {
    pub algorithm: String,
    pub public_key: String,
    pub verified_by: String,
}

pub struct Verifier;

impl Verifier {
    /// Verify a sealed artifact against its manifest and generate a report
    pub fn verify<P: AsRef<Path>>(
        manifest_path: P,
        artifact_path: P,
    ) -> SealResult<VerificationReport> {
        let manifest = ArtifactManifest::load(&manifest_path)?;

        let structure_ok = !manifest.schema_version.is_empty() && !manifest.custody.chain.is_empty();

        let signature_ok = manifest.verify_signature()?;

        let computed = HashInfo::from_file(&artifact_path)?;
        let hash_ok = computed.value == manifest.content_hash.value;

        let custody_ok = manifest.custody.is_consistent();

        // The identifier must re-derive from the declared type and stored hash.
        let stable_id_ok = match split_stable_id(&manifest.stable_id) {
            Some((namespace, _, _)) => {
                derive_stable_id(
                    namespace,
                    manifest.metadata.file_type,
                    &manifest.content_hash.value,
                ) == manifest.stable_id
            }
            None => false,
        };

        let timestamp_check = if manifest.timestamp.is_real() {
            CheckResult::Pass
        } else {
            CheckResult::Skip
        };

        let all_ok = structure_ok && signature_ok && hash_ok && custody_ok && stable_id_ok;
        let status = if !all_ok {
            VerificationStatus::Failed
        } else if timestamp_check == CheckResult::Skip {
            VerificationStatus::Warning
        } else {
            VerificationStatus::Verified
        };

        let sealed_at = manifest
            .custody
            .chain
            .first()
            .map(|e| e.timestamp)
            .unwrap_or(manifest.metadata.capture_date);

        Ok(VerificationReport {
            verification: VerificationInfo {
                timestamp: Utc::now(),
                status,
                checks: VerificationChecks {
                    manifest_structure: CheckResult::from_bool(structure_ok),
                    signature_valid: CheckResult::from_bool(signature_ok),
                    hash_match: CheckResult::from_bool(hash_ok),
                    custody_consistent: CheckResult::from_bool(custody_ok),
                    stable_id_match: CheckResult::from_bool(stable_id_ok),
                    timestamp_present: timestamp_check,
                },
                artifact_info: ArtifactInfoSummary {
                    stable_id: manifest.stable_id.clone(),
                    original_filename: manifest.metadata.original_filename.clone(),
                    byte_size: manifest.metadata.byte_size,
                    sealed_at,
                    operator: manifest.metadata.capture_operator.clone(),
                },
                signature_info: SignatureInfoSummary {
                    algorithm: manifest.signature.algorithm.clone(),
                    public_key: manifest.signature.public_key.clone(),
                    verified_by: format!("provseal v{}", env!("CARGO_PKG_VERSION")),
                },
            },
        })
    }

    /// Quick verification (just signature, no hash recomputation)
    pub fn verify_signature_only<P: AsRef<Path>>(manifest_path: P) -> SealResult<bool> {
        let manifest = ArtifactManifest::load(manifest_path)?;
        manifest.verify_signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seal::manifest::FileType;
    use crate::seal::manifest_builder::ArtifactManifestBuilder;
    use crate::seal::signature::KeyManager;
    use crate::seal::timestamp::{LocalClockAuthority, TimestampAuthority, TimestampProof};
    use std::io::Write;
    use std::time::Duration;

    fn sealed_manifest_for(path: &Path, timestamped: bool) -> ArtifactManifest {
        let hash = HashInfo::from_file(path).unwrap();
        let size = std::fs::metadata(path).unwrap().len();
        let mut manifest = ArtifactManifestBuilder::new()
            .content_hash(hash)
            .file_type(FileType::Other)
            .original_filename(path.file_name().unwrap().to_string_lossy())
            .byte_size(size)
            .operator("Test Operator")
            .build()
            .unwrap();

        let key_manager = KeyManager::generate();
        manifest.sign(&key_manager, "Test Operator").unwrap();

        manifest.timestamp = if timestamped {
            let digest = manifest.signed_digest().unwrap();
            LocalClockAuthority
                .issue(&digest, Duration::from_secs(1))
                .unwrap()
        } else {
            TimestampProof::none()
        };
        manifest
    }

    #[test]
    fn test_verification_success() {
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"artifact content").unwrap();

        let manifest = sealed_manifest_for(artifact.path(), true);
        let manifest_file = tempfile::NamedTempFile::new().unwrap();
        manifest.save(manifest_file.path()).unwrap();

        let report = Verifier::verify(manifest_file.path(), artifact.path()).unwrap();
        assert_eq!(report.verification.status, VerificationStatus::Verified);
        assert_eq!(report.verification.checks.hash_match, CheckResult::Pass);
        assert_eq!(
            report.verification.checks.stable_id_match,
            CheckResult::Pass
        );
    }

    #[test]
    fn test_verification_warns_without_timestamp() {
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"artifact content").unwrap();

        let manifest = sealed_manifest_for(artifact.path(), false);
        let manifest_file = tempfile::NamedTempFile::new().unwrap();
        manifest.save(manifest_file.path()).unwrap();

        let report = Verifier::verify(manifest_file.path(), artifact.path()).unwrap();
        assert_eq!(report.verification.status, VerificationStatus::Warning);
        assert_eq!(
            report.verification.checks.timestamp_present,
            CheckResult::Skip
        );
    }

    #[test]
    fn test_verification_fails_with_tampered_artifact() {
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"original content").unwrap();

        let manifest = sealed_manifest_for(artifact.path(), true);
        let manifest_file = tempfile::NamedTempFile::new().unwrap();
        manifest.save(manifest_file.path()).unwrap();

        artifact.write_all(b" tampered").unwrap();
        artifact.flush().unwrap();

        let report = Verifier::verify(manifest_file.path(), artifact.path()).unwrap();
        assert_eq!(report.verification.status, VerificationStatus::Failed);
        assert_eq!(report.verification.checks.hash_match, CheckResult::Fail);
    }

    #[test]
    fn test_verification_fails_with_edited_manifest() {
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"artifact content").unwrap();

        let mut manifest = sealed_manifest_for(artifact.path(), true);
        manifest.metadata.capture_operator = "Someone Else".to_string();

        let manifest_file = tempfile::NamedTempFile::new().unwrap();
        manifest.save(manifest_file.path()).unwrap();

        let report = Verifier::verify(manifest_file.path(), artifact.path()).unwrap();
        assert_eq!(report.verification.status, VerificationStatus::Failed);
        assert_eq!(
            report.verification.checks.signature_valid,
            CheckResult::Fail
        );
    }

    #[test]
    fn test_verify_signature_only() {
        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        artifact.write_all(b"artifact content").unwrap();

        let manifest = sealed_manifest_for(artifact.path(), true);
        let manifest_file = tempfile::NamedTempFile::new().unwrap();
        manifest.save(manifest_file.path()).unwrap();

        assert!(Verifier::verify_signature_only(manifest_file.path()).unwrap());
    }
}
