use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{OperatingMode, SealConfig};
use crate::error::{SealError, SealResult};
use crate::seal::{
    keys, ArtifactManifest, ArtifactManifestBuilder, FileType, HashInfo, LocalClockAuthority,
    SensitivityLevel, TimestampClient, TimestampProof,
};
use crate::vault::{store_in_vault, VaultPaths};

/// One sealing invocation: one file in, one manifest out.
#[derive(Debug, Clone)]
pub struct SealRequest {
    pub file_path: PathBuf,
    /// Declared type tag; must belong to the closed `FileType` set.
    pub file_type: String,
    pub operator: String,
    pub description: Option<String>,
    pub capture_device: Option<String>,
    /// Defaults to RESTRICTED when absent.
    pub sensitivity: Option<String>,
    pub tags: Vec<String>,
    /// Manifest destination directory; defaults to the source file's parent.
    pub output_dir: Option<PathBuf>,
    pub copy_to_vault: bool,
    pub vault_root: Option<PathBuf>,
    pub skip_timestamp: bool,
    pub key_file: PathBuf,
}

#[derive(Debug)]
pub struct SealOutcome {
    pub manifest: ArtifactManifest,
    pub manifest_path: PathBuf,
    pub vault: Option<VaultPaths>,
}

/// Seal an artifact: validate, hash, build, sign, timestamp, persist, and
/// optionally copy into the vault. Any failure leaves no partial manifest.
pub fn seal_artifact(request: &SealRequest, config: &SealConfig) -> SealResult<SealOutcome> {
    // Validation comes first, before any file or key is touched.
    let file_type = FileType::parse(&request.file_type)?;
    let sensitivity = match &request.sensitivity {
        Some(s) => SensitivityLevel::parse(s)?,
        None => SensitivityLevel::default(),
    };
    if request.operator.trim().is_empty() {
        return Err(SealError::Validation("operator must be non-empty".to_string()));
    }
    if request.copy_to_vault && request.vault_root.is_none() {
        return Err(SealError::Validation(
            "vault root is required when copying to the vault".to_string(),
        ));
    }
    if request.skip_timestamp && config.mode == OperatingMode::Strict {
        return Err(SealError::Validation(
            "strict mode does not permit sealing without a timestamp proof".to_string(),
        ));
    }

    let file_path = &request.file_path;
    if !file_path.is_file() {
        return Err(SealError::FileNotFound(file_path.clone()));
    }

    let file_meta = fs::metadata(file_path).map_err(|source| SealError::ReadFailed {
        path: file_path.clone(),
        source,
    })?;
    let original_filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| SealError::Validation("input path has no filename".to_string()))?;

    debug!(file = %file_path.display(), "hashing artifact");
    let content_hash = HashInfo::from_file(file_path)?;

    let mut manifest = ArtifactManifestBuilder::new()
        .namespace(&config.namespace)
        .content_hash(content_hash)
        .file_type(file_type)
        .original_filename(original_filename)
        .byte_size(file_meta.len())
        .operator(&request.operator)
        .sensitivity(sensitivity)
        .tags(request.tags.clone())
        .custody_notes(format!("Sealed with provseal v{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    if let Some(description) = &request.description {
        manifest.metadata.description = Some(description.clone());
    }
    if let Some(device) = &request.capture_device {
        manifest.metadata.capture_device = Some(device.clone());
    }

    let key_manager = keys::load_or_generate(&request.key_file)?;
    manifest.sign(&key_manager, &request.operator)?;
    debug!(stable_id = %manifest.stable_id, "manifest signed");

    manifest.timestamp = if request.skip_timestamp {
        warn!("sealing without a timestamp proof; manifest will carry the NONE sentinel");
        TimestampProof::none()
    } else {
        let digest = manifest.signed_digest()?;
        let client = TimestampClient::new(Box::new(LocalClockAuthority), config);
        client.request(&digest)?
    };

    let manifest_path = manifest_output_path(file_path, request.output_dir.as_deref())?;
    manifest.save(&manifest_path)?;
    info!(
        stable_id = %manifest.stable_id,
        manifest = %manifest_path.display(),
        "artifact sealed"
    );

    let vault = if request.copy_to_vault {
        // Checked during validation above.
        let vault_root = request
            .vault_root
            .as_deref()
            .ok_or_else(|| SealError::Validation("vault root is required".to_string()))?;
        Some(store_in_vault(&manifest, file_path, vault_root)?)
    } else {
        None
    };

    Ok(SealOutcome {
        manifest,
        manifest_path,
        vault,
    })
}

/// `<stem>_manifest.json` beside the source, or under the output directory
fn manifest_output_path(file_path: &Path, output_dir: Option<&Path>) -> SealResult<PathBuf> {
    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SealError::Validation("input path has no filename".to_string()))?;
    let name = format!("{}_manifest.json", stem);

    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| SealError::WriteFailed {
                path: dir.to_path_buf(),
                source,
            })?;
            Ok(dir.join(name))
        }
        None => {
            let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
            Ok(parent.join(name))
        }
    }
}
