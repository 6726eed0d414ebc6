use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{SealError, SealResult};
use crate::seal::{ArtifactManifest, HashInfo};

/// Paths produced by a vault copy
#[derive(Debug, Clone)]
pub struct VaultPaths {
    pub bucket: PathBuf,
    pub artifact: PathBuf,
    pub manifest: PathBuf,
}

/// Upper bound on manifest filename versioning within one bucket
const MAX_MANIFEST_VERSIONS: u32 = 10_000;

/// Copy a sealed artifact and its manifest into the content-addressed vault.
///
/// Layout: `<vault-root>/<first-8-hex-of-hash>/`. The artifact copy is named
/// by its full content hash, so two different files can never fight over one
/// name even when their original filenames or hash prefixes coincide.
/// Manifest copies are versioned (`_2`, `_3`, ...) instead of overwritten.
///
/// The source file is re-hashed immediately before the copy; if it no longer
/// matches the manifest the copy is refused with an integrity error.
pub fn store_in_vault(
    manifest: &ArtifactManifest,
    source: &Path,
    vault_root: &Path,
) -> SealResult<VaultPaths> {
    let current = HashInfo::from_file(source)?;
    if current.value != manifest.content_hash.value {
        return Err(SealError::IntegrityFailed(format!(
            "{} changed since sealing (recorded {}, found {})",
            source.display(),
            manifest.content_hash.value,
            current.value
        )));
    }

    let bucket = vault_root.join(manifest.content_hash.bucket_prefix());
    fs::create_dir_all(&bucket).map_err(|source| SealError::WriteFailed {
        path: bucket.clone(),
        source,
    })?;

    let artifact_path = bucket.join(artifact_copy_name(manifest, source));
    if artifact_path.exists() {
        // Content-addressed name: an existing copy must be the same bytes.
        if current.verify_file(&artifact_path)? {
            debug!(path = %artifact_path.display(), "vault already holds this artifact");
        } else {
            return Err(SealError::IntegrityFailed(format!(
                "vault entry {} does not match its content hash",
                artifact_path.display()
            )));
        }
    } else {
        fs::copy(source, &artifact_path).map_err(|source| SealError::WriteFailed {
            path: artifact_path.clone(),
            source,
        })?;
        if !current.verify_file(&artifact_path)? {
            let _ = fs::remove_file(&artifact_path);
            return Err(SealError::IntegrityFailed(format!(
                "vault copy {} does not match the sealed hash",
                artifact_path.display()
            )));
        }
    }

    let manifest_path = next_manifest_path(&bucket, source)?;
    manifest.save(&manifest_path)?;

    info!(
        bucket = %bucket.display(),
        artifact = %artifact_path.display(),
        manifest = %manifest_path.display(),
        "stored artifact in vault"
    );

    Ok(VaultPaths {
        bucket,
        artifact: artifact_path,
        manifest: manifest_path,
    })
}

fn artifact_copy_name(manifest: &ArtifactManifest, source: &Path) -> String {
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", manifest.content_hash.value, ext),
        None => manifest.content_hash.value.clone(),
    }
}

/// First free `<stem>_manifest[_N].json` slot inside the bucket
fn next_manifest_path(bucket: &Path, source: &Path) -> SealResult<PathBuf> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");

    for n in 1..=MAX_MANIFEST_VERSIONS {
        let name = if n == 1 {
            format!("{}_manifest.json", stem)
        } else {
            format!("{}_manifest_{}.json", stem, n)
        };
        let candidate = bucket.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(SealError::IntegrityFailed(format!(
        "manifest slots exhausted for '{}' in {}",
        stem,
        bucket.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seal::{ArtifactManifestBuilder, FileType, KeyManager};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn seal_file(path: &Path) -> ArtifactManifest {
        let hash = HashInfo::from_file(path).unwrap();
        let size = fs::metadata(path).unwrap().len();
        let mut manifest = ArtifactManifestBuilder::new()
            .content_hash(hash)
            .file_type(FileType::Other)
            .original_filename(path.file_name().unwrap().to_string_lossy())
            .byte_size(size)
            .operator("Vault Tester")
            .build()
            .unwrap();
        manifest.sign(&KeyManager::generate(), "Vault Tester").unwrap();
        manifest
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_vault_layout() {
        let temp_dir = TempDir::new().unwrap();
        let vault_root = temp_dir.path().join("vault");
        let source = write_file(temp_dir.path(), "photo.jpg", b"jpeg bytes");

        let manifest = seal_file(&source);
        let paths = store_in_vault(&manifest, &source, &vault_root).unwrap();

        assert_eq!(
            paths.bucket,
            vault_root.join(&manifest.content_hash.value[..8])
        );
        assert_eq!(
            paths.artifact.file_name().unwrap().to_string_lossy(),
            format!("{}.jpg", manifest.content_hash.value)
        );
        assert!(paths.artifact.exists());
        assert!(paths.manifest.exists());
    }

    #[test]
    fn test_double_store_dedupes_artifact_and_versions_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let vault_root = temp_dir.path().join("vault");
        let source = write_file(temp_dir.path(), "doc.txt", b"same content");

        let first = store_in_vault(&seal_file(&source), &source, &vault_root).unwrap();
        let second = store_in_vault(&seal_file(&source), &source, &vault_root).unwrap();

        assert_eq!(first.artifact, second.artifact);
        assert_ne!(first.manifest, second.manifest);
        assert!(first.manifest.exists());
        assert!(second.manifest.exists());

        let artifacts: Vec<_> = fs::read_dir(&first.bucket)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_name().to_string_lossy().contains("_manifest"))
            .collect();
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn test_store_refuses_modified_source() {
        let temp_dir = TempDir::new().unwrap();
        let vault_root = temp_dir.path().join("vault");
        let source = write_file(temp_dir.path(), "doc.txt", b"before");

        let manifest = seal_file(&source);
        fs::write(&source, b"after modification").unwrap();

        let result = store_in_vault(&manifest, &source, &vault_root);
        assert!(matches!(result, Err(SealError::IntegrityFailed(_))));
        assert!(!vault_root.exists() || fs::read_dir(&vault_root).unwrap().next().is_none());
    }

    #[test]
    fn test_colliding_filenames_do_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let vault_root = temp_dir.path().join("vault");

        // Same original filename, different bytes, so different hashes.
        let dir_a = temp_dir.path().join("a");
        let dir_b = temp_dir.path().join("b");
        fs::create_dir_all(&dir_a).unwrap();
        fs::create_dir_all(&dir_b).unwrap();
        let src_a = write_file(&dir_a, "evidence.bin", b"first payload");
        let src_b = write_file(&dir_b, "evidence.bin", b"second payload");

        let paths_a = store_in_vault(&seal_file(&src_a), &src_a, &vault_root).unwrap();
        let paths_b = store_in_vault(&seal_file(&src_b), &src_b, &vault_root).unwrap();

        assert_ne!(paths_a.artifact, paths_b.artifact);
        assert!(paths_a.artifact.exists());
        assert!(paths_b.artifact.exists());
    }
}
