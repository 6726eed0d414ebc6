use std::fs;
use std::path::Path;

use tracing::info;

use super::signature::KeyManager;
use crate::error::{SealError, SealResult};

/// Load the operator's signing key from a hex-encoded seed file, generating
/// and persisting a fresh key on first use.
pub fn load_or_generate<P: AsRef<Path>>(path: P) -> SealResult<KeyManager> {
    let path = path.as_ref();
    if path.exists() {
        return load(path);
    }

    let key_manager = KeyManager::generate();
    save(&key_manager, path)?;
    info!(path = %path.display(), "generated new signing key");
    Ok(key_manager)
}

/// Load a signing key from a hex-encoded seed file
pub fn load<P: AsRef<Path>>(path: P) -> SealResult<KeyManager> {
    let path = path.as_ref();
    let hex_seed = fs::read_to_string(path).map_err(|source| SealError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let seed = hex::decode(hex_seed.trim())
        .map_err(|e| SealError::KeyFailed(format!("Invalid key file {}: {}", path.display(), e)))?;
    KeyManager::from_bytes(&seed)
}

/// Persist the signing key seed, hex-encoded, readable only by the owner.
pub fn save<P: AsRef<Path>>(key_manager: &KeyManager, path: P) -> SealResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SealError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let hex_seed = hex::encode(key_manager.to_bytes());
    fs::write(path, hex_seed).map_err(|source| SealError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms).map_err(|source| SealError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}
