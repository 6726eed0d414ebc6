use super::manifest::FileType;

/// Derive the content-addressed identifier for an artifact.
///
/// Format: `<namespace>:<TYPE>:<hex-digest>`. Deterministic: the same
/// declared type and digest always produce the same identifier.
pub fn derive_stable_id(namespace: &str, file_type: FileType, digest: &str) -> String {
    format!("{}:{}:{}", namespace, file_type.as_str(), digest)
}

/// Split a stable identifier back into (namespace, type tag, digest).
pub fn split_stable_id(stable_id: &str) -> Option<(&str, &str, &str)> {
    let mut parts = stable_id.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ns), Some(ty), Some(digest)) if !ns.is_empty() && !ty.is_empty() => {
            Some((ns, ty, digest))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seal::HashInfo;

    #[test]
    fn test_stable_id_format() {
        let id = derive_stable_id("artifact", FileType::Document, "abc123");
        assert_eq!(id, "artifact:DOCUMENT:abc123");
    }

    #[test]
    fn test_stable_id_deterministic() {
        let digest = HashInfo::from_bytes(b"stable bytes").value;
        let id1 = derive_stable_id("artifact", FileType::Other, &digest);
        let id2 = derive_stable_id("artifact", FileType::Other, &digest);
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_stable_id_differs_by_type() {
        let digest = HashInfo::from_bytes(b"stable bytes").value;
        let doc = derive_stable_id("artifact", FileType::Document, &digest);
        let log = derive_stable_id("artifact", FileType::Log, &digest);
        assert_ne!(doc, log);
    }

    #[test]
    fn test_split_stable_id() {
        let id = derive_stable_id("artifact", FileType::Video, "deadbeef");
        let (ns, ty, digest) = split_stable_id(&id).unwrap();
        assert_eq!(ns, "artifact");
        assert_eq!(ty, "VIDEO");
        assert_eq!(digest, "deadbeef");
    }

    #[test]
    fn test_split_rejects_malformed() {
        assert!(split_stable_id("no-separators").is_none());
        assert!(split_stable_id(":TYPE:digest").is_none());
    }
}
