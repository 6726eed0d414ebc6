use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::SealConfig;
use crate::error::{SealError, SealResult};

/// Sentinel proof type for manifests sealed without a timestamp.
pub const PROOF_TYPE_NONE: &str = "NONE";

/// Proof type issued by the local wall-clock placeholder authority.
pub const PROOF_TYPE_LOCAL: &str = "LOCAL-WALLCLOCK";

/// Proof-of-time record attached to a sealed manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampProof {
    pub authority: String,
    pub value: String,
    pub issued_at: DateTime<Utc>,
    pub proof_type: String,
}

impl TimestampProof {
    /// Sentinel for a seal that explicitly opted out of timestamping.
    /// Distinguishable from every real proof by its `proofType`.
    pub fn none() -> Self {
        Self {
            authority: String::new(),
            value: String::new(),
            issued_at: Utc::now(),
            proof_type: PROOF_TYPE_NONE.to_string(),
        }
    }

    /// Placeholder used when computing signable manifest bytes. Fixed
    /// contents so the signable serialization stays deterministic.
    pub fn unsigned_placeholder() -> Self {
        Self {
            authority: String::new(),
            value: String::new(),
            issued_at: DateTime::<Utc>::MIN_UTC,
            proof_type: String::new(),
        }
    }

    pub fn is_real(&self) -> bool {
        self.proof_type != PROOF_TYPE_NONE && !self.proof_type.is_empty()
    }
}

/// Source of proof-of-time records.
///
/// The input is the SHA-256 digest of the signed manifest bytes; the output
/// proof commits to that digest. A production implementation backs this
/// with an RFC 3161 service; the contract stays the same.
pub trait TimestampAuthority {
    fn name(&self) -> &str;

    fn issue(&self, manifest_digest: &[u8; 32], timeout: Duration) -> SealResult<TimestampProof>;
}

/// Placeholder authority backed by the local wall clock.
pub struct LocalClockAuthority;

impl TimestampAuthority for LocalClockAuthority {
    fn name(&self) -> &str {
        "local-clock"
    }

    fn issue(&self, manifest_digest: &[u8; 32], _timeout: Duration) -> SealResult<TimestampProof> {
        let issued_at = Utc::now();

        let mut hasher = Sha256::new();
        hasher.update(manifest_digest);
        hasher.update(issued_at.to_rfc3339().as_bytes());

        Ok(TimestampProof {
            authority: self.name().to_string(),
            value: hex::encode(hasher.finalize()),
            issued_at,
            proof_type: PROOF_TYPE_LOCAL.to_string(),
        })
    }
}

/// Wraps an authority with the retry policy for remote calls: time-bounded,
/// at most one retry, so a flaky authority cannot yield a pile of divergent
/// proofs for the same manifest.
pub struct TimestampClient {
    authority: Box<dyn TimestampAuthority>,
    timeout: Duration,
    retries: u32,
}

impl TimestampClient {
    pub fn new(authority: Box<dyn TimestampAuthority>, config: &SealConfig) -> Self {
        Self {
            authority,
            timeout: config.timestamp_timeout,
            retries: config.timestamp_retries,
        }
    }

    pub fn request(&self, manifest_digest: &[u8; 32]) -> SealResult<TimestampProof> {
        let mut last_err: Option<SealError> = None;
        for attempt in 0..=self.retries {
            match self.authority.issue(manifest_digest, self.timeout) {
                Ok(proof) => return Ok(proof),
                Err(e) => {
                    warn!(
                        authority = self.authority.name(),
                        attempt,
                        error = %e,
                        "timestamp request failed"
                    );
                    last_err = Some(e);
                }
            }
        }
        Err(match last_err {
            Some(SealError::TimestampFailed(msg)) => SealError::TimestampFailed(msg),
            Some(e) => SealError::TimestampFailed(e.to_string()),
            None => SealError::TimestampFailed("authority unreachable".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_none_proof_is_sentinel() {
        let proof = TimestampProof::none();
        assert_eq!(proof.proof_type, PROOF_TYPE_NONE);
        assert!(!proof.is_real());
        assert!(proof.authority.is_empty());
    }

    #[test]
    fn test_local_authority_issues_real_proof() {
        let digest = [7u8; 32];
        let proof = LocalClockAuthority
            .issue(&digest, Duration::from_secs(1))
            .unwrap();
        assert_eq!(proof.proof_type, PROOF_TYPE_LOCAL);
        assert_eq!(proof.authority, "local-clock");
        assert_eq!(proof.value.len(), 64);
        assert!(proof.is_real());
    }

    #[test]
    fn test_proof_commits_to_digest() {
        let a = LocalClockAuthority
            .issue(&[1u8; 32], Duration::from_secs(1))
            .unwrap();
        let b = LocalClockAuthority
            .issue(&[2u8; 32], Duration::from_secs(1))
            .unwrap();
        assert_ne!(a.value, b.value);
    }

    struct FlakyAuthority {
        failures_remaining: AtomicU32,
    }

    impl TimestampAuthority for FlakyAuthority {
        fn name(&self) -> &str {
            "flaky"
        }

        fn issue(&self, digest: &[u8; 32], timeout: Duration) -> SealResult<TimestampProof> {
            if self.failures_remaining.fetch_update(
                Ordering::SeqCst,
                Ordering::SeqCst,
                |n| n.checked_sub(1),
            ).is_ok() {
                return Err(SealError::TimestampFailed("authority timeout".to_string()));
            }
            LocalClockAuthority.issue(digest, timeout)
        }
    }

    #[test]
    fn test_client_retries_once_then_succeeds() {
        let config = SealConfig::default();
        let client = TimestampClient::new(
            Box::new(FlakyAuthority {
                failures_remaining: AtomicU32::new(1),
            }),
            &config,
        );
        let proof = client.request(&[0u8; 32]).unwrap();
        assert!(proof.is_real());
    }

    #[test]
    fn test_client_gives_up_after_retry_budget() {
        let config = SealConfig::default();
        let client = TimestampClient::new(
            Box::new(FlakyAuthority {
                failures_remaining: AtomicU32::new(10),
            }),
            &config,
        );
        let result = client.request(&[0u8; 32]);
        assert!(matches!(result, Err(SealError::TimestampFailed(_))));
    }
}
