use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SealError, SealResult};

/// Operating mode for a sealing invocation.
///
/// `Strict` refuses degraded seals: opting out of timestamping is rejected
/// instead of producing a manifest with a sentinel proof.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Standard,
    Strict,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Standard => "standard",
            OperatingMode::Strict => "strict",
        }
    }

    pub fn parse(s: &str) -> SealResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(OperatingMode::Standard),
            "strict" => Ok(OperatingMode::Strict),
            other => Err(SealError::Validation(format!(
                "unknown operating mode '{}' (expected 'standard' or 'strict')",
                other
            ))),
        }
    }
}

/// Configuration carried explicitly into the sealing pipeline.
///
/// Passed as a parameter rather than read from ambient state so two
/// invocations with different settings cannot interfere.
#[derive(Debug, Clone)]
pub struct SealConfig {
    pub mode: OperatingMode,
    /// Namespace prefix of derived stable identifiers.
    pub namespace: String,
    /// Budget for a single timestamp-authority call.
    pub timestamp_timeout: Duration,
    /// Additional attempts after a failed timestamp call. Kept at one:
    /// repeated requests must not produce divergent proofs for the same
    /// manifest content.
    pub timestamp_retries: u32,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Standard,
            namespace: "artifact".to_string(),
            timestamp_timeout: Duration::from_secs(10),
            timestamp_retries: 1,
        }
    }
}

impl SealConfig {
    pub fn with_mode(mode: OperatingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
