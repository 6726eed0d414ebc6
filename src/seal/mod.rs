pub mod hash;
pub mod keys;
pub mod manifest;
pub mod manifest_builder;
pub mod signature;
pub mod stable_id;
pub mod timestamp;
pub mod verification;

pub use hash::HashInfo;
pub use manifest::{
    ArtifactManifest, ArtifactMetadata, CustodyEvent, CustodyRecord, FileType, SensitivityLevel,
};
pub use manifest_builder::ArtifactManifestBuilder;
pub use signature::{KeyManager, SignatureInfo};
pub use stable_id::derive_stable_id;
pub use timestamp::{
    LocalClockAuthority, TimestampAuthority, TimestampClient, TimestampProof, PROOF_TYPE_LOCAL,
    PROOF_TYPE_NONE,
};
pub use verification::{
    ArtifactInfoSummary, CheckResult, SignatureInfoSummary, VerificationChecks, VerificationInfo,
    VerificationReport, VerificationStatus, Verifier,
};
