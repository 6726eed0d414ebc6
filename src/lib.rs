//! Artifact sealing with verifiable provenance.
//!
//! Seals a file by hashing its content, assembling a signed and timestamped
//! manifest with an initial custody entry, and optionally copying both into
//! a content-addressed vault.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod seal;
pub mod vault;

pub use config::{OperatingMode, SealConfig};
pub use error::{SealError, SealResult};
pub use pipeline::{seal_artifact, SealOutcome, SealRequest};
pub use vault::{store_in_vault, VaultPaths};
