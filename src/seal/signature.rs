use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::{SealError, SealResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub algorithm: String,
    pub value: String,
    pub public_key: String,
    pub signer: String,
    pub signed_at: DateTime<Utc>,
}

impl SignatureInfo {
    /// Empty placeholder used before signing and when computing signable bytes.
    pub fn placeholder() -> Self {
        Self {
            algorithm: String::new(),
            value: String::new(),
            public_key: String::new(),
            signer: String::new(),
            signed_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

pub struct KeyManager {
    signing_key: SigningKey,
}

impl KeyManager {
    /// Generate a new Ed25519 keypair
    pub fn generate() -> Self {
        let signing_key = SigningKey::from_bytes(&rand::random::<[u8; 32]>());
        Self { signing_key }
    }

    /// Load keypair from a 32-byte seed
    pub fn from_bytes(bytes: &[u8]) -> SealResult<Self> {
        if bytes.len() != 32 {
            return Err(SealError::KeyFailed(
                "Invalid key length: expected 32 bytes".to_string(),
            ));
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(bytes);
        Ok(Self {
            signing_key: SigningKey::from_bytes(&key_bytes),
        })
    }

    /// Get the signing key bytes (private key)
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Get the public key
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Base64 encoding of the public key, as stored in manifests
    pub fn public_key_b64(&self) -> String {
        general_purpose::STANDARD.encode(self.public_key().as_bytes())
    }

    /// Sign data on behalf of the named signer
    pub fn sign(&self, data: &[u8], signer: &str) -> SignatureInfo {
        let signature = self.signing_key.sign(data);

        SignatureInfo {
            algorithm: "Ed25519".to_string(),
            value: general_purpose::STANDARD.encode(signature.to_bytes()),
            public_key: self.public_key_b64(),
            signer: signer.to_string(),
            signed_at: Utc::now(),
        }
    }

    /// Verify a signature
    pub fn verify(public_key_b64: &str, signature_b64: &str, data: &[u8]) -> SealResult<bool> {
        let public_key_bytes = general_purpose::STANDARD.decode(public_key_b64)?;
        let signature_bytes = general_purpose::STANDARD.decode(signature_b64)?;

        if public_key_bytes.len() != 32 {
            return Err(SealError::VerificationFailed(
                "Invalid public key length".to_string(),
            ));
        }
        if signature_bytes.len() != 64 {
            return Err(SealError::VerificationFailed(
                "Invalid signature length".to_string(),
            ));
        }

        let mut pk_array = [0u8; 32];
        pk_array.copy_from_slice(&public_key_bytes);
        let public_key = VerifyingKey::from_bytes(&pk_array)
            .map_err(|e| SealError::VerificationFailed(format!("Invalid public key: {}", e)))?;

        let mut sig_array = [0u8; 64];
        sig_array.copy_from_slice(&signature_bytes);
        let signature = Signature::from_bytes(&sig_array);

        Ok(public_key.verify(data, &signature).is_ok())
    }
}
