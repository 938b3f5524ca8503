//! # ECDSA Signatures (secp256k1)
//!
//! Two message conventions are supported:
//!
//! - **Prehash**: the 32-byte transaction digest is signed directly
//!   (key authenticators).
//! - **SHA-256 message**: the signer hashes the message with SHA-256 first
//!   (`ES256K` JSON Web Signatures).
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces
//! - High-S signatures are rejected explicitly before verification
//! - Public keys must be valid SEC1 points

use crate::CryptoError;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Parse SEC1 bytes (compressed or uncompressed) and store them compressed.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Build from affine coordinates (JWK `x`/`y`, 32 bytes each).
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self, CryptoError> {
        if x.len() != 32 || y.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: if x.len() != 32 { x.len() } else { y.len() },
            });
        }
        let mut uncompressed = [0u8; 65];
        uncompressed[0] = 0x04;
        uncompressed[1..33].copy_from_slice(x);
        uncompressed[33..].copy_from_slice(y);
        Self::from_sec1(&uncompressed)
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Affine coordinates `(x, y)`, as published in a JWK.
    pub fn coordinates(&self) -> Result<([u8; 32], [u8; 32]), CryptoError> {
        let key = self.verifying_key()?;
        let point = key.to_encoded_point(false);
        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(CryptoError::InvalidPublicKey),
        };
        let mut out_x = [0u8; 32];
        let mut out_y = [0u8; 32];
        out_x.copy_from_slice(x);
        out_y.copy_from_slice(y);
        Ok((out_x, out_y))
    }

    fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Verify a signature over a 32-byte digest (no further hashing).
    pub fn verify_prehash(
        &self,
        digest: &[u8; 32],
        signature: &Secp256k1Signature,
    ) -> Result<(), CryptoError> {
        let sig = signature.to_low_s_signature()?;
        self.verifying_key()?
            .verify_prehash(digest, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Verify a signature over `SHA-256(message)`.
    pub fn verify_sha256(
        &self,
        message: &[u8],
        signature: &Secp256k1Signature,
    ) -> Result<(), CryptoError> {
        let sig = signature.to_low_s_signature()?;
        self.verifying_key()?
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// ECDSA signature (64 bytes, r||s format).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1Signature([u8; 64]);

impl Secp256k1Signature {
    /// Create from bytes (64 bytes).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat)?;
        Ok(Self(arr))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    fn to_low_s_signature(self) -> Result<Signature, CryptoError> {
        let sig = Signature::from_slice(&self.0).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        // normalize_s returns Some only when S was in the upper half.
        if sig.normalize_s().is_some() {
            return Err(CryptoError::MalleableSignature);
        }
        Ok(sig)
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest directly, normalized to low S.
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<Secp256k1Signature, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|_| CryptoError::SignatureVerificationFailed)?;
        Ok(Self::encode(sig))
    }

    /// Sign `SHA-256(message)` (deterministic RFC 6979), normalized to low S.
    pub fn sign_sha256(&self, message: &[u8]) -> Secp256k1Signature {
        let sig: Signature = self.signing_key.sign(message);
        Self::encode(sig)
    }

    fn encode(sig: Signature) -> Secp256k1Signature {
        let sig = sig.normalize_s().unwrap_or(sig);
        let bytes: [u8; 64] = sig.to_bytes().into();
        Secp256k1Signature(bytes)
    }
}
