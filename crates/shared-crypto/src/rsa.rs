//! # RSA Signatures (RS256)
//!
//! RSASSA-PKCS1-v1_5 with SHA-256, the algorithm most identity providers
//! sign their tokens with.

use crate::CryptoError;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// Smallest accepted modulus.
pub const MIN_MODULUS_BITS: usize = 1024;

/// Largest accepted modulus.
pub const MAX_MODULUS_BITS: usize = 4096;

/// RSA public key pinned to PKCS#1 v1.5 / SHA-256.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaVerifyingKey {
    key: RsaPublicKey,
}

impl RsaVerifyingKey {
    /// Build from big-endian modulus and exponent (JWK `n`/`e`).
    pub fn from_components(modulus: &[u8], exponent: &[u8]) -> Result<Self, CryptoError> {
        let n = BigUint::from_bytes_be(modulus);
        let bits = n.bits();
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
            return Err(CryptoError::UnsupportedKeySize {
                bits,
                min: MIN_MODULUS_BITS,
                max: MAX_MODULUS_BITS,
            });
        }
        let e = BigUint::from_bytes_be(exponent);
        let key = RsaPublicKey::new(n, e).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    /// Big-endian modulus.
    pub fn modulus(&self) -> Vec<u8> {
        self.key.n().to_bytes_be()
    }

    /// Big-endian public exponent.
    pub fn exponent(&self) -> Vec<u8> {
        self.key.e().to_bytes_be()
    }

    /// Verify an RS256 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        if signature.len() != self.key.size() {
            return Err(CryptoError::InvalidSignatureFormat);
        }
        let sig = Signature::try_from(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        VerifyingKey::<Sha256>::new(self.key.clone())
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// RSA keypair, used to mint tokens in tests and tooling.
pub struct RsaKeyPair {
    private: RsaPrivateKey,
}

impl RsaKeyPair {
    /// Generate a keypair with the given modulus size.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self { private })
    }

    /// Public half.
    pub fn verifying_key(&self) -> RsaVerifyingKey {
        RsaVerifyingKey {
            key: self.private.to_public_key(),
        }
    }

    /// Sign `message` with RS256.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::<Sha256>::new(self.private.clone());
        signing_key.sign(message).to_vec()
    }
}
