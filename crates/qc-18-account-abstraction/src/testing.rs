//! Fixtures for tests: token issuers, passkey devices, email proof inputs
//! and canned proof verifiers.

use qc_zkp::{field_to_decimal, pack_bytes, Fr, ZkpError};
use serde_json::{json, Value};
use shared_crypto::{
    encode_base64url, sha256, Ed25519KeyPair, Ed25519PublicKey, Hash, RsaKeyPair,
    Secp256k1KeyPair,
};
use shared_types::{AccountAddress, Transaction};

use crate::domain::entities::AuthenticatorId;
use crate::domain::messages::DkimRecordInput;
use crate::domain::passkey::{PasskeyAssertion, PasskeyRegistration};
use crate::domain::zkemail::{DIGEST_FIELDS, HOST_FIELDS};
use crate::ports::outbound::ProofVerifier;

/// Block time used throughout the fixtures.
pub const NOW: u64 = 1_700_000_000;

/// Chain id used by [`transaction`].
pub const CHAIN_ID: &str = "qc-testnet-1";

/// `qc1<data>` address.
pub fn address(data: &str) -> AccountAddress {
    AccountAddress::parse(&format!("qc1{data}"), "qc").expect("valid fixture address")
}

/// Unsigned transaction from `sender` with the given body.
pub fn transaction(sender: &AccountAddress, sequence: u64, body: &[u8]) -> Transaction {
    Transaction {
        chain_id: CHAIN_ID.to_string(),
        sender: sender.clone(),
        account_number: 7,
        sequence,
        body: body.to_vec(),
        signature: Vec::new(),
    }
}

/// Attach the `[id] ++ credential` envelope.
pub fn with_envelope(mut tx: Transaction, id: AuthenticatorId, credential: &[u8]) -> Transaction {
    let mut signature = Vec::with_capacity(credential.len() + 1);
    signature.push(id);
    signature.extend_from_slice(credential);
    tx.signature = signature;
    tx
}

/// Digest a new authenticator's bootstrap credential must cover.
pub fn bootstrap_digest(account: &AccountAddress) -> Hash {
    sha256(account.as_bytes())
}

/// Identity provider signing tokens with one asymmetric key.
pub enum TokenIssuer {
    Rsa(RsaKeyPair),
    Secp256k1(Secp256k1KeyPair),
    Ed25519(Ed25519KeyPair),
}

impl TokenIssuer {
    /// RS256 issuer with a fresh 1024-bit key.
    pub fn rsa() -> Self {
        Self::Rsa(RsaKeyPair::generate(1024).expect("rsa keygen"))
    }

    /// ES256K issuer.
    pub fn secp256k1() -> Self {
        Self::Secp256k1(Secp256k1KeyPair::generate())
    }

    /// EdDSA issuer.
    pub fn ed25519() -> Self {
        Self::Ed25519(Ed25519KeyPair::generate())
    }

    /// JOSE algorithm of the key.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "RS256",
            Self::Secp256k1(_) => "ES256K",
            Self::Ed25519(_) => "EdDSA",
        }
    }

    /// Public key as a JWK document.
    pub fn jwk(&self) -> String {
        match self {
            Self::Rsa(pair) => {
                let key = pair.verifying_key();
                json!({
                    "kty": "RSA",
                    "alg": "RS256",
                    "n": encode_base64url(&key.modulus()),
                    "e": encode_base64url(&key.exponent()),
                })
            }
            Self::Secp256k1(pair) => {
                let (x, y) = pair.public_key().coordinates().expect("valid point");
                json!({
                    "kty": "EC",
                    "crv": "secp256k1",
                    "x": encode_base64url(&x),
                    "y": encode_base64url(&y),
                })
            }
            Self::Ed25519(pair) => json!({
                "kty": "OKP",
                "crv": "Ed25519",
                "x": encode_base64url(pair.public_key().as_bytes()),
            }),
        }
        .to_string()
    }

    /// Sign raw bytes with the issuer key.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Rsa(pair) => pair.sign(message),
            Self::Secp256k1(pair) => pair.sign_sha256(message).as_bytes().to_vec(),
            Self::Ed25519(pair) => pair.sign(message).as_bytes().to_vec(),
        }
    }

    /// Signed compact token with a `{alg, typ}` header.
    pub fn mint(&self, claims: &Value) -> String {
        self.mint_with_header(&json!({"alg": self.algorithm(), "typ": "JWT"}), claims)
    }

    /// Signed compact token with an arbitrary header.
    pub fn mint_with_header(&self, header: &Value, claims: &Value) -> String {
        let signing_input = signing_input(header, claims);
        let signature = self.sign(signing_input.as_bytes());
        format!("{signing_input}.{}", encode_base64url(&signature))
    }
}

fn signing_input(header: &Value, claims: &Value) -> String {
    format!(
        "{}.{}",
        encode_base64url(header.to_string().as_bytes()),
        encode_base64url(claims.to_string().as_bytes())
    )
}

/// Compact token with a caller-supplied signature.
pub fn compact(header: &Value, claims: &Value, signature: &[u8]) -> String {
    format!(
        "{}.{}",
        signing_input(header, claims),
        encode_base64url(signature)
    )
}

/// Complete claim set valid for five minutes from `issued_at`.
pub fn token_claims(sub: &str, aud: &str, digest: &Hash, issued_at: u64) -> Value {
    json!({
        "sub": sub,
        "aud": aud,
        "iss": "https://issuer.example",
        "iat": issued_at,
        "nbf": issued_at,
        "exp": issued_at + 300,
        "transaction_hash": encode_base64url(digest),
    })
}

/// Platform authenticator bound to one origin.
pub struct PasskeyDevice {
    pair: Ed25519KeyPair,
    origin: String,
}

impl PasskeyDevice {
    pub fn new(origin: &str) -> Self {
        Self {
            pair: Ed25519KeyPair::generate(),
            origin: origin.to_string(),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.pair.public_key()
    }

    /// Assertion over `digest` for the given ceremony type and origin.
    pub fn assertion_for(&self, ceremony_type: &str, origin: &str, digest: &Hash) -> PasskeyAssertion {
        let mut authenticator_data = sha256(origin.as_bytes()).to_vec();
        authenticator_data.push(0x05); // UP | UV
        authenticator_data.extend_from_slice(&1u32.to_be_bytes());

        let client_data = json!({
            "type": ceremony_type,
            "challenge": encode_base64url(digest),
            "origin": origin,
            "crossOrigin": false,
        })
        .to_string();

        let mut signed = authenticator_data.clone();
        signed.extend_from_slice(&sha256(client_data.as_bytes()));
        let signature = self.pair.sign(&signed);

        PasskeyAssertion {
            authenticator_data: encode_base64url(&authenticator_data),
            client_data_json: encode_base64url(client_data.as_bytes()),
            signature: encode_base64url(signature.as_bytes()),
        }
    }

    /// Transaction credential bytes (`webauthn.get`).
    pub fn sign_transaction(&self, digest: &Hash) -> Vec<u8> {
        let assertion = self.assertion_for("webauthn.get", &self.origin, digest);
        serde_json::to_vec(&assertion).expect("serializable assertion")
    }

    /// Base64url registration credential (`webauthn.create`).
    pub fn registration_credential(&self, digest: &Hash) -> String {
        let registration = PasskeyRegistration {
            public_key: encode_base64url(self.pair.public_key().as_bytes()),
            assertion: self.assertion_for("webauthn.create", &self.origin, digest),
        };
        encode_base64url(&serde_json::to_vec(&registration).expect("serializable registration"))
    }
}

/// Public inputs of the email circuit as decimal strings.
pub fn email_public_inputs(host: &str, commitment: &str, digest: &Hash, salt: &str) -> Vec<String> {
    let mut inputs: Vec<String> = pack_bytes(host.as_bytes(), HOST_FIELDS)
        .expect("host fits")
        .iter()
        .map(field_to_decimal)
        .collect();
    inputs.push(commitment.to_string());
    inputs.extend(
        pack_bytes(digest, DIGEST_FIELDS)
            .expect("digest fits")
            .iter()
            .map(field_to_decimal),
    );
    inputs.push(salt.to_string());
    inputs
}

/// JSON `{proof, publicInputs}` credential.
pub fn email_credential(proof: &[u8], public_inputs: &[String]) -> Vec<u8> {
    json!({
        "proof": shared_crypto::encode_base64url(proof),
        "publicInputs": public_inputs,
    })
    .to_string()
    .into_bytes()
}

/// DKIM registry entry with a dummy key.
pub fn dkim_input(domain: &str, selector: &str, commitment: &str) -> DkimRecordInput {
    DkimRecordInput {
        domain: domain.to_string(),
        selector: selector.to_string(),
        public_key: "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA".to_string(),
        commitment: commitment.to_string(),
    }
}

/// Proof verifier that accepts every proof.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptingProofVerifier;

impl ProofVerifier for AcceptingProofVerifier {
    fn verify(&self, _proof: &[u8], _public_inputs: &[Fr]) -> Result<(), ZkpError> {
        Ok(())
    }
}

/// Proof verifier that rejects every proof.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectingProofVerifier;

impl ProofVerifier for RejectingProofVerifier {
    fn verify(&self, _proof: &[u8], _public_inputs: &[Fr]) -> Result<(), ZkpError> {
        Err(ZkpError::VerificationFailed)
    }
}
