//! # Algorithm Confusion Attacks
//!
//! Tokens whose header names an algorithm other than the one pinned to the
//! audience key must be refused before any signature check.
//!
//! ## Attack Vectors
//!
//! - `alg: none` with an empty signature
//! - `HS256` keyed with the published public key
//! - A different asymmetric algorithm than the registered key's
//! - Missing or case-altered `alg`

#[cfg(test)]
mod tests {
    use crate::fixtures::{jwt_request, Chain};
    use qc_18_account_abstraction::testing::{
        address, compact, token_claims, transaction, with_envelope, AcceptingProofVerifier,
        TokenIssuer, NOW,
    };
    use qc_18_account_abstraction::{AbstractAccount, AddAuthenticator, AuthError};
    use serde_json::{json, Value};
    use shared_crypto::sha256;
    use shared_types::{AccountAddress, Transaction};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    const SUB: &str = "victim";
    const AUD: &str = "acme";

    struct Target {
        chain: Chain<AcceptingProofVerifier>,
        user: AccountAddress,
        account: AbstractAccount,
        issuer: TokenIssuer,
    }

    fn target(issuer: TokenIssuer) -> Target {
        let mut chain = Chain::new(AcceptingProofVerifier);
        chain.register_audience(&address("acmecorp"), AUD, &issuer);
        let user = address("victim");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();
        Target {
            chain,
            user,
            account,
            issuer,
        }
    }

    /// Attach a forged token for a fresh transaction.
    fn forged_tx(user: &AccountAddress, header: Value, signature: &[u8]) -> Transaction {
        let tx = transaction(user, 1, b"drain");
        let token = compact(
            &header,
            &token_claims(SUB, AUD, &tx.signing_digest(), NOW),
            signature,
        );
        with_envelope(tx, 0, token.as_bytes())
    }

    fn assert_algorithm_rejected(target: &Target, tx: &Transaction) {
        let result = target.chain.authorize(&target.account, tx);
        assert!(!result.valid);
        assert!(
            matches!(result.error, Some(AuthError::Algorithm { .. })),
            "unexpected {:?}",
            result.error
        );
    }

    // =========================================================================
    // ATTACKS
    // =========================================================================

    /// Unsigned token.
    #[test]
    fn test_alg_none_rejected() {
        let target = target(TokenIssuer::rsa());
        let tx = forged_tx(&target.user, json!({"alg": "none", "typ": "JWT"}), b"");
        assert_algorithm_rejected(&target, &tx);
    }

    /// Symmetric token keyed with the public JWK text.
    #[test]
    fn test_hs256_with_public_key_as_secret_rejected() {
        let target = target(TokenIssuer::rsa());
        let fake_mac = sha256(target.issuer.jwk().as_bytes());
        let tx = forged_tx(&target.user, json!({"alg": "HS256"}), &fake_mac);
        assert_algorithm_rejected(&target, &tx);
    }

    /// Token signed by a different key type than the audience registered.
    #[test]
    fn test_other_asymmetric_algorithm_rejected() {
        let target = target(TokenIssuer::ed25519());
        let attacker = TokenIssuer::secp256k1();
        let tx = transaction(&target.user, 1, b"drain");
        let token = attacker.mint(&token_claims(SUB, AUD, &tx.signing_digest(), NOW));
        let tx = with_envelope(tx, 0, token.as_bytes());
        assert_algorithm_rejected(&target, &tx);
    }

    /// Header without `alg`.
    #[test]
    fn test_missing_alg_rejected() {
        let target = target(TokenIssuer::ed25519());
        let tx = forged_tx(&target.user, json!({"typ": "JWT"}), &[0u8; 64]);
        let result = target.chain.authorize(&target.account, &tx);
        assert_eq!(
            result.error,
            Some(AuthError::Algorithm {
                found: None,
                pinned: "EdDSA",
            })
        );
    }

    /// Algorithm names match exactly.
    #[test]
    fn test_case_altered_alg_rejected() {
        let target = target(TokenIssuer::ed25519());
        let tx = forged_tx(&target.user, json!({"alg": "eddsa"}), &[0u8; 64]);
        assert_algorithm_rejected(&target, &tx);
    }

    /// Registration goes through the same pinning.
    #[test]
    fn test_alg_none_cannot_register() {
        let target = target(TokenIssuer::rsa());
        let newcomer = address("newcomer");
        let digest = shared_crypto::sha256(newcomer.as_bytes());
        let token = compact(
            &json!({"alg": "none"}),
            &token_claims(SUB, AUD, &digest, NOW),
            b"",
        );
        let err = target
            .chain
            .instantiate(
                &newcomer,
                AddAuthenticator::Jwt {
                    id: None,
                    sub: SUB.into(),
                    aud: AUD.into(),
                    token,
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Algorithm { .. }));
    }
}
