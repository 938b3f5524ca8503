//! # Replay Attacks
//!
//! Credentials are bound to one transaction digest, and through it to one
//! chain, account and sequence. Email proofs are additionally bound to the
//! account's salt.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        email_request, email_tx, jwt_request, key_tx, msg_body, secp_request, token_tx, Chain,
        EmailProver,
    };
    use qc_18_account_abstraction::testing::{
        address, bootstrap_digest, transaction, with_envelope, AcceptingProofVerifier,
        PasskeyDevice, TokenIssuer, NOW,
    };
    use qc_18_account_abstraction::{AccountMsg, AddAuthenticator, AuthError};
    use shared_crypto::Secp256k1KeyPair;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    const SUB: &str = "u1";
    const AUD: &str = "acme";

    fn chain() -> Chain<AcceptingProofVerifier> {
        Chain::new(AcceptingProofVerifier)
    }

    // =========================================================================
    // CROSS-TRANSACTION
    // =========================================================================

    /// A token lifted from one transaction onto the next sequence.
    #[test]
    fn test_token_replayed_on_next_sequence() {
        let mut chain = chain();
        let issuer = TokenIssuer::rsa();
        chain.register_audience(&address("acmecorp"), AUD, &issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();

        let first = token_tx(&user, 0, 1, b"pay bob 5", &issuer, SUB, AUD, NOW);
        assert!(chain.authorize(&account, &first).valid);

        let mut replay = transaction(&user, 2, b"pay bob 5");
        replay.signature = first.signature;
        assert_eq!(
            chain.authorize(&account, &replay).error,
            Some(AuthError::DigestMismatch)
        );
    }

    /// A key signature replayed on another chain.
    #[test]
    fn test_key_signature_replayed_cross_chain() {
        let chain = chain();
        let user = address("alice");
        let key = Secp256k1KeyPair::generate();
        let account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();

        let signed = key_tx(&user, 0, 1, b"pay", &key);
        let mut replay = signed.clone();
        replay.chain_id = "qc-mainnet-1".into();
        assert!(chain.authorize(&account, &signed).valid);
        assert_eq!(
            chain.authorize(&account, &replay).error,
            Some(AuthError::SignatureInvalid)
        );
    }

    /// The bootstrap credential does not authorize transactions.
    #[test]
    fn test_bootstrap_credential_not_a_transaction_credential() {
        let chain = chain();
        let user = address("alice");
        let key = Secp256k1KeyPair::generate();
        let request = secp_request(&user, &key);
        let bootstrap = match &request {
            AddAuthenticator::Secp256K1 { signature, .. } => {
                shared_crypto::decode_base64url(signature).unwrap()
            }
            _ => unreachable!(),
        };
        let account = chain.instantiate(&user, request).unwrap();

        let tx = with_envelope(transaction(&user, 1, b"pay"), 0, &bootstrap);
        assert_eq!(
            chain.authorize(&account, &tx).error,
            Some(AuthError::SignatureInvalid)
        );
    }

    /// A registration assertion is not accepted as a transaction assertion.
    #[test]
    fn test_passkey_registration_ceremony_replay() {
        let chain = chain();
        let user = address("alice");
        let origin = "https://wallet.example";
        let device = PasskeyDevice::new(origin);
        let account = chain
            .instantiate(
                &user,
                AddAuthenticator::Passkey {
                    id: None,
                    url: origin.into(),
                    credential: device.registration_credential(&bootstrap_digest(&user)),
                },
            )
            .unwrap();

        let tx = transaction(&user, 1, b"pay");
        let assertion = device.assertion_for("webauthn.create", origin, &tx.signing_digest());
        let tx = with_envelope(tx, 0, &serde_json::to_vec(&assertion).unwrap());
        assert!(matches!(
            chain.authorize(&account, &tx).error,
            Some(AuthError::Structural(_))
        ));
    }

    /// A token signed over an ordinary transfer cannot be reused to carry
    /// an authenticator-management message: the message is read from the
    /// signed body, and a transfer body is not one.
    #[test]
    fn test_transfer_token_cannot_drive_management() {
        let mut chain = chain();
        let issuer = TokenIssuer::rsa();
        chain.register_audience(&address("acmecorp"), AUD, &issuer);

        let user = address("alice");
        let key = Secp256k1KeyPair::generate();
        let mut account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();
        let token_id = chain
            .add(&mut account, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();
        let before = account.clone();

        let transfer = token_tx(&user, token_id, 1, b"transfer 10 to bob", &issuer, SUB, AUD, NOW);
        assert!(chain.authorize(&account, &transfer).valid);
        assert!(matches!(
            chain.execute(&mut account, &transfer),
            Err(AuthError::Structural(_))
        ));
        assert_eq!(account, before);

        // Swapping in a management body breaks the token's digest binding
        let mut swapped = transaction(&user, 1, &msg_body(&AccountMsg::RemoveAuthMethod { id: 0 }));
        swapped.signature = transfer.signature;
        assert_eq!(
            chain.execute(&mut account, &swapped),
            Err(AuthError::DigestMismatch)
        );
        assert_eq!(account, before);
    }

    // =========================================================================
    // CROSS-ACCOUNT
    // =========================================================================

    /// Two accounts bound to the same identity: a token for one account's
    /// transaction does not authorize the other's.
    #[test]
    fn test_token_replayed_on_sibling_account() {
        let mut chain = chain();
        let issuer = TokenIssuer::ed25519();
        chain.register_audience(&address("acmecorp"), AUD, &issuer);

        let alice = address("alice");
        let alice_alt = address("alicealt");
        let _primary = chain
            .instantiate(&alice, jwt_request(&alice, &issuer, SUB, AUD, NOW))
            .unwrap();
        let secondary = chain
            .instantiate(&alice_alt, jwt_request(&alice_alt, &issuer, SUB, AUD, NOW))
            .unwrap();

        let signed = token_tx(&alice, 0, 1, b"pay", &issuer, SUB, AUD, NOW);
        let mut replay = transaction(&alice_alt, 1, b"pay");
        replay.signature = signed.signature;
        assert_eq!(
            chain.authorize(&secondary, &replay).error,
            Some(AuthError::DigestMismatch)
        );
    }

    /// An email proof produced under one account's salt does not authorize
    /// another account using the same mailbox host.
    #[test]
    fn test_email_proof_salt_replay() {
        const HOST: &str = "gmail.com";
        const COMMITMENT: &str = "987654321987654321";

        let prover = EmailProver::new();
        let mut chain = Chain::new(prover.verifier());
        chain.add_dkim(HOST, "s1", COMMITMENT);

        let victim = address("victim");
        let victim_account = chain
            .instantiate(&victim, email_request(&prover, &victim, HOST, COMMITMENT, "1001"))
            .unwrap();

        let attacker = address("attacker");
        chain
            .instantiate(&attacker, email_request(&prover, &attacker, HOST, COMMITMENT, "2002"))
            .unwrap();

        let tx = email_tx(&prover, &victim, 1, b"drain", HOST, COMMITMENT, "2002");
        assert_eq!(
            chain.authorize(&victim_account, &tx).error,
            Some(AuthError::SaltMismatch)
        );
    }
}
