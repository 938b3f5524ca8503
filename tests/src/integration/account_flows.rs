//! # Account Lifecycle Flows
//!
//! Registry management, account instantiation, authorization and
//! authenticator management exercised together through the public API.

#[cfg(test)]
mod tests {
    use crate::fixtures::{jwt_request, key_tx, msg_body, secp_request, token_tx, Chain};
    use qc_18_account_abstraction::testing::{
        address, bootstrap_digest, transaction, with_envelope, AcceptingProofVerifier,
        PasskeyDevice, TokenIssuer, NOW,
    };
    use qc_18_account_abstraction::{
        AccountAuthApi, AccountMsg, AddAuthenticator, AuthError, AuthenticatorKind,
        MsgClaimAudience, MsgCreateAudience, MsgDeleteAudience, MsgUpdateAudience, RegistryError,
        RegistryEvent, RegistryManagementApi,
    };
    use shared_crypto::{encode_base64url, Ed25519KeyPair, Secp256k1KeyPair};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    const SUB: &str = "u1";
    const AUD: &str = "acme";

    fn chain() -> Chain<AcceptingProofVerifier> {
        Chain::new(AcceptingProofVerifier)
    }

    // =========================================================================
    // TOKEN AUTHENTICATOR FLOWS
    // =========================================================================

    /// Audience owner registers a key; a user account bound to (sub, aud)
    /// authorizes a transaction with a token carrying its digest.
    #[test]
    fn test_token_account_end_to_end() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let issuer = TokenIssuer::rsa();
        chain.register_audience(&owner, AUD, &issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();
        assert_eq!(account.len(), 1);
        assert_eq!(
            account.authenticator(0).unwrap().kind(),
            AuthenticatorKind::TokenBased
        );

        let tx = token_tx(&user, 0, 1, b"transfer 10", &issuer, SUB, AUD, NOW);
        let result = chain.authorize(&account, &tx);
        assert!(result.valid, "{:?}", result.error);
        assert_eq!(result.authenticator_id, Some(0));
        assert_eq!(result.gas_used, chain.service.config().costs.jwt);
    }

    /// The token's transaction_hash binds it to exactly one transaction.
    #[test]
    fn test_token_for_other_body_is_rejected() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let issuer = TokenIssuer::secp256k1();
        chain.register_audience(&owner, AUD, &issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();

        let signed = token_tx(&user, 0, 1, b"transfer 10", &issuer, SUB, AUD, NOW);
        let mut forged = transaction(&user, 1, b"transfer 10000");
        forged.signature = signed.signature.clone();

        let result = chain.authorize(&account, &forged);
        assert!(!result.valid);
        assert_eq!(result.error, Some(AuthError::DigestMismatch));
    }

    /// Rotating the audience key cuts old tokens off at once.
    #[test]
    fn test_key_rotation_invalidates_old_tokens() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let old_issuer = TokenIssuer::ed25519();
        chain.register_audience(&owner, AUD, &old_issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &old_issuer, SUB, AUD, NOW))
            .unwrap();

        let new_issuer = TokenIssuer::rsa();
        chain.advance(1);
        let height = chain.height;
        let algorithm = chain
            .registry
            .update_audience(
                &owner,
                height,
                MsgUpdateAudience {
                    aud: AUD.into(),
                    public_key_jwk: new_issuer.jwk(),
                },
            )
            .unwrap();
        assert_eq!(algorithm.as_str(), "RS256");

        let stale = token_tx(&user, 0, 1, b"pay", &old_issuer, SUB, AUD, chain.now);
        let result = chain.authorize(&account, &stale);
        assert!(matches!(result.error, Some(AuthError::Algorithm { .. })));

        let fresh = token_tx(&user, 0, 1, b"pay", &new_issuer, SUB, AUD, chain.now);
        assert!(chain.authorize(&account, &fresh).valid);

        assert!(matches!(
            chain.registry.events().last(),
            Some(RegistryEvent::Updated { height: h, .. }) if *h == height
        ));
    }

    /// Rotation to a key of the same family: the old signature no longer verifies.
    #[test]
    fn test_same_algorithm_rotation_rejects_old_signature() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let old_issuer = TokenIssuer::secp256k1();
        chain.register_audience(&owner, AUD, &old_issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &old_issuer, SUB, AUD, NOW))
            .unwrap();

        let new_issuer = TokenIssuer::secp256k1();
        let height = chain.height;
        chain
            .registry
            .update_audience(
                &owner,
                height,
                MsgUpdateAudience {
                    aud: AUD.into(),
                    public_key_jwk: new_issuer.jwk(),
                },
            )
            .unwrap();

        let stale = token_tx(&user, 0, 1, b"pay", &old_issuer, SUB, AUD, NOW);
        assert_eq!(
            chain.authorize(&account, &stale).error,
            Some(AuthError::SignatureInvalid)
        );
    }

    /// A snapshot taken before a rotation keeps the old key.
    #[test]
    fn test_snapshot_isolated_from_later_rotation() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let old_issuer = TokenIssuer::ed25519();
        chain.register_audience(&owner, AUD, &old_issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &old_issuer, SUB, AUD, NOW))
            .unwrap();
        let snapshot = chain.registry.snapshot();

        let height = chain.height;
        chain
            .registry
            .update_audience(
                &owner,
                height,
                MsgUpdateAudience {
                    aud: AUD.into(),
                    public_key_jwk: TokenIssuer::ed25519().jwk(),
                },
            )
            .unwrap();

        let tx = token_tx(&user, 0, 1, b"pay", &old_issuer, SUB, AUD, NOW);
        assert!(chain.service.authorize(&account, &tx, &snapshot, NOW).valid);
        assert!(!chain.authorize(&account, &tx).valid);
    }

    /// Deleting an audience stops its tokens and the name stays with its
    /// owner: nobody else can re-create it under a key of their own.
    #[test]
    fn test_deleted_audience_cannot_be_taken_over() {
        let mut chain = chain();
        let owner = address("acmecorp");
        let issuer = TokenIssuer::rsa();
        chain.register_audience(&owner, AUD, &issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();

        let height = chain.height;
        let intruder = address("mallory");
        assert!(matches!(
            chain
                .registry
                .delete_audience(&intruder, height, MsgDeleteAudience { aud: AUD.into() }),
            Err(RegistryError::Unauthorized(_))
        ));
        chain
            .registry
            .delete_audience(&owner, height, MsgDeleteAudience { aud: AUD.into() })
            .unwrap();

        let tx = token_tx(&user, 0, 1, b"pay", &issuer, SUB, AUD, NOW);
        assert_eq!(
            chain.authorize(&account, &tx).error,
            Some(AuthError::AudienceNotFound(AUD.into()))
        );

        let intruder_issuer = TokenIssuer::ed25519();
        assert_eq!(
            chain
                .registry
                .claim_audience(&intruder, height, MsgClaimAudience { aud: AUD.into() }),
            Err(RegistryError::NameTaken(AUD.into()))
        );
        assert_eq!(
            chain.registry.create_audience(
                &intruder,
                height,
                MsgCreateAudience {
                    aud: AUD.into(),
                    public_key_jwk: intruder_issuer.jwk(),
                },
            ),
            Err(RegistryError::ClaimRequired(AUD.into()))
        );

        let forged = token_tx(&user, 0, 1, b"pay", &intruder_issuer, SUB, AUD, NOW);
        assert_eq!(
            chain.authorize(&account, &forged).error,
            Some(AuthError::AudienceNotFound(AUD.into()))
        );
        assert_eq!(
            chain.registry.audience_claim(AUD).map(|c| &c.owner),
            Some(&owner)
        );
    }

    /// Audiences keep separate keys: a token signed by one audience's key
    /// is not accepted under another's name.
    #[test]
    fn test_audiences_are_independent() {
        let mut chain = chain();
        let acme_issuer = TokenIssuer::ed25519();
        let globex_issuer = TokenIssuer::ed25519();
        chain.register_audience(&address("acmecorp"), "acme", &acme_issuer);
        chain.register_audience(&address("globexcorp"), "globex", &globex_issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &acme_issuer, SUB, "acme", NOW))
            .unwrap();

        let cross = token_tx(&user, 0, 1, b"pay", &globex_issuer, SUB, "acme", NOW);
        assert_eq!(
            chain.authorize(&account, &cross).error,
            Some(AuthError::SignatureInvalid)
        );

        let foreign = token_tx(&user, 0, 1, b"pay", &globex_issuer, SUB, "globex", NOW);
        assert_eq!(
            chain.authorize(&account, &foreign).error,
            Some(AuthError::SubjectAudienceMismatch)
        );
    }

    /// Tokens expire with block time.
    #[test]
    fn test_token_expires_with_block_time() {
        let mut chain = chain();
        let issuer = TokenIssuer::rsa();
        chain.register_audience(&address("acmecorp"), AUD, &issuer);

        let user = address("alice");
        let account = chain
            .instantiate(&user, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();
        let tx = token_tx(&user, 0, 1, b"pay", &issuer, SUB, AUD, NOW);

        chain.advance(300);
        assert!(chain.authorize(&account, &tx).valid);
        chain.advance(1);
        assert!(matches!(
            chain.authorize(&account, &tx).error,
            Some(AuthError::Expired { .. })
        ));
    }

    // =========================================================================
    // KEY AND PASSKEY FLOWS
    // =========================================================================

    /// Registration payloads arrive as JSON and round through the wire names.
    #[test]
    fn test_instantiate_from_json_payload() {
        let chain = chain();
        let user = address("carol");
        let pair = Ed25519KeyPair::generate();
        let bootstrap = pair.sign(&bootstrap_digest(&user));

        let payload = serde_json::json!({
            "Ed25519": {
                "id": 3,
                "pubkey": encode_base64url(pair.public_key().as_bytes()),
                "signature": encode_base64url(bootstrap.as_bytes()),
            }
        });
        let request: AddAuthenticator = serde_json::from_value(payload).unwrap();
        let account = chain.instantiate(&user, request).unwrap();
        assert!(account.authenticator(3).is_some());

        let tx = transaction(&user, 1, b"stake");
        let signature = pair.sign(&tx.signing_digest());
        let tx = with_envelope(tx, 3, signature.as_bytes());
        assert!(chain.authorize(&account, &tx).valid);
    }

    /// Bootstrap credentials are bound to the account they register on.
    #[test]
    fn test_bootstrap_credential_bound_to_account() {
        let chain = chain();
        let pair = Secp256k1KeyPair::generate();
        let request = secp_request(&address("alice"), &pair);
        assert_eq!(
            chain.instantiate(&address("bob"), request).unwrap_err(),
            AuthError::SignatureInvalid
        );
    }

    /// Passkey device registered against an origin authorizes transactions
    /// from that origin only.
    #[test]
    fn test_passkey_account_end_to_end() {
        let chain = chain();
        let user = address("dave");
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

        let tx = transaction(&user, 1, b"mint");
        let credential = device.sign_transaction(&tx.signing_digest());
        let tx = with_envelope(tx, 0, &credential);
        let result = chain.authorize(&account, &tx);
        assert!(result.valid, "{:?}", result.error);
        assert_eq!(result.gas_used, chain.service.config().costs.passkey);

        let phished = transaction(&user, 2, b"drain");
        let assertion =
            device.assertion_for("webauthn.get", "https://evil.example", &phished.signing_digest());
        let phished = with_envelope(phished, 0, &serde_json::to_vec(&assertion).unwrap());
        assert!(matches!(
            chain.authorize(&account, &phished).error,
            Some(AuthError::OriginMismatch { .. })
        ));
    }

    // =========================================================================
    // AUTHENTICATOR MANAGEMENT
    // =========================================================================

    /// Account with a key and a token authenticator drops the key through a
    /// token-authorized message, then cannot drop its last authenticator.
    #[test]
    fn test_authenticator_rotation_via_execute() {
        let mut chain = chain();
        let issuer = TokenIssuer::ed25519();
        chain.register_audience(&address("acmecorp"), AUD, &issuer);

        let user = address("erin");
        let key = Secp256k1KeyPair::generate();
        let mut account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();
        let token_id = chain
            .add(&mut account, jwt_request(&user, &issuer, SUB, AUD, NOW))
            .unwrap();
        assert_eq!(token_id, 1);

        let body = msg_body(&AccountMsg::RemoveAuthMethod { id: 0 });
        let tx = token_tx(&user, token_id, 1, &body, &issuer, SUB, AUD, NOW);
        chain.execute(&mut account, &tx).unwrap();
        assert_eq!(account.len(), 1);

        let by_old_key = key_tx(&user, 0, 2, b"pay", &key);
        assert_eq!(
            chain.authorize(&account, &by_old_key).error,
            Some(AuthError::AuthenticatorNotFound(0))
        );

        let body = msg_body(&AccountMsg::RemoveAuthMethod { id: token_id });
        let tx = token_tx(&user, token_id, 2, &body, &issuer, SUB, AUD, NOW);
        assert_eq!(chain.execute(&mut account, &tx), Err(AuthError::Lockout));
        assert_eq!(account.len(), 1);
    }

    /// Management messages are not applied when authorization fails.
    #[test]
    fn test_unauthorized_execute_leaves_account_unchanged() {
        let chain = chain();
        let user = address("frank");
        let key = Secp256k1KeyPair::generate();
        let mut account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();

        let other = Secp256k1KeyPair::generate();
        let body = msg_body(&AccountMsg::AddAuthMethod {
            add_authenticator: secp_request(&user, &other),
        });
        let tx = key_tx(&user, 0, 1, &body, &other);
        assert_eq!(
            chain.execute(&mut account, &tx),
            Err(AuthError::SignatureInvalid)
        );
        assert_eq!(account.len(), 1);
    }

    /// Removed ids are never handed out again.
    #[test]
    fn test_removed_id_not_reused() {
        let chain = chain();
        let user = address("grace");
        let first = Secp256k1KeyPair::generate();
        let second = Secp256k1KeyPair::generate();
        let third = Secp256k1KeyPair::generate();

        let mut account = chain.instantiate(&user, secp_request(&user, &first)).unwrap();
        assert_eq!(chain.add(&mut account, secp_request(&user, &second)), Ok(1));
        chain
            .service
            .remove_authenticator(&mut account, 1)
            .unwrap();
        assert_eq!(chain.add(&mut account, secp_request(&user, &third)), Ok(2));

        let reuse = match secp_request(&user, &third) {
            AddAuthenticator::Secp256K1 {
                pubkey, signature, ..
            } => AddAuthenticator::Secp256K1 {
                id: Some(1),
                pubkey,
                signature,
            },
            other => other,
        };
        assert_eq!(
            chain.add(&mut account, reuse),
            Err(AuthError::AuthenticatorIdTaken(1))
        );
    }
}
