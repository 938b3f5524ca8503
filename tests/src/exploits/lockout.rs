//! # Lockout Attacks
//!
//! An account must never end up with zero authenticators, and removals
//! only happen through an authorized transaction.

#[cfg(test)]
mod tests {
    use crate::fixtures::{key_tx, msg_body, secp_request, Chain};
    use qc_18_account_abstraction::testing::{address, AcceptingProofVerifier};
    use qc_18_account_abstraction::{AccountAuthApi, AccountMsg, AuthError};
    use shared_crypto::Secp256k1KeyPair;

    fn chain() -> Chain<AcceptingProofVerifier> {
        Chain::new(AcceptingProofVerifier)
    }

    /// The sole authenticator cannot remove itself.
    #[test]
    fn test_remove_sole_authenticator() {
        let chain = chain();
        let user = address("alice");
        let key = Secp256k1KeyPair::generate();
        let mut account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();

        let body = msg_body(&AccountMsg::RemoveAuthMethod { id: 0 });
        let tx = key_tx(&user, 0, 1, &body, &key);
        assert_eq!(chain.execute(&mut account, &tx), Err(AuthError::Lockout));

        let next = key_tx(&user, 0, 2, b"still here", &key);
        assert!(chain.authorize(&account, &next).valid);
    }

    /// Removing every authenticator one by one stops at the last.
    #[test]
    fn test_sequential_removal_stops_at_last() {
        let chain = chain();
        let user = address("bob");
        let keys: Vec<_> = (0..3).map(|_| Secp256k1KeyPair::generate()).collect();
        let mut account = chain
            .instantiate(&user, secp_request(&user, &keys[0]))
            .unwrap();
        for key in &keys[1..] {
            chain.add(&mut account, secp_request(&user, key)).unwrap();
        }
        assert_eq!(account.len(), 3);

        assert_eq!(chain.service.remove_authenticator(&mut account, 0), Ok(()));
        assert_eq!(chain.service.remove_authenticator(&mut account, 2), Ok(()));
        assert_eq!(
            chain.service.remove_authenticator(&mut account, 1),
            Err(AuthError::Lockout)
        );
        assert_eq!(
            account.authenticators().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![1]
        );
    }

    /// An outsider's signature cannot strip the owner's key.
    #[test]
    fn test_outsider_cannot_remove_authenticator() {
        let chain = chain();
        let user = address("carol");
        let owner_keys = [Secp256k1KeyPair::generate(), Secp256k1KeyPair::generate()];
        let mut account = chain
            .instantiate(&user, secp_request(&user, &owner_keys[0]))
            .unwrap();
        chain
            .add(&mut account, secp_request(&user, &owner_keys[1]))
            .unwrap();

        let outsider = Secp256k1KeyPair::generate();
        let body = msg_body(&AccountMsg::RemoveAuthMethod { id: 0 });
        for id in [0u8, 1, 9] {
            let tx = key_tx(&user, id, 1, &body, &outsider);
            assert!(chain.execute(&mut account, &tx).is_err());
        }
        assert_eq!(account.len(), 2);
    }

    /// Removing an id that was never assigned reports it, not a lockout.
    #[test]
    fn test_remove_unknown_id() {
        let chain = chain();
        let user = address("dave");
        let key = Secp256k1KeyPair::generate();
        let mut account = chain.instantiate(&user, secp_request(&user, &key)).unwrap();
        assert_eq!(
            chain.service.remove_authenticator(&mut account, 42),
            Err(AuthError::AuthenticatorNotFound(42))
        );
    }
}
