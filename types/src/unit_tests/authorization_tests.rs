// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::account_key::{AccountKey, Role};
use crate::authorization::{verify_authorization, AuthorizationFailure};
use crate::base::NexaAddress;
use crate::crypto::{KeypairTraits as _, NexaKeyPair, TransactionSignature};
use crate::intent::{Intent, IntentMessage, PersonalMessage};
use crate::unit_tests::utils::{keys, public_key, role_based_key, weighted_key};

fn message() -> IntentMessage<PersonalMessage> {
    IntentMessage::new(
        Intent::personal_message(),
        PersonalMessage { message: "Hello".as_bytes().to_vec() },
    )
}

fn sign(kp: &NexaKeyPair) -> TransactionSignature {
    TransactionSignature::new_secure(&message(), kp)
}

#[test]
fn legacy_key_requires_matching_signer() {
    let keys = keys();
    let signer = NexaAddress::from(keys[0].public());
    let msg = message();

    assert!(verify_authorization(
        &AccountKey::Legacy,
        Role::Transaction,
        signer,
        &msg,
        &[sign(&keys[0])],
    )
    .is_ok());

    // A signature from a different keypair recovers a different address.
    assert_eq!(
        verify_authorization(
            &AccountKey::Legacy,
            Role::Transaction,
            signer,
            &msg,
            &[sign(&keys[1])],
        ),
        Err(AuthorizationFailure::Unauthorized)
    );
}

#[test]
fn single_key_variants_demand_exactly_one_signature() {
    let keys = keys();
    let signer = NexaAddress::from(keys[0].public());
    let msg = message();

    for key in [AccountKey::Legacy, public_key(&keys[0])] {
        assert_eq!(
            verify_authorization(&key, Role::Transaction, signer, &msg, &[]),
            Err(AuthorizationFailure::SignatureCountMismatch { expected: 1, actual: 0 })
        );
        assert_eq!(
            verify_authorization(
                &key,
                Role::Transaction,
                signer,
                &msg,
                &[sign(&keys[0]), sign(&keys[0])],
            ),
            Err(AuthorizationFailure::SignatureCountMismatch { expected: 1, actual: 2 })
        );
    }
}

#[test]
fn public_key_matches_stored_key_not_address() {
    let keys = keys();
    let msg = message();
    // The account address is unrelated to the stored key; only the key matters.
    let signer = NexaAddress::random();
    let key = public_key(&keys[0]);

    assert!(verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[0])]).is_ok());
    assert_eq!(
        verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[1])]),
        Err(AuthorizationFailure::Unauthorized)
    );
}

#[test]
fn fail_and_nil_never_authorize() {
    let keys = keys();
    let signer = NexaAddress::from(keys[0].public());
    let msg = message();

    for key in [AccountKey::Fail, AccountKey::Nil] {
        assert_eq!(
            verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[0])]),
            Err(AuthorizationFailure::Unauthorized)
        );
    }
}

#[test]
fn weighted_threshold_accumulation() {
    let keys = keys();
    let signer = NexaAddress::random();
    let msg = message();
    let key = weighted_key(3, vec![(1, &keys[0]), (2, &keys[1]), (3, &keys[2])]);

    // weight 3 alone meets the threshold
    assert!(verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[2])]).is_ok());
    // 1 + 2 meets it
    assert!(verify_authorization(
        &key,
        Role::Transaction,
        signer,
        &msg,
        &[sign(&keys[0]), sign(&keys[1])],
    )
    .is_ok());
    // 1 alone does not
    assert_eq!(
        verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[0])]),
        Err(AuthorizationFailure::Unauthorized)
    );
}

#[test]
fn weighted_matching_is_order_free_and_consume_once() {
    let keys = keys();
    let signer = NexaAddress::random();
    let msg = message();
    let key = weighted_key(2, vec![(1, &keys[0]), (1, &keys[1]), (1, &keys[2])]);

    // Signature order carries no correspondence to the key-list order.
    assert!(verify_authorization(
        &key,
        Role::Transaction,
        signer,
        &msg,
        &[sign(&keys[2]), sign(&keys[0])],
    )
    .is_ok());

    // The same signature twice consumes its entry only once.
    assert_eq!(
        verify_authorization(
            &key,
            Role::Transaction,
            signer,
            &msg,
            &[sign(&keys[0]), sign(&keys[0])],
        ),
        Err(AuthorizationFailure::Unauthorized)
    );

    // A signature from a key outside the set contributes nothing but is not an error.
    assert!(verify_authorization(
        &key,
        Role::Transaction,
        signer,
        &msg,
        &[sign(&keys[3]), sign(&keys[0]), sign(&keys[1])],
    )
    .is_ok());
}

#[test]
fn unparseable_signature_is_unauthorized_not_error() {
    let keys = keys();
    let signer = NexaAddress::random();
    let msg = message();
    let key = weighted_key(1, vec![(1, &keys[0])]);

    // An all-zero signature cannot recover any key.
    assert_eq!(
        verify_authorization(
            &key,
            Role::Transaction,
            signer,
            &msg,
            &[TransactionSignature::default()],
        ),
        Err(AuthorizationFailure::Unauthorized)
    );
}

#[test]
fn unsatisfiable_threshold_reported_over_unauthorized() {
    let keys = keys();
    let signer = NexaAddress::random();
    let msg = message();
    let key = weighted_key(10, vec![(1, &keys[0]), (2, &keys[1]), (3, &keys[2])]);

    // Even all three valid signatures cannot reach 10; the key itself is the defect.
    assert_eq!(
        verify_authorization(
            &key,
            Role::Transaction,
            signer,
            &msg,
            &[sign(&keys[0]), sign(&keys[1]), sign(&keys[2])],
        ),
        Err(AuthorizationFailure::UnsatisfiableThreshold)
    );
    assert_eq!(
        verify_authorization(&key, Role::Transaction, signer, &msg, &[]),
        Err(AuthorizationFailure::UnsatisfiableThreshold)
    );
}

#[test]
fn roles_are_isolated() {
    let keys = keys();
    let signer = NexaAddress::random();
    let msg = message();
    let key = role_based_key(vec![
        public_key(&keys[0]),
        public_key(&keys[1]),
        public_key(&keys[2]),
    ]);

    // Each role only accepts its own key.
    assert!(verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[0])]).is_ok());
    assert!(verify_authorization(&key, Role::AccountUpdate, signer, &msg, &[sign(&keys[1])]).is_ok());
    assert!(verify_authorization(&key, Role::FeePayer, signer, &msg, &[sign(&keys[2])]).is_ok());

    // The fee-payer key cannot authorize the transaction role, and vice versa.
    assert_eq!(
        verify_authorization(&key, Role::Transaction, signer, &msg, &[sign(&keys[2])]),
        Err(AuthorizationFailure::Unauthorized)
    );
    assert_eq!(
        verify_authorization(&key, Role::FeePayer, signer, &msg, &[sign(&keys[0])]),
        Err(AuthorizationFailure::Unauthorized)
    );
}

#[test]
fn intent_scope_separates_sender_and_fee_payer_signatures() {
    let keys = keys();
    let signer = NexaAddress::random();
    let key = public_key(&keys[0]);

    let value = PersonalMessage { message: "Hello".as_bytes().to_vec() };
    let sender_msg = IntentMessage::new(Intent::nexa_transaction(), &value);
    let payer_msg = IntentMessage::new(Intent::fee_payer_transaction(), &value);

    let sender_sig = TransactionSignature::new_secure(&sender_msg, &keys[0]);

    // The same key, the same payload: only the scope differs, and it must not verify.
    assert!(
        verify_authorization(&key, Role::Transaction, signer, &sender_msg, &[sender_sig.clone()])
            .is_ok()
    );
    assert_eq!(
        verify_authorization(&key, Role::FeePayer, signer, &payer_msg, &[sender_sig]),
        Err(AuthorizationFailure::Unauthorized)
    );
}
