// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use rand::{rngs::StdRng, SeedableRng as _};

use crate::{
    account_key::{
        AccountKey, RoleBasedKey, ThresholdUnit, WeightUnit, WeightedMultiSigKey,
        WeightedPublicKey,
    },
    crypto::{get_key_pair_from_rng, KeypairTraits as _, NexaKeyPair, NexaPublicKeyBytes},
    transaction::{SignedTransaction, TransactionData},
};

/// Deterministic key fixtures shared by the test modules.
pub fn keys() -> Vec<NexaKeyPair> {
    let mut seed = StdRng::from_seed([0; 32]);
    (0..4).map(|_| get_key_pair_from_rng(&mut seed).1).collect()
}

pub fn pk_bytes(kp: &NexaKeyPair) -> NexaPublicKeyBytes {
    NexaPublicKeyBytes::from(kp.public())
}

pub fn public_key(kp: &NexaKeyPair) -> AccountKey {
    AccountKey::Public(pk_bytes(kp))
}

pub fn weighted_key(
    threshold: ThresholdUnit,
    entries: Vec<(WeightUnit, &NexaKeyPair)>,
) -> AccountKey {
    AccountKey::WeightedMultiSig(WeightedMultiSigKey::new(
        threshold,
        entries
            .into_iter()
            .map(|(weight, kp)| WeightedPublicKey::new(weight, pk_bytes(kp)))
            .collect(),
    ))
}

pub fn role_based_key(roles: Vec<AccountKey>) -> AccountKey {
    AccountKey::RoleBased(RoleBasedKey::new(roles))
}

// This is used to sign a transaction with a single signer under the sender intent.
pub fn to_sender_signed_transaction(
    data: TransactionData,
    signer: &NexaKeyPair,
) -> SignedTransaction {
    to_sender_signed_transaction_with_multi_signers(data, vec![signer])
}

pub fn to_sender_signed_transaction_with_multi_signers(
    data: TransactionData,
    signers: Vec<&NexaKeyPair>,
) -> SignedTransaction {
    SignedTransaction::from_data_and_signers(data, signers)
}
