// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use protocol_config::{Chain, ProtocolConfig};
use rand::{rngs::StdRng, SeedableRng as _};
use types::account_key::{
    AccountKey, RoleBasedKey, ThresholdUnit, WeightUnit, WeightedMultiSigKey, WeightedPublicKey,
};
use types::crypto::{get_key_pair_from_rng, KeypairTraits as _, NexaKeyPair, NexaPublicKeyBytes};
use types::transaction::{SignedTransaction, TransactionData};

pub fn config() -> ProtocolConfig {
    ProtocolConfig::get_for_max_version(Chain::Unknown)
}

pub fn keys() -> Vec<NexaKeyPair> {
    let mut seed = StdRng::from_seed([0; 32]);
    (0..4).map(|_| get_key_pair_from_rng(&mut seed).1).collect()
}

pub fn public_key(kp: &NexaKeyPair) -> AccountKey {
    AccountKey::Public(NexaPublicKeyBytes::from(kp.public()))
}

pub fn weighted_key(
    threshold: ThresholdUnit,
    entries: Vec<(WeightUnit, &NexaKeyPair)>,
) -> AccountKey {
    AccountKey::WeightedMultiSig(WeightedMultiSigKey::new(
        threshold,
        entries
            .into_iter()
            .map(|(weight, kp)| {
                WeightedPublicKey::new(weight, NexaPublicKeyBytes::from(kp.public()))
            })
            .collect(),
    ))
}

pub fn role_based_key(roles: Vec<AccountKey>) -> AccountKey {
    AccountKey::RoleBased(RoleBasedKey::new(roles))
}

pub fn sign(data: TransactionData, signers: Vec<&NexaKeyPair>) -> SignedTransaction {
    SignedTransaction::from_data_and_signers(data, signers)
}
