// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Authorization Module
//!
//! ## Overview
//! Decides whether a list of signatures authorizes a given role against an account
//! key. Signatures carry no index into the key list: matching is a set-cover problem,
//! solved greedily by recovering each signature's public key and consuming the first
//! unused key entry it matches.
//!
//! ## Responsibilities
//! - Resolve the role on the account key and dispatch per key variant
//! - Enforce the exactly-one-signature rule for address-bound and single-key accounts
//! - Accumulate matched weights against the threshold for weighted keys
//! - Distinguish an unsatisfiable key (threshold unreachable by any signature set)
//!   from a merely unauthorized attempt

use crate::account_key::{AccountKey, Role, WeightedMultiSigKey};
use crate::base::NexaAddress;
use crate::crypto::{NexaPublicKeyBytes, TransactionSignature};
use crate::intent::IntentMessage;
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

/// Why an authorization attempt did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationFailure {
    /// The key variant requires an exact signature count and got something else.
    /// Detected before any cryptography runs, and rejected pool-side.
    #[error("Expect {expected} signer signatures but got {actual}")]
    SignatureCountMismatch { expected: usize, actual: usize },

    /// The signatures do not satisfy the key. Unparseable signatures and signatures
    /// from unknown keys land here; they are not distinct conditions.
    #[error("signatures do not satisfy the account key")]
    Unauthorized,

    /// The key's threshold exceeds the sum of all its weights: no signature set can
    /// ever satisfy it. Reported separately because the defect is in the installed
    /// key, not in the supplied signatures.
    #[error("account key threshold is unsatisfiable")]
    UnsatisfiableThreshold,
}

/// Verify that `signatures` authorize `role` on behalf of `signer`, whose current
/// account key is `account_key`.
///
/// The message the signatures are checked against is the intent-wrapped value; sender
/// and fee-payer checks pass different intents over the same transaction, so a
/// signature can only ever count for the role scope it was produced under.
pub fn verify_authorization<T>(
    account_key: &AccountKey,
    role: Role,
    signer: NexaAddress,
    value: &IntentMessage<T>,
    signatures: &[TransactionSignature],
) -> Result<(), AuthorizationFailure>
where
    T: Serialize,
{
    match account_key.key_for_role(role) {
        AccountKey::Legacy => {
            let signature = exactly_one(signatures)?;
            match signature.recover_signer(value) {
                Ok(recovered) if recovered == signer => Ok(()),
                Ok(recovered) => {
                    trace!(%signer, %recovered, ?role, "legacy key signer mismatch");
                    Err(AuthorizationFailure::Unauthorized)
                }
                Err(_) => Err(AuthorizationFailure::Unauthorized),
            }
        }
        AccountKey::Public(stored) => {
            let signature = exactly_one(signatures)?;
            match signature.recover_public_key(value) {
                Ok(recovered) if NexaPublicKeyBytes::from(&recovered) == *stored => Ok(()),
                Ok(_) | Err(_) => Err(AuthorizationFailure::Unauthorized),
            }
        }
        AccountKey::WeightedMultiSig(key) => verify_weighted(key, value, signatures),
        // Fail never authorizes; Nil holds no key material; a nested role-based key is
        // structurally invalid and treated the same as no key.
        AccountKey::Fail | AccountKey::Nil | AccountKey::RoleBased(_) => {
            Err(AuthorizationFailure::Unauthorized)
        }
    }
}

fn exactly_one(
    signatures: &[TransactionSignature],
) -> Result<&TransactionSignature, AuthorizationFailure> {
    match signatures {
        [signature] => Ok(signature),
        _ => Err(AuthorizationFailure::SignatureCountMismatch {
            expected: 1,
            actual: signatures.len(),
        }),
    }
}

fn verify_weighted<T>(
    key: &WeightedMultiSigKey,
    value: &IntentMessage<T>,
    signatures: &[TransactionSignature],
) -> Result<(), AuthorizationFailure>
where
    T: Serialize,
{
    // Even a full set of valid signatures cannot help a key whose weights do not reach
    // its threshold; report the key defect, not the signatures.
    if key.sum_of_weights() < key.threshold as u64 {
        return Err(AuthorizationFailure::UnsatisfiableThreshold);
    }

    let mut used = vec![false; key.entries.len()];
    let mut accumulated: u64 = 0;
    for signature in signatures {
        // A signature that fails to parse or recover contributes nothing.
        let Ok(recovered) = signature.recover_public_key(value) else {
            continue;
        };
        let recovered = NexaPublicKeyBytes::from(&recovered);
        // First unused entry wins; a duplicate signature cannot double-count an entry.
        let matched = key
            .entries
            .iter()
            .enumerate()
            .find(|(i, entry)| !used[*i] && entry.public_key == recovered);
        if let Some((i, entry)) = matched {
            used[i] = true;
            accumulated += entry.weight as u64;
            if accumulated >= key.threshold as u64 {
                return Ok(());
            }
        }
    }

    trace!(
        accumulated,
        threshold = key.threshold as u64,
        "weighted multi-sig threshold not met"
    );
    Err(AuthorizationFailure::Unauthorized)
}

