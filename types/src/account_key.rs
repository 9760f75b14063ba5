// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Account Key Module
//!
//! ## Overview
//! This module defines the composite signing-authority model bound to Nexa accounts.
//! An account's key is not a single keypair: it is a first-class, mutable object that
//! can require multiple weighted signatures, assign different key sets to different
//! operational roles, and be decoupled entirely from how the address was derived.
//!
//! ## Responsibilities
//! - Define the closed set of account-key variants and their structural invariants
//! - Resolve the concrete key set that must authorize a given role
//! - Count key material for gas purposes (installed leaves, signing cardinality)
//!
//! ## Key Workflows
//! 1. Structural validation when a key is carried by an AccountCreation/AccountUpdate
//! 2. Install-time checking, which additionally walks weighted keys for threshold
//!    reachability
//! 3. Per-role key resolution during signature verification
//!
//! ## Design Patterns
//! - Closed sum type with exhaustive matching; no trait objects
//! - Malformed arities are representable and rejected by validation, because they
//!   arrive from the wire and must map to receipt statuses rather than parse errors

use crate::crypto::NexaPublicKeyBytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// The weight a single entry contributes toward a weighted multi-sig threshold.
pub type WeightUnit = u8;

/// The threshold a weighted multi-sig key must accumulate to authorize.
pub type ThresholdUnit = u16;

/// Max number of entries in a weighted multi-sig key.
pub const MAX_KEYS_IN_MULTISIG: usize = 10;

/// Number of operational roles an account distinguishes.
pub const ROLE_COUNT: usize = 3;

/// The operational role a signature authorizes.
///
/// A role-based account key assigns an independent key set to each role; every other
/// key variant uses the same key material for all three.
#[derive(
    Debug,
    Display,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum Role {
    /// Ordinary transaction signing.
    Transaction = 0,
    /// Authorizing a replacement of the account key itself.
    AccountUpdate = 1,
    /// Countersigning as the fee payer of a delegated transaction.
    FeePayer = 2,
}

impl Role {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One entry of a weighted multi-sig key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct WeightedPublicKey {
    pub weight: WeightUnit,
    pub public_key: NexaPublicKeyBytes,
}

impl WeightedPublicKey {
    pub fn new(weight: WeightUnit, public_key: NexaPublicKeyBytes) -> Self {
        Self { weight, public_key }
    }
}

/// A key requiring signatures whose summed weights meet a threshold.
///
/// Entries are ordered; verification consumes each entry at most once. Nothing at
/// construction time forces `threshold <= sum(weights)`: an unsatisfiable key is only
/// fatal when it is installed or used, and is reported then (see
/// [`AccountKey::check_installable`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct WeightedMultiSigKey {
    pub threshold: ThresholdUnit,
    pub entries: Vec<WeightedPublicKey>,
}

impl WeightedMultiSigKey {
    pub fn new(threshold: ThresholdUnit, entries: Vec<WeightedPublicKey>) -> Self {
        Self { threshold, entries }
    }

    /// Sum of all entry weights, matched or not.
    pub fn sum_of_weights(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    fn validate_structure(&self) -> Result<(), KeyValidationError> {
        if self.entries.is_empty() {
            return Err(KeyValidationError::ZeroLength);
        }
        if self.entries.len() > MAX_KEYS_IN_MULTISIG {
            return Err(KeyValidationError::MaxKeysExceeded {
                max: MAX_KEYS_IN_MULTISIG,
                actual: self.entries.len(),
            });
        }
        if self.threshold == 0 {
            return Err(KeyValidationError::ZeroThreshold);
        }
        if self.entries.iter().any(|e| e.weight == 0) {
            return Err(KeyValidationError::ZeroWeight);
        }
        Ok(())
    }

    fn check_satisfiable(&self) -> Result<(), KeyValidationError> {
        let max_weight = self.sum_of_weights();
        if max_weight < self.threshold as u64 {
            return Err(KeyValidationError::UnsatisfiableThreshold {
                threshold: self.threshold,
                max_weight,
            });
        }
        Ok(())
    }
}

/// A key assigning one sub-key per role.
///
/// A well-formed value has exactly [`ROLE_COUNT`] entries, none of which is `Nil` and
/// none of which is itself role-based. Malformed values are representable (they arrive
/// from the wire) and are rejected by [`AccountKey::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RoleBasedKey {
    pub roles: Vec<AccountKey>,
}

static NIL_KEY: AccountKey = AccountKey::Nil;

impl RoleBasedKey {
    pub fn new(roles: Vec<AccountKey>) -> Self {
        Self { roles }
    }

    /// The sub-key bound to `role`. Out-of-range slots read as `Nil`, which never
    /// authorizes anything.
    pub fn key_for_role(&self, role: Role) -> &AccountKey {
        self.roles.get(role.index()).unwrap_or(&NIL_KEY)
    }
}

/// The fieldless discriminant of an [`AccountKey`], for diagnostics and wire tags.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AccountKeyKind {
    Nil,
    Legacy,
    Fail,
    Public,
    WeightedMultiSig,
    RoleBased,
}

/// The signing authority bound to an account.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AccountKey {
    /// No key material. Only meaningful as a slot value inside wire-decoded role-based
    /// keys; installing it, alone or inside a role slot, is rejected.
    Nil,
    /// The signing key is implicitly the one whose derived address equals the account
    /// address. No explicit key material is stored.
    Legacy,
    /// A sentinel that never authorizes. Bound to program accounts so they can never
    /// sign on their own behalf.
    Fail,
    /// Exactly one public key; threshold 1.
    Public(NexaPublicKeyBytes),
    /// Weighted multi-signature key.
    WeightedMultiSig(WeightedMultiSigKey),
    /// Independent sub-key per role.
    RoleBased(RoleBasedKey),
}

/// A structural defect found while validating an account key.
///
/// `MaxKeysExceeded` and `NestedCompositeKey` are rejected before a transaction enters
/// the pool; the remaining kinds can only be detected by walking the key tree when the
/// carrying transaction executes, and surface as receipt statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum KeyValidationError {
    #[error("key contains an empty key list")]
    ZeroLength,
    #[error("key list has {actual} entries, exceeding the maximum of {max}")]
    MaxKeysExceeded { max: usize, actual: usize },
    #[error("role-based key has {actual} role entries, exceeding the maximum of {max}")]
    LengthTooLong { max: usize, actual: usize },
    #[error("a nil key cannot be initialized")]
    NilUninitializable,
    #[error("a role-based key cannot contain another composite key")]
    NestedCompositeKey,
    #[error("weighted key threshold must be at least 1")]
    ZeroThreshold,
    #[error("weighted key entries must have non-zero weight")]
    ZeroWeight,
    #[error("threshold {threshold} exceeds the maximum accumulable weight {max_weight}")]
    UnsatisfiableThreshold { threshold: ThresholdUnit, max_weight: u64 },
}

impl AccountKey {
    pub fn kind(&self) -> AccountKeyKind {
        match self {
            AccountKey::Nil => AccountKeyKind::Nil,
            AccountKey::Legacy => AccountKeyKind::Legacy,
            AccountKey::Fail => AccountKeyKind::Fail,
            AccountKey::Public(_) => AccountKeyKind::Public,
            AccountKey::WeightedMultiSig(_) => AccountKeyKind::WeightedMultiSig,
            AccountKey::RoleBased(_) => AccountKeyKind::RoleBased,
        }
    }

    /// Purely structural validation of a key about to be installed.
    ///
    /// Independent of any runtime key material correctness and of account state; the
    /// same key object always validates to the same result.
    pub fn validate(&self) -> Result<(), KeyValidationError> {
        match self {
            AccountKey::Nil => Err(KeyValidationError::NilUninitializable),
            AccountKey::Legacy | AccountKey::Fail | AccountKey::Public(_) => Ok(()),
            AccountKey::WeightedMultiSig(key) => key.validate_structure(),
            AccountKey::RoleBased(key) => {
                if key.roles.is_empty() {
                    return Err(KeyValidationError::ZeroLength);
                }
                if key.roles.len() > ROLE_COUNT {
                    return Err(KeyValidationError::LengthTooLong {
                        max: ROLE_COUNT,
                        actual: key.roles.len(),
                    });
                }
                // Fewer than three entries leaves the trailing roles uninitialized,
                // which is the same defect as an explicit nil slot.
                if key.roles.len() < ROLE_COUNT {
                    return Err(KeyValidationError::NilUninitializable);
                }
                for entry in &key.roles {
                    match entry {
                        AccountKey::Nil => return Err(KeyValidationError::NilUninitializable),
                        AccountKey::RoleBased(_) => {
                            return Err(KeyValidationError::NestedCompositeKey)
                        }
                        AccountKey::WeightedMultiSig(inner) => inner.validate_structure()?,
                        AccountKey::Legacy | AccountKey::Fail | AccountKey::Public(_) => {}
                    }
                }
                Ok(())
            }
        }
    }

    /// Everything [`Self::validate`] checks, plus threshold reachability of every
    /// weighted key in the tree. Run when the key is actually installed on-chain.
    pub fn check_installable(&self) -> Result<(), KeyValidationError> {
        self.validate()?;
        match self {
            AccountKey::WeightedMultiSig(key) => key.check_satisfiable(),
            AccountKey::RoleBased(key) => {
                for entry in &key.roles {
                    if let AccountKey::WeightedMultiSig(inner) = entry {
                        inner.check_satisfiable()?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// The concrete key that must authorize `role`.
    ///
    /// Only a role-based key distinguishes roles; every other variant is its own
    /// resolution regardless of role.
    pub fn key_for_role(&self, role: Role) -> &AccountKey {
        match self {
            AccountKey::RoleBased(key) => key.key_for_role(role),
            _ => self,
        }
    }

    /// Total leaf-key count of this key, the unit the key-material gas term scales by.
    pub fn num_keys(&self) -> u64 {
        match self {
            AccountKey::Nil | AccountKey::Legacy | AccountKey::Fail => 0,
            AccountKey::Public(_) => 1,
            AccountKey::WeightedMultiSig(key) => key.entries.len() as u64,
            AccountKey::RoleBased(key) => key.roles.iter().map(|k| k.num_keys()).sum(),
        }
    }

    /// The key-set cardinality used for the per-signer validation gas term.
    ///
    /// This is the size of the key set a verifier must consider, not the number of
    /// signatures actually supplied. For a role-based key the caller resolves the role
    /// first; resolving here falls back to the transaction role.
    pub fn signing_cardinality(&self) -> u64 {
        match self {
            AccountKey::Nil | AccountKey::Legacy | AccountKey::Fail | AccountKey::Public(_) => 1,
            AccountKey::WeightedMultiSig(key) => key.entries.len() as u64,
            AccountKey::RoleBased(_) => self.key_for_role(Role::Transaction).signing_cardinality(),
        }
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::Nil | AccountKey::Legacy | AccountKey::Fail => {
                write!(f, "{}", self.kind())
            }
            AccountKey::Public(pk) => write!(f, "Public({})", pk),
            AccountKey::WeightedMultiSig(key) => f
                .debug_struct("WeightedMultiSig")
                .field("threshold", &key.threshold)
                .field("entries", &key.entries.len())
                .finish(),
            AccountKey::RoleBased(key) => f
                .debug_list()
                .entries(key.roles.iter().map(|k| k.kind()))
                .finish(),
        }
    }
}

