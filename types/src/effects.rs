// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::account_key::KeyValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # ExecutionStatus
///
/// The outcome recorded on a transaction's receipt once it has been included in a
/// block and executed.
///
/// ## Purpose
/// Some defects are only detectable while a transaction executes against state - most
/// notably the structural walk of an account key being installed. Such a transaction
/// is included in a block, consumes its gas, and its receipt carries a failure status;
/// it never mutates the account it targeted.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Transaction executed successfully
    Success,

    /// Transaction execution failed
    Failure {
        /// The specific error that caused the failure
        error: ExecutionFailureStatus,
    },
}

impl ExecutionStatus {
    pub fn new_failure(error: ExecutionFailureStatus) -> ExecutionStatus {
        ExecutionStatus::Failure { error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ExecutionStatus::Success { .. })
    }

    pub fn is_err(&self) -> bool {
        matches!(self, ExecutionStatus::Failure { .. })
    }

    pub fn unwrap(&self) {
        match self {
            ExecutionStatus::Success => {}
            ExecutionStatus::Failure { .. } => {
                panic!("Unable to unwrap() on {:?}", self);
            }
        }
    }

    pub fn unwrap_err(self) -> ExecutionFailureStatus {
        match self {
            ExecutionStatus::Success { .. } => {
                panic!("Unable to unwrap_err() on {:?}", self);
            }
            ExecutionStatus::Failure { error } => error,
        }
    }
}

/// # ExecutionFailureStatus
///
/// Detailed failure kinds a receipt can carry.
///
/// The account-key kinds mirror [`KeyValidationError`]: a key that passed the
/// pool-time structural screen can still fail the full install-time walk, and the
/// receipt records exactly which invariant it broke.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Serialize, Deserialize, Error)]
pub enum ExecutionFailureStatus {
    //
    // Account-key installation errors
    //
    /// The key's threshold exceeds the sum of its weights; no signature set can ever
    /// satisfy it.
    #[error("account key threshold is unsatisfiable")]
    UnsatisfiableThreshold,

    /// A nil key, alone or inside a role slot, cannot be initialized.
    #[error("account key contains an uninitializable nil entry")]
    NilUninitializable,

    /// A role-based key carries more role entries than roles exist.
    #[error("account key role list is too long")]
    LengthTooLong,

    /// A key carries an empty key list.
    #[error("account key contains an empty key list")]
    ZeroLength,

    /// A weighted key list exceeds the per-key maximum.
    #[error("account key exceeds the maximum number of keys")]
    MaxKeysExceeded,

    /// A role-based key nests another composite key.
    #[error("account key nests a composite key")]
    NestedCompositeKey,

    /// A weighted key carries a zero threshold or a zero-weight entry.
    #[error("account key carries a degenerate threshold or weight")]
    DegenerateWeight,

    //
    // General execution errors
    //
    /// Transaction ran out of gas before completion
    #[error("Insufficient Gas.")]
    InsufficientGas,
}

impl From<KeyValidationError> for ExecutionFailureStatus {
    fn from(err: KeyValidationError) -> Self {
        match err {
            KeyValidationError::UnsatisfiableThreshold { .. } => {
                ExecutionFailureStatus::UnsatisfiableThreshold
            }
            KeyValidationError::NilUninitializable => ExecutionFailureStatus::NilUninitializable,
            KeyValidationError::LengthTooLong { .. } => ExecutionFailureStatus::LengthTooLong,
            KeyValidationError::ZeroLength => ExecutionFailureStatus::ZeroLength,
            KeyValidationError::MaxKeysExceeded { .. } => ExecutionFailureStatus::MaxKeysExceeded,
            KeyValidationError::NestedCompositeKey => ExecutionFailureStatus::NestedCompositeKey,
            KeyValidationError::ZeroThreshold | KeyValidationError::ZeroWeight => {
                ExecutionFailureStatus::DegenerateWeight
            }
        }
    }
}
