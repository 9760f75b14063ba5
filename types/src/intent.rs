// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// The scope a signature commits to.
///
/// Distinct scopes keep signatures from being replayed across contexts: a sender
/// signature over a transaction can never satisfy a fee-payer check, and an offline
/// personal-message signature can never authorize a transaction.
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, JsonSchema)]
#[repr(u8)]
pub enum IntentScope {
    /// A transaction payload signed by the sending account.
    TransactionData = 0,
    /// A transaction payload countersigned by the fee-paying account.
    FeePayerTransactionData = 1,
    /// A free-form message signed outside any transaction.
    PersonalMessage = 2,
}

/// The version of the intent encoding itself.
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, JsonSchema)]
#[repr(u8)]
pub enum IntentVersion {
    V0 = 0,
}

/// The application domain the signature belongs to.
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, JsonSchema)]
#[repr(u8)]
pub enum AppId {
    Nexa = 0,
}

/// A three-byte domain-separation prefix prepended (via BCS) to every signed value.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Hash, JsonSchema)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: IntentVersion,
    pub app_id: AppId,
}

impl Intent {
    pub fn nexa_app(scope: IntentScope) -> Self {
        Self {
            scope,
            version: IntentVersion::V0,
            app_id: AppId::Nexa,
        }
    }

    /// The intent a sender signs a transaction under.
    pub fn nexa_transaction() -> Self {
        Self::nexa_app(IntentScope::TransactionData)
    }

    /// The intent a fee payer countersigns a transaction under.
    pub fn fee_payer_transaction() -> Self {
        Self::nexa_app(IntentScope::FeePayerTransactionData)
    }

    pub fn personal_message() -> Self {
        Self::nexa_app(IntentScope::PersonalMessage)
    }
}

/// Intent message wraps around `value` with its intent. The message can be signed or
/// hashed but never the bare `value` itself.
#[derive(Debug, PartialEq, Eq, Serialize, Clone, Hash, Deserialize)]
pub struct IntentMessage<T> {
    pub intent: Intent,
    pub value: T,
}

impl<T> IntentMessage<T> {
    pub fn new(intent: Intent, value: T) -> Self {
        Self { intent, value }
    }
}

/// A message a user signs outside of any transaction, for ownership proofs.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalMessage {
    pub message: Vec<u8>,
}
