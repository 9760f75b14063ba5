//! # Error Types and Handling
//!
//! ## Overview
//! This module defines the pool-time error tier of the admission core: every way a
//! transaction can be rejected before it is queued. Defects that are only detectable
//! while a transaction executes against state live on the other tier, as receipt
//! statuses in [`crate::effects`].
//!
//! ## Responsibilities
//! - Define the primary error type and result alias used throughout the codebase
//! - Carry enough structured context for callers to correct and resubmit
//!
//! ## Design Patterns
//! - One variant per rejection kind; no stringly-typed catch-alls for decisions
//!   callers branch on
//! - Both tiers are recoverable by resubmission; nothing here is process-fatal

use crate::base::{AddressParseError, InvalidFeeRatio, NexaAddress};
use crate::transaction::TxFieldKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard Result type for admission operations.
///
/// The generic parameter T allows specifying the success type, defaulting to () for
/// operations that don't return a value.
pub type NexaResult<T = ()> = Result<T, NexaError>;

/// Primary error type of the admission core: the pool-time rejection tier.
///
/// A transaction failing any of these checks never enters the pool. The errors are
/// grouped into related categories:
/// - Cryptographic and signature errors
/// - Account-key structural errors detectable before queueing
/// - Address and account-shape guards
/// - Nonce, pricing and gas admission checks
/// - Transaction construction errors
/// - Node-local policy rejections
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Error, Hash)]
pub enum NexaError {
    /// Error when an address format is invalid
    #[error("Invalid address")]
    InvalidAddress,

    /// Error when converting between key formats
    #[error("Key Conversion Error: {0}")]
    KeyConversionError(String),

    /// Error when a cryptographic signature is invalid or does not parse
    #[error("Signature is not valid: {}", error)]
    InvalidSignature { error: String },

    /// Error when a value wasn't signed by the required authority
    #[error("Value was not signed by the correct sender: {}", error)]
    IncorrectSigner { error: String },

    /// Error when a key variant requires an exact signature count and got another
    #[error("Expect {expected} signer signatures but got {actual}")]
    SignerSignatureNumberMismatch { expected: usize, actual: usize },

    /// Error when an account key's threshold exceeds its maximum accumulable weight
    #[error("Account key threshold is unsatisfiable")]
    UnsatisfiableThreshold,

    /// Error when a weighted key exceeds the per-key maximum
    #[error("Account key has {actual} keys, exceeding the maximum of {max}")]
    MaxKeysExceeded { max: usize, actual: usize },

    /// Error when a role-based key nests another composite key
    #[error("A role-based key cannot contain another composite key")]
    NestedCompositeKey,

    /// Error when a transaction targets the reserved precompiled-contract range
    #[error("Address {address} is reserved for precompiled contracts")]
    PrecompiledContractAddress { address: NexaAddress },

    /// Error when a contract execution targets an account holding no program
    #[error("Account {address} is not a program account")]
    NotProgramAccount { address: NexaAddress },

    /// Error when a value transfer targets a program account
    #[error("Account {address} is a program account and cannot receive plain transfers")]
    NotForProgramAccount { address: NexaAddress },

    /// Error when an account creation targets an address that already has state
    #[error("Account {address} already exists")]
    AccountAlreadyExists { address: NexaAddress },

    /// Error when a transaction payload exceeds the protocol size limit
    #[error("Transaction payload of {size} bytes exceeds the limit of {limit}")]
    OversizedData { size: u64, limit: u64 },

    /// Error when a transaction's nonce is below the account's current nonce
    #[error("Nonce {actual} is below the account nonce {expected}")]
    NonceTooLow { expected: u64, actual: u64 },

    /// Error when a transaction is priced below the network unit price
    #[error("Gas price {gas_price} is below the network unit price {unit_price}")]
    InvalidUnitPrice { unit_price: u64, gas_price: u64 },

    /// Error when a transaction's gas limit cannot cover its intrinsic gas
    #[error("Gas limit {limit} is below the intrinsic gas {required}")]
    InsufficientGasLimit { required: u64, limit: u64 },

    /// Error when the intrinsic gas formula overflows
    #[error("Intrinsic gas computation overflowed")]
    GasComputationOverflow,

    /// Error when a transaction requests the disabled human-readable address feature
    #[error("Human-readable addresses are not supported on this network")]
    HumanReadableNotSupported,

    /// Error when a kind/delegation combination is not a valid transaction type
    #[error("Invalid transaction type: {}", error)]
    InvalidTransactionType { error: String },

    /// Error when a required construction field is absent
    #[error("Missing transaction field {field}")]
    MissingTransactionField { field: TxFieldKey },

    /// Error when a construction field carries a value of the wrong type
    #[error("Transaction field {field} has the wrong type")]
    InvalidTransactionFieldType { field: TxFieldKey },

    /// Error when a ratio-delegated transaction carries a degenerate ratio
    #[error("Fee ratio {ratio} out of range, must be in [1, 99]")]
    InvalidFeeRatio { ratio: u8 },

    /// Error when node-local policy refuses the transaction
    #[error("Transaction denied: {}", error)]
    TransactionDenied { error: String },
}

impl From<AddressParseError> for NexaError {
    fn from(_: AddressParseError) -> Self {
        NexaError::InvalidAddress
    }
}

impl From<InvalidFeeRatio> for NexaError {
    fn from(err: InvalidFeeRatio) -> Self {
        NexaError::InvalidFeeRatio { ratio: err.0 }
    }
}
