// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! The pool-time admission pipeline.
//!
//! Every check here runs before a transaction is queued, reads account state only
//! through a [`StateReader`] snapshot, and writes nothing. The pipeline either prices
//! the transaction with its intrinsic gas or rejects it with a typed error the
//! submitter can act on. Defects that need the executing state walk (the install-time
//! account-key checks) are deliberately not rejected here; they surface as receipt
//! statuses in [`crate::execution`].

use protocol_config::ProtocolConfig;
use tracing::{instrument, trace};
use types::account::Account;
use types::account_key::{KeyValidationError, Role};
use types::authorization::{verify_authorization, AuthorizationFailure};
use types::base::NexaAddress;
use types::config::transaction_deny_config::TransactionDenyConfig;
use types::digests::TransactionDigest;
use types::error::{NexaError, NexaResult};
use types::gas::intrinsic_gas;
use types::transaction::{SignedTransaction, TransactionData, TransactionKind};

use crate::state_reader::StateReader;

/// A transaction that passed every pool-time check, priced with its intrinsic gas.
#[derive(Debug, Clone)]
pub struct AdmittedTransaction {
    transaction: SignedTransaction,
    intrinsic_gas: u64,
    digest: TransactionDigest,
}

impl AdmittedTransaction {
    pub fn transaction(&self) -> &SignedTransaction {
        &self.transaction
    }

    pub fn intrinsic_gas(&self) -> u64 {
        self.intrinsic_gas
    }

    pub fn digest(&self) -> TransactionDigest {
        self.digest
    }

    pub fn into_inner(self) -> SignedTransaction {
        self.transaction
    }
}

macro_rules! deny_if_true {
    ($cond:expr, $msg:expr) => {
        if ($cond) {
            return Err(NexaError::TransactionDenied { error: $msg.to_string() });
        }
    };
}

/// Run the full admission pipeline for one transaction against a state snapshot.
///
/// The order is fixed: node policy, type-level shape, address-range and
/// account-shape guards, nonce and pricing, pool-detectable key structure, sender and
/// fee-payer authorization, and finally intrinsic gas against the gas limit.
#[instrument(level = "trace", skip_all, fields(digest = %transaction.digest()))]
pub fn check_transaction_admissible<S: StateReader>(
    state: &S,
    protocol_config: &ProtocolConfig,
    deny_config: &TransactionDenyConfig,
    transaction: &SignedTransaction,
) -> NexaResult<AdmittedTransaction> {
    let tx_data = transaction.data();

    check_transaction_for_signing(tx_data, deny_config)?;
    tx_data.validity_check()?;
    check_transaction_shape(protocol_config, transaction)?;
    check_address_guards(state, tx_data)?;

    let sender_account = resolve_account(state, tx_data.sender);
    let fee_payer_account = tx_data
        .fee_delegation
        .fee_payer()
        .map(|address| resolve_account(state, address));

    check_nonce_and_price(protocol_config, tx_data, &sender_account)?;
    check_new_account_key(tx_data)?;
    check_authorization(transaction, &sender_account, fee_payer_account.as_ref())?;

    let intrinsic = intrinsic_gas(
        tx_data,
        &sender_account.account_key,
        fee_payer_account.as_ref().map(|a| &a.account_key),
        protocol_config,
    )?;
    if tx_data.gas_limit < intrinsic {
        return Err(NexaError::InsufficientGasLimit {
            required: intrinsic,
            limit: tx_data.gas_limit,
        });
    }

    let digest = transaction.digest();
    trace!(intrinsic, "transaction admitted");
    Ok(AdmittedTransaction {
        transaction: transaction.clone(),
        intrinsic_gas: intrinsic,
        digest,
    })
}

/// The account backing `address`: its stored state, or the implicit legacy account
/// when the address has none yet.
fn resolve_account<S: StateReader>(state: &S, address: NexaAddress) -> Account {
    state
        .get_account(&address)
        .unwrap_or_else(|| Account::new_legacy(address))
}

/// Check that the provided transaction is allowed to be signed according to the
/// deny config.
fn check_transaction_for_signing(
    tx_data: &TransactionData,
    deny_config: &TransactionDenyConfig,
) -> NexaResult {
    deny_if_true!(
        deny_config.user_transaction_disabled(),
        "Transaction signing is temporarily disabled"
    );

    let deny_set = deny_config.get_address_deny_set();
    if deny_set.is_empty() {
        return Ok(());
    }
    deny_if_true!(
        deny_set.contains(&tx_data.sender),
        format!("Access to account address {:?} is temporarily disabled", tx_data.sender)
    );
    if let Some(fee_payer) = tx_data.fee_delegation.fee_payer() {
        deny_if_true!(
            deny_set.contains(&fee_payer),
            format!("Access to account address {:?} is temporarily disabled", fee_payer)
        );
    }
    Ok(())
}

/// Stateless shape checks: payload size, disabled features, and signature-set
/// placement.
fn check_transaction_shape(
    protocol_config: &ProtocolConfig,
    transaction: &SignedTransaction,
) -> NexaResult {
    let tx_data = transaction.data();

    if let Some(payload) = tx_data.kind.payload() {
        let limit = protocol_config.max_tx_payload_bytes();
        if payload.len() as u64 > limit {
            return Err(NexaError::OversizedData {
                size: payload.len() as u64,
                limit,
            });
        }
    }

    if tx_data.kind.human_readable() {
        return Err(NexaError::HumanReadableNotSupported);
    }

    if !tx_data.fee_delegation.is_delegated() && !transaction.fee_payer_signatures.is_empty() {
        return Err(NexaError::InvalidTransactionType {
            error: "fee-payer signatures on a non-delegated transaction".to_string(),
        });
    }

    Ok(())
}

/// Address-range and account-shape guards, each a hard reject.
fn check_address_guards<S: StateReader>(state: &S, tx_data: &TransactionData) -> NexaResult {
    if tx_data.kind.forbids_precompiled_target() {
        if let Some(to) = tx_data.kind.to() {
            if to.is_precompiled() {
                return Err(NexaError::PrecompiledContractAddress { address: to });
            }
        }
    }

    match &tx_data.kind {
        TransactionKind::SmartContractExecution { to, .. } => {
            let is_program = state
                .get_account(to)
                .map(|account| account.is_program_account())
                .unwrap_or(false);
            if !is_program {
                return Err(NexaError::NotProgramAccount { address: *to });
            }
        }
        TransactionKind::ValueTransfer { to, .. }
        | TransactionKind::ValueTransferMemo { to, .. } => {
            if let Some(account) = state.get_account(to) {
                if account.is_program_account() {
                    return Err(NexaError::NotForProgramAccount { address: *to });
                }
            }
        }
        TransactionKind::AccountCreation { to, .. } => {
            if state.get_account(to).is_some() {
                return Err(NexaError::AccountAlreadyExists { address: *to });
            }
        }
        _ => {}
    }

    Ok(())
}

fn check_nonce_and_price(
    protocol_config: &ProtocolConfig,
    tx_data: &TransactionData,
    sender_account: &Account,
) -> NexaResult {
    if tx_data.nonce < sender_account.nonce {
        return Err(NexaError::NonceTooLow {
            expected: sender_account.nonce,
            actual: tx_data.nonce,
        });
    }
    let unit_price = protocol_config.unit_price();
    if tx_data.gas_price < unit_price {
        return Err(NexaError::InvalidUnitPrice {
            unit_price,
            gas_price: tx_data.gas_price,
        });
    }
    Ok(())
}

/// Pool-detectable structure of a key being installed. Only the kinds a node can
/// refuse without walking state are rejected here; the rest are left for the
/// execution receipt.
fn check_new_account_key(tx_data: &TransactionData) -> NexaResult {
    let Some(new_key) = tx_data.kind.new_account_key() else {
        return Ok(());
    };
    match new_key.validate() {
        Ok(())
        | Err(KeyValidationError::ZeroLength)
        | Err(KeyValidationError::LengthTooLong { .. })
        | Err(KeyValidationError::NilUninitializable)
        | Err(KeyValidationError::ZeroThreshold)
        | Err(KeyValidationError::ZeroWeight)
        | Err(KeyValidationError::UnsatisfiableThreshold { .. }) => Ok(()),
        Err(KeyValidationError::MaxKeysExceeded { max, actual }) => {
            Err(NexaError::MaxKeysExceeded { max, actual })
        }
        Err(KeyValidationError::NestedCompositeKey) => Err(NexaError::NestedCompositeKey),
    }
}

fn check_authorization(
    transaction: &SignedTransaction,
    sender_account: &Account,
    fee_payer_account: Option<&Account>,
) -> NexaResult {
    let tx_data = transaction.data();

    let sender_role = tx_data.sender_role();
    let sender_sigs: Vec<_> = transaction.tx_signatures.iter().cloned().collect();
    verify_authorization(
        &sender_account.account_key,
        sender_role,
        tx_data.sender,
        &transaction.sender_intent_message(),
        &sender_sigs,
    )
    .map_err(|failure| authorization_error(failure, sender_role, tx_data.sender))?;

    if let Some(payer_account) = fee_payer_account {
        verify_authorization(
            &payer_account.account_key,
            Role::FeePayer,
            payer_account.address,
            &transaction.fee_payer_intent_message(),
            &transaction.fee_payer_signatures,
        )
        .map_err(|failure| authorization_error(failure, Role::FeePayer, payer_account.address))?;
    }

    Ok(())
}

fn authorization_error(
    failure: AuthorizationFailure,
    role: Role,
    address: NexaAddress,
) -> NexaError {
    match failure {
        AuthorizationFailure::SignatureCountMismatch { expected, actual } => {
            NexaError::SignerSignatureNumberMismatch { expected, actual }
        }
        AuthorizationFailure::Unauthorized => NexaError::IncorrectSigner {
            error: format!("{} authorization failed for {}", role, address),
        },
        AuthorizationFailure::UnsatisfiableThreshold => NexaError::UnsatisfiableThreshold,
    }
}

