// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Intrinsic Gas Module
//!
//! ## Overview
//! Computes the gas a transaction must consume before any contract code runs. The
//! total is additive over independent terms: a per-type base, a per-byte payload term,
//! a key-material term when a key is installed, a validation term per authorizing
//! party scaled by key-set cardinality, and a flat fee-delegation surcharge.
//!
//! ## Responsibilities
//! - Price every transaction kind from the protocol gas schedule
//! - Scale validation cost by the signer's and fee payer's resolved key sets
//! - Keep all arithmetic checked; an overflowing formula is a rejection, not a wrap

use crate::account_key::{AccountKey, Role};
use crate::error::{NexaError, NexaResult};
use crate::transaction::{DelegationKind, TransactionData, TransactionKind};
use protocol_config::ProtocolConfig;

fn checked_add(a: u64, b: u64) -> NexaResult<u64> {
    a.checked_add(b).ok_or(NexaError::GasComputationOverflow)
}

fn checked_mul(a: u64, b: u64) -> NexaResult<u64> {
    a.checked_mul(b).ok_or(NexaError::GasComputationOverflow)
}

/// Total intrinsic gas of `tx`.
///
/// `sender_key` is the sender's current account key; `fee_payer_key` the fee payer's,
/// present when the transaction is delegated. A missing key (an account with no state
/// yet) prices as the implicit legacy key. The validation terms scale with the
/// cardinality of each party's resolved-role key set, never with how many signatures
/// were actually supplied.
pub fn intrinsic_gas(
    tx: &TransactionData,
    sender_key: &AccountKey,
    fee_payer_key: Option<&AccountKey>,
    config: &ProtocolConfig,
) -> NexaResult<u64> {
    let mut gas = base_gas(&tx.kind, config)?;
    gas = checked_add(gas, payload_gas(&tx.kind, config)?)?;
    gas = checked_add(gas, key_material_gas(&tx.kind, config)?)?;

    let sender_cardinality = sender_key.key_for_role(tx.sender_role()).signing_cardinality();
    gas = checked_add(gas, validation_gas(sender_cardinality, config)?)?;

    match tx.fee_delegation.kind() {
        DelegationKind::None => {}
        DelegationKind::Delegated => {
            let payer_cardinality = fee_payer_cardinality(fee_payer_key);
            gas = checked_add(gas, validation_gas(payer_cardinality, config)?)?;
            gas = checked_add(gas, config.tx_gas_fee_delegated())?;
        }
        DelegationKind::DelegatedWithRatio => {
            let payer_cardinality = fee_payer_cardinality(fee_payer_key);
            gas = checked_add(gas, validation_gas(payer_cardinality, config)?)?;
            gas = checked_add(gas, config.tx_gas_fee_delegated_with_ratio())?;
        }
    }

    Ok(gas)
}

fn fee_payer_cardinality(fee_payer_key: Option<&AccountKey>) -> u64 {
    fee_payer_key
        .map(|key| key.key_for_role(Role::FeePayer).signing_cardinality())
        .unwrap_or(1)
}

/// The per-type base term. Chain-data anchoring scales linearly with the anchored
/// payload; every other base is a flat constant.
fn base_gas(kind: &TransactionKind, config: &ProtocolConfig) -> NexaResult<u64> {
    Ok(match kind {
        TransactionKind::Legacy { to: Some(_), .. }
        | TransactionKind::ValueTransfer { .. }
        | TransactionKind::ValueTransferMemo { .. } => config.tx_gas(),
        // A legacy transaction without a target deploys a contract.
        TransactionKind::Legacy { to: None, .. } => config.tx_gas_contract_creation(),
        TransactionKind::AccountCreation { .. } => config.tx_gas_account_creation(),
        TransactionKind::AccountUpdate { .. } => config.tx_gas_account_update(),
        TransactionKind::SmartContractDeploy { .. } => config.tx_gas_contract_creation(),
        TransactionKind::SmartContractExecution { .. } => config.tx_gas_contract_execution(),
        TransactionKind::Cancel => config.tx_gas_cancel(),
        TransactionKind::ChainDataAnchoring { anchored_data } => checked_add(
            config.tx_gas_chain_data_anchoring(),
            checked_mul(anchored_data.len() as u64, config.chain_data_anchoring_gas())?,
        )?,
    })
}

/// The zero/non-zero per-byte payload term for memo- and data-bearing kinds.
/// Anchored data is priced in the base term and does not count here.
fn payload_gas(kind: &TransactionKind, config: &ProtocolConfig) -> NexaResult<u64> {
    let payload: &[u8] = match kind {
        TransactionKind::Legacy { payload, .. }
        | TransactionKind::SmartContractDeploy { payload, .. }
        | TransactionKind::SmartContractExecution { payload, .. } => payload,
        TransactionKind::ValueTransferMemo { memo, .. } => memo,
        _ => return Ok(0),
    };
    let zero_bytes = payload.iter().filter(|b| **b == 0).count() as u64;
    let non_zero_bytes = payload.len() as u64 - zero_bytes;
    checked_add(
        checked_mul(zero_bytes, config.tx_data_zero_gas())?,
        checked_mul(non_zero_bytes, config.tx_data_non_zero_gas())?,
    )
}

/// The key-material term for transactions installing a new account key, scaled by the
/// total leaf-key count of the key being installed.
fn key_material_gas(kind: &TransactionKind, config: &ProtocolConfig) -> NexaResult<u64> {
    let Some(new_key) = kind.new_account_key() else {
        return Ok(0);
    };
    checked_add(
        config.account_creation_gas_default(),
        checked_mul(new_key.num_keys(), config.account_creation_gas_per_key())?,
    )
}

/// The per-party validation term: a flat default plus a per-key surcharge for every
/// key in the resolved set beyond the first.
fn validation_gas(cardinality: u64, config: &ProtocolConfig) -> NexaResult<u64> {
    checked_add(
        config.tx_validation_gas_default(),
        checked_mul(cardinality.saturating_sub(1), config.tx_validation_gas_per_key())?,
    )
}

