// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::account_key::Role;
use crate::base::{FeeRatio, NexaAddress};
use crate::crypto::{KeypairTraits as _, NexaPublicKeyBytes};
use crate::error::NexaError;
use crate::transaction::{
    BasicTxType, DelegationKind, FeeDelegation, TransactionData, TransactionKind, TxFieldKey,
    TxFieldMap, TxFieldValue, TxType,
};
use crate::unit_tests::utils::{keys, public_key, to_sender_signed_transaction};

fn transfer_fields(sender: NexaAddress, recipient: NexaAddress) -> TxFieldMap {
    TxFieldMap::new()
        .with(TxFieldKey::From, TxFieldValue::Address(sender))
        .with(TxFieldKey::To, TxFieldValue::Address(recipient))
        .with(TxFieldKey::Amount, TxFieldValue::U64(1_000))
        .with(TxFieldKey::Nonce, TxFieldValue::U64(0))
        .with(TxFieldKey::GasPrice, TxFieldValue::U64(25_000_000_000))
        .with(TxFieldKey::GasLimit, TxFieldValue::U64(100_000))
}

#[test]
fn field_map_builds_value_transfer() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();
    let data = TransactionData::from_field_map(
        TxType::basic(BasicTxType::ValueTransfer),
        transfer_fields(sender, recipient),
    )
    .unwrap();

    assert_eq!(data.sender, sender);
    assert_eq!(data.kind, TransactionKind::ValueTransfer { to: recipient, amount: 1_000 });
    assert_eq!(data.fee_delegation, FeeDelegation::None);
    assert_eq!(data.sender_role(), Role::Transaction);
}

#[test]
fn field_map_missing_and_mistyped_fields() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();

    let missing_amount = TxFieldMap::new()
        .with(TxFieldKey::From, TxFieldValue::Address(sender))
        .with(TxFieldKey::To, TxFieldValue::Address(recipient))
        .with(TxFieldKey::Nonce, TxFieldValue::U64(0))
        .with(TxFieldKey::GasPrice, TxFieldValue::U64(1))
        .with(TxFieldKey::GasLimit, TxFieldValue::U64(1));
    assert_eq!(
        TransactionData::from_field_map(TxType::basic(BasicTxType::ValueTransfer), missing_amount),
        Err(NexaError::MissingTransactionField { field: TxFieldKey::Amount })
    );

    let mistyped = transfer_fields(sender, recipient)
        .with(TxFieldKey::Amount, TxFieldValue::Bytes(vec![1, 2]));
    assert_eq!(
        TransactionData::from_field_map(TxType::basic(BasicTxType::ValueTransfer), mistyped),
        Err(NexaError::InvalidTransactionFieldType { field: TxFieldKey::Amount })
    );
}

#[test]
fn field_map_ignores_irrelevant_keys() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();
    let fields = transfer_fields(sender, recipient)
        .with(TxFieldKey::AnchoredData, TxFieldValue::Bytes(vec![0xde, 0xad]));
    // An irrelevant key is not itself an error; it is simply unused.
    assert!(
        TransactionData::from_field_map(TxType::basic(BasicTxType::ValueTransfer), fields).is_ok()
    );
}

#[test]
fn ratio_delegation_requires_ratio_field() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();
    let payer = NexaAddress::random();

    let fields = transfer_fields(sender, recipient)
        .with(TxFieldKey::FeePayer, TxFieldValue::Address(payer));
    assert_eq!(
        TransactionData::from_field_map(
            TxType::delegated_with_ratio(BasicTxType::ValueTransfer),
            fields.clone(),
        ),
        Err(NexaError::MissingTransactionField { field: TxFieldKey::FeeRatioOfFeePayer })
    );

    let fields = fields.with(
        TxFieldKey::FeeRatioOfFeePayer,
        TxFieldValue::FeeRatio(FeeRatio::new(30).unwrap()),
    );
    let data = TransactionData::from_field_map(
        TxType::delegated_with_ratio(BasicTxType::ValueTransfer),
        fields,
    )
    .unwrap();
    assert_eq!(data.fee_delegation.fee_payer(), Some(payer));
    assert_eq!(data.fee_delegation.ratio().unwrap().get(), 30);
    assert_eq!(data.tx_type().delegation, DelegationKind::DelegatedWithRatio);
}

#[test]
fn legacy_transactions_cannot_be_delegated() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();
    let payer = NexaAddress::random();
    let fields = transfer_fields(sender, recipient)
        .with(TxFieldKey::FeePayer, TxFieldValue::Address(payer));

    assert!(matches!(
        TransactionData::from_field_map(TxType::delegated(BasicTxType::Legacy), fields),
        Err(NexaError::InvalidTransactionType { .. })
    ));
}

#[test]
fn account_update_resolves_to_update_role() {
    let keys = keys();
    let data = TransactionData::new_account_update(
        public_key(&keys[1]),
        NexaAddress::random(),
        0,
        25_000_000_000,
        100_000,
    );
    assert_eq!(data.sender_role(), Role::AccountUpdate);
}

#[test]
fn tx_type_display_composes_dimensions() {
    assert_eq!(TxType::basic(BasicTxType::ValueTransfer).to_string(), "ValueTransfer");
    assert_eq!(
        TxType::delegated(BasicTxType::SmartContractExecution).to_string(),
        "FeeDelegatedSmartContractExecution"
    );
    assert_eq!(
        TxType::delegated_with_ratio(BasicTxType::ValueTransfer).to_string(),
        "FeeDelegatedValueTransferWithRatio"
    );
}

#[test]
fn digest_is_stable_and_nonce_sensitive() {
    let sender = NexaAddress::random();
    let recipient = NexaAddress::random();
    let data = TransactionData::new_transfer(recipient, 7, sender, 0, 25_000_000_000, 100_000);
    let same = TransactionData::new_transfer(recipient, 7, sender, 0, 25_000_000_000, 100_000);
    let bumped = TransactionData::new_transfer(recipient, 7, sender, 1, 25_000_000_000, 100_000);

    assert_eq!(data.digest(), same.digest());
    assert_ne!(data.digest(), bumped.digest());
}

#[test]
fn sender_and_fee_payer_signatures_bind_distinct_scopes() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let payer = NexaAddress::from(keys[1].public());
    let data = TransactionData::new_delegated(
        TransactionKind::ValueTransfer { to: NexaAddress::random(), amount: 5 },
        sender,
        payer,
        0,
        25_000_000_000,
        100_000,
    );

    let tx = to_sender_signed_transaction(data, &keys[0]).with_fee_payer_signers(vec![&keys[1]]);

    // Sender signature recovers the sender under the sender intent only.
    let sender_sig = tx.tx_signatures.first();
    assert_eq!(sender_sig.recover_signer(&tx.sender_intent_message()).unwrap(), sender);
    assert!(!sender_sig
        .recover_signer(&tx.fee_payer_intent_message())
        .map(|a| a == sender)
        .unwrap_or(false));

    // Fee-payer signature recovers the payer under the fee-payer intent.
    let payer_sig = &tx.fee_payer_signatures[0];
    assert_eq!(payer_sig.recover_signer(&tx.fee_payer_intent_message()).unwrap(), payer);
}

#[test]
fn public_key_bytes_are_wire_visible_in_keys() {
    let keys = keys();
    let pk = NexaPublicKeyBytes::from(keys[0].public());
    let key = crate::account_key::AccountKey::Public(pk);
    let encoded = bcs::to_bytes(&key).unwrap();
    let decoded: crate::account_key::AccountKey = bcs::from_bytes(&encoded).unwrap();
    assert_eq!(key, decoded);
}
