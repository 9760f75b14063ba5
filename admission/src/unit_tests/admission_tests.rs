// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use rand::{rngs::StdRng, SeedableRng as _};
use types::account::Account;
use types::base::{FeeRatio, NexaAddress};
use types::config::transaction_deny_config::{TransactionDenyConfig, TransactionDenyConfigBuilder};
use types::crypto::{get_key_pair_from_rng, KeypairTraits as _, NexaKeyPair};
use types::error::NexaError;
use types::transaction::{SignedTransaction, TransactionData, TransactionKind};

use crate::state_reader::InMemoryStateReader;
use crate::transaction_checks::check_transaction_admissible;
use crate::unit_tests::utils::{config, keys, public_key, role_based_key, sign, weighted_key};

const GAS_PRICE: u64 = 25_000_000_000;
const GAS_LIMIT: u64 = 10_000_000;

fn admit(
    state: &InMemoryStateReader,
    tx: &SignedTransaction,
) -> Result<u64, NexaError> {
    check_transaction_admissible(state, &config(), &TransactionDenyConfig::default(), tx)
        .map(|admitted| admitted.intrinsic_gas())
}

fn legacy_transfer(sender_kp: &NexaKeyPair, to: NexaAddress) -> SignedTransaction {
    let sender = NexaAddress::from(sender_kp.public());
    sign(
        TransactionData::new_transfer(to, 100, sender, 0, GAS_PRICE, GAS_LIMIT),
        vec![sender_kp],
    )
}

#[test]
fn legacy_transfer_admits_at_base_gas() {
    let keys = keys();
    let state = InMemoryStateReader::new();
    let tx = legacy_transfer(&keys[0], NexaAddress::random());

    let cfg = config();
    assert_eq!(admit(&state, &tx).unwrap(), cfg.tx_gas());
}

#[test]
fn reserved_address_range_is_fenced() {
    let keys = keys();
    let state = InMemoryStateReader::new();

    let reserved = NexaAddress::from_hex_literal("0x3ff").unwrap();
    let tx = legacy_transfer(&keys[0], reserved);
    assert_eq!(
        admit(&state, &tx),
        Err(NexaError::PrecompiledContractAddress { address: reserved })
    );

    // The first unrestricted address admits.
    let unrestricted = NexaAddress::from_hex_literal("0x400").unwrap();
    let tx = legacy_transfer(&keys[0], unrestricted);
    assert!(admit(&state, &tx).is_ok());
}

#[test]
fn reserved_range_applies_to_creation_and_deploy() {
    let keys = keys();
    let state = InMemoryStateReader::new();
    let sender = NexaAddress::from(keys[0].public());
    let reserved = NexaAddress::from_hex_literal("0x5").unwrap();

    let creation = sign(
        TransactionData::new(
            TransactionKind::AccountCreation {
                to: reserved,
                amount: 0,
                human_readable: false,
                account_key: public_key(&keys[1]),
            },
            sender,
            0,
            GAS_PRICE,
            GAS_LIMIT,
        ),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&state, &creation),
        Err(NexaError::PrecompiledContractAddress { address: reserved })
    );

    let deploy = sign(
        TransactionData::new(
            TransactionKind::SmartContractDeploy {
                to: Some(reserved),
                amount: 0,
                payload: vec![1, 2, 3],
                human_readable: false,
                code_format: Default::default(),
            },
            sender,
            0,
            GAS_PRICE,
            GAS_LIMIT,
        ),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&state, &deploy),
        Err(NexaError::PrecompiledContractAddress { address: reserved })
    );
}

#[test]
fn contract_execution_requires_a_program_account() {
    let keys = keys();
    let target = NexaAddress::random();
    let sender = NexaAddress::from(keys[0].public());

    let execution = |to: NexaAddress| {
        sign(
            TransactionData::new(
                TransactionKind::SmartContractExecution { to, amount: 0, payload: vec![0xca, 0xfe] },
                sender,
                0,
                GAS_PRICE,
                GAS_LIMIT,
            ),
            vec![&keys[0]],
        )
    };

    // Fresh address: nothing deployed there.
    let state = InMemoryStateReader::new();
    assert_eq!(
        admit(&state, &execution(target)),
        Err(NexaError::NotProgramAccount { address: target })
    );

    // A plain EOA is not a program either.
    let state = InMemoryStateReader::new().with_account(Account::new_legacy(target));
    assert_eq!(
        admit(&state, &execution(target)),
        Err(NexaError::NotProgramAccount { address: target })
    );

    // A deployed program account admits.
    let state = InMemoryStateReader::new().with_account(Account::new_program_account(target));
    let cfg = config();
    assert_eq!(
        admit(&state, &execution(target)).unwrap(),
        cfg.tx_gas_contract_execution() + 2 * cfg.tx_data_non_zero_gas()
    );
}

#[test]
fn value_transfer_cannot_target_a_program_account() {
    let keys = keys();
    let target = NexaAddress::random();
    let state = InMemoryStateReader::new().with_account(Account::new_program_account(target));

    let tx = legacy_transfer(&keys[0], target);
    assert_eq!(
        admit(&state, &tx),
        Err(NexaError::NotForProgramAccount { address: target })
    );
}

#[test]
fn account_creation_requires_a_fresh_address() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let target = NexaAddress::random();

    let creation = sign(
        TransactionData::new(
            TransactionKind::AccountCreation {
                to: target,
                amount: 0,
                human_readable: false,
                account_key: public_key(&keys[1]),
            },
            sender,
            0,
            GAS_PRICE,
            GAS_LIMIT,
        ),
        vec![&keys[0]],
    );

    let state = InMemoryStateReader::new().with_account(Account::new_legacy(target));
    assert_eq!(
        admit(&state, &creation),
        Err(NexaError::AccountAlreadyExists { address: target })
    );

    let state = InMemoryStateReader::new();
    assert!(admit(&state, &creation).is_ok());
}

#[test]
fn nonce_and_unit_price_guards() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());

    let mut account = Account::new_legacy(sender);
    account.nonce = 5;
    let state = InMemoryStateReader::new().with_account(account);

    let stale = sign(
        TransactionData::new_transfer(NexaAddress::random(), 1, sender, 4, GAS_PRICE, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&state, &stale),
        Err(NexaError::NonceTooLow { expected: 5, actual: 4 })
    );

    let underpriced = sign(
        TransactionData::new_transfer(NexaAddress::random(), 1, sender, 5, GAS_PRICE - 1, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&state, &underpriced),
        Err(NexaError::InvalidUnitPrice { unit_price: GAS_PRICE, gas_price: GAS_PRICE - 1 })
    );

    // Equal or higher nonces are pool-admissible; ordering is the pool's business.
    let current = sign(
        TransactionData::new_transfer(NexaAddress::random(), 1, sender, 5, GAS_PRICE, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert!(admit(&state, &current).is_ok());
    let future = sign(
        TransactionData::new_transfer(NexaAddress::random(), 1, sender, 9, GAS_PRICE, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert!(admit(&state, &future).is_ok());
}

#[test]
fn oversized_payload_is_rejected() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let cfg = config();
    let limit = cfg.max_tx_payload_bytes();

    let tx = sign(
        TransactionData::new(
            TransactionKind::ValueTransferMemo {
                to: NexaAddress::random(),
                amount: 1,
                memo: vec![1; limit as usize + 1],
            },
            sender,
            0,
            GAS_PRICE,
            GAS_LIMIT,
        ),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&InMemoryStateReader::new(), &tx),
        Err(NexaError::OversizedData { size: limit + 1, limit })
    );
}

#[test]
fn gas_limit_must_cover_intrinsic_gas() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let cfg = config();

    let exact = sign(
        TransactionData::new_transfer(NexaAddress::random(), 1, sender, 0, GAS_PRICE, cfg.tx_gas()),
        vec![&keys[0]],
    );
    assert!(admit(&InMemoryStateReader::new(), &exact).is_ok());

    let short = sign(
        TransactionData::new_transfer(
            NexaAddress::random(),
            1,
            sender,
            0,
            GAS_PRICE,
            cfg.tx_gas() - 1,
        ),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&InMemoryStateReader::new(), &short),
        Err(NexaError::InsufficientGasLimit { required: cfg.tx_gas(), limit: cfg.tx_gas() - 1 })
    );
}

#[test]
fn eleven_key_multisig_is_rejected_pool_side() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());

    let mut seed = StdRng::from_seed([9; 32]);
    let many: Vec<NexaKeyPair> = (0..11).map(|_| get_key_pair_from_rng(&mut seed).1).collect();
    let new_key = weighted_key(10, many.iter().map(|kp| (1u8, kp)).collect());

    let update = sign(
        TransactionData::new_account_update(new_key, sender, 0, GAS_PRICE, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&InMemoryStateReader::new(), &update),
        Err(NexaError::MaxKeysExceeded { max: 10, actual: 11 })
    );
}

#[test]
fn unsatisfiable_key_still_admits_pool_side() {
    // A threshold beyond the weight sum is only caught when the update executes, so
    // the pool takes the transaction.
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let new_key = weighted_key(10, vec![(1, &keys[1]), (2, &keys[2]), (3, &keys[3])]);

    let update = sign(
        TransactionData::new_account_update(new_key, sender, 0, GAS_PRICE, GAS_LIMIT),
        vec![&keys[0]],
    );
    assert!(admit(&InMemoryStateReader::new(), &update).is_ok());
}

#[test]
fn multisig_account_authorizes_by_weight() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let account_key = weighted_key(2, vec![(1, &keys[0]), (1, &keys[1]), (1, &keys[2])]);
    let state = InMemoryStateReader::new()
        .with_account(Account::new(sender, account_key));

    let data = TransactionData::new_transfer(NexaAddress::random(), 1, sender, 0, GAS_PRICE, GAS_LIMIT);

    // Two of three distinct signers meet the threshold.
    let tx = sign(data.clone(), vec![&keys[0], &keys[2]]);
    let cfg = config();
    assert_eq!(
        admit(&state, &tx).unwrap(),
        cfg.tx_gas() + 2 * cfg.tx_validation_gas_per_key()
    );

    // One signer does not.
    let tx = sign(data.clone(), vec![&keys[0]]);
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));

    // A signer outside the key set does not help.
    let tx = sign(data, vec![&keys[0], &keys[3]]);
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));
}

#[test]
fn role_based_account_separates_update_authority() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let account_key = role_based_key(vec![
        public_key(&keys[0]),
        public_key(&keys[1]),
        public_key(&keys[2]),
    ]);
    let state = InMemoryStateReader::new().with_account(Account::new(sender, account_key));

    let update_data = TransactionData::new_account_update(
        public_key(&keys[3]),
        sender,
        0,
        GAS_PRICE,
        GAS_LIMIT,
    );

    // Signed by the transaction-role key: wrong role, rejected.
    let tx = sign(update_data.clone(), vec![&keys[0]]);
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));

    // Signed by the update-role key: admitted.
    let tx = sign(update_data, vec![&keys[1]]);
    assert!(admit(&state, &tx).is_ok());

    // And the converse: the update-role key cannot sign ordinary transfers.
    let transfer = TransactionData::new_transfer(NexaAddress::random(), 1, sender, 0, GAS_PRICE, GAS_LIMIT);
    let tx = sign(transfer, vec![&keys[1]]);
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));
}

#[test]
fn delegated_transfer_verifies_both_parties() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let payer = NexaAddress::from(keys[1].public());
    let state = InMemoryStateReader::new();
    let cfg = config();

    let data = TransactionData::new_delegated(
        TransactionKind::ValueTransfer { to: NexaAddress::random(), amount: 1 },
        sender,
        payer,
        0,
        GAS_PRICE,
        GAS_LIMIT,
    );

    // Properly countersigned: admitted, and priced with both validation terms.
    let tx = sign(data.clone(), vec![&keys[0]]).with_fee_payer_signers(vec![&keys[1]]);
    assert_eq!(
        admit(&state, &tx).unwrap(),
        cfg.tx_gas() + cfg.tx_gas_fee_delegated()
    );

    // Missing the fee-payer signature entirely.
    let tx = sign(data.clone(), vec![&keys[0]]);
    assert_eq!(
        admit(&state, &tx),
        Err(NexaError::SignerSignatureNumberMismatch { expected: 1, actual: 0 })
    );

    // Countersigned by the wrong account.
    let tx = sign(data.clone(), vec![&keys[0]]).with_fee_payer_signers(vec![&keys[2]]);
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));

    // The sender cannot reuse its own sender-scope signature as the payer signature:
    // a payer signature is made under a different intent.
    let mut tx = sign(data, vec![&keys[0]]);
    tx.fee_payer_signatures = vec![tx.tx_signatures.first().clone()];
    assert!(matches!(admit(&state, &tx), Err(NexaError::IncorrectSigner { .. })));
}

#[test]
fn ratio_delegated_transfer_prices_the_ratio_surcharge() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let payer = NexaAddress::from(keys[1].public());
    let cfg = config();

    let data = TransactionData::new_delegated_with_ratio(
        TransactionKind::ValueTransfer { to: NexaAddress::random(), amount: 1 },
        sender,
        payer,
        FeeRatio::new(30).unwrap(),
        0,
        GAS_PRICE,
        GAS_LIMIT,
    );
    let tx = sign(data, vec![&keys[0]]).with_fee_payer_signers(vec![&keys[1]]);
    assert_eq!(
        admit(&InMemoryStateReader::new(), &tx).unwrap(),
        cfg.tx_gas() + cfg.tx_gas_fee_delegated_with_ratio()
    );
}

#[test]
fn fee_payer_signatures_on_undelegated_transaction_are_rejected() {
    let keys = keys();
    let tx = legacy_transfer(&keys[0], NexaAddress::random())
        .with_fee_payer_signers(vec![&keys[1]]);
    assert!(matches!(
        admit(&InMemoryStateReader::new(), &tx),
        Err(NexaError::InvalidTransactionType { .. })
    ));
}

#[test]
fn human_readable_flag_is_gated() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let tx = sign(
        TransactionData::new(
            TransactionKind::AccountCreation {
                to: NexaAddress::random(),
                amount: 0,
                human_readable: true,
                account_key: public_key(&keys[1]),
            },
            sender,
            0,
            GAS_PRICE,
            GAS_LIMIT,
        ),
        vec![&keys[0]],
    );
    assert_eq!(
        admit(&InMemoryStateReader::new(), &tx),
        Err(NexaError::HumanReadableNotSupported)
    );
}

#[test]
fn deny_config_screens_before_everything_else() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let tx = legacy_transfer(&keys[0], NexaAddress::random());
    let state = InMemoryStateReader::new();

    let kill_switch = TransactionDenyConfigBuilder::new().disable_user_transaction().build();
    assert!(matches!(
        check_transaction_admissible(&state, &config(), &kill_switch, &tx),
        Err(NexaError::TransactionDenied { .. })
    ));

    let denied_sender = TransactionDenyConfigBuilder::new().add_denied_address(sender).build();
    assert!(matches!(
        check_transaction_admissible(&state, &config(), &denied_sender, &tx),
        Err(NexaError::TransactionDenied { .. })
    ));

    let denied_other =
        TransactionDenyConfigBuilder::new().add_denied_address(NexaAddress::random()).build();
    assert!(check_transaction_admissible(&state, &config(), &denied_other, &tx).is_ok());
}

#[test]
fn wrong_signer_on_legacy_account_is_rejected() {
    let keys = keys();
    let sender = NexaAddress::from(keys[0].public());
    let data = TransactionData::new_transfer(NexaAddress::random(), 1, sender, 0, GAS_PRICE, GAS_LIMIT);

    let tx = sign(data, vec![&keys[1]]);
    assert!(matches!(
        admit(&InMemoryStateReader::new(), &tx),
        Err(NexaError::IncorrectSigner { .. })
    ));
}
