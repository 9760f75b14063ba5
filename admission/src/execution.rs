// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! Execution-time application of the account-mutating transaction kinds.
//!
//! A transaction that reaches this point was already admitted: it is in a block and
//! will get a receipt either way. The checks here are the ones that need the full
//! install-time walk of the key being installed. On failure the receipt records the
//! defect and the targeted account is left untouched; nonce and fee accounting for
//! included-but-failed transactions belong to the surrounding block processor.

use tracing::trace;
use types::account::Account;
use types::account_key::AccountKey;
use types::base::NexaAddress;
use types::effects::ExecutionStatus;

/// Execute the state application of an AccountCreation transaction.
///
/// Returns the created account alongside a success status, or a failure status and no
/// account when the key fails its install-time walk.
pub fn execute_account_creation(
    address: NexaAddress,
    account_key: &AccountKey,
) -> (ExecutionStatus, Option<Account>) {
    match account_key.check_installable() {
        Err(err) => {
            trace!(%address, %err, "account creation failed install-time key check");
            (ExecutionStatus::new_failure(err.into()), None)
        }
        Ok(()) => (
            ExecutionStatus::Success,
            Some(Account::new(address, account_key.clone())),
        ),
    }
}

/// Execute the state application of an AccountUpdate transaction against the sender's
/// current account.
///
/// The account key is replaced wholesale on success. On failure the account is not
/// mutated in any way; re-reading it observes the pre-transaction key.
pub fn execute_account_update(account: &mut Account, new_key: &AccountKey) -> ExecutionStatus {
    match new_key.check_installable() {
        Err(err) => {
            trace!(address = %account.address, %err, "account update failed install-time key check");
            ExecutionStatus::new_failure(err.into())
        }
        Ok(()) => {
            account.account_key = new_key.clone();
            ExecutionStatus::Success
        }
    }
}

