// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::account_key::{AccountKey, Role};
use crate::base::NexaAddress;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// # Account
///
/// The persisted account entity: the state the admission core reads to authorize a
/// transaction.
///
/// ## Lifecycle
/// Created by an AccountCreation transaction, or implicitly when a legacy value
/// transfer first targets a fresh address. The account key is replaced wholesale by a
/// successfully-executed AccountUpdate transaction and by nothing else. Program
/// accounts are created by contract deployment with a `Fail` key so the account can
/// never sign on its own behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Account {
    pub address: NexaAddress,
    /// Monotonic transaction counter.
    pub nonce: u64,
    /// The signing authority currently bound to this address.
    pub account_key: AccountKey,
    /// True for accounts holding successfully-deployed contract code.
    pub program_account: bool,
    /// Legacy feature gate; carried but never enabled on current networks.
    pub human_readable: bool,
}

impl Account {
    pub fn new(address: NexaAddress, account_key: AccountKey) -> Self {
        Self {
            address,
            nonce: 0,
            account_key,
            program_account: false,
            human_readable: false,
        }
    }

    /// The implicit account backing any address that has no explicit state yet: a
    /// legacy key and a zero nonce. Fresh addresses transact exactly like the classic
    /// address-bound-keypair model until their key is updated.
    pub fn new_legacy(address: NexaAddress) -> Self {
        Self::new(address, AccountKey::Legacy)
    }

    /// A deployed-contract account. Its key is `Fail`: nothing ever authorizes as it.
    pub fn new_program_account(address: NexaAddress) -> Self {
        Self {
            address,
            nonce: 0,
            account_key: AccountKey::Fail,
            program_account: true,
            human_readable: false,
        }
    }

    pub fn is_program_account(&self) -> bool {
        self.program_account
    }

    /// The concrete key that must authorize `role` for this account.
    pub fn key_for_role(&self, role: Role) -> &AccountKey {
        self.account_key.key_for_role(role)
    }
}
