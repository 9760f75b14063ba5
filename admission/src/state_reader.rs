// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use types::account::Account;
use types::base::NexaAddress;

/// Read-only access to account state at a consistent snapshot.
///
/// The admission pipeline is a pure function of a transaction, a snapshot read through
/// this trait, and the protocol config: it never writes. Implementations are expected
/// to serve point-in-time views; the pipeline may be driven concurrently from many
/// threads against the same reader.
pub trait StateReader {
    /// The account stored at `address`, or `None` if the address has no state yet.
    fn get_account(&self, address: &NexaAddress) -> Option<Account>;
}

/// A map-backed reader for tests and local tooling.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateReader {
    accounts: BTreeMap<NexaAddress, Account>,
}

impl InMemoryStateReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.address, account);
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.insert_account(account);
        self
    }
}

impl StateReader for InMemoryStateReader {
    fn get_account(&self, address: &NexaAddress) -> Option<Account> {
        self.accounts.get(address).cloned()
    }
}
