// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use crate::base::NexaAddress;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Node-local policy applied before any validation work runs.
///
/// This is operator configuration, not protocol: two nodes may disagree on it without
/// forking, because it only controls what a node is willing to admit into its own pool.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionDenyConfig {
    /// A list of addresses that are not allowed to be used as the sender or the
    /// fee payer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    address_deny_list: Vec<NexaAddress>,

    /// Whether user transactions are disabled (i.e. only system transactions are allowed).
    /// This is essentially a kill switch for transactions processing to a degree.
    #[serde(default)]
    user_transaction_disabled: bool,

    /// In-memory set for faster lookup of the deny list.
    #[serde(skip)]
    address_deny_set: OnceCell<HashSet<NexaAddress>>,
}

impl TransactionDenyConfig {
    pub fn get_address_deny_set(&self) -> &HashSet<NexaAddress> {
        self.address_deny_set
            .get_or_init(|| self.address_deny_list.iter().cloned().collect())
    }

    pub fn user_transaction_disabled(&self) -> bool {
        self.user_transaction_disabled
    }
}

#[derive(Default)]
pub struct TransactionDenyConfigBuilder {
    config: TransactionDenyConfig,
}

impl TransactionDenyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> TransactionDenyConfig {
        self.config
    }

    pub fn disable_user_transaction(mut self) -> Self {
        self.config.user_transaction_disabled = true;
        self
    }

    pub fn add_denied_address(mut self, address: NexaAddress) -> Self {
        self.config.address_deny_list.push(address);
        self
    }
}
