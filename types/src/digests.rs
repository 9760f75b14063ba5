// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::crypto::DIGEST_LENGTH;
use crate::serde::Readable;
use fastcrypto::encoding::{Base58, Encoding};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

/// A transaction's identity: the default hash of its name-prefixed BCS bytes.
#[serde_as]
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct TransactionDigest(
    #[schemars(with = "Base58")]
    #[serde_as(as = "Readable<Base58, Bytes>")]
    [u8; DIGEST_LENGTH],
);

impl TransactionDigest {
    pub const ZERO: Self = Self([0; DIGEST_LENGTH]);

    pub const fn new(digest: [u8; DIGEST_LENGTH]) -> Self {
        Self(digest)
    }

    pub fn inner(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; DIGEST_LENGTH] {
        self.0
    }

    pub fn base58_encode(&self) -> String {
        Base58::encode(self.0)
    }

    /// A digest we pick by fair dice roll, for tests.
    pub fn random() -> Self {
        let random_bytes = rand::random::<[u8; DIGEST_LENGTH]>();
        Self(random_bytes)
    }
}

impl AsRef<[u8]> for TransactionDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base58_encode())
    }
}

impl fmt::Debug for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionDigest({})", self.base58_encode())
    }
}
