//! # Base Type Definitions
//!
//! ## Overview
//! This module defines the fundamental types used throughout the Nexa admission core.
//! It serves as a foundation layer for all components.
//!
//! ## Responsibilities
//! - Provide address representation and manipulation (NexaAddress)
//! - Define the reserved precompiled-contract address range test
//! - Implement the validated fee-ratio value type used by ratio delegation
//!
//! ## Component Relationships
//! - Used by virtually all other modules in the system
//! - Relies on crypto module for address derivation from public keys

use crate::crypto::{DefaultHash, NexaPublicKey, NexaPublicKeyBytes, DIGEST_LENGTH};
use fastcrypto::hash::HashFunction;
use hex::FromHex;
use rand::rngs::OsRng;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::serde::Readable;
use fastcrypto::encoding::Hex;

/// The length of a Nexa address in bytes.
pub const NEXA_ADDRESS_LENGTH: usize = 20;

/// Largest reserved suffix of the precompiled-contract address range.
///
/// Addresses `[0x1, 0x3FF]` are reserved for precompiled contracts and may never be the
/// target of value-moving or deploying transactions. `0x0` and `0x400` upward are
/// unrestricted.
pub const PRECOMPILED_ADDRESS_RANGE_END: u16 = 0x3FF;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Unable to parse address (must be hex string of length {})", NEXA_ADDRESS_LENGTH * 2)]
pub struct AddressParseError;

/// Represents an account address on the Nexa chain.
///
/// A NexaAddress is a 20-byte identifier for user accounts and deployed program
/// accounts. Addresses are derived from public keys (for user accounts), chosen by the
/// creating transaction (for explicitly-created accounts), or generated randomly in
/// tests. The address does not commit to the account's key material: the signing
/// authority bound to an address is the account key stored in state, which can be
/// rotated independently.
#[serde_as]
#[derive(Eq, Default, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, JsonSchema, Serialize, Deserialize)]
pub struct NexaAddress(
    #[schemars(with = "Hex")]
    #[serde_as(as = "Readable<Hex, _>")]
    [u8; NEXA_ADDRESS_LENGTH],
);

impl NexaAddress {
    /// The byte length of a NexaAddress
    pub const LENGTH: usize = NEXA_ADDRESS_LENGTH;

    /// A constant representing the zero address (all bytes set to 0)
    pub const ZERO: Self = Self([0u8; NEXA_ADDRESS_LENGTH]);

    pub const fn new(address: [u8; Self::LENGTH]) -> Self {
        Self(address)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Returns the underlying byte array of the address.
    pub fn to_inner(self) -> [u8; NEXA_ADDRESS_LENGTH] {
        self.0
    }

    /// Generates a random NexaAddress using the system's secure random number generator.
    ///
    /// This is primarily useful for testing purposes.
    pub fn random() -> Self {
        let mut rng = OsRng;
        let buf: [u8; Self::LENGTH] = rng.gen();
        Self(buf)
    }

    /// Generates a random NexaAddress using the provided random number generator.
    pub fn generate<R: rand::RngCore + rand::CryptoRng>(mut rng: R) -> Self {
        let buf: [u8; NEXA_ADDRESS_LENGTH] = rng.gen();
        Self(buf)
    }

    /// True iff this address falls in the reserved precompiled-contract range
    /// `[0x1, 0x3FF]`.
    pub fn is_precompiled(&self) -> bool {
        if self.0[..Self::LENGTH - 2].iter().any(|b| *b != 0) {
            return false;
        }
        let suffix = u16::from_be_bytes([self.0[Self::LENGTH - 2], self.0[Self::LENGTH - 1]]);
        (1..=PRECOMPILED_ADDRESS_RANGE_END).contains(&suffix)
    }

    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, AddressParseError> {
        <[u8; Self::LENGTH]>::try_from(bytes.as_ref())
            .map_err(|_| AddressParseError)
            .map(Self)
    }

    pub fn from_hex_literal(literal: &str) -> Result<Self, AddressParseError> {
        if !literal.starts_with("0x") {
            return Err(AddressParseError);
        }

        let hex_len = literal.len() - 2;

        // If the string is too short, pad it
        if hex_len < Self::LENGTH * 2 {
            let mut hex_str = String::with_capacity(Self::LENGTH * 2);
            for _ in 0..Self::LENGTH * 2 - hex_len {
                hex_str.push('0');
            }
            hex_str.push_str(&literal[2..]);
            NexaAddress::from_hex(hex_str)
        } else {
            NexaAddress::from_hex(&literal[2..])
        }
    }

    pub fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, AddressParseError> {
        <[u8; Self::LENGTH]>::from_hex(hex)
            .map_err(|_| AddressParseError)
            .map(Self)
    }

    pub fn to_hex(&self) -> String {
        format!("{:x}", self)
    }

    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", self.short_str_lossless())
    }

    pub fn short_str_lossless(&self) -> String {
        let hex_str = hex::encode(self.0).trim_start_matches('0').to_string();
        if hex_str.is_empty() {
            "0".to_string()
        } else {
            hex_str
        }
    }
}

impl fmt::LowerHex for NexaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }

        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl fmt::UpperHex for NexaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }

        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }

        Ok(())
    }
}

impl fmt::Display for NexaAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl fmt::Debug for NexaAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl FromStr for NexaAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Self::from_hex_literal(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl From<&NexaPublicKey> for NexaAddress {
    /// Derive an address from a public key: the trailing 20 bytes of the default hash of
    /// the compressed public-key bytes.
    fn from(pk: &NexaPublicKey) -> Self {
        let mut hasher = DefaultHash::default();
        hasher.update(pk.as_ref());
        let g_arr = hasher.finalize();
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(&g_arr.digest[DIGEST_LENGTH - Self::LENGTH..]);
        Self(bytes)
    }
}

impl From<&NexaPublicKeyBytes> for NexaAddress {
    fn from(pk: &NexaPublicKeyBytes) -> Self {
        let mut hasher = DefaultHash::default();
        hasher.update(pk.as_ref());
        let g_arr = hasher.finalize();
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(&g_arr.digest[DIGEST_LENGTH - Self::LENGTH..]);
        Self(bytes)
    }
}

impl AsRef<[u8]> for NexaAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for NexaAddress {
    type Target = [u8; Self::LENGTH];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The fee-payer percentage of a ratio-delegated transaction.
///
/// Valid values are 1 through 99 inclusive. 0 and 100 are rejected as degenerate: a
/// ratio of 0 means the sender pays everything (use no delegation) and 100 means the
/// payer pays everything (use plain fee delegation).
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, JsonSchema, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FeeRatio(u8);

impl FeeRatio {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    pub fn new(ratio: u8) -> Result<Self, InvalidFeeRatio> {
        if (Self::MIN..=Self::MAX).contains(&ratio) {
            Ok(Self(ratio))
        } else {
            Err(InvalidFeeRatio(ratio))
        }
    }

    pub const fn get(&self) -> u8 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("fee ratio {0} out of range, must be in [1, 99]")]
pub struct InvalidFeeRatio(pub u8);

impl TryFrom<u8> for FeeRatio {
    type Error = InvalidFeeRatio;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeeRatio> for u8 {
    fn from(ratio: FeeRatio) -> u8 {
        ratio.0
    }
}

impl fmt::Debug for FeeRatio {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl fmt::Display for FeeRatio {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

