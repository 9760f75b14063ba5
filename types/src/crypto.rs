// Copyright (c) Nexa Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Cryptography Module
//!
//! ## Overview
//! This module provides the cryptographic primitives used by the Nexa admission core:
//! the recoverable ECDSA scheme user accounts sign with, the compressed public-key
//! representation stored inside account keys, and the hashing machinery that turns
//! transactions into signable digests.
//!
//! ## Responsibilities
//! - Define the user signature scheme (secp256k1 with public-key recovery)
//! - Provide key pair generation helpers for tests and tooling
//! - Implement signable-value hashing with type-name domain separation
//!
//! ## Design Patterns
//! - Byte-array newtypes for key material that crosses serialization boundaries
//! - Recovery-based verification: a signature alone identifies its signer, which the
//!   legacy account-key semantics depend on

use crate::base::NexaAddress;
use crate::error::{NexaError, NexaResult};
use crate::intent::IntentMessage;
use crate::serde::Readable;
use derive_more::{AsMut, AsRef};
use fastcrypto::encoding::{Base64, Encoding, Hex};
use fastcrypto::error::FastCryptoError;
use fastcrypto::hash::{HashFunction, Keccak256};
use fastcrypto::secp256k1::recoverable::Secp256k1RecoverableSignature;
use fastcrypto::secp256k1::{Secp256k1KeyPair, Secp256k1PrivateKey, Secp256k1PublicKey};
pub use fastcrypto::traits::KeyPair as KeypairTraits;
use fastcrypto::traits::{RecoverableSignature, RecoverableSigner, ToFromBytes};
use rand::rngs::OsRng;
use rand::{rngs::StdRng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Default hash function used throughout the Nexa chain.
///
/// Keccak256 keeps address derivation and signing digests compatible with the
/// EVM-adjacent tooling the execution layer integrates with.
pub type DefaultHash = Keccak256;

/// Length of hash digests produced by the default hash function
pub const DIGEST_LENGTH: usize = DefaultHash::OUTPUT_SIZE;

/// Key pair used by user accounts to sign transactions
pub type NexaKeyPair = Secp256k1KeyPair;

/// Public key type for user accounts
pub type NexaPublicKey = Secp256k1PublicKey;

/// Private key type for user accounts
pub type NexaPrivateKey = Secp256k1PrivateKey;

/// Length of a recoverable transaction signature: a 64-byte compact ECDSA signature
/// followed by the one-byte recovery id.
pub const TRANSACTION_SIGNATURE_LENGTH: usize = 65;

/// Compressed representation of a user public key.
///
/// This is the form key material takes inside an [`crate::account_key::AccountKey`]:
/// plain bytes that serialize cheaply and compare without point decompression.
/// Convert to a full [`NexaPublicKey`] only when a cryptographic operation needs it.
#[serde_as]
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    AsRef,
)]
#[as_ref(forward)]
pub struct NexaPublicKeyBytes(
    #[schemars(with = "Base64")]
    #[serde_as(as = "Readable<Base64, Bytes>")]
    pub [u8; NexaPublicKey::LENGTH],
);

impl NexaPublicKeyBytes {
    /// Constant representing a zero-initialized public key, used in tests.
    pub const ZERO: Self = Self::new([0u8; NexaPublicKey::LENGTH]);

    pub const fn new(bytes: [u8; NexaPublicKey::LENGTH]) -> NexaPublicKeyBytes {
        NexaPublicKeyBytes(bytes)
    }

    fn fmt_impl(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let s = Hex::encode(self.0);
        write!(f, "k#{}", s)?;
        Ok(())
    }
}

impl TryFrom<NexaPublicKeyBytes> for NexaPublicKey {
    type Error = FastCryptoError;

    fn try_from(bytes: NexaPublicKeyBytes) -> Result<NexaPublicKey, Self::Error> {
        NexaPublicKey::from_bytes(bytes.as_ref())
    }
}

impl From<&NexaPublicKey> for NexaPublicKeyBytes {
    fn from(pk: &NexaPublicKey) -> NexaPublicKeyBytes {
        // This unwrap is safe because we're converting from a valid public key
        NexaPublicKeyBytes::from_bytes(pk.as_ref()).unwrap()
    }
}

impl ToFromBytes for NexaPublicKeyBytes {
    fn from_bytes(bytes: &[u8]) -> Result<Self, FastCryptoError> {
        let bytes: [u8; NexaPublicKey::LENGTH] =
            bytes.try_into().map_err(|_| FastCryptoError::InvalidInput)?;
        Ok(NexaPublicKeyBytes(bytes))
    }
}

impl Debug for NexaPublicKeyBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.fmt_impl(f)
    }
}

impl Display for NexaPublicKeyBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.fmt_impl(f)
    }
}

impl FromStr for NexaPublicKeyBytes {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Hex::decode(s).map_err(|e| anyhow::anyhow!(e))?;
        Self::from_bytes(&value[..]).map_err(|e| anyhow::anyhow!(e))
    }
}

/// A user signature over an intent message.
///
/// Stored as the raw 65 recoverable-signature bytes. There is no embedded public key:
/// verification recovers the signing key from the signature and matches it against the
/// account key of the claimed signer.
#[serde_as]
#[derive(Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, AsRef, AsMut)]
#[as_ref(forward)]
#[as_mut(forward)]
pub struct TransactionSignature(
    #[schemars(with = "Base64")]
    #[serde_as(as = "Readable<Base64, Bytes>")]
    [u8; TRANSACTION_SIGNATURE_LENGTH],
);

// Implementation useful to simplify testing when a mock signature is needed
impl Default for TransactionSignature {
    fn default() -> Self {
        Self([0; TRANSACTION_SIGNATURE_LENGTH])
    }
}

impl Debug for TransactionSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "s#{}", Base64::encode(self.0))
    }
}

impl ToFromBytes for TransactionSignature {
    fn from_bytes(bytes: &[u8]) -> Result<Self, FastCryptoError> {
        if bytes.len() != TRANSACTION_SIGNATURE_LENGTH {
            return Err(FastCryptoError::InputLengthWrong(TRANSACTION_SIGNATURE_LENGTH));
        }
        let mut sig_bytes = [0; TRANSACTION_SIGNATURE_LENGTH];
        sig_bytes.copy_from_slice(bytes);
        Ok(Self(sig_bytes))
    }
}

impl TransactionSignature {
    pub const LENGTH: usize = TRANSACTION_SIGNATURE_LENGTH;

    /// Sign the BCS bytes of an intent message with the default hash.
    pub fn new_secure<T>(value: &IntentMessage<T>, secret: &NexaKeyPair) -> Self
    where
        T: Serialize,
    {
        let msg = bcs::to_bytes(&value).expect("Message serialization should not fail");
        let sig = secret.sign_recoverable_with_hash::<DefaultHash>(&msg);
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(sig.as_ref());
        Self(bytes)
    }

    /// Recover the public key that produced this signature over `value`.
    ///
    /// A signature that does not parse, or that was made over different bytes, yields an
    /// `InvalidSignature` error; callers performing authorization treat that the same as
    /// a key mismatch.
    pub fn recover_public_key<T>(&self, value: &IntentMessage<T>) -> NexaResult<NexaPublicKey>
    where
        T: Serialize,
    {
        let msg = bcs::to_bytes(&value).expect("Message serialization should not fail");
        let sig = Secp256k1RecoverableSignature::from_bytes(&self.0).map_err(|_| {
            NexaError::InvalidSignature {
                error: "Cannot parse recoverable signature".to_string(),
            }
        })?;
        sig.recover_with_hash::<DefaultHash>(&msg)
            .map_err(|e| NexaError::InvalidSignature {
                error: format!("Fail to recover public key: {}", e),
            })
    }

    /// Recover the address of the account that produced this signature over `value`.
    pub fn recover_signer<T>(&self, value: &IntentMessage<T>) -> NexaResult<NexaAddress>
    where
        T: Serialize,
    {
        Ok(NexaAddress::from(&self.recover_public_key(value)?))
    }
}

pub fn get_key_pair_from_rng<R>(csprng: &mut R) -> (NexaAddress, NexaKeyPair)
where
    R: rand::CryptoRng + rand::RngCore,
{
    let kp = NexaKeyPair::generate(&mut StdRng::from_rng(csprng).unwrap());
    (NexaAddress::from(kp.public()), kp)
}

pub fn get_key_pair() -> (NexaAddress, NexaKeyPair) {
    get_key_pair_from_rng(&mut OsRng)
}

/// Something that we know how to hash and sign.
pub trait Signable<W> {
    fn write(&self, writer: &mut W);
}

fn hash<S: Signable<H>, H: HashFunction<DIGEST_SIZE>, const DIGEST_SIZE: usize>(
    signable: &S,
) -> [u8; DIGEST_SIZE] {
    let mut digest = H::default();
    signable.write(&mut digest);
    let hash = digest.finalize();
    hash.into()
}

pub fn default_hash<S: Signable<DefaultHash>>(signable: &S) -> [u8; DIGEST_LENGTH] {
    hash::<S, DefaultHash, DIGEST_LENGTH>(signable)
}

/// Activate the blanket implementation of `Signable` based on serde and BCS.
/// * We use `serde_name` to extract a seed from the name of structs and enums.
/// * We use `BCS` to generate canonical bytes suitable for hashing and signing.
///
/// # Safety
/// We protect the access to this marker trait through a "sealed trait" pattern:
/// impls must be added here (nowhere else) which lets us note those impls
/// MUST be on types that comply with the `serde_name` machinery
/// for the below implementations not to panic. One way to check they work is to write
/// a unit test for serialization to / deserialization from signable bytes.
mod bcs_signable {
    pub trait BcsSignable: serde::Serialize + serde::de::DeserializeOwned {}
    impl BcsSignable for crate::transaction::TransactionData {}
}

impl<T, W> Signable<W> for T
where
    T: bcs_signable::BcsSignable,
    W: std::io::Write,
{
    fn write(&self, writer: &mut W) {
        let name = serde_name::trace_name::<Self>().expect("Self must be a struct or an enum");
        // Note: This assumes that names never contain the separator `::`.
        write!(writer, "{}::", name).expect("Hasher should not fail");
        bcs::serialize_into(writer, &self).expect("Message serialization should not fail");
    }
}

