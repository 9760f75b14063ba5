use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// The minimum and maximum protocol versions supported by this build.
pub const MIN_PROTOCOL_VERSION: u64 = 1;
pub const MAX_PROTOCOL_VERSION: u64 = 1;

#[derive(Copy, Clone, Debug, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion(u64);

impl ProtocolVersion {
    // The minimum and maximum protocol version supported by this binary. Counterintuitively,
    // the minimum may rise over time as support for old protocol versions is removed from the
    // source; MAX must match the version the current network agrees on.
    pub const MIN: Self = Self(MIN_PROTOCOL_VERSION);

    pub const MAX: Self = Self(MAX_PROTOCOL_VERSION);

    pub fn new(v: u64) -> Self {
        Self(v)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    // For serde deserialization - we don't define a Default impl because there isn't a single
    // universally appropriate default value.
    pub fn max() -> Self {
        Self::MAX
    }
}

impl From<u64> for ProtocolVersion {
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Copy, PartialOrd, Ord, Eq)]
pub enum Chain {
    Mainnet,
    Testnet,
    Unknown,
}

impl Default for Chain {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Chain {
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Mainnet => "mainnet",
            Chain::Testnet => "testnet",
            Chain::Unknown => "unknown",
        }
    }
}

/// Constants that change the behavior of the protocol.
///
/// The value of each constant here must be fixed for a given protocol version. To change the
/// value of a constant, advance the protocol version, and add support for it in
/// `get_for_version` under the new version number.
///
/// To add a new field to this struct, use the following procedure:
/// - Advance the protocol version.
/// - Add the field as a private `Option<u64>` to the struct.
/// - Initialize the field to `None` in prior protocol versions.
/// - Initialize the field to `Some(val)` for your new protocol version.
/// - Add a public getter that simply unwraps the field.
///
/// If a constant is accessed in a protocol version in which it is not defined, the getter
/// panics. Panicking is necessary because this type of error would almost always result in
/// forking if not prevented here.
#[skip_serializing_none]
#[derive(Clone, Serialize, Debug)]
pub struct ProtocolConfig {
    pub version: ProtocolVersion,

    // === Intrinsic gas: per-type base terms ===
    /// Base gas for a legacy transaction or a plain value transfer.
    tx_gas: Option<u64>,
    /// Base gas for an account creation, on top of the key-material term.
    tx_gas_account_creation: Option<u64>,
    /// Base gas for an account update, on top of the key-material term.
    tx_gas_account_update: Option<u64>,
    /// Base gas for a contract deployment.
    tx_gas_contract_creation: Option<u64>,
    /// Base gas for a contract execution call.
    tx_gas_contract_execution: Option<u64>,
    /// Base gas for a cancel transaction.
    tx_gas_cancel: Option<u64>,
    /// Base gas for a chain-data anchoring transaction, before the per-byte term.
    tx_gas_chain_data_anchoring: Option<u64>,
    /// Per-byte gas for anchored payloads.
    chain_data_anchoring_gas: Option<u64>,

    // === Intrinsic gas: payload term ===
    /// Per-byte gas for zero bytes of transaction payload.
    tx_data_zero_gas: Option<u64>,
    /// Per-byte gas for non-zero bytes of transaction payload.
    tx_data_non_zero_gas: Option<u64>,

    // === Intrinsic gas: key-material and validation terms ===
    /// Flat term charged when installing a new account key.
    account_creation_gas_default: Option<u64>,
    /// Per-leaf-key term charged when installing a new account key.
    account_creation_gas_per_key: Option<u64>,
    /// Flat term charged for validating a signer's key set.
    tx_validation_gas_default: Option<u64>,
    /// Per-key term charged for each key beyond the first in a signer's key set.
    tx_validation_gas_per_key: Option<u64>,

    // === Intrinsic gas: fee-delegation surcharges ===
    /// Flat surcharge for fee-delegated transaction types.
    tx_gas_fee_delegated: Option<u64>,
    /// Flat surcharge for ratio-based fee-delegated transaction types.
    tx_gas_fee_delegated_with_ratio: Option<u64>,

    // === Admission limits ===
    /// Maximum size in bytes of a transaction payload (`data` or anchored data).
    max_tx_payload_bytes: Option<u64>,
    /// The network gas unit price; transactions priced below it are rejected.
    unit_price: Option<u64>,
}

const CONSTANT_ERR_MSG: &str = "protocol constant not present in current protocol version";

macro_rules! getters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> u64 {
                self.$field.expect(CONSTANT_ERR_MSG)
            }
        )*
    }
}

impl ProtocolConfig {
    getters!(
        tx_gas,
        tx_gas_account_creation,
        tx_gas_account_update,
        tx_gas_contract_creation,
        tx_gas_contract_execution,
        tx_gas_cancel,
        tx_gas_chain_data_anchoring,
        chain_data_anchoring_gas,
        tx_data_zero_gas,
        tx_data_non_zero_gas,
        account_creation_gas_default,
        account_creation_gas_per_key,
        tx_validation_gas_default,
        tx_validation_gas_per_key,
        tx_gas_fee_delegated,
        tx_gas_fee_delegated_with_ratio,
        max_tx_payload_bytes,
        unit_price,
    );
}

// Instantiations for each protocol version.
impl ProtocolConfig {
    /// Get the ProtocolConfig that is in effect during the given protocol version.
    pub fn get_for_version(version: ProtocolVersion, chain: Chain) -> Self {
        // ProtocolVersion can be deserialized so we need to check it here as well.
        assert!(
            version >= ProtocolVersion::MIN,
            "Network protocol version is {:?}, but the minimum supported version by the binary is {:?}. Please upgrade the binary.",
            version,
            ProtocolVersion::MIN.0,
        );
        assert!(
            version <= ProtocolVersion::MAX,
            "Network protocol version is {:?}, but the maximum supported version by the binary is {:?}. Please upgrade the binary.",
            version,
            ProtocolVersion::MAX.0,
        );

        let mut ret = Self::get_for_version_impl(version, chain);
        ret.version = version;
        ret
    }

    /// Convenience for the common case of running at the newest supported version.
    pub fn get_for_max_version(chain: Chain) -> Self {
        Self::get_for_version(ProtocolVersion::MAX, chain)
    }

    fn get_for_version_impl(version: ProtocolVersion, _chain: Chain) -> Self {
        // IMPORTANT: Never modify the value of any constant for a pre-existing protocol version.
        // To change the values here you must create a new protocol version with the new values!
        let cfg = Self {
            // will be overwritten before being returned
            version,

            tx_gas: Some(21_000),
            tx_gas_account_creation: Some(21_000),
            tx_gas_account_update: Some(21_000),
            tx_gas_contract_creation: Some(53_000),
            tx_gas_contract_execution: Some(25_000),
            tx_gas_cancel: Some(21_000),
            tx_gas_chain_data_anchoring: Some(21_000),
            chain_data_anchoring_gas: Some(100),

            tx_data_zero_gas: Some(4),
            tx_data_non_zero_gas: Some(68),

            account_creation_gas_default: Some(0),
            account_creation_gas_per_key: Some(20_000),
            tx_validation_gas_default: Some(0),
            tx_validation_gas_per_key: Some(15_000),

            tx_gas_fee_delegated: Some(10_000),
            tx_gas_fee_delegated_with_ratio: Some(15_000),

            max_tx_payload_bytes: Some(32 * 1024),
            unit_price: Some(25_000_000_000),
            // When adding a new constant, set it to None in the earliest version, like this:
            // new_constant: None,
        };
        for cur in 2..=version.0 {
            match cur {
                1 => unreachable!(),
                // Use this template when making changes:
                //
                //     // modify an existing constant.
                //     tx_gas: Some(23_000),
                //
                //     // Add a new constant (which is set to None in prior versions).
                //     new_constant: Some(new_value),
                _ => panic!("unsupported version {:?}", version),
            }
        }
        cfg
    }
}
