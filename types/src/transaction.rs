//! # Transaction Module
//!
//! ## Overview
//! This module defines the transaction family of the Nexa chain. A transaction's type
//! has two independent dimensions: a basic kind (value transfer, account creation and
//! update, contract deploy and execution, cancel, data anchoring) and a fee-delegation
//! mode (none, delegated, delegated with a percentage ratio). The two compose freely,
//! except that the legacy wire format carries no fee-payer slot.
//!
//! ## Responsibilities
//! - Define transaction payload structures and the composite type tag
//! - Construct transactions from a closed field map, the way client tooling submits them
//! - Bind sender and fee-payer signatures to a transaction under distinct intents
//! - Resolve which operational role authorizes a transaction's sender signatures
//!
//! ## Design Patterns
//! - Enum-with-struct-variants payloads; no bit-flag arithmetic for the type tag
//! - Intent-wrapped signing: signatures commit to scope, never to bare payload bytes

use std::collections::BTreeMap;

use nonempty::NonEmpty;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tap::Pipe;

use crate::{
    account_key::{AccountKey, Role},
    base::{FeeRatio, NexaAddress},
    crypto::{default_hash, NexaKeyPair, TransactionSignature},
    digests::TransactionDigest,
    error::{NexaError, NexaResult},
    intent::{Intent, IntentMessage},
};

/// The nine basic transaction kinds, without payload.
#[derive(
    Debug,
    Display,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum BasicTxType {
    Legacy,
    ValueTransfer,
    ValueTransferMemo,
    AccountCreation,
    AccountUpdate,
    SmartContractDeploy,
    SmartContractExecution,
    Cancel,
    ChainDataAnchoring,
}

/// The fee-delegation dimension of a transaction type, without payload.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum DelegationKind {
    None,
    Delegated,
    DelegatedWithRatio,
}

/// The composite transaction type tag: basic kind x delegation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TxType {
    pub basic: BasicTxType,
    pub delegation: DelegationKind,
}

impl TxType {
    pub const fn basic(basic: BasicTxType) -> Self {
        Self { basic, delegation: DelegationKind::None }
    }

    pub const fn delegated(basic: BasicTxType) -> Self {
        Self { basic, delegation: DelegationKind::Delegated }
    }

    pub const fn delegated_with_ratio(basic: BasicTxType) -> Self {
        Self { basic, delegation: DelegationKind::DelegatedWithRatio }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.delegation {
            DelegationKind::None => write!(f, "{}", self.basic),
            DelegationKind::Delegated => write!(f, "FeeDelegated{}", self.basic),
            DelegationKind::DelegatedWithRatio => write!(f, "FeeDelegated{}WithRatio", self.basic),
        }
    }
}

/// Format of deployed contract code.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
pub enum CodeFormat {
    #[default]
    Evm,
}

/// The typed payload of a transaction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize, JsonSchema)]
pub enum TransactionKind {
    /// The classic address-bound-keypair transaction. Transfers value, or deploys a
    /// contract when `to` is absent. Never fee-delegated.
    Legacy {
        to: Option<NexaAddress>,
        amount: u64,
        payload: Vec<u8>,
    },
    ValueTransfer {
        to: NexaAddress,
        amount: u64,
    },
    ValueTransferMemo {
        to: NexaAddress,
        amount: u64,
        memo: Vec<u8>,
    },
    /// Creates the account at `to` with an explicit initial key.
    AccountCreation {
        to: NexaAddress,
        amount: u64,
        human_readable: bool,
        account_key: AccountKey,
    },
    /// Replaces the sender's account key wholesale.
    AccountUpdate {
        account_key: AccountKey,
    },
    SmartContractDeploy {
        to: Option<NexaAddress>,
        amount: u64,
        payload: Vec<u8>,
        human_readable: bool,
        code_format: CodeFormat,
    },
    SmartContractExecution {
        to: NexaAddress,
        amount: u64,
        payload: Vec<u8>,
    },
    /// Withdraws a pending same-nonce transaction; carries nothing but the nonce.
    Cancel,
    /// Anchors service-chain data onto the chain.
    ChainDataAnchoring {
        anchored_data: Vec<u8>,
    },
}

impl TransactionKind {
    pub fn basic_type(&self) -> BasicTxType {
        match self {
            TransactionKind::Legacy { .. } => BasicTxType::Legacy,
            TransactionKind::ValueTransfer { .. } => BasicTxType::ValueTransfer,
            TransactionKind::ValueTransferMemo { .. } => BasicTxType::ValueTransferMemo,
            TransactionKind::AccountCreation { .. } => BasicTxType::AccountCreation,
            TransactionKind::AccountUpdate { .. } => BasicTxType::AccountUpdate,
            TransactionKind::SmartContractDeploy { .. } => BasicTxType::SmartContractDeploy,
            TransactionKind::SmartContractExecution { .. } => BasicTxType::SmartContractExecution,
            TransactionKind::Cancel => BasicTxType::Cancel,
            TransactionKind::ChainDataAnchoring { .. } => BasicTxType::ChainDataAnchoring,
        }
    }

    /// The target address, for the kinds that have one.
    pub fn to(&self) -> Option<NexaAddress> {
        match self {
            TransactionKind::Legacy { to, .. } | TransactionKind::SmartContractDeploy { to, .. } => {
                *to
            }
            TransactionKind::ValueTransfer { to, .. }
            | TransactionKind::ValueTransferMemo { to, .. }
            | TransactionKind::AccountCreation { to, .. }
            | TransactionKind::SmartContractExecution { to, .. } => Some(*to),
            TransactionKind::AccountUpdate { .. }
            | TransactionKind::Cancel
            | TransactionKind::ChainDataAnchoring { .. } => None,
        }
    }

    /// The variable-length payload, for the kinds that carry one. Anchored data counts:
    /// it is subject to the same size limit as call data.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            TransactionKind::Legacy { payload, .. }
            | TransactionKind::SmartContractDeploy { payload, .. }
            | TransactionKind::SmartContractExecution { payload, .. } => Some(payload),
            TransactionKind::ValueTransferMemo { memo, .. } => Some(memo),
            TransactionKind::ChainDataAnchoring { anchored_data } => Some(anchored_data),
            TransactionKind::ValueTransfer { .. }
            | TransactionKind::AccountCreation { .. }
            | TransactionKind::AccountUpdate { .. }
            | TransactionKind::Cancel => None,
        }
    }

    /// The key being installed, when this transaction installs one.
    pub fn new_account_key(&self) -> Option<&AccountKey> {
        match self {
            TransactionKind::AccountCreation { account_key, .. }
            | TransactionKind::AccountUpdate { account_key } => Some(account_key),
            _ => None,
        }
    }

    /// Whether the reserved precompiled-contract address range is forbidden as this
    /// transaction's target. Contract execution is exempt: its target checks resolve
    /// through the program-account guard instead.
    pub fn forbids_precompiled_target(&self) -> bool {
        matches!(
            self,
            TransactionKind::Legacy { .. }
                | TransactionKind::ValueTransfer { .. }
                | TransactionKind::ValueTransferMemo { .. }
                | TransactionKind::AccountCreation { .. }
                | TransactionKind::SmartContractDeploy { .. }
        )
    }

    pub fn human_readable(&self) -> bool {
        match self {
            TransactionKind::AccountCreation { human_readable, .. }
            | TransactionKind::SmartContractDeploy { human_readable, .. } => *human_readable,
            _ => false,
        }
    }
}

/// Who pays the gas of a transaction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum FeeDelegation {
    /// The sender pays.
    None,
    /// The fee payer pays everything.
    Delegated { fee_payer: NexaAddress },
    /// The fee payer pays `ratio` percent of execution gas (and all intrinsic gas);
    /// the sender covers the rest.
    DelegatedWithRatio {
        fee_payer: NexaAddress,
        ratio: FeeRatio,
    },
}

impl FeeDelegation {
    pub fn kind(&self) -> DelegationKind {
        match self {
            FeeDelegation::None => DelegationKind::None,
            FeeDelegation::Delegated { .. } => DelegationKind::Delegated,
            FeeDelegation::DelegatedWithRatio { .. } => DelegationKind::DelegatedWithRatio,
        }
    }

    pub fn is_delegated(&self) -> bool {
        !matches!(self, FeeDelegation::None)
    }

    pub fn fee_payer(&self) -> Option<NexaAddress> {
        match self {
            FeeDelegation::None => None,
            FeeDelegation::Delegated { fee_payer }
            | FeeDelegation::DelegatedWithRatio { fee_payer, .. } => Some(*fee_payer),
        }
    }

    pub fn ratio(&self) -> Option<FeeRatio> {
        match self {
            FeeDelegation::DelegatedWithRatio { ratio, .. } => Some(*ratio),
            _ => None,
        }
    }
}

/// The signable core of a transaction: everything except the signatures.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionData {
    pub kind: TransactionKind,
    pub fee_delegation: FeeDelegation,
    pub sender: NexaAddress,
    pub nonce: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
}

impl TransactionData {
    pub fn new(
        kind: TransactionKind,
        sender: NexaAddress,
        nonce: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> Self {
        Self {
            kind,
            fee_delegation: FeeDelegation::None,
            sender,
            nonce,
            gas_price,
            gas_limit,
        }
    }

    pub fn new_delegated(
        kind: TransactionKind,
        sender: NexaAddress,
        fee_payer: NexaAddress,
        nonce: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> Self {
        Self {
            kind,
            fee_delegation: FeeDelegation::Delegated { fee_payer },
            sender,
            nonce,
            gas_price,
            gas_limit,
        }
    }

    pub fn new_delegated_with_ratio(
        kind: TransactionKind,
        sender: NexaAddress,
        fee_payer: NexaAddress,
        ratio: FeeRatio,
        nonce: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> Self {
        Self {
            kind,
            fee_delegation: FeeDelegation::DelegatedWithRatio { fee_payer, ratio },
            sender,
            nonce,
            gas_price,
            gas_limit,
        }
    }

    pub fn new_transfer(
        recipient: NexaAddress,
        amount: u64,
        sender: NexaAddress,
        nonce: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> Self {
        Self::new(
            TransactionKind::ValueTransfer { to: recipient, amount },
            sender,
            nonce,
            gas_price,
            gas_limit,
        )
    }

    pub fn new_account_update(
        account_key: AccountKey,
        sender: NexaAddress,
        nonce: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> Self {
        Self::new(
            TransactionKind::AccountUpdate { account_key },
            sender,
            nonce,
            gas_price,
            gas_limit,
        )
    }

    pub fn tx_type(&self) -> TxType {
        TxType {
            basic: self.kind.basic_type(),
            delegation: self.fee_delegation.kind(),
        }
    }

    /// The role that must authorize this transaction's sender signatures. Replacing an
    /// account key is the one operation authorized by a dedicated role; everything else
    /// a sender signs is ordinary transaction signing.
    pub fn sender_role(&self) -> Role {
        match self.kind {
            TransactionKind::AccountUpdate { .. } => Role::AccountUpdate,
            _ => Role::Transaction,
        }
    }

    /// Type-level consistency of the kind/delegation pair.
    pub fn validity_check(&self) -> NexaResult<()> {
        if matches!(self.kind, TransactionKind::Legacy { .. }) && self.fee_delegation.is_delegated()
        {
            return Err(NexaError::InvalidTransactionType {
                error: "legacy transactions carry no fee-payer slot".to_string(),
            });
        }
        Ok(())
    }

    /// Construct a transaction of the given type from a field map, the submission
    /// surface client tooling uses. Fields irrelevant to `tx_type` are ignored;
    /// missing required fields and mistyped values are errors.
    pub fn from_field_map(tx_type: TxType, fields: TxFieldMap) -> NexaResult<Self> {
        let sender = fields.require_address(TxFieldKey::From)?;
        let nonce = fields.require_u64(TxFieldKey::Nonce)?;
        let gas_price = fields.require_u64(TxFieldKey::GasPrice)?;
        let gas_limit = fields.require_u64(TxFieldKey::GasLimit)?;

        let kind = match tx_type.basic {
            BasicTxType::Legacy => TransactionKind::Legacy {
                to: fields.opt_address(TxFieldKey::To)?,
                amount: fields.opt_u64(TxFieldKey::Amount)?.unwrap_or(0),
                payload: fields.opt_bytes(TxFieldKey::Data)?.unwrap_or_default(),
            },
            BasicTxType::ValueTransfer => TransactionKind::ValueTransfer {
                to: fields.require_address(TxFieldKey::To)?,
                amount: fields.require_u64(TxFieldKey::Amount)?,
            },
            BasicTxType::ValueTransferMemo => TransactionKind::ValueTransferMemo {
                to: fields.require_address(TxFieldKey::To)?,
                amount: fields.require_u64(TxFieldKey::Amount)?,
                memo: fields.require_bytes(TxFieldKey::Data)?,
            },
            BasicTxType::AccountCreation => TransactionKind::AccountCreation {
                to: fields.require_address(TxFieldKey::To)?,
                amount: fields.opt_u64(TxFieldKey::Amount)?.unwrap_or(0),
                human_readable: fields.opt_bool(TxFieldKey::HumanReadable)?.unwrap_or(false),
                account_key: fields.require_account_key(TxFieldKey::AccountKey)?,
            },
            BasicTxType::AccountUpdate => TransactionKind::AccountUpdate {
                account_key: fields.require_account_key(TxFieldKey::AccountKey)?,
            },
            BasicTxType::SmartContractDeploy => TransactionKind::SmartContractDeploy {
                to: fields.opt_address(TxFieldKey::To)?,
                amount: fields.opt_u64(TxFieldKey::Amount)?.unwrap_or(0),
                payload: fields.require_bytes(TxFieldKey::Data)?,
                human_readable: fields.opt_bool(TxFieldKey::HumanReadable)?.unwrap_or(false),
                code_format: fields.opt_code_format(TxFieldKey::CodeFormat)?.unwrap_or_default(),
            },
            BasicTxType::SmartContractExecution => TransactionKind::SmartContractExecution {
                to: fields.require_address(TxFieldKey::To)?,
                amount: fields.opt_u64(TxFieldKey::Amount)?.unwrap_or(0),
                payload: fields.require_bytes(TxFieldKey::Data)?,
            },
            BasicTxType::Cancel => TransactionKind::Cancel,
            BasicTxType::ChainDataAnchoring => TransactionKind::ChainDataAnchoring {
                anchored_data: fields.require_bytes(TxFieldKey::AnchoredData)?,
            },
        };

        let fee_delegation = match tx_type.delegation {
            DelegationKind::None => FeeDelegation::None,
            DelegationKind::Delegated => FeeDelegation::Delegated {
                fee_payer: fields.require_address(TxFieldKey::FeePayer)?,
            },
            DelegationKind::DelegatedWithRatio => FeeDelegation::DelegatedWithRatio {
                fee_payer: fields.require_address(TxFieldKey::FeePayer)?,
                ratio: fields.require_fee_ratio(TxFieldKey::FeeRatioOfFeePayer)?,
            },
        };

        let data = Self {
            kind,
            fee_delegation,
            sender,
            nonce,
            gas_price,
            gas_limit,
        };
        data.validity_check()?;
        data.pipe(Ok)
    }

    pub fn digest(&self) -> TransactionDigest {
        TransactionDigest::new(default_hash(self))
    }
}

/// The closed set of keys a transaction field map accepts.
#[derive(
    Debug,
    Display,
    EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum TxFieldKey {
    Nonce,
    From,
    To,
    Amount,
    GasLimit,
    GasPrice,
    HumanReadable,
    Data,
    AccountKey,
    FeePayer,
    FeeRatioOfFeePayer,
    AnchoredData,
    CodeFormat,
}

/// A value supplied under a [`TxFieldKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TxFieldValue {
    U64(u64),
    Address(NexaAddress),
    Bytes(Vec<u8>),
    Bool(bool),
    AccountKey(AccountKey),
    FeeRatio(FeeRatio),
    CodeFormat(CodeFormat),
}

/// The field map a transaction is constructed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TxFieldMap(BTreeMap<TxFieldKey, TxFieldValue>);

macro_rules! typed_getters {
    ($($required:ident / $optional:ident -> $ty:ty [$variant:ident]);* $(;)?) => {
        $(
            pub fn $required(&self, key: TxFieldKey) -> NexaResult<$ty> {
                self.$optional(key)?
                    .ok_or(NexaError::MissingTransactionField { field: key })
            }

            pub fn $optional(&self, key: TxFieldKey) -> NexaResult<Option<$ty>> {
                match self.0.get(&key) {
                    None => Ok(None),
                    Some(TxFieldValue::$variant(v)) => Ok(Some(v.clone())),
                    Some(_) => Err(NexaError::InvalidTransactionFieldType { field: key }),
                }
            }
        )*
    }
}

impl TxFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion; the last value supplied for a key wins.
    pub fn with(mut self, key: TxFieldKey, value: TxFieldValue) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: TxFieldKey, value: TxFieldValue) {
        self.0.insert(key, value);
    }

    typed_getters!(
        require_u64 / opt_u64 -> u64 [U64];
        require_address / opt_address -> NexaAddress [Address];
        require_bytes / opt_bytes -> Vec<u8> [Bytes];
        require_bool / opt_bool -> bool [Bool];
        require_account_key / opt_account_key -> AccountKey [AccountKey];
        require_fee_ratio / opt_fee_ratio -> FeeRatio [FeeRatio];
        require_code_format / opt_code_format -> CodeFormat [CodeFormat];
    );
}

/// A transaction as submitted: the signable payload plus its signature sets.
///
/// Sender signatures are checked against the sender's resolved-role key; fee-payer
/// signatures, present only on delegated types, are checked against the fee payer's
/// `FeePayer`-role key under a distinct signing intent. Neither list carries any
/// correspondence to key-list order.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub intent_message: IntentMessage<TransactionData>,
    pub tx_signatures: NonEmpty<TransactionSignature>,
    pub fee_payer_signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    pub fn new(data: TransactionData, tx_signatures: NonEmpty<TransactionSignature>) -> Self {
        Self {
            intent_message: IntentMessage::new(Intent::nexa_transaction(), data),
            tx_signatures,
            fee_payer_signatures: Vec::new(),
        }
    }

    /// Sign `data` with each signer under the sender intent.
    pub fn from_data_and_signers(data: TransactionData, signers: Vec<&NexaKeyPair>) -> Self {
        let intent_msg = IntentMessage::new(Intent::nexa_transaction(), &data);
        let signatures: Vec<_> = signers
            .into_iter()
            .map(|s| TransactionSignature::new_secure(&intent_msg, s))
            .collect();
        Self::new(
            data,
            NonEmpty::from_vec(signatures).expect("transaction requires at least one sender signature"),
        )
    }

    /// Attach fee-payer signatures produced under the fee-payer intent.
    pub fn with_fee_payer_signers(mut self, signers: Vec<&NexaKeyPair>) -> Self {
        let intent_msg =
            IntentMessage::new(Intent::fee_payer_transaction(), &self.intent_message.value);
        self.fee_payer_signatures = signers
            .into_iter()
            .map(|s| TransactionSignature::new_secure(&intent_msg, s))
            .collect();
        self
    }

    pub fn data(&self) -> &TransactionData {
        &self.intent_message.value
    }

    pub fn digest(&self) -> TransactionDigest {
        self.data().digest()
    }

    /// The message sender signatures are verified against.
    pub fn sender_intent_message(&self) -> IntentMessage<&TransactionData> {
        IntentMessage::new(Intent::nexa_transaction(), self.data())
    }

    /// The message fee-payer signatures are verified against.
    pub fn fee_payer_intent_message(&self) -> IntentMessage<&TransactionData> {
        IntentMessage::new(Intent::fee_payer_transaction(), self.data())
    }
}

