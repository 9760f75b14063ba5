use serde::{Deserialize, Serialize};

use crate::transaction::FeeDelegation;

/// Breakdown of who pays what for a transaction, settled at execution time.
///
/// The intrinsic portion is always borne in full by the party charged for admission:
/// the sender, or the fee payer when the transaction is delegated. A percentage ratio,
/// when present, splits only the execution-gas remainder consumed beyond the intrinsic
/// minimum.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct TransactionFee {
    // Cost of the intrinsic gas portion
    pub intrinsic_fee: u64,
    // Cost of the gas consumed beyond the intrinsic minimum
    pub execution_fee: u64,
    // Portion of the total borne by the sender
    pub sender_fee: u64,
    // Portion of the total borne by the fee payer
    pub fee_payer_fee: u64,
    // Total fee deducted
    pub total_fee: u64,
}

impl TransactionFee {
    pub fn new(
        intrinsic_gas: u64,
        execution_gas: u64,
        gas_price: u64,
        delegation: &FeeDelegation,
    ) -> Self {
        let intrinsic_fee = intrinsic_gas * gas_price;
        let execution_fee = execution_gas * gas_price;
        let total_fee = intrinsic_fee + execution_fee;

        let (sender_fee, fee_payer_fee) = match delegation {
            FeeDelegation::None => (total_fee, 0),
            FeeDelegation::Delegated { .. } => (0, total_fee),
            FeeDelegation::DelegatedWithRatio { ratio, .. } => {
                let (payer_execution, sender_execution) =
                    split_execution_fee(execution_fee, ratio.get());
                (sender_execution, intrinsic_fee + payer_execution)
            }
        };

        Self {
            intrinsic_fee,
            execution_fee,
            sender_fee,
            fee_payer_fee,
            total_fee,
        }
    }
}

/// Split an execution-fee amount by the fee payer's percentage. Integer division; the
/// rounding remainder falls to the sender.
pub fn split_execution_fee(execution_fee: u64, ratio_of_fee_payer: u8) -> (u64, u64) {
    let payer = execution_fee / 100 * (ratio_of_fee_payer as u64)
        + execution_fee % 100 * (ratio_of_fee_payer as u64) / 100;
    (payer, execution_fee - payer)
}

