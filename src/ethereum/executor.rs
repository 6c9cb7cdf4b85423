//! Transaction executor: simulate, submit, await inclusion.

use alloy::{
    contract::SolCallBuilder,
    network::ReceiptResponse,
    primitives::TxHash,
    providers::Provider,
    sol_types::SolCall,
};

use crate::error::{AppError, Result};

/// Simulate `call` against current state, broadcast it, and wait for the receipt.
///
/// A revert during simulation surfaces as [`AppError::SimulationReverted`]
/// before any gas is spent. Broadcast failures, dropped transactions and
/// receipts with a failed status surface as [`AppError::SubmissionFailed`].
/// Nothing is retried.
pub async fn simulate_and_send<P, C>(call: SolCallBuilder<P, C>, label: &str) -> Result<TxHash>
where
    P: Provider,
    C: SolCall,
{
    tracing::debug!(call = C::SIGNATURE, label, "Simulating call");

    call.call().await.map_err(|e| {
        tracing::warn!(label, error = %e, "Simulation reverted");
        AppError::SimulationReverted(e.to_string())
    })?;

    let pending = call
        .send()
        .await
        .map_err(|e| AppError::SubmissionFailed(format!("{label}: {e}")))?;
    let tx_hash = *pending.tx_hash();
    tracing::info!(label, tx_hash = %tx_hash, "Transaction submitted, awaiting receipt");

    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| AppError::SubmissionFailed(format!("{label} ({tx_hash}): {e}")))?;

    if !ReceiptResponse::status(&receipt) {
        return Err(AppError::SubmissionFailed(format!(
            "{label} transaction {tx_hash} reverted on-chain"
        )));
    }

    let tx_hash = ReceiptResponse::transaction_hash(&receipt);
    tracing::info!(label, tx_hash = %tx_hash, "Transaction confirmed");
    Ok(tx_hash)
}
