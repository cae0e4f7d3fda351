//! On-chain phase executors.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Abi;
use ethers::contract::Contract;
use ethers::types::{Address, H256, TransactionReceipt, U256};
use mintdesk_batch::{ApprovalPhase, PhaseError, UnitPhase, WorkUnit};
use tracing::{debug, info, warn};

use crate::abi::StandardBinding;
use crate::parse_address;
use crate::signer::ChainClient;

/// Calls a mint entry point with `(recipient, 1)` once per unit.
pub struct DirectCallPhase {
  contract: Contract<ChainClient>,
  entry_point: String,
  confirm: bool,
}

impl DirectCallPhase {
  /// `abi` should come from [`crate::parse_mint_abi`] so the entry point is
  /// known to exist with the right inputs.
  pub fn new(
    client: Arc<ChainClient>,
    contract: Address,
    abi: Abi,
    entry_point: impl Into<String>,
  ) -> Self {
    Self {
      contract: Contract::new(contract, abi, client),
      entry_point: entry_point.into(),
      confirm: false,
    }
  }

  /// Also wait for each receipt and fail units whose transaction was dropped
  /// or reverted.
  pub fn confirm(mut self, confirm: bool) -> Self {
    self.confirm = confirm;
    self
  }
}

#[async_trait]
impl UnitPhase for DirectCallPhase {
  fn name(&self) -> &str {
    &self.entry_point
  }

  async fn execute(&self, unit: &WorkUnit) -> Result<(), PhaseError> {
    let recipient = parse_address("recipient", &unit.key)
      .map_err(|e| PhaseError::invalid_unit(&unit.key, e.to_string()))?;

    let call = self
      .contract
      .method::<_, ()>(&self.entry_point, (recipient, U256::one()))
      .map_err(|e| PhaseError::contract(e.to_string()))?;

    let pending = call
      .send()
      .await
      .map_err(|e| PhaseError::contract(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    info!(
      entry_point = %self.entry_point,
      recipient = %unit.key,
      tx_hash = ?tx_hash,
      "transaction_sent"
    );

    if self.confirm {
      let receipt = pending
        .await
        .map_err(|e| PhaseError::transaction(e.to_string()))?;
      let receipt = check_receipt(tx_hash, receipt)?;
      debug!(tx_hash = ?tx_hash, block = ?receipt.block_number, "transaction_confirmed");
    }

    Ok(())
  }
}

/// Grants the marketplace transfer manager operator rights on a collection.
pub struct ApprovalCallPhase {
  contract: Contract<ChainClient>,
  binding: StandardBinding,
}

impl ApprovalCallPhase {
  pub fn new(client: Arc<ChainClient>, collection: Address, binding: StandardBinding) -> Self {
    Self {
      contract: Contract::new(collection, binding.abi.clone(), client),
      binding,
    }
  }

  pub fn binding(&self) -> &StandardBinding {
    &self.binding
  }
}

#[async_trait]
impl ApprovalPhase for ApprovalCallPhase {
  async fn approve(&self) -> Result<(), PhaseError> {
    let call = self
      .contract
      .method::<_, ()>(
        "setApprovalForAll",
        (self.binding.transfer_manager, true),
      )
      .map_err(|e| PhaseError::contract(e.to_string()))?;

    let pending = call
      .send()
      .await
      .map_err(|e| PhaseError::contract(e.to_string()))?;
    let tx_hash = pending.tx_hash();
    info!(
      standard = %self.binding.standard,
      operator = ?self.binding.transfer_manager,
      tx_hash = ?tx_hash,
      "approval_sent"
    );

    let receipt = pending
      .await
      .map_err(|e| PhaseError::transaction(e.to_string()))?;
    let receipt = check_receipt(tx_hash, receipt)?;
    info!(tx_hash = ?tx_hash, block = ?receipt.block_number, "approval_confirmed");

    Ok(())
  }
}

/// A missing receipt means the transaction was dropped from the mempool.
/// Receipts without a status field (pre-Byzantium) count as success.
pub(crate) fn check_receipt(
  tx_hash: H256,
  receipt: Option<TransactionReceipt>,
) -> Result<TransactionReceipt, PhaseError> {
  match receipt {
    None => {
      warn!(tx_hash = ?tx_hash, "transaction_dropped");
      Err(PhaseError::transaction(format!(
        "transaction {tx_hash:#x} was dropped"
      )))
    }
    Some(receipt) if receipt.status.is_some_and(|status| status.is_zero()) => {
      warn!(tx_hash = ?tx_hash, "transaction_reverted");
      Err(PhaseError::transaction(format!(
        "transaction {tx_hash:#x} reverted"
      )))
    }
    Some(receipt) => Ok(receipt),
  }
}
