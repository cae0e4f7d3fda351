use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ethers::types::U256;
use ethers::types::transaction::eip712::EIP712Domain;
use mintdesk_batch::{PhaseError, UnitPhase, WorkUnit};
use mintdesk_chain::SigningContext;
use tracing::info;

use crate::client::MarketClient;
use crate::order::OrderTemplate;
use crate::typed_data::MakerOrderTypedData;

/// Signs one maker order per token id and submits it to the marketplace.
#[derive(Debug)]
pub struct OrderSubmissionPhase {
  signing: SigningContext,
  client: MarketClient,
  template: OrderTemplate,
  domain: EIP712Domain,
}

impl OrderSubmissionPhase {
  pub fn new(
    signing: SigningContext,
    client: MarketClient,
    template: OrderTemplate,
    domain: EIP712Domain,
  ) -> Self {
    Self {
      signing,
      client,
      template,
      domain,
    }
  }
}

#[async_trait]
impl UnitPhase for OrderSubmissionPhase {
  fn name(&self) -> &str {
    "makeOrder"
  }

  async fn execute(&self, unit: &WorkUnit) -> Result<(), PhaseError> {
    let token_id = U256::from_dec_str(unit.key.trim())
      .map_err(|e| PhaseError::invalid_unit(&unit.key, format!("token id: {e}")))?;

    let order = self.template.order(token_id, unix_now());
    let signature = self
      .signing
      .sign_typed_data(&MakerOrderTypedData::new(&self.domain, &order))
      .await?;

    self.client.submit(&order, &signature).await?;
    info!(token_id = %token_id, nonce = order.nonce, "order_submitted");

    Ok(())
  }
}

/// Seconds since the unix epoch; used for order timestamps and nonces.
pub fn unix_now() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or_default()
}
