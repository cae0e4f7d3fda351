//! The maker order record.

use ethers::types::{Address, Bytes, Signature, U256};
use ethers::utils::to_checksum;
use mintdesk_chain::parse_address;
use mintdesk_config::NetworkConfig;
use serde::Serialize;

use crate::error::MarketError;

/// Share of the sale price the seller must receive, in basis points.
pub const MIN_PERCENTAGE_TO_ASK: u64 = 8500;

/// How long a listing stays valid.
pub const LISTING_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// A sell order as signed by the maker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerOrder {
  pub is_order_ask: bool,
  pub signer: Address,
  pub collection: Address,
  /// Always in wei.
  pub price: U256,
  pub token_id: U256,
  pub amount: u64,
  pub strategy: Address,
  pub currency: Address,
  pub nonce: u64,
  pub start_time: u64,
  pub end_time: u64,
  pub min_percentage_to_ask: u64,
  pub params: Bytes,
}

impl MakerOrder {
  /// JSON shape accepted by the marketplace API.
  pub fn to_wire(&self, signature: &Signature) -> WireOrder {
    WireOrder {
      is_order_ask: self.is_order_ask,
      signer: to_checksum(&self.signer, None),
      collection: to_checksum(&self.collection, None),
      price: self.price.to_string(),
      token_id: self.token_id.to_string(),
      amount: self.amount,
      strategy: to_checksum(&self.strategy, None),
      currency: to_checksum(&self.currency, None),
      nonce: self.nonce,
      start_time: self.start_time,
      end_time: self.end_time,
      min_percentage_to_ask: self.min_percentage_to_ask,
      params: self.params.to_vec(),
      sign: format!("0x{signature}"),
    }
  }
}

/// Serialized order body. Numbers above 2^53 are sent as decimal strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
  pub is_order_ask: bool,
  pub signer: String,
  pub collection: String,
  pub price: String,
  pub token_id: String,
  pub amount: u64,
  pub strategy: String,
  pub currency: String,
  pub nonce: u64,
  pub start_time: u64,
  pub end_time: u64,
  pub min_percentage_to_ask: u64,
  pub params: Vec<u8>,
  pub sign: String,
}

/// Optional replacements for the network's default listing terms.
#[derive(Debug, Clone, Default)]
pub struct OrderOverrides {
  pub strategy: Option<String>,
  pub currency: Option<String>,
}

/// The fields shared by every order of one listing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
  pub signer: Address,
  pub collection: Address,
  pub price: U256,
  pub strategy: Address,
  pub currency: Address,
  pub start_time: u64,
  pub end_time: u64,
}

impl OrderTemplate {
  /// `now` is unix seconds, taken once per run.
  pub fn new(
    signer: Address,
    collection: Address,
    price: U256,
    strategy: Address,
    currency: Address,
    now: u64,
  ) -> Self {
    Self {
      signer,
      collection,
      price,
      strategy,
      currency,
      start_time: now,
      end_time: now + LISTING_DURATION_SECS,
    }
  }

  /// Resolve strategy and currency from `overrides`, falling back to the
  /// network's standard-sale strategy and WETH.
  pub fn for_network(
    signer: Address,
    collection: Address,
    price: U256,
    overrides: &OrderOverrides,
    network: &NetworkConfig,
    now: u64,
  ) -> Result<Self, MarketError> {
    let strategy = match non_empty(&overrides.strategy) {
      Some(value) => parse_address("strategy", value)?,
      None => parse_address("strategy_standard_sale", &network.strategy_standard_sale)?,
    };
    let currency = match non_empty(&overrides.currency) {
      Some(value) => parse_address("currency", value)?,
      None => parse_address("weth", &network.weth)?,
    };

    Ok(Self::new(signer, collection, price, strategy, currency, now))
  }

  pub fn order(&self, token_id: U256, nonce: u64) -> MakerOrder {
    MakerOrder {
      is_order_ask: true,
      signer: self.signer,
      collection: self.collection,
      price: self.price,
      token_id,
      amount: 1,
      strategy: self.strategy,
      currency: self.currency,
      nonce,
      start_time: self.start_time,
      end_time: self.end_time,
      min_percentage_to_ask: MIN_PERCENTAGE_TO_ASK,
      params: Bytes::default(),
    }
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
