//! EIP-712 encoding of maker orders.
//!
//! ```text
//! digest     = keccak256(0x1901 ‖ domainSeparator ‖ structHash)
//! structHash = keccak256(abi.encode(MAKER_ORDER_TYPEHASH, isOrderAsk, ..., keccak256(params)))
//! ```

use std::convert::Infallible;

use ethers::abi::Token;
use ethers::types::transaction::eip712::{EIP712Domain, Eip712};
use ethers::types::{Address, U256};
use ethers::utils::keccak256;
use mintdesk_config::{ExchangeDomain, Network};

use crate::order::MakerOrder;

/// Canonical type string of the exchange's order struct.
pub const MAKER_ORDER_TYPE: &str = "MakerOrder(bool isOrderAsk,address signer,address collection,uint256 price,uint256 tokenId,uint256 amount,address strategy,address currency,uint256 nonce,uint256 startTime,uint256 endTime,uint256 minPercentageToAsk,bytes params)";

/// Domain of the exchange contract that verifies orders on `network`.
pub fn exchange_domain(domain: &ExchangeDomain, network: Network, exchange: Address) -> EIP712Domain {
  EIP712Domain {
    name: Some(domain.name.clone()),
    version: Some(domain.version.clone()),
    chain_id: Some(U256::from(network.chain_id())),
    verifying_contract: Some(exchange),
    salt: None,
  }
}

/// A maker order bound to its signing domain.
#[derive(Debug, Clone)]
pub struct MakerOrderTypedData<'a> {
  domain: &'a EIP712Domain,
  order: &'a MakerOrder,
}

impl<'a> MakerOrderTypedData<'a> {
  pub fn new(domain: &'a EIP712Domain, order: &'a MakerOrder) -> Self {
    Self { domain, order }
  }
}

impl Eip712 for MakerOrderTypedData<'_> {
  type Error = Infallible;

  fn domain(&self) -> Result<EIP712Domain, Self::Error> {
    Ok(self.domain.clone())
  }

  fn type_hash() -> Result<[u8; 32], Self::Error> {
    Ok(keccak256(MAKER_ORDER_TYPE))
  }

  fn struct_hash(&self) -> Result<[u8; 32], Self::Error> {
    let order = self.order;
    let tokens = [
      Token::FixedBytes(Self::type_hash()?.to_vec()),
      Token::Bool(order.is_order_ask),
      Token::Address(order.signer),
      Token::Address(order.collection),
      Token::Uint(order.price),
      Token::Uint(order.token_id),
      Token::Uint(order.amount.into()),
      Token::Address(order.strategy),
      Token::Address(order.currency),
      Token::Uint(order.nonce.into()),
      Token::Uint(order.start_time.into()),
      Token::Uint(order.end_time.into()),
      Token::Uint(order.min_percentage_to_ask.into()),
      Token::FixedBytes(keccak256(&order.params).to_vec()),
    ];
    Ok(keccak256(ethers::abi::encode(&tokens)))
  }
}
