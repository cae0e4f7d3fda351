use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The two networks a run can target.
///
/// The chain id mapping is fixed; only endpoints and addresses come from the
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
  #[serde(alias = "goerli")]
  Test,
  #[default]
  #[serde(alias = "homestead")]
  Main,
}

impl Network {
  pub const fn chain_id(self) -> u64 {
    match self {
      Network::Test => 5,
      Network::Main => 1,
    }
  }

  /// Key of the network's section in the config file.
  pub const fn config_key(self) -> &'static str {
    match self {
      Network::Test => "test",
      Network::Main => "main",
    }
  }

  /// Conventional provider name of the network.
  pub const fn provider_name(self) -> &'static str {
    match self {
      Network::Test => "goerli",
      Network::Main => "homestead",
    }
  }
}

impl fmt::Display for Network {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.provider_name())
  }
}

impl FromStr for Network {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "test" | "goerli" => Ok(Network::Test),
      "main" | "homestead" | "mainnet" => Ok(Network::Main),
      other => Err(ConfigError::UnknownNetwork(other.to_string())),
    }
  }
}

/// EIP-712 domain identity of the marketplace exchange contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDomain {
  pub name: String,
  pub version: String,
}

impl Default for ExchangeDomain {
  fn default() -> Self {
    Self {
      name: "LooksRareExchange".to_string(),
      version: "1".to_string(),
    }
  }
}

/// Endpoints and marketplace addresses for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
  /// JSON-RPC endpoint, e.g. an Alchemy URL with the API key embedded.
  pub rpc_url: String,
  /// Exchange contract; the verifying contract of signed orders.
  pub exchange: String,
  pub transfer_manager_erc721: String,
  pub transfer_manager_erc1155: String,
  /// Default execution strategy for listings.
  pub strategy_standard_sale: String,
  /// Wrapped native currency; the default listing currency.
  pub weth: String,
  #[serde(default)]
  pub domain: ExchangeDomain,
}

impl NetworkConfig {
  pub fn validate(&self, network: Network) -> Result<(), ConfigError> {
    if self.rpc_url.trim().is_empty() {
      return Err(ConfigError::invalid(
        format!("networks.{}.rpc_url", network.config_key()),
        "must not be empty",
      ));
    }

    let addresses = [
      ("exchange", &self.exchange),
      ("transfer_manager_erc721", &self.transfer_manager_erc721),
      ("transfer_manager_erc1155", &self.transfer_manager_erc1155),
      ("strategy_standard_sale", &self.strategy_standard_sale),
      ("weth", &self.weth),
    ];
    for (field, value) in addresses {
      let field = format!("networks.{}.{}", network.config_key(), field);
      if !is_address(value) {
        return Err(ConfigError::invalid(
          field,
          format!("'{value}' is not a 0x-prefixed 20-byte hex address"),
        ));
      }
      if is_zero_address(value) {
        return Err(ConfigError::invalid(field, "the zero address is not a contract"));
      }
    }

    Ok(())
  }
}

/// Whether `value` has the shape of an Ethereum address (`0x` + 40 hex digits).
///
/// Checksum casing is not verified.
pub fn is_address(value: &str) -> bool {
  value
    .strip_prefix("0x")
    .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_zero_address(value: &str) -> bool {
  value
    .strip_prefix("0x")
    .is_some_and(|hex| hex.chars().all(|c| c == '0'))
}
