use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::NetworkConfig;

/// Token standard declared by a collection contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractStandard {
  #[default]
  Erc721,
  Erc1155,
}

impl ContractStandard {
  /// The transfer manager that must be approved before listings of this
  /// standard can be filled.
  pub fn transfer_manager<'a>(&self, network: &'a NetworkConfig) -> &'a str {
    match self {
      ContractStandard::Erc721 => &network.transfer_manager_erc721,
      ContractStandard::Erc1155 => &network.transfer_manager_erc1155,
    }
  }
}

impl fmt::Display for ContractStandard {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ContractStandard::Erc721 => f.write_str("ERC721"),
      ContractStandard::Erc1155 => f.write_str("ERC1155"),
    }
  }
}

impl FromStr for ContractStandard {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().replace('-', "").as_str() {
      "ERC721" => Ok(ContractStandard::Erc721),
      "ERC1155" => Ok(ContractStandard::Erc1155),
      _ => Err(ConfigError::invalid(
        "standard",
        format!("'{s}' is not ERC721 or ERC1155"),
      )),
    }
  }
}
