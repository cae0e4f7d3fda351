use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::{Network, NetworkConfig};

/// Marketplace service credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
  /// Sent as `x-api-key` on order submissions.
  pub api_key: String,
}

impl std::fmt::Debug for MarketConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MarketConfig")
      .field("api_key", &"<redacted>")
      .finish()
  }
}

/// Per-network sections. Either may be omitted; selecting an omitted network
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Networks {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test: Option<NetworkConfig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main: Option<NetworkConfig>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
  pub market: MarketConfig,
  pub networks: Networks,
}

impl AppConfig {
  /// Load and validate a configuration file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_json(&content)
  }

  /// Parse and validate a configuration document.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    for network in [Network::Test, Network::Main] {
      if let Some(section) = self.section(network) {
        section.validate(network)?;
      }
    }
    Ok(())
  }

  /// The section of `network`, if the file configures it.
  pub fn network(&self, network: Network) -> Result<&NetworkConfig, ConfigError> {
    self
      .section(network)
      .ok_or_else(|| ConfigError::NetworkNotConfigured(network.config_key().to_string()))
  }

  fn section(&self, network: Network) -> Option<&NetworkConfig> {
    match network {
      Network::Test => self.networks.test.as_ref(),
      Network::Main => self.networks.main.as_ref(),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use crate::ContractStandard;

  fn sample_json() -> serde_json::Value {
    let network = serde_json::json!({
      "rpc_url": "https://rpc.example.org/v2/key",
      "exchange": "0x59728544B08AB483533076417FbBB2fD0B17CE3a",
      "transfer_manager_erc721": "0xf42aa99F011A1fA7CDA90E5E98b277E306BcA83e",
      "transfer_manager_erc1155": "0xFED24eC7E22f573c2e08AEF55aA6797Ca2b3A051",
      "strategy_standard_sale": "0x56244Bb70CbD3EA9Dc8007399F61dFC065190031",
      "weth": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
    });
    serde_json::json!({
      "market": { "api_key": "secret-key" },
      "networks": { "test": network.clone(), "main": network }
    })
  }

  #[test]
  fn test_from_json() {
    let config = AppConfig::from_json(&sample_json().to_string()).unwrap();
    assert_eq!(config.market.api_key, "secret-key");
    assert_eq!(config.network(Network::Main).unwrap().domain.name, "LooksRareExchange");
    assert_eq!(
      ContractStandard::Erc1155.transfer_manager(config.network(Network::Test).unwrap()),
      "0xFED24eC7E22f573c2e08AEF55aA6797Ca2b3A051"
    );
  }

  #[test]
  fn test_rejects_bad_address() {
    let mut json = sample_json();
    json["networks"]["test"]["weth"] = serde_json::json!("not-an-address");

    let err = AppConfig::from_json(&json.to_string()).unwrap_err();
    assert!(
      matches!(&err, ConfigError::InvalidField { field, .. } if field == "networks.test.weth"),
      "unexpected error: {err}"
    );
  }

  #[test]
  fn test_rejects_empty_rpc_url() {
    let mut json = sample_json();
    json["networks"]["main"]["rpc_url"] = serde_json::json!("  ");

    let err = AppConfig::from_json(&json.to_string()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidField { .. }));
  }

  #[test]
  fn test_debug_redacts_api_key() {
    let config = AppConfig::from_json(&sample_json().to_string()).unwrap();
    assert!(!format!("{config:?}").contains("secret-key"));
  }

  #[test]
  fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file
      .write_all(sample_json().to_string().as_bytes())
      .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.network(Network::Main).unwrap().rpc_url, "https://rpc.example.org/v2/key");
  }

  #[test]
  fn test_example_config_is_valid() {
    let config =
      AppConfig::from_json(include_str!("../../../config/mintdesk.example.json")).unwrap();
    assert_eq!(config.network(Network::Main).unwrap().domain.version, "1");
    // Only mainnet addresses are shipped.
    assert!(config.network(Network::Test).is_err());
  }

  #[test]
  fn test_omitted_network_cannot_be_selected() {
    let mut json = sample_json();
    json["networks"]
      .as_object_mut()
      .unwrap()
      .remove("test");

    let config = AppConfig::from_json(&json.to_string()).unwrap();
    assert!(config.network(Network::Main).is_ok());
    assert!(matches!(
      config.network(Network::Test),
      Err(ConfigError::NetworkNotConfigured(name)) if name == "test"
    ));
  }

  #[test]
  fn test_rejects_zero_exchange() {
    let mut json = sample_json();
    json["networks"]["test"]["exchange"] = serde_json::json!(format!("0x{}", "0".repeat(40)));

    let err = AppConfig::from_json(&json.to_string()).unwrap_err();
    assert!(
      matches!(&err, ConfigError::InvalidField { field, .. } if field == "networks.test.exchange"),
      "unexpected error: {err}"
    );
  }

  #[test]
  fn test_load_missing_file() {
    let err = AppConfig::load(Path::new("/nonexistent/mintdesk.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
