//! Contract ABI handling.

use ethers::abi::{Abi, ParamType};
use ethers::types::Address;
use mintdesk_config::{ContractStandard, NetworkConfig};

use crate::error::ChainError;
use crate::parse_address;

const ERC721_APPROVAL_ABI: &[&str] = &[
  "function setApprovalForAll(address operator, bool approved)",
  "function isApprovedForAll(address owner, address operator) view returns (bool)",
  "function ownerOf(uint256 tokenId) view returns (address)",
];

const ERC1155_APPROVAL_ABI: &[&str] = &[
  "function setApprovalForAll(address operator, bool approved)",
  "function isApprovedForAll(address account, address operator) view returns (bool)",
  "function balanceOf(address account, uint256 id) view returns (uint256)",
];

/// Parse an operator-supplied ABI and check that `entry_point` can be called
/// with `(recipient, amount)`.
///
/// Accepts either a bare ABI array or a build artifact with an `abi` field.
pub fn parse_mint_abi(json: &str, entry_point: &str) -> Result<Abi, ChainError> {
  let value: serde_json::Value = serde_json::from_str(json).map_err(|e| ChainError::InvalidAbi {
    message: e.to_string(),
  })?;
  let value = match value {
    serde_json::Value::Object(mut artifact) if artifact.contains_key("abi") => artifact
      .remove("abi")
      .unwrap_or(serde_json::Value::Null),
    other => other,
  };

  let abi: Abi = serde_json::from_value(value).map_err(|e| ChainError::InvalidAbi {
    message: e.to_string(),
  })?;

  // Calls resolve to the first overload of a name.
  let function = abi
    .function(entry_point)
    .map_err(|_| ChainError::MissingEntryPoint {
      name: entry_point.to_string(),
    })?;

  let kinds: Vec<&ParamType> = function.inputs.iter().map(|p| &p.kind).collect();
  if !matches!(kinds.as_slice(), [ParamType::Address, ParamType::Uint(_)]) {
    return Err(ChainError::EntryPointSignature {
      name: entry_point.to_string(),
      found: kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", "),
    });
  }

  Ok(abi)
}

/// Approval ABI and transfer manager for a collection's token standard.
///
/// Resolved once per run.
#[derive(Debug, Clone)]
pub struct StandardBinding {
  pub standard: ContractStandard,
  pub abi: Abi,
  pub transfer_manager: Address,
}

impl StandardBinding {
  pub fn resolve(standard: ContractStandard, network: &NetworkConfig) -> Result<Self, ChainError> {
    let signatures = match standard {
      ContractStandard::Erc721 => ERC721_APPROVAL_ABI,
      ContractStandard::Erc1155 => ERC1155_APPROVAL_ABI,
    };
    let abi = ethers::abi::parse_abi(signatures).map_err(|e| ChainError::InvalidAbi {
      message: e.to_string(),
    })?;
    let transfer_manager = parse_address(
      &format!("transfer manager ({standard})"),
      standard.transfer_manager(network),
    )?;

    Ok(Self {
      standard,
      abi,
      transfer_manager,
    })
  }
}
