//! On-chain side of mintdesk.
//!
//! This crate provides:
//! - [`SigningContext`]: one private key bound to one network for a whole run
//! - ABI validation for operator-supplied mint contracts
//! - [`StandardBinding`]: the approval ABI and transfer manager of a token standard
//! - [`DirectCallPhase`] and [`ApprovalCallPhase`], the on-chain phase executors

mod abi;
mod error;
mod phases;
mod signer;

pub use abi::{StandardBinding, parse_mint_abi};
pub use error::{ChainError, CredentialError};
pub use phases::{ApprovalCallPhase, DirectCallPhase};
pub use signer::{ChainClient, SigningContext};

pub use ethers::types::Address;

/// Parse a `0x`-prefixed address, naming `field` in the error.
pub fn parse_address(field: &str, value: &str) -> Result<Address, ChainError> {
  if !mintdesk_config::is_address(value.trim()) {
    return Err(ChainError::InvalidAddress {
      field: field.to_string(),
      value: value.to_string(),
    });
  }
  value
    .trim()
    .parse::<Address>()
    .map_err(|_| ChainError::InvalidAddress {
      field: field.to_string(),
      value: value.to_string(),
    })
}
