use thiserror::Error;

/// The supplied private key cannot be used for signing.
///
/// Messages never include any part of the key.
#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("private key is empty")]
  Empty,

  #[error("private key is not valid hex")]
  NotHex,

  #[error("private key must be 32 bytes, got {0}")]
  WrongLength(usize),

  #[error("private key is not a valid secp256k1 scalar")]
  InvalidScalar,
}

/// Setup errors for contract bindings and providers.
#[derive(Debug, Error)]
pub enum ChainError {
  #[error("invalid contract ABI: {message}")]
  InvalidAbi { message: String },

  #[error("contract ABI has no function '{name}'")]
  MissingEntryPoint { name: String },

  #[error("function '{name}' must take (address, uint256), found ({found})")]
  EntryPointSignature { name: String, found: String },

  #[error("invalid address for {field}: '{value}'")]
  InvalidAddress { field: String, value: String },

  #[error("failed to create provider: {message}")]
  Provider { message: String },
}
