//! The signing identity of a run.

use std::sync::Arc;

use ethers::core::k256::ecdsa::SigningKey;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip712::Eip712;
use ethers::types::{Address, Signature};
use ethers::utils::hex;
use mintdesk_batch::PhaseError;
use mintdesk_config::Network;
use tracing::debug;

use crate::error::{ChainError, CredentialError};

/// Provider stack every on-chain phase sends through.
pub type ChainClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A private key bound to one network.
///
/// Built once per run and shared read-only by every phase of that run. The
/// key itself is never logged or printed; `Debug` shows only the network and
/// the derived address.
#[derive(Clone)]
pub struct SigningContext {
  network: Network,
  wallet: LocalWallet,
}

impl SigningContext {
  /// Validate `secret` as a hex secp256k1 key and derive its address.
  ///
  /// A `0x` prefix and surrounding whitespace are accepted.
  pub fn create(network: Network, secret: &str) -> Result<Self, CredentialError> {
    let secret = secret.trim();
    let secret = secret
      .strip_prefix("0x")
      .or_else(|| secret.strip_prefix("0X"))
      .unwrap_or(secret);
    if secret.is_empty() {
      return Err(CredentialError::Empty);
    }

    let bytes = hex::decode(secret).map_err(|_| CredentialError::NotHex)?;
    if bytes.len() != 32 {
      return Err(CredentialError::WrongLength(bytes.len()));
    }

    let key = SigningKey::from_slice(&bytes).map_err(|_| CredentialError::InvalidScalar)?;
    let wallet = LocalWallet::from(key).with_chain_id(network.chain_id());

    debug!(network = %network, address = ?wallet.address(), "signing_context_created");

    Ok(Self { network, wallet })
  }

  pub fn network(&self) -> Network {
    self.network
  }

  pub fn chain_id(&self) -> u64 {
    self.network.chain_id()
  }

  /// The address that authorizes every phase of the run.
  pub fn address(&self) -> Address {
    self.wallet.address()
  }

  /// Build a signing client over the JSON-RPC endpoint at `rpc_url`.
  pub fn connect(&self, rpc_url: &str) -> Result<Arc<ChainClient>, ChainError> {
    // The URL usually embeds a provider API key; keep it out of errors.
    let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| ChainError::Provider {
      message: format!("invalid rpc url: {}", e),
    })?;
    Ok(self.client(provider))
  }

  /// Wrap an already configured provider with the run's key.
  pub fn client(&self, provider: Provider<Http>) -> Arc<ChainClient> {
    Arc::new(SignerMiddleware::new(provider, self.wallet.clone()))
  }

  /// Sign an EIP-712 payload with the run's key.
  pub async fn sign_typed_data<T>(&self, payload: &T) -> Result<Signature, PhaseError>
  where
    T: Eip712 + Send + Sync,
  {
    self
      .wallet
      .sign_typed_data(payload)
      .await
      .map_err(|e| PhaseError::signing(e.to_string()))
  }
}

impl std::fmt::Debug for SigningContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SigningContext")
      .field("network", &self.network)
      .field("address", &self.address())
      .finish_non_exhaustive()
  }
}
