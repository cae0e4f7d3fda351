use mintdesk_chain::ChainError;
use thiserror::Error;

/// Setup errors for a listing run. All of them are fatal before any unit.
#[derive(Debug, Error)]
pub enum MarketError {
  #[error("invalid price '{value}': {message}")]
  InvalidPrice { value: String, message: String },

  #[error("invalid marketplace url '{url}': {message}")]
  InvalidBaseUrl { url: String, message: String },

  #[error("marketplace api key is not a valid header value")]
  InvalidApiKey,

  #[error("failed to build http client: {0}")]
  Client(#[from] reqwest::Error),

  #[error(transparent)]
  Chain(#[from] ChainError),
}

impl MarketError {
  pub(crate) fn price(value: &str, message: impl Into<String>) -> Self {
    Self::InvalidPrice {
      value: value.to_string(),
      message: message.into(),
    }
  }
}
