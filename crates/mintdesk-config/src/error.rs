use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid value for '{field}': {message}")]
  InvalidField { field: String, message: String },

  #[error("unknown network '{0}' (expected test/goerli or main/homestead)")]
  UnknownNetwork(String),

  #[error("network '{0}' has no section in the config file")]
  NetworkNotConfigured(String),
}

impl ConfigError {
  pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidField {
      field: field.into(),
      message: message.into(),
    }
  }
}
