//! Error types for batch execution.

use thiserror::Error;

/// Failure of a single phase invocation.
///
/// Unit-level failures never abort a run; they are counted and exported.
/// The same type is returned by the approval phase, where the runner turns it
/// into a fatal [`RunError::Approval`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
  /// The unit's key could not be turned into call arguments.
  #[error("invalid work unit '{key}': {message}")]
  InvalidUnit { key: String, message: String },

  /// The contract call was rejected before a transaction was accepted.
  #[error("contract call failed: {message}")]
  Contract { message: String },

  /// The transaction was accepted but dropped or reverted.
  #[error("transaction failed: {message}")]
  Transaction { message: String },

  /// Typed-data signing failed.
  #[error("signing failed: {message}")]
  Signing { message: String },

  /// The HTTP request could not be completed.
  #[error("request failed: {message}")]
  Transport { message: String },

  /// The remote service answered without an explicit success status.
  #[error("rejected by remote service: {message}")]
  Rejected { message: String },
}

impl PhaseError {
  pub fn invalid_unit(key: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidUnit {
      key: key.into(),
      message: message.into(),
    }
  }

  pub fn contract(message: impl Into<String>) -> Self {
    Self::Contract {
      message: message.into(),
    }
  }

  pub fn transaction(message: impl Into<String>) -> Self {
    Self::Transaction {
      message: message.into(),
    }
  }

  pub fn signing(message: impl Into<String>) -> Self {
    Self::Signing {
      message: message.into(),
    }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport {
      message: message.into(),
    }
  }

  pub fn rejected(message: impl Into<String>) -> Self {
    Self::Rejected {
      message: message.into(),
    }
  }

  /// Short operator-facing reason: the variant prefix plus the summarized
  /// inner message.
  pub fn summary(&self) -> String {
    let mut short = self.clone();
    let (Self::InvalidUnit { message, .. }
    | Self::Contract { message }
    | Self::Transaction { message }
    | Self::Signing { message }
    | Self::Transport { message }
    | Self::Rejected { message }) = &mut short;
    *message = summarize_error(message);
    short.to_string()
  }
}

/// Errors that halt a run.
#[derive(Debug, Error)]
pub enum RunError {
  /// The one-off approval failed; no unit was attempted.
  #[error("approval failed: {source}")]
  Approval {
    #[source]
    source: PhaseError,
  },
}

/// Trim provider error messages down to their readable head.
///
/// JSON-RPC errors render as `(code: C, message: M, data: D)`; only `M` is
/// kept. Otherwise provider errors tend to append a parenthesised dump of the
/// request and response, and everything from the last `(` of the first line
/// that has one is dropped. Messages that would become empty are returned
/// unchanged.
pub fn summarize_error(message: &str) -> String {
  if let Some(rpc_message) = json_rpc_message(message) {
    return rpc_message.to_string();
  }

  let Some(line) = message.lines().find(|line| line.contains('(')) else {
    return message.trim().to_string();
  };

  let head = line[..line.rfind('(').unwrap_or(line.len())].trim_end();
  if head.is_empty() {
    message.trim().to_string()
  } else {
    head.to_string()
  }
}

fn json_rpc_message(message: &str) -> Option<&str> {
  let start = message.find("(code: ")?;
  let rest = &message[start..];
  let rest = &rest[rest.find(", message: ")? + ", message: ".len()..];
  let end = rest.rfind(", data: ")?;
  Some(rest[..end].trim()).filter(|m| !m.is_empty())
}
