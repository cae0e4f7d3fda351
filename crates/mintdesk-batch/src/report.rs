//! Terminal run report and failure export.
//!
//! The export is the only recovery path: operators feed the `key,count` file
//! back in as the source of a follow-up run.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::RunState;

/// File name used when the operator does not pick one.
pub const DEFAULT_EXPORT_FILE: &str = "mint_failed_list.csv";

/// Errors rendering or writing the failure export.
#[derive(Debug, Error)]
pub enum ExportError {
  #[error("failed to render csv: {0}")]
  Csv(#[from] csv::Error),

  #[error("failed to write '{path}': {source}")]
  Write {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Frozen outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
  pub run_id: String,
  pub total_units: usize,
  pub success_count: usize,
  pub failure_count: usize,
  pub failed_keys: Vec<String>,
}

impl TaskReport {
  pub(crate) fn from_state(run_id: String, state: &RunState) -> Self {
    Self {
      run_id,
      total_units: state.total_units,
      success_count: state.success_count,
      failure_count: state.failure_count,
      failed_keys: state.failed_keys.clone(),
    }
  }

  pub fn has_failures(&self) -> bool {
    self.failure_count > 0
  }

  /// Distinct failed keys with their occurrence counts.
  pub fn failure_summary(&self) -> Vec<(String, usize)> {
    aggregate_failures(&self.failed_keys)
  }

  /// Render the failure export as CSV text.
  pub fn export_failures(&self) -> Result<String, ExportError> {
    export_failures(&self.failed_keys)
  }

  /// Write the failure export to `path`.
  pub fn write_failures(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let csv = self.export_failures()?;
    std::fs::write(path, csv).map_err(|source| ExportError::Write {
      path: path.display().to_string(),
      source,
    })
  }
}

/// Group keys by value, keeping the order in which each key first appeared.
pub fn aggregate_failures<S: AsRef<str>>(keys: &[S]) -> Vec<(String, usize)> {
  let mut positions: HashMap<&str, usize> = HashMap::new();
  let mut aggregated: Vec<(String, usize)> = Vec::new();

  for key in keys {
    let key = key.as_ref();
    match positions.get(key) {
      Some(&index) => aggregated[index].1 += 1,
      None => {
        positions.insert(key, aggregated.len());
        aggregated.push((key.to_string(), 1));
      }
    }
  }

  aggregated
}

/// Render `key,count` rows, one per distinct key, without a header.
pub fn export_failures<S: AsRef<str>>(keys: &[S]) -> Result<String, ExportError> {
  let mut writer = csv::WriterBuilder::new()
    .has_headers(false)
    .from_writer(Vec::new());

  for (key, count) in aggregate_failures(keys) {
    writer.write_record([key, count.to_string()])?;
  }

  let bytes = writer
    .into_inner()
    .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
  // The writer only ever received UTF-8 input.
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}
