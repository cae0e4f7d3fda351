//! Live progress of a run.

use serde::{Deserialize, Serialize};

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
  #[default]
  Idle,
  /// Waiting for the one-off approval to confirm.
  Approving,
  Running,
  /// Every unit has been visited; the state is frozen.
  Done,
}

/// Counters and failed keys of the current (or last) run.
///
/// Only the [`BatchRunner`](crate::BatchRunner) mutates this; counts only grow
/// between resets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunState {
  pub phase: RunPhase,
  pub success_count: usize,
  pub failure_count: usize,
  /// Keys of failed units, in visitation order. May contain duplicates.
  pub failed_keys: Vec<String>,
  pub total_units: usize,
  /// Label of the unit currently in flight.
  pub current: Option<String>,
}

impl RunState {
  pub(crate) fn reset(&mut self, total_units: usize) {
    *self = Self {
      total_units,
      ..Self::default()
    };
  }

  pub(crate) fn record_success(&mut self) {
    self.success_count += 1;
    self.current = None;
  }

  pub(crate) fn record_failure(&mut self, key: &str) {
    self.failure_count += 1;
    self.failed_keys.push(key.to_string());
    self.current = None;
  }

  /// Units whose phase invocation has completed.
  pub fn completed_units(&self) -> usize {
    self.success_count + self.failure_count
  }

  /// Completion percentage, rounded down. An empty run counts as complete.
  pub fn progress_percent(&self) -> u8 {
    if self.total_units == 0 {
      return 100;
    }
    let percent = self.completed_units() * 100 / self.total_units;
    percent.min(100) as u8
  }

  pub fn is_done(&self) -> bool {
    self.phase == RunPhase::Done
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_keeps_invariants() {
    let mut state = RunState::default();
    state.reset(3);
    state.record_success();
    state.record_failure("0xAAA");

    assert_eq!(state.completed_units(), 2);
    assert_eq!(state.failed_keys.len(), state.failure_count);
    assert_eq!(state.progress_percent(), 66);
  }

  #[test]
  fn test_reset_clears_previous_run() {
    let mut state = RunState::default();
    state.reset(2);
    state.record_failure("1");
    state.phase = RunPhase::Done;

    state.reset(5);
    assert_eq!(state, RunState {
      total_units: 5,
      ..RunState::default()
    });
  }

  #[test]
  fn test_empty_run_progress() {
    assert_eq!(RunState::default().progress_percent(), 100);
  }
}
