//! Progress events and notifiers.
//!
//! Events are emitted in the order units are visited so consumers can render
//! live progress, raise per-item notifications, or record an audit trail.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::state::RunPhase;

/// Events emitted during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
  /// A run has started; counters were reset.
  RunStarted { run_id: String, total_units: usize },

  /// The run moved to a new phase.
  PhaseChanged { run_id: String, phase: RunPhase },

  /// The approval phase failed and the run went back to idle.
  ApprovalFailed { run_id: String, error: String },

  /// A unit is about to be executed.
  UnitStarted {
    run_id: String,
    ordinal: usize,
    key: String,
    label: String,
    /// Share of the run completed before this unit, rounded down.
    progress_percent: u8,
  },

  /// A unit completed successfully.
  UnitSucceeded {
    run_id: String,
    ordinal: usize,
    key: String,
    success_count: usize,
  },

  /// A unit failed; the run continues.
  UnitFailed {
    run_id: String,
    ordinal: usize,
    key: String,
    error: String,
    failure_count: usize,
  },

  /// Every unit has been visited.
  RunCompleted {
    run_id: String,
    success_count: usize,
    failure_count: usize,
  },
}

/// Trait for receiving batch events.
///
/// The runner calls `notify` synchronously between phase invocations, so
/// implementations should hand events off rather than block.
pub trait BatchNotifier: Send + Sync {
  fn notify(&self, event: BatchEvent);
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl BatchNotifier for NoopNotifier {
  fn notify(&self, _event: BatchEvent) {}
}

/// A notifier that forwards events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded: at most a handful of events per unit, and the runner must not
  // wait on a slow renderer.
  sender: mpsc::UnboundedSender<BatchEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<BatchEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<BatchEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl BatchNotifier for ChannelNotifier {
  fn notify(&self, event: BatchEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

impl<N: BatchNotifier + ?Sized> BatchNotifier for std::sync::Arc<N> {
  fn notify(&self, event: BatchEvent) {
    (**self).notify(event);
  }
}
