//! Terminal rendering of batch events.

use mintdesk_batch::{BatchEvent, RunPhase};
use tokio::sync::mpsc::UnboundedReceiver;

/// Print events until the runner drops its notifier.
///
/// Human-readable lines go to stderr. With `json`, every event is also written
/// to stdout as one JSON line.
pub async fn render(mut receiver: UnboundedReceiver<BatchEvent>, json: bool) {
  while let Some(event) = receiver.recv().await {
    if json {
      match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, "event_serialize_failed"),
      }
    }
    if let Some(line) = describe(&event) {
      eprintln!("{line}");
    }
  }
}

pub fn describe(event: &BatchEvent) -> Option<String> {
  let line = match event {
    BatchEvent::RunStarted { total_units, .. } => format!("starting: {total_units} units"),
    BatchEvent::PhaseChanged { phase, .. } => match phase {
      RunPhase::Approving => "approving transfer manager, waiting for confirmation...".to_string(),
      _ => return None,
    },
    BatchEvent::ApprovalFailed { error, .. } => format!("approval failed: {error}"),
    BatchEvent::UnitStarted {
      label,
      progress_percent,
      ..
    } => format!("[{progress_percent:>3}%] {label}"),
    BatchEvent::UnitSucceeded { .. } => return None,
    BatchEvent::UnitFailed { key, error, .. } => format!("       failed {key}: {error}"),
    BatchEvent::RunCompleted {
      success_count,
      failure_count,
      ..
    } => format!("done: {success_count} succeeded, {failure_count} failed"),
  };
  Some(line)
}
