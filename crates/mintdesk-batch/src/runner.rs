//! The sequential batch runner.

use tracing::{Instrument, error, info, info_span, warn};

use crate::error::RunError;
use crate::events::{BatchEvent, BatchNotifier, NoopNotifier};
use crate::item::{WorkItem, expand_units};
use crate::phase::Workflow;
use crate::report::TaskReport;
use crate::state::{RunPhase, RunState};

/// Drives work items through a [`Workflow`], one invocation at a time.
///
/// Generic over `N: BatchNotifier` so callers choose how progress is observed.
/// Use `BatchRunner::new()` to discard events, or `with_notifier` to receive
/// them.
///
/// A runner can be reused: each call to [`run`](Self::run) starts from a
/// fresh [`RunState`].
pub struct BatchRunner<N: BatchNotifier = NoopNotifier> {
  notifier: N,
  state: RunState,
}

impl BatchRunner<NoopNotifier> {
  pub fn new() -> Self {
    Self::with_notifier(NoopNotifier)
  }
}

impl Default for BatchRunner<NoopNotifier> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: BatchNotifier> BatchRunner<N> {
  pub fn with_notifier(notifier: N) -> Self {
    Self {
      notifier,
      state: RunState::default(),
    }
  }

  /// State of the current or most recent run.
  pub fn state(&self) -> &RunState {
    &self.state
  }

  /// Execute every unit of `items` through `workflow`.
  ///
  /// Unit failures are recorded and never stop the run. Only a failed
  /// approval returns an error, in which case no unit has been attempted and
  /// the state is back at [`RunPhase::Idle`].
  pub async fn run(
    &mut self,
    items: &[WorkItem],
    workflow: &Workflow,
  ) -> Result<TaskReport, RunError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("batch_run", run_id = %run_id, kind = ?workflow.kind());
    self.run_inner(run_id, items, workflow).instrument(span).await
  }

  async fn run_inner(
    &mut self,
    run_id: String,
    items: &[WorkItem],
    workflow: &Workflow,
  ) -> Result<TaskReport, RunError> {
    let units = expand_units(items);
    self.state.reset(units.len());

    info!(
      items = items.len(),
      total_units = units.len(),
      "run_started"
    );
    self.notifier.notify(BatchEvent::RunStarted {
      run_id: run_id.clone(),
      total_units: units.len(),
    });

    if let Some(approval) = workflow.approval() {
      self.enter(&run_id, RunPhase::Approving);

      if let Err(e) = approval.approve().await {
        error!(error = %e, "approval_failed");
        self.enter(&run_id, RunPhase::Idle);
        self.notifier.notify(BatchEvent::ApprovalFailed {
          run_id,
          error: e.summary(),
        });
        return Err(RunError::Approval { source: e });
      }

      info!("approval_confirmed");
    }

    self.enter(&run_id, RunPhase::Running);

    let phase = workflow.unit_phase();
    for unit in &units {
      let label = unit.label();
      self.state.current = Some(label.clone());
      info!(
        ordinal = unit.ordinal,
        key = %unit.key,
        phase = phase.name(),
        "unit_started"
      );
      self.notifier.notify(BatchEvent::UnitStarted {
        run_id: run_id.clone(),
        ordinal: unit.ordinal,
        key: unit.key.clone(),
        label,
        progress_percent: self.state.progress_percent(),
      });

      match phase.execute(unit).await {
        Ok(()) => {
          self.state.record_success();
          info!(ordinal = unit.ordinal, key = %unit.key, "unit_succeeded");
          self.notifier.notify(BatchEvent::UnitSucceeded {
            run_id: run_id.clone(),
            ordinal: unit.ordinal,
            key: unit.key.clone(),
            success_count: self.state.success_count,
          });
        }
        Err(e) => {
          self.state.record_failure(&unit.key);
          warn!(ordinal = unit.ordinal, key = %unit.key, error = %e, "unit_failed");
          self.notifier.notify(BatchEvent::UnitFailed {
            run_id: run_id.clone(),
            ordinal: unit.ordinal,
            key: unit.key.clone(),
            error: e.summary(),
            failure_count: self.state.failure_count,
          });
        }
      }
    }

    self.enter(&run_id, RunPhase::Done);

    info!(
      success_count = self.state.success_count,
      failure_count = self.state.failure_count,
      "run_completed"
    );
    self.notifier.notify(BatchEvent::RunCompleted {
      run_id: run_id.clone(),
      success_count: self.state.success_count,
      failure_count: self.state.failure_count,
    });

    Ok(TaskReport::from_state(run_id, &self.state))
  }

  fn enter(&mut self, run_id: &str, phase: RunPhase) {
    self.state.phase = phase;
    self.notifier.notify(BatchEvent::PhaseChanged {
      run_id: run_id.to_string(),
      phase,
    });
  }
}
