//! Phase executor traits and workflow composition.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PhaseError;
use crate::item::WorkUnit;

/// A remote operation performed once before any unit.
///
/// Implementations must only return once the operation is final (for
/// on-chain approvals: confirmed).
#[async_trait]
pub trait ApprovalPhase: Send + Sync {
  async fn approve(&self) -> Result<(), PhaseError>;
}

/// A remote operation performed once per work unit.
#[async_trait]
pub trait UnitPhase: Send + Sync {
  /// Short name used in logs, e.g. `"devMint"`.
  fn name(&self) -> &str;

  async fn execute(&self, unit: &WorkUnit) -> Result<(), PhaseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
  DevMint,
  Listing,
}

/// The phases a run goes through.
#[derive(Clone)]
pub struct Workflow {
  kind: WorkflowKind,
  approval: Option<Arc<dyn ApprovalPhase>>,
  unit: Arc<dyn UnitPhase>,
}

impl Workflow {
  /// Direct per-unit calls, no approval.
  pub fn dev_mint(unit: Arc<dyn UnitPhase>) -> Self {
    Self {
      kind: WorkflowKind::DevMint,
      approval: None,
      unit,
    }
  }

  /// A one-off approval followed by per-unit calls.
  pub fn listing(approval: Arc<dyn ApprovalPhase>, unit: Arc<dyn UnitPhase>) -> Self {
    Self {
      kind: WorkflowKind::Listing,
      approval: Some(approval),
      unit,
    }
  }

  pub fn kind(&self) -> WorkflowKind {
    self.kind
  }

  pub fn approval(&self) -> Option<&dyn ApprovalPhase> {
    self.approval.as_deref()
  }

  pub fn unit_phase(&self) -> &dyn UnitPhase {
    self.unit.as_ref()
  }
}

impl std::fmt::Debug for Workflow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Workflow")
      .field("kind", &self.kind)
      .field("approval", &self.approval.is_some())
      .field("unit", &self.unit.name())
      .finish()
  }
}
