//! Mintdesk batch engine
//!
//! This crate drives an ordered list of work items through one or more
//! remote phases, strictly one invocation at a time, and keeps a tally of
//! what succeeded and what has to be retried by hand.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        BatchRunner                          │
//! │  - owns RunState (phase, counts, failed keys)               │
//! │  - run(items, workflow) → TaskReport                        │
//! │  - emits BatchEvent through a BatchNotifier                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Workflow                            │
//! │  - optional ApprovalPhase, run once, fatal on failure       │
//! │  - UnitPhase, run once per expanded WorkUnit                │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TaskReport                           │
//! │  - terminal counts and failed keys                          │
//! │  - export_failures → `key,count` CSV                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use mintdesk_batch::{BatchRunner, WorkItem, Workflow};
//!
//! let workflow = Workflow::listing(approval, submit_order);
//! let mut runner = BatchRunner::with_notifier(notifier);
//!
//! let report = runner.run(&items, &workflow).await?;
//! if report.has_failures() {
//!     report.write_failures("mint_failed_list.csv")?;
//! }
//! ```

mod error;
mod events;
mod item;
mod phase;
mod report;
mod runner;
mod state;

pub use error::{PhaseError, RunError, summarize_error};
pub use events::{BatchEvent, BatchNotifier, ChannelNotifier, NoopNotifier};
pub use item::{WorkItem, WorkUnit, expand_units, total_units};
pub use phase::{ApprovalPhase, UnitPhase, Workflow, WorkflowKind};
pub use report::{DEFAULT_EXPORT_FILE, ExportError, TaskReport, aggregate_failures, export_failures};
pub use runner::BatchRunner;
pub use state::{RunPhase, RunState};
