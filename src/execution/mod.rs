//! Pipeline execution

pub mod dispatcher;
pub mod runner;
pub mod workspace;

pub use dispatcher::{DispatchError, MlflowDispatcher, StepDispatcher};
pub use runner::{PipelineError, PipelineRunner, RunEvent, SkipReason};
pub use workspace::{ScopedWorkspace, WorkspaceError};
