//! Run state model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Idle,
    /// Run is iterating the topology
    Running,
    /// Every active step completed
    Completed,
    /// A step failed; remaining steps were not attempted
    Failed,
}

/// State of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub run_id: Uuid,

    /// Current status
    pub status: RunStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or failed
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of steps dispatched so far
    pub dispatched_steps: usize,

    /// Number of active steps in this run
    pub active_steps: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Idle,
            started_at: None,
            finished_at: None,
            dispatched_steps: 0,
            active_steps: 0,
        }
    }

    /// Idle → Running
    pub fn start(&mut self, active_steps: usize) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
        self.active_steps = active_steps;
    }

    /// Running → Completed
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// Running → Failed
    pub fn fail(&mut self) {
        self.status = RunStatus::Failed;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RunStatus::Completed | RunStatus::Failed)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
