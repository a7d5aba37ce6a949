//! Progress events emitted by the engine.
//!
//! The engine sends events over a `tokio::sync::mpsc` channel while a run
//! progresses; the CLI renders them. Sending is best-effort: a closed
//! receiver never stops a run.
//!
//! Events use tagged serialization:
//! ```json
//! {
//!   "type": "stageFinished",
//!   "payload": {
//!     "run_id": "uuid-here",
//!     "stage": "official-rate",
//!     "ok": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::run_models::{RunStatus, StageKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has been created.
    RunStarted { run_id: Uuid },

    /// The run's status has changed.
    RunStatusUpdate {
        run_id: Uuid,
        status: RunStatus,
        stage_index: usize,
    },

    /// A stage has begun.
    StageStarted { run_id: Uuid, stage: StageKind },

    /// A stage has ended. `ok` is false when it failed or was skipped.
    StageFinished {
        run_id: Uuid,
        stage: StageKind,
        ok: bool,
    },

    /// The run produced a log line.
    RunLogChunk { run_id: Uuid, content: String },

    /// The run finished and a report is available.
    RunCompleted { run_id: Uuid },

    /// The run could not produce a report.
    RunError { run_id: Uuid, error: String },
}

impl Event {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id }
            | Self::RunStatusUpdate { run_id, .. }
            | Self::StageStarted { run_id, .. }
            | Self::StageFinished { run_id, .. }
            | Self::RunLogChunk { run_id, .. }
            | Self::RunCompleted { run_id }
            | Self::RunError { run_id, .. } => *run_id,
        }
    }
}
