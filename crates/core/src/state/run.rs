//! Run state machine implementation.
//!
//! Functions here mutate a [`Run`] and emit the matching events. Sending
//! is best-effort: a dropped receiver never interrupts a run.

use chrono::Utc;
use fx_protocol::ipc::Event;
use fx_protocol::run_models::{Run, RunStatus, StageKind};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Create a new Run with Pending status.
pub fn create_run() -> Run {
    Run {
        id: Uuid::new_v4(),
        started_at: Utc::now(),
        status: RunStatus::Pending,
        current_stage: 0,
        logs: Vec::new(),
    }
}

/// Transition the run to Running status and emit events.
pub async fn start_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Running;
    let _ = events_tx.send(Event::RunStarted { run_id: run.id }).await;
    send_status(run, events_tx).await;
}

/// Record that `stage` is now executing.
pub async fn begin_stage(run: &mut Run, events_tx: &Sender<Event>, stage: StageKind) {
    run.current_stage = stage.index();
    let _ = events_tx
        .send(Event::StageStarted {
            run_id: run.id,
            stage,
        })
        .await;
}

/// Record the end of `stage`. `ok` is false for failed and skipped stages.
pub async fn finish_stage(run: &mut Run, events_tx: &Sender<Event>, stage: StageKind, ok: bool) {
    let _ = events_tx
        .send(Event::StageFinished {
            run_id: run.id,
            stage,
            ok,
        })
        .await;
}

/// Append a log message to the run logs and emit event.
pub async fn log_to_run(run: &mut Run, events_tx: &Sender<Event>, message: String) {
    run.logs.push(message.clone());
    let _ = events_tx
        .send(Event::RunLogChunk {
            run_id: run.id,
            content: message,
        })
        .await;
}

/// Mark the run as completed and emit events.
pub async fn complete_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Completed;
    send_status(run, events_tx).await;
    let _ = events_tx.send(Event::RunCompleted { run_id: run.id }).await;
}

/// Mark the run as failed and emit error event.
///
/// # Arguments
///
/// * `run` - The run to fail
/// * `events_tx` - Channel to send error event
/// * `error` - Error message describing the failure
pub async fn fail_run(run: &mut Run, events_tx: &Sender<Event>, error: String) {
    run.status = RunStatus::Failed;
    send_status(run, events_tx).await;
    let _ = events_tx
        .send(Event::RunError {
            run_id: run.id,
            error,
        })
        .await;
}

async fn send_status(run: &Run, events_tx: &Sender<Event>) {
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            stage_index: run.current_stage,
        })
        .await;
}
