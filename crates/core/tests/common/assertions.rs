//! Custom assertion helpers over run event sequences.

use fx_protocol::ipc::Event;
use fx_protocol::run_models::StageKind;

/// Whether the events contain a RunStarted event.
#[allow(dead_code)]
pub fn has_run_started(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::RunStarted { .. }))
}

/// Whether the events contain a RunCompleted event.
#[allow(dead_code)]
pub fn has_run_completed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::RunCompleted { .. }))
}

/// `ok` flags of every StageFinished event, keyed by stage, in order.
#[allow(dead_code)]
pub fn stage_results(events: &[Event]) -> Vec<(StageKind, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StageFinished { stage, ok, .. } => Some((*stage, *ok)),
            _ => None,
        })
        .collect()
}

/// Assert that events are in the correct order.
///
/// Checks that:
/// 1. RunStarted comes first
/// 2. Stages start in pipeline order, each finishing before the next starts
/// 3. RunCompleted or RunError comes last
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[Event]) {
    assert!(!events.is_empty(), "Event sequence is empty");

    assert!(
        matches!(events[0], Event::RunStarted { .. }),
        "First event should be RunStarted, got: {:?}",
        events[0]
    );

    let mut open: Option<StageKind> = None;
    let mut last_index: Option<usize> = None;
    for event in events {
        match event {
            Event::StageStarted { stage, .. } => {
                assert!(open.is_none(), "{stage} started while {open:?} was running");
                if let Some(previous) = last_index {
                    assert!(stage.index() > previous, "{stage} started out of order");
                }
                open = Some(*stage);
                last_index = Some(stage.index());
            }
            Event::StageFinished { stage, .. } => {
                assert_eq!(open, Some(*stage), "{stage} finished without starting");
                open = None;
            }
            _ => {}
        }
    }

    let last = events.last().expect("checked non-empty above");
    assert!(
        matches!(last, Event::RunCompleted { .. } | Event::RunError { .. }),
        "Last event should be RunCompleted or RunError, got: {last:?}"
    );
}
