//! Terminal output: live progress and the final report.

use colored::{Color, Colorize};
use fx_core::engine::AdvisorReport;
use fx_protocol::ipc::Event;
use fx_protocol::quote_models::BankLookup;
use tokio::sync::mpsc::Receiver;

/// Print progress events to stderr until the sender is dropped.
pub async fn print_events(mut events_rx: Receiver<Event>) {
    while let Some(event) = events_rx.recv().await {
        if let Some(line) = event_line(&event) {
            eprintln!("{line}");
        }
    }
}

fn event_line(event: &Event) -> Option<String> {
    match event {
        Event::StageStarted { stage, .. } => Some(format!("{} {stage}", "→".cyan())),
        Event::StageFinished { stage, ok: true, .. } => {
            Some(format!("{} {stage}", "✓".green()))
        }
        Event::StageFinished { stage, ok: false, .. } => {
            Some(format!("{} {stage}", "✗".red()))
        }
        Event::RunLogChunk { content, .. } => Some(format!("  {}", content.dimmed())),
        // Run errors are returned to `main` and reported there.
        Event::RunStarted { .. }
        | Event::RunStatusUpdate { .. }
        | Event::RunCompleted { .. }
        | Event::RunError { .. } => None,
    }
}

/// The plain report with section headings, failures and the
/// recommendation highlighted.
pub fn colorize_report(report: &AdvisorReport, role_color: &str) -> String {
    let accent = if role_color.trim().is_empty() {
        Color::Green
    } else {
        Color::from(role_color)
    };

    let mut out = String::new();
    let mut in_recommendation = false;
    for line in report.render_plain().lines() {
        let styled = if line == "Recommendation:" {
            in_recommendation = true;
            line.bold().to_string()
        } else if line == "Data source issues:" {
            in_recommendation = false;
            line.yellow().bold().to_string()
        } else if line.contains("[SOURCE FAILED") {
            line.red().to_string()
        } else if in_recommendation {
            line.color(accent).to_string()
        } else if line.ends_with(':') {
            line.bold().to_string()
        } else {
            line.to_string()
        };
        out.push_str(&styled);
        out.push('\n');
    }
    out
}

pub fn lookup_line(lookup: &BankLookup) -> String {
    match lookup {
        BankLookup::Found { quote } => quote.to_string(),
        BankLookup::NotFound { requested } => {
            format!("{requested}: {}", "not in demo table".yellow())
        }
    }
}
