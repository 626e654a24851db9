use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use reminder_timer::{
    adapters::outbound::InMemoryReminderStore,
    config::read_config,
    domain::{
        models::{Reminder, ReminderId},
        ports::outbound::ReminderStore,
        time_spent::format_clock,
    },
    telemetry::init_tracing,
    TimerSession,
};

/// Time one reminder from a JSON file until Ctrl-C, then write the tracked
/// time back into the file.
///
/// Usage: `reminder-timer <reminders.json> [reminder-id]`. Without an id the
/// first open reminder by title is timed.
#[tokio::main]
async fn main() -> Result<()> {
    let settings = read_config()?;
    init_tracing(&settings.logging.filter)?;

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: reminder-timer <reminders.json> [reminder-id]")?;
    let requested = args.next().map(ReminderId::new);

    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let reminders: Vec<Reminder> =
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {path}"))?;

    let store = Arc::new(InMemoryReminderStore::new().with_reminders(reminders));
    let session = TimerSession::bootstrap(Arc::clone(&store), &settings).await?;

    let board = session.board().await;
    let reminder = match &requested {
        Some(id) => board.find(id),
        None => board.reminders().first(),
    }
    .context("No open reminder to time")?
    .clone();

    session.start(&reminder.id).await?;
    println!(
        "Timing \"{}\" (tracked so far: {}). Press Ctrl-C to stop.",
        reminder.display_title(),
        reminder.pretty_time_spent()
    );

    let mut running = session.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = running.changed() => {
                if changed.is_err() {
                    break;
                }
                let elapsed = running
                    .borrow_and_update()
                    .get(&reminder.id)
                    .copied()
                    .unwrap_or_default();
                print!("\r{}", format_clock(elapsed));
                std::io::stdout().flush()?;
            }
            _ = &mut ctrl_c => break,
        }
    }
    println!();

    if let Some(recorded) = session.stop(&reminder.id).await? {
        println!(
            "Recorded {} (total {})",
            format_clock(recorded.elapsed),
            recorded.total.compact()
        );
    }
    session.shutdown().await;

    let mut updated = store.fetch_reminders().await?;
    updated.sort_by(|a, b| a.id.cmp(&b.id));
    std::fs::write(&path, serde_json::to_string_pretty(&updated)?)
        .with_context(|| format!("Failed to write {path}"))?;

    Ok(())
}
