//! Background task that refreshes running timers on a fixed interval.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::clock::Clock;
use super::timer_registry::{lock_registry, SharedTimerRegistry};

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running ticker task.
///
/// Dropping the handle aborts the task; [`TickerHandle::shutdown`] stops it
/// and waits for it to finish.
pub struct TickerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    pub async fn shutdown(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Timer ticker task failed");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn a task calling [`tick`](super::TimerRegistry::tick) every
/// `interval`.
///
/// Ticks run one after another inside a single task, so they never overlap;
/// ticks missed while the registry lock was held are skipped.
pub fn spawn_ticker<C: Clock>(registry: SharedTimerRegistry<C>, interval: Duration) -> TickerHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(run_ticker(registry, interval.max(MIN_TICK_INTERVAL), shutdown_rx));

    TickerHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    }
}

async fn run_ticker<C: Clock>(
    registry: SharedTimerRegistry<C>,
    interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    info!(
        interval_ms = interval.as_millis() as u64,
        "Timer ticker started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                lock_registry(&registry).tick();
            }
            _ = &mut shutdown_rx => break,
        }
    }

    info!("Timer ticker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::models::ReminderId;
    use crate::domain::TimerRegistry;
    use time::macros::datetime;

    fn shared() -> (SharedTimerRegistry<ManualClock>, ManualClock) {
        let clock = ManualClock::new(datetime!(2025-11-11 09:00 UTC));
        (TimerRegistry::with_clock(clock.clone()).into_shared(), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_refreshes_running_timers() {
        let (registry, clock) = shared();
        let id = ReminderId::new("a");
        let mut rx = {
            let mut guard = lock_registry(&registry);
            guard.start(&id);
            guard.subscribe()
        };
        rx.borrow_and_update();
        clock.advance(Duration::from_secs(5));

        let ticker = spawn_ticker(registry.clone(), Duration::from_secs(1));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get(&id), Some(&Duration::from_secs(5)));

        clock.advance(Duration::from_secs(1));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get(&id), Some(&Duration::from_secs(6)));

        ticker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_ticking() {
        let (registry, clock) = shared();
        let id = ReminderId::new("a");
        lock_registry(&registry).start(&id);

        let ticker = spawn_ticker(registry.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        ticker.shutdown().await;

        clock.advance(Duration::from_secs(30));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let guard = lock_registry(&registry);
        assert!(guard.is_running(&id));
        assert_eq!(guard.display_elapsed(&id), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_ticks_publish_nothing() {
        let (registry, _) = shared();
        let rx = lock_registry(&registry).subscribe();

        let ticker = spawn_ticker(registry.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!rx.has_changed().unwrap());
        ticker.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_aborts_task() {
        let (registry, clock) = shared();
        let id = ReminderId::new("a");
        lock_registry(&registry).start(&id);

        let ticker = spawn_ticker(registry.clone(), Duration::from_secs(1));
        assert!(!ticker.is_finished());
        drop(ticker);

        clock.advance(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let guard = lock_registry(&registry);
        assert!(guard.is_running(&id));
        assert_eq!(guard.display_elapsed(&id), Duration::ZERO);
    }
}
