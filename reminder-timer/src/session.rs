//! A timing session: the loaded reminders, their timers and the ticker that
//! keeps running timers fresh.

use std::{sync::Arc, time::Duration};

use tokio::sync::{watch, RwLock};
use tracing::info;

use crate::config::Settings;
use crate::domain::{
    clock::{Clock, SystemClock},
    models::{Reminder, ReminderId},
    ports::outbound::ReminderStore,
    services::{RecordedTime, ReminderBoard, TimeRecordingService},
    spawn_ticker, ElapsedSnapshot, ReminderTimerError, TickerHandle, TimerRegistry,
};

pub struct TimerSession<S, C = SystemClock> {
    store: Arc<S>,
    board: RwLock<ReminderBoard>,
    recording: TimeRecordingService<S, C>,
    ticker: Option<TickerHandle>,
}

impl<S: ReminderStore> TimerSession<S, SystemClock> {
    /// Load the open reminders and start ticking. Requires a Tokio runtime.
    pub async fn bootstrap(store: Arc<S>, settings: &Settings) -> Result<Self, ReminderTimerError> {
        Self::bootstrap_with_clock(store, settings, SystemClock).await
    }
}

impl<S: ReminderStore, C: Clock> TimerSession<S, C> {
    pub async fn bootstrap_with_clock(
        store: Arc<S>,
        settings: &Settings,
        clock: C,
    ) -> Result<Self, ReminderTimerError> {
        let board = ReminderBoard::load(store.as_ref()).await?;

        let registry = TimerRegistry::with_clock(clock).into_shared();
        let ticker = spawn_ticker(Arc::clone(&registry), settings.timer.tick_interval());
        let recording = TimeRecordingService::with_registry(Arc::clone(&store), registry);

        info!(
            reminders = board.len(),
            tick_interval_secs = settings.timer.tick_interval().as_secs(),
            "Timer session ready"
        );

        Ok(Self {
            store,
            board: RwLock::new(board),
            recording,
            ticker: Some(ticker),
        })
    }

    /// Re-fetch the open reminders. Running timers are unaffected.
    pub async fn reload(&self) -> Result<(), ReminderTimerError> {
        let board = ReminderBoard::load(self.store.as_ref()).await?;
        *self.board.write().await = board;
        Ok(())
    }

    pub async fn board(&self) -> ReminderBoard {
        self.board.read().await.clone()
    }

    pub async fn search(&self, query: &str) -> Vec<Reminder> {
        self.board
            .read()
            .await
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Start timing an open reminder.
    pub async fn start(&self, id: &ReminderId) -> Result<(), ReminderTimerError> {
        if self.board.read().await.find(id).is_none() {
            return Err(ReminderTimerError::ReminderNotFound(id.clone()));
        }
        self.recording.start(id);
        Ok(())
    }

    /// Stop timing `id` and persist the elapsed time into its notes.
    pub async fn stop(&self, id: &ReminderId) -> Result<Option<RecordedTime>, ReminderTimerError> {
        let recorded = self.recording.stop_and_record(id).await?;
        if let Some(recorded) = &recorded {
            self.board
                .write()
                .await
                .update_notes(id, recorded.notes.clone());
        }
        Ok(recorded)
    }

    /// Retry persisting time left over from a failed [`stop`](Self::stop).
    pub async fn retry_record(
        &self,
        id: &ReminderId,
        elapsed: Duration,
    ) -> Result<RecordedTime, ReminderTimerError> {
        let recorded = self.recording.record(id, elapsed).await?;
        self.board
            .write()
            .await
            .update_notes(id, recorded.notes.clone());
        Ok(recorded)
    }

    pub fn is_running(&self, id: &ReminderId) -> bool {
        self.recording.is_running(id)
    }

    pub fn display_elapsed(&self, id: &ReminderId) -> Duration {
        self.recording.display_elapsed(id)
    }

    pub fn subscribe(&self) -> watch::Receiver<ElapsedSnapshot> {
        self.recording.subscribe()
    }

    pub fn recording(&self) -> &TimeRecordingService<S, C> {
        &self.recording
    }

    /// Stop the ticker. Timers that are still running are discarded.
    pub async fn shutdown(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown().await;
        }
        info!("Timer session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::InMemoryReminderStore;
    use crate::domain::clock::ManualClock;
    use time::macros::datetime;

    fn store() -> InMemoryReminderStore {
        InMemoryReminderStore::new().with_reminders(vec![
            Reminder::new("r1").with_title("Write report"),
            Reminder::new("r2").with_title("Buy milk").with_notes("2 bottles"),
            Reminder::new("r3").with_title("Done already").completed(),
        ])
    }

    async fn session(
        store: &InMemoryReminderStore,
    ) -> (TimerSession<InMemoryReminderStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(datetime!(2025-11-15 08:00 UTC));
        let session = TimerSession::bootstrap_with_clock(
            Arc::new(store.clone()),
            &Settings::default(),
            clock.clone(),
        )
        .await
        .unwrap();
        (session, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn start_stop_updates_store_and_board() {
        let store = store();
        let (session, clock) = session(&store).await;
        let id = ReminderId::new("r2");

        session.start(&id).await.unwrap();
        clock.advance(Duration::from_secs(3725));
        let recorded = session.stop(&id).await.unwrap().unwrap();

        assert_eq!(recorded.notes, "2 bottles\ntime_spent: 1h 2m 5s");
        assert_eq!(store.notes(&id), Some(recorded.notes.clone()));
        assert_eq!(
            session.board().await.find(&id).unwrap().pretty_time_spent(),
            "1h 2m 5s"
        );

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn completed_and_unknown_reminders_cannot_start() {
        let store = store();
        let (session, _) = session(&store).await;

        for id in ["r3", "nope"] {
            let err = session.start(&ReminderId::new(id)).await.unwrap_err();
            assert!(matches!(err, ReminderTimerError::ReminderNotFound(_)));
        }

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_running_time() {
        let store = store();
        let (session, clock) = session(&store).await;
        let id = ReminderId::new("r1");
        let mut rx = session.subscribe();

        session.start(&id).await.unwrap();
        rx.borrow_and_update();
        clock.advance(Duration::from_secs(4));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().get(&id), Some(&Duration::from_secs(4)));
        assert_eq!(session.display_elapsed(&id), Duration::from_secs(4));

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_can_be_retried() {
        let store = store();
        let (session, clock) = session(&store).await;
        let id = ReminderId::new("r1");
        store.fail_next_saves(1);

        session.start(&id).await.unwrap();
        clock.advance(Duration::from_secs(30));
        let err = session.stop(&id).await.unwrap_err();
        let elapsed = err.unsaved_elapsed().unwrap();
        assert!(!session.is_running(&id));

        let recorded = session.retry_record(&id, elapsed).await.unwrap();
        assert_eq!(recorded.notes, "time_spent: 0h 0m 30s");

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn search_and_reload() {
        let store = store();
        let (session, _) = session(&store).await;

        let hits = session.search("MILK").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ReminderId::new("r2"));

        store.insert(Reminder::new("r4").with_title("Call the bank"));
        assert_eq!(session.board().await.len(), 2);
        session.reload().await.unwrap();
        assert_eq!(session.board().await.len(), 3);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_fails_without_access() {
        let store = store().deny_access();
        let result = TimerSession::bootstrap(Arc::new(store), &Settings::default()).await;
        assert!(matches!(result, Err(ReminderTimerError::AccessDenied)));
    }
}
