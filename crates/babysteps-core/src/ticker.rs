//! Once-per-second tick source for [`SessionTimer`].
//!
//! The driver owns at most one interval task. It is aborted on pause, stop
//! and drop so a torn-down view never leaves a running interval behind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::locale::Locale;
use crate::model::Log;
use crate::timer::{SessionTimer, TimerState};
use crate::types::BabyId;

/// Real-time tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives a [`SessionTimer`] from a Tokio interval.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct TimerDriver {
    timer: Arc<Mutex<SessionTimer>>,
    elapsed_tx: watch::Sender<u64>,
    tick_task: Option<JoinHandle<()>>,
    period: Duration,
}

impl Default for TimerDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let (elapsed_tx, _) = watch::channel(0);
        Self {
            timer: Arc::new(Mutex::new(SessionTimer::new())),
            elapsed_tx,
            tick_task: None,
            period,
        }
    }

    /// Starts or resumes the session. A second call while running is a no-op.
    pub fn start(&mut self) -> bool {
        if !lock(&self.timer).start() {
            return false;
        }

        let timer = Arc::clone(&self.timer);
        let elapsed_tx = self.elapsed_tx.clone();
        let period = self.period;
        self.tick_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // Published under the lock: no tick lands after pause or stop.
                let mut timer = lock(&timer);
                if !timer.is_running() {
                    break;
                }
                timer.tick();
                let elapsed = timer.elapsed_seconds();
                elapsed_tx.send_replace(elapsed);
                drop(timer);
                tracing::trace!(elapsed, "timer tick");
            }
        }));
        true
    }

    pub fn pause(&mut self) {
        lock(&self.timer).pause();
        self.cancel_ticks();
    }

    /// Stops the session; see [`SessionTimer::stop`].
    pub fn stop(
        &mut self,
        active_baby: Option<&BabyId>,
        now: DateTime<Utc>,
        locale: Locale,
    ) -> Option<Log> {
        let mut timer = lock(&self.timer);
        let log = timer.stop(active_baby, now, locale);
        self.elapsed_tx.send_replace(0);
        drop(timer);
        self.cancel_ticks();
        log
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        lock(&self.timer).state()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        lock(&self.timer).elapsed_seconds()
    }

    #[must_use]
    pub fn display(&self) -> String {
        lock(&self.timer).display()
    }

    /// Receiver that observes every elapsed-seconds change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed_tx.subscribe()
    }

    fn cancel_ticks(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.cancel_ticks();
    }
}

fn lock(timer: &Mutex<SessionTimer>) -> MutexGuard<'_, SessionTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-12T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_does_not_double_tick() {
        let mut driver = TimerDriver::new();
        assert!(driver.start());
        assert!(!driver.start());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(driver.elapsed_seconds(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_halts_ticks_until_resumed() {
        let mut driver = TimerDriver::new();
        driver.start();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        driver.pause();
        assert_eq!(driver.state(), TimerState::Paused);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(driver.elapsed_seconds(), 2);

        driver.start();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(driver.elapsed_seconds(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_emits_log_spanning_elapsed_time() {
        let baby = BabyId::new("baby-1").unwrap();
        let mut driver = TimerDriver::new();
        let rx = driver.subscribe();
        driver.start();
        tokio::time::sleep(Duration::from_millis(125_500)).await;

        let log = driver.stop(Some(&baby), now(), Locale::En).unwrap();
        assert_eq!(
            now().signed_duration_since(log.start_time),
            chrono::Duration::seconds(125)
        );
        assert_eq!(log.details.notes(), Some("00:02:05 slept"));
        assert_eq!(driver.elapsed_seconds(), 0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(driver.elapsed_seconds(), 0);
        assert_eq!(*rx.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_driver_cancels_ticks() {
        let mut driver = TimerDriver::new();
        let mut rx = driver.subscribe();
        driver.start();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(*rx.borrow_and_update(), 1);

        drop(driver);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_after_pause_is_not_published() {
        let mut driver = TimerDriver::new();
        let mut rx = driver.subscribe();
        driver.start();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        driver.pause();
        rx.mark_unchanged();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(driver.elapsed_seconds(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_each_tick() {
        let mut driver = TimerDriver::new();
        let mut rx = driver.subscribe();
        driver.start();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
    }
}
