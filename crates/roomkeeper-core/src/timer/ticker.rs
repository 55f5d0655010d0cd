//! Periodic refresh primitive.
//!
//! A [`Ticker`] owns at most one background interval task. Starting it always
//! aborts the previous task first, and cancelling or dropping it releases the
//! task, so a stop/restart cycle can never leave two refresh loops running.
//! Must be used from inside a tokio runtime.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    task: Option<JoinHandle<()>>,
    ticks: Option<mpsc::Receiver<Instant>>,
}

impl Ticker {
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            task: None,
            ticks: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the periodic task, replacing any previous one.
    pub fn start(&mut self) {
        self.cancel();
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut iv = interval(period);
            iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let t = iv.tick().await;
                if tx.send(t).await.is_err() {
                    break;
                }
            }
        }));
        self.ticks = Some(rx);
        tracing::debug!(period_ms = period.as_millis() as u64, "ticker started");
    }

    /// Wait for the next tick. Returns `None` when the ticker is not active.
    pub async fn next(&mut self) -> Option<Instant> {
        self.ticks.as_mut()?.recv().await
    }

    /// Release the periodic task. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("ticker cancelled");
        }
        self.ticks = None;
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::every(DEFAULT_TICK_INTERVAL)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_ticks_while_active() {
        let mut ticker = Ticker::default();
        ticker.start();
        let first = ticker.next().await.unwrap();
        let second = ticker.next().await.unwrap();
        assert_eq!(second - first, DEFAULT_TICK_INTERVAL);
        assert!(ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let mut ticker = Ticker::default();
        ticker.start();
        ticker.next().await.unwrap();
        ticker.cancel();
        assert!(!ticker.is_active());
        assert!(ticker.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_task() {
        let mut ticker = Ticker::every(Duration::from_millis(100));
        ticker.start();
        let old = ticker.task.as_ref().unwrap().abort_handle();
        ticker.start();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(old.is_finished());
        assert!(ticker.is_active());
        assert!(ticker.next().await.is_some());
    }
}
