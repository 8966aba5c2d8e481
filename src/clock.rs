use std::time::Duration;

use chrono::{Local, NaiveDateTime, Utc};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::time::{TimeOfDay, now_as_time_of_day};

pub trait Clock: Send + Sync + 'static {
    /// Current local wall-clock date and time.
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    timezone: Option<chrono_tz::Tz>,
}

impl SystemClock {
    pub fn new(timezone: Option<chrono_tz::Tz>) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Keeps a "current start time" value live by re-reading the clock on every tick.
///
/// Publishing stops as soon as the ticker is stopped or dropped.
pub struct StartTimeTicker {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
    receiver: watch::Receiver<TimeOfDay>,
}

impl StartTimeTicker {
    pub fn spawn<TClock: Clock>(clock: TClock, period: Duration) -> Self {
        let (sender, receiver) = watch::channel(now_as_time_of_day(&clock));
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancellation_token.cancelled() => {
                        log::debug!("Start time ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let now = now_as_time_of_day(&clock);
                        sender.send_if_modified(|current| {
                            let changed = *current != now;
                            *current = now;
                            changed
                        });
                    }
                }
            }
        });

        Self {
            task,
            cancellation_token,
            receiver,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TimeOfDay> {
        self.receiver.clone()
    }

    pub fn current(&self) -> TimeOfDay {
        *self.receiver.borrow()
    }

    /// Returns `false` when the task did not shut down cleanly within `timeout`.
    pub async fn stop(mut self, timeout: Duration) -> bool {
        self.cancellation_token.cancel();
        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(())) => true,
            Ok(Err(error)) => {
                log::warn!("Start time ticker task failed: {}", error);
                false
            }
            Err(_) => {
                log::warn!("Start time ticker did not stop within {:?}", timeout);
                false
            }
        }
    }
}

impl Drop for StartTimeTicker {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
