use std::fmt;

use async_trait::async_trait;

use crate::time::{ShiftDuration, TimeOfDay, compute_end_time};

/// Display-only alarm. Nothing is registered with the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmMessage {
    pub at: TimeOfDay,
}

impl AlarmMessage {
    pub fn after(now: TimeOfDay, duration: ShiftDuration) -> Self {
        Self {
            at: compute_end_time(now, duration),
        }
    }
}

impl fmt::Display for AlarmMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alarm at {}", self.at)
    }
}

#[async_trait]
pub trait AlarmNotifier: Send + Sync + 'static {
    async fn notify(&self, alarm: &AlarmMessage);
}

pub struct LogAlarmNotifier;

#[async_trait]
impl AlarmNotifier for LogAlarmNotifier {
    async fn notify(&self, alarm: &AlarmMessage) {
        log::info!("{}", alarm);
    }
}
