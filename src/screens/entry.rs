use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    alarm::{AlarmMessage, AlarmNotifier},
    clock::Clock,
    error::{EntryError, ValidationError},
    record::Record,
    store::RecordStore,
    time::{ShiftDuration, TimeOfDay, compute_end_time, now_as_time_of_day, parse_duration},
};

/// State behind the shift entry screen.
pub struct EntryForm {
    clock: Arc<dyn Clock>,
    start_time: watch::Receiver<TimeOfDay>,
    start_override: Option<TimeOfDay>,
    store: Arc<RecordStore>,
    notifier: Arc<dyn AlarmNotifier>,
    duration_input: String,
    end_time: Option<TimeOfDay>,
    hours_worked: Option<ShiftDuration>,
}

impl EntryForm {
    pub fn new(
        clock: Arc<dyn Clock>,
        start_time: watch::Receiver<TimeOfDay>,
        store: Arc<RecordStore>,
        notifier: Arc<dyn AlarmNotifier>,
    ) -> Self {
        Self {
            clock,
            start_time,
            start_override: None,
            store,
            notifier,
            duration_input: String::new(),
            end_time: None,
            hours_worked: None,
        }
    }

    /// The start time typed by the user, or the live time when none was entered.
    pub fn start_time(&self) -> TimeOfDay {
        self.start_override.unwrap_or_else(|| *self.start_time.borrow())
    }

    /// `None` goes back to following the live time.
    pub fn set_start_time(&mut self, start_time: Option<TimeOfDay>) {
        self.start_override = start_time;
    }

    pub fn is_start_time_overridden(&self) -> bool {
        self.start_override.is_some()
    }

    pub fn duration_input(&self) -> &str {
        &self.duration_input
    }

    pub fn set_duration_input(&mut self, input: impl Into<String>) {
        self.duration_input = input.into();
    }

    pub fn end_time(&self) -> Option<TimeOfDay> {
        self.end_time
    }

    pub fn hours_worked(&self) -> Option<ShiftDuration> {
        self.hours_worked
    }

    pub fn calculate(&mut self) -> Result<TimeOfDay, ValidationError> {
        self.calculate_shift().map(|(_, end_time)| end_time)
    }

    pub async fn save(&mut self) -> Result<Record, EntryError> {
        let (duration, end_time) = self.calculate_shift()?;
        let record = Record::compose(self.clock.now(), duration, end_time);

        self.store.append(record.clone()).await?;
        Ok(record)
    }

    fn calculate_shift(&mut self) -> Result<(ShiftDuration, TimeOfDay), ValidationError> {
        let duration = parse_duration(&self.duration_input)?;
        let end_time = compute_end_time(self.start_time(), duration);

        self.end_time = Some(end_time);
        self.hours_worked = Some(duration);
        Ok((duration, end_time))
    }

    /// Shows when the shift would end if it started right now.
    pub async fn alarm(&self) -> Result<AlarmMessage, ValidationError> {
        let duration = parse_duration(&self.duration_input)?;
        let alarm = AlarmMessage::after(now_as_time_of_day(self.clock.as_ref()), duration);

        self.notifier.notify(&alarm).await;
        Ok(alarm)
    }
}
