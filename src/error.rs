use thiserror::Error;

/// Invalid user input. Reported inline, nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duration required")]
    DurationRequired,
    #[error("invalid duration \"{0}\", expected H:MM")]
    MalformedDuration(String),
    #[error("duration minutes must be below 60, got {0}")]
    MinutesOutOfRange(u32),
    #[error("invalid time \"{0}\", expected HH:MM or hh:mm AM/PM")]
    MalformedTime(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored records are not valid JSON: {0}")]
    Read(#[source] serde_json::Error),
    #[error("could not read from storage: {0:#}")]
    Backend(anyhow::Error),
    #[error("could not write to storage: {0:#}")]
    Write(anyhow::Error),
    #[error("could not serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("another save or delete is still in progress")]
    Busy,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
