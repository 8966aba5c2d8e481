mod record_store;

pub use record_store::{LoadState, RECORDS_KEY, RecordStore};

#[cfg(test)]
mod tests;
