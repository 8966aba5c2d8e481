mod entry;
mod history;
mod settings;

pub use entry::EntryForm;
pub use history::{DEFAULT_PAGE_SIZE, HistoryView};
pub use settings::{RESET_MESSAGE, SettingsView};
