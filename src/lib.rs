pub mod alarm;
pub mod appsettings;
pub mod clock;
pub mod console;
pub mod error;
pub mod record;
pub mod screens;
pub mod storage;
pub mod store;
pub mod theme;
pub mod time;
