use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{screens::DEFAULT_PAGE_SIZE, theme::Theme};

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub in_memory: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HistorySettings {
    pub page_size: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TickerSettings {
    pub interval_ms: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClockSettings {
    pub timezone: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThemeSettings {
    pub dark_mode: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub history: HistorySettings,
    pub ticker: TickerSettings,
    #[serde(default)]
    pub clock: ClockSettings,
    pub theme: ThemeSettings,
}

impl AppSettings {
    /// Reads `appsettings.*`, then `appsettings.local.*`, then `APP__SECTION__KEY` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    fn load_from(dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("storage.data_dir", "data")?
            .set_default("storage.in_memory", false)?
            .set_default("history.page_size", DEFAULT_PAGE_SIZE as i64)?
            .set_default("ticker.interval_ms", 1000i64)?
            .set_default("theme.dark_mode", false)?
            .add_source(File::from(dir.join("appsettings")).required(false))
            .add_source(File::from(dir.join("appsettings.local")).required(false))
            .add_source(environment)
            .build()?;

        settings.try_deserialize()
    }

    pub fn timezone(&self) -> anyhow::Result<Option<chrono_tz::Tz>> {
        match self.clock.timezone.as_deref() {
            Some(name) => {
                let tz = name
                    .parse::<chrono_tz::Tz>()
                    .map_err(|e| anyhow::anyhow!("Unknown timezone \"{name}\": {e}"))?;
                Ok(Some(tz))
            }
            None => Ok(None),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::with_dark_mode(self.theme.dark_mode)
    }
}
