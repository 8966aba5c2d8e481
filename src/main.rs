use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shiftlog::{
    alarm::{AlarmMessage, AlarmNotifier},
    appsettings::AppSettings,
    clock::{StartTimeTicker, SystemClock},
    console::{Console, Reply},
    screens::{EntryForm, HistoryView, SettingsView},
    storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore},
    store::RecordStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

struct ConsoleAlarmNotifier;

#[async_trait]
impl AlarmNotifier for ConsoleAlarmNotifier {
    async fn notify(&self, alarm: &AlarmMessage) {
        log::info!("Showing alarm dialog: {}", alarm);
        println!("[Alarm] {alarm}");
    }
}

fn storage_backend(settings: &AppSettings) -> Arc<dyn KeyValueStore> {
    if settings.storage.in_memory {
        log::warn!("Using in-memory storage, shifts will not survive a restart");
        Arc::new(InMemoryKeyValueStore::new())
    } else {
        log::info!(
            "Storing shifts under {}",
            settings.storage.data_dir.display()
        );
        Arc::new(FileKeyValueStore::new(settings.storage.data_dir.clone()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load()?;
    log::debug!("Loaded settings {:?}", settings);

    let clock = SystemClock::new(settings.timezone()?);
    let ticker = StartTimeTicker::spawn(
        clock.clone(),
        Duration::from_millis(settings.ticker.interval_ms.max(1)),
    );
    let store = Arc::new(RecordStore::new(storage_backend(&settings)));

    let entry = EntryForm::new(
        Arc::new(clock),
        ticker.subscribe(),
        store.clone(),
        Arc::new(ConsoleAlarmNotifier),
    );
    let history = HistoryView::new(store, settings.history.page_size);
    let mut console = Console::new(entry, history, SettingsView::new(settings.theme()));

    println!("{}", console.theme().paint("Shift log. Type help for commands."));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match console.handle_line(&line).await {
            Reply::Lines(output) => {
                for line in output {
                    println!("{line}");
                }
            }
            Reply::Quit => break,
        }
    }

    ticker.stop(Duration::from_secs(1)).await;
    log::info!("Bye");
    Ok(())
}
