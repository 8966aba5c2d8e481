use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    error::EntryError,
    record::Record,
    screens::{EntryForm, HistoryView, SettingsView},
    theme::Theme,
    time::TimeOfDay,
};

#[derive(Debug, Parser)]
#[command(multicall = true, help_template = "Commands:\n{subcommands}")]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the current start time
    Now,
    /// Type the start time, or follow the clock again when none is given
    Start {
        /// HH:MM or hh:mm AM/PM
        #[arg(allow_hyphen_values = true)]
        time: Vec<String>,
    },
    /// Set the shift duration
    Duration {
        /// H:MM
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Compute the end time
    #[command(name = "calc")]
    Calculate,
    /// Compute and save the shift
    Save,
    /// Show when the shift would end if started now
    Alarm,
    /// Show the current history page
    History,
    /// Next history page
    Next,
    /// Previous history page
    #[command(name = "prev")]
    Previous,
    /// Reload the history
    Refresh,
    /// Delete a saved shift
    Delete { name: String },
    /// Toggle dark mode
    Theme {
        #[arg(value_enum)]
        mode: Option<DarkMode>,
    },
    /// Restore default settings
    Reset,
    /// Leave
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DarkMode {
    On,
    Off,
}

impl Command {
    /// Parses one console line. Help and usage errors come back as `Err` for display.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        CommandLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }
}

pub enum Reply {
    Lines(Vec<String>),
    Quit,
}

/// Dispatches console commands to the three screens.
pub struct Console {
    entry: EntryForm,
    history: HistoryView,
    settings: SettingsView,
    history_focused: bool,
}

impl Console {
    pub fn new(entry: EntryForm, history: HistoryView, settings: SettingsView) -> Self {
        Self {
            entry,
            history,
            settings,
            history_focused: false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse_line(line) {
            Ok(command) => self.handle(command).await,
            Err(error) => {
                log::debug!("Rejected console line {:?}: {:?}", line, error.kind());
                let rendered = error.render().to_string();
                Reply::Lines(rendered.trim_end().lines().map(str::to_string).collect())
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        let is_history_command = matches!(
            command,
            Command::History | Command::Next | Command::Previous | Command::Refresh | Command::Delete { .. }
        );
        if !is_history_command {
            self.history_focused = false;
        }

        let lines = match command {
            Command::Now => {
                let start_time = self.entry.start_time();
                let source = if self.entry.is_start_time_overridden() {
                    "typed"
                } else {
                    "clock"
                };
                vec![format!(
                    "Start time: {} ({}, {source})",
                    start_time.to_padded_12_hour(),
                    start_time.to_24_hour()
                )]
            }
            Command::Start { time } => self.set_start_time(&time.join(" ")),
            Command::Duration { input } => {
                self.entry.set_duration_input(input.unwrap_or_default());
                vec![format!("Duration: {}", self.entry.duration_input())]
            }
            Command::Calculate => match self.entry.calculate() {
                Ok(end_time) => self.shift_summary(end_time),
                Err(error) => vec![error.to_string()],
            },
            Command::Save => match self.entry.save().await {
                Ok(record) => {
                    let mut lines = self.shift_summary(record.end_time);
                    lines.push(format!("Saved as {}", record.name));
                    lines
                }
                Err(EntryError::Validation(error)) => vec![error.to_string()],
                Err(EntryError::Store(error)) => {
                    log::error!("Could not save shift: {}", error);
                    vec![format!("Could not save: {error}")]
                }
            },
            Command::Alarm => match self.entry.alarm().await {
                Ok(alarm) => vec![alarm.to_string()],
                Err(error) => vec![error.to_string()],
            },
            Command::History => self.show_history().await,
            Command::Next => match self.ensure_history_loaded().await {
                Some(error_lines) => error_lines,
                None => {
                    if self.history.next_page().await {
                        self.render_page().await
                    } else {
                        vec!["Already on the last page.".to_string()]
                    }
                }
            },
            Command::Previous => match self.ensure_history_loaded().await {
                Some(error_lines) => error_lines,
                None => {
                    if self.history.previous_page().await {
                        self.render_page().await
                    } else {
                        vec!["Already on the first page.".to_string()]
                    }
                }
            },
            Command::Refresh => match self.history.refresh().await {
                Ok(()) => {
                    self.history_focused = true;
                    self.render_page().await
                }
                Err(error) => vec![format!("Could not load history: {error}")],
            },
            Command::Delete { name } => match self.history.delete(&name).await {
                Ok(0) => vec![format!("No shift named {name}.")],
                Ok(_) => {
                    let mut lines = vec![format!("Deleted {name}.")];
                    lines.extend(self.render_page().await);
                    lines
                }
                Err(error) => {
                    log::error!("Could not delete {}: {}", name, error);
                    vec![format!("Could not delete: {error}")]
                }
            },
            Command::Theme { mode } => {
                let theme = self
                    .settings
                    .toggle_dark_mode(mode.map(|mode| mode == DarkMode::On));
                let mode = if theme.is_dark() { "on" } else { "off" };
                vec![format!("Dark mode {mode}")]
            }
            Command::Reset => vec![self.settings.reset().to_string()],
            Command::Quit => return Reply::Quit,
        };

        Reply::Lines(lines)
    }

    fn set_start_time(&mut self, input: &str) -> Vec<String> {
        if input.is_empty() {
            self.entry.set_start_time(None);
            return vec![format!(
                "Start time follows the clock: {}",
                self.entry.start_time().to_padded_12_hour()
            )];
        }

        match input.parse::<TimeOfDay>() {
            Ok(start_time) => {
                self.entry.set_start_time(Some(start_time));
                vec![format!("Start time: {}", start_time.to_padded_12_hour())]
            }
            Err(error) => vec![error.to_string()],
        }
    }

    fn shift_summary(&self, end_time: TimeOfDay) -> Vec<String> {
        let mut lines = vec![format!("End time: {end_time}")];
        if let Some(hours_worked) = self.entry.hours_worked() {
            lines.push(format!("Hours worked: {hours_worked}"));
        }
        lines
    }

    /// Entering the history screen reloads it.
    async fn show_history(&mut self) -> Vec<String> {
        match self.history.on_focus().await {
            Ok(()) => {
                self.history_focused = true;
                self.render_page().await
            }
            Err(error) => vec![format!("Could not load history: {error}")],
        }
    }

    /// Returns an error message when the history could not be loaded.
    async fn ensure_history_loaded(&mut self) -> Option<Vec<String>> {
        if self.history_focused {
            return None;
        }

        match self.history.on_focus().await {
            Ok(()) => {
                self.history_focused = true;
                None
            }
            Err(error) => Some(vec![format!("Could not load history: {error}")]),
        }
    }

    async fn render_page(&self) -> Vec<String> {
        let records = self.history.current_page().await;
        let mut lines = vec![self.theme().paint(&format!(
            "History, page {} of {}",
            self.history.page_number(),
            self.history.page_count().await
        ))];

        if records.is_empty() {
            lines.push("No shifts saved yet.".to_string());
        }
        lines.extend(records.iter().map(render_record));
        lines
    }
}

fn render_record(record: &Record) -> String {
    format!(
        "{}  {}  worked {}  ended {}",
        record.name, record.date, record.duration, record.end_time
    )
}
