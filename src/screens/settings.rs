use crate::theme::Theme;

pub const RESET_MESSAGE: &str = "Settings restored. All settings are back to their defaults.";

#[derive(Debug, Default)]
pub struct SettingsView {
    theme: Theme,
}

impl SettingsView {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets dark mode explicitly, or flips it when `value` is `None`.
    pub fn toggle_dark_mode(&mut self, value: Option<bool>) -> Theme {
        self.theme = match value {
            Some(dark_mode) => Theme::with_dark_mode(dark_mode),
            None => self.theme.toggled(),
        };
        log::debug!("Theme set to {:?}", self.theme);
        self.theme
    }

    pub fn reset(&mut self) -> &'static str {
        self.toggle_dark_mode(Some(false));
        RESET_MESSAGE
    }
}
