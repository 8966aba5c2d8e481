#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

const LIGHT: Palette = Palette {
    background: "#f0f0f0",
    text: "#333333",
    accent: "#ff6347",
};

const DARK: Palette = Palette {
    background: "#333333",
    text: "#ffffff",
    accent: "#a52a2a",
};

impl Theme {
    pub fn with_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        Self::with_dark_mode(!self.is_dark())
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    /// Wraps `text` in the 24-bit ANSI colours of the palette.
    pub fn paint(self, text: &str) -> String {
        let palette = self.palette();
        let (fr, fg, fb) = hex_to_rgb(palette.text);
        let (br, bg, bb) = hex_to_rgb(palette.background);
        format!("\x1b[38;2;{fr};{fg};{fb}m\x1b[48;2;{br};{bg};{bb}m{text}\x1b[0m")
    }
}

fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let channel = |range| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
    (channel(1..3), channel(3..5), channel(5..7))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_returns_a_new_value() {
        let light = Theme::default();
        let dark = light.toggled();

        assert_eq!(light, Theme::Light);
        assert_eq!(dark, Theme::Dark);
        assert_eq!(dark.toggled(), Theme::Light);
    }

    #[test]
    fn palettes_differ_per_theme() {
        assert_eq!(Theme::Dark.palette().background, "#333333");
        assert_eq!(Theme::Light.palette().text, "#333333");
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
    }

    #[test]
    fn paint_uses_palette_colours() {
        assert_eq!(
            Theme::Dark.paint("Settings"),
            "\x1b[38;2;255;255;255m\x1b[48;2;51;51;51mSettings\x1b[0m"
        );
    }
}
