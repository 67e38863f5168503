use ratatui::style::Color;

/// Binary display mode. Not remembered across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors the terminal UI draws with for a theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub user: Color,
    pub assistant: Color,
    pub error: Color,
    pub accent: Color,
}

impl Theme {
    pub fn toggle(&mut self) {
        *self = match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    /// Icon for the toggle control: shows the mode a press switches to
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☾",
            Theme::Dark => "☀",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }

    pub fn palette(&self) -> Palette {
        if self.is_dark() {
            return Palette {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                user: Color::Cyan,
                assistant: Color::Yellow,
                error: Color::LightRed,
                accent: Color::LightCyan,
            };
        }
        Palette {
            background: Color::White,
            text: Color::Black,
            muted: Color::DarkGray,
            user: Color::Blue,
            assistant: Color::Magenta,
            error: Color::Red,
            accent: Color::Cyan,
        }
    }
}
