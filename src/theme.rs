//! Colour palettes for the dark and light themes
//!
//! Rendering code receives a `&Theme` explicitly; nothing reads the active
//! theme from global state.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Ambient theme selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

/// Resolved palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub header: Color,
    pub cursor_bg: Color,
    pub selected_bg: Color,
    pub footer_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            accent: Color::Cyan,
            header: Color::Cyan,
            cursor_bg: Color::Rgb(38, 38, 46),
            selected_bg: Color::Rgb(52, 56, 70),
            footer_bg: Color::Rgb(30, 64, 34),
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            bg: Color::White,
            fg: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            accent: Color::Rgb(14, 165, 233),
            header: Color::Blue,
            cursor_bg: Color::Rgb(243, 244, 246),
            selected_bg: Color::Rgb(229, 231, 235),
            footer_bg: Color::Rgb(220, 245, 218),
            success: Color::Rgb(22, 101, 52),
            warning: Color::Rgb(133, 77, 14),
            danger: Color::Rgb(185, 28, 28),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Palette for a component that may pin itself to the light theme
    pub fn resolve(ambient: ThemeMode, force_light: bool) -> Self {
        if force_light {
            Self::light()
        } else {
            Self::from_mode(ambient)
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn key_hint(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.header)
            .add_modifier(Modifier::BOLD)
    }
}
