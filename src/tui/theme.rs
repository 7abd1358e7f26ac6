//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Auto,
    Dark,
    Light,
}

impl Theme {
    /// Parse the config `theme` value. Unknown values were already rejected
    /// by config validation; anything unexpected here falls back to Auto.
    pub fn from_config(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ => Theme::Auto,
        }
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // General colors
    pub title_color: Color,
    pub muted: Color,
    pub value_color: Color,

    // Form colors
    pub row_selected: Style,
    pub header_style: Style,

    // Chart colors, one per breakdown category (fixed order)
    pub category_colors: [Color; 6],
    pub bar_empty: Color,

    // Totals panel
    pub total_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            title_color: Color::Cyan,
            muted: Color::Gray,
            value_color: Color::White,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            category_colors: [
                Color::Blue,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Red,
                Color::LightRed,
            ],
            bar_empty: Color::DarkGray,
            total_style: Style::new().bold(),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
        }
    }

    pub fn light() -> Self {
        Self {
            title_color: Color::Blue,
            muted: Color::DarkGray,
            value_color: Color::Black,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            category_colors: [
                Color::Blue,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Red,
                Color::LightRed,
            ],
            bar_empty: Color::Gray,
            total_style: Style::new().bold(),
            status_bar_bg: Color::Indexed(252),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
        }
    }

    /// Color for one of the six breakdown categories, by its fixed index.
    pub fn category_color(&self, index: usize) -> Color {
        self.category_colors[index % self.category_colors.len()]
    }
}

/// Resolve the effective palette. Auto probes the terminal background via
/// terminal-light; detection failure (pipes, unsupported terminals) falls
/// back to dark.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
