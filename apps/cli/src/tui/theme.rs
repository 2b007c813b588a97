//! Theme system for the TUI.
//!
//! Provides the Diet Architect palette and a terminal-adaptive theme that
//! respects the user's terminal color scheme.

use ratatui::style::Color;
use std::env;

/// Check if the terminal supports true color (24-bit RGB).
fn supports_true_color() -> bool {
    if let Ok(colorterm) = env::var("COLORTERM") {
        let ct = colorterm.to_lowercase();
        if ct == "truecolor" || ct == "24bit" {
            return true;
        }
    }

    if let Ok(term) = env::var("TERM") {
        let t = term.to_lowercase();
        if t.contains("truecolor") || t.contains("24bit") || t.contains("direct") {
            return true;
        }
    }

    false
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// Diet Architect brand theme (dark, emerald and saffron)
    #[default]
    Architect,
    /// Terminal-adaptive theme using ANSI colors
    Terminal,
}

/// Color palette for the TUI.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // Backgrounds
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_selection: Color,

    // Borders
    pub border: Color,
    pub border_active: Color,

    // Text
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub spinner: Color,
}

impl Theme {
    /// Brand theme, RGB when the terminal supports true color and the
    /// 256-color palette otherwise.
    pub fn architect() -> Self {
        if supports_true_color() {
            Self::architect_rgb()
        } else {
            Self::architect_256()
        }
    }

    fn architect_rgb() -> Self {
        Self {
            bg: Color::Rgb(0x0F, 0x17, 0x2A),           // slate-900
            bg_panel: Color::Rgb(0x1E, 0x29, 0x3B),     // slate-800
            bg_selection: Color::Rgb(0x33, 0x41, 0x55), // slate-700

            border: Color::Rgb(0x47, 0x55, 0x69),        // slate-600
            border_active: Color::Rgb(0x10, 0xB9, 0x81), // emerald-500

            text: Color::Rgb(0xF8, 0xFA, 0xFC),           // slate-50
            text_secondary: Color::Rgb(0xCB, 0xD5, 0xE1), // slate-300
            text_muted: Color::Rgb(0x94, 0xA3, 0xB8),     // slate-400

            accent: Color::Rgb(0x34, 0xD3, 0x99), // emerald-400

            success: Color::Rgb(0x34, 0xD3, 0x99), // emerald-400
            warning: Color::Rgb(0xF5, 0x9E, 0x0B), // amber-500 (saffron)
            error: Color::Rgb(0xEF, 0x44, 0x44),   // red-500
            info: Color::Rgb(0x60, 0xA5, 0xFA),    // blue-400

            spinner: Color::Rgb(0xF5, 0x9E, 0x0B),
        }
    }

    fn architect_256() -> Self {
        // 232-255 grayscale, 16-231 color cube
        Self {
            bg: Color::Indexed(234),
            bg_panel: Color::Indexed(236),
            bg_selection: Color::Indexed(238),

            border: Color::Indexed(241),
            border_active: Color::Indexed(36),

            text: Color::Indexed(255),
            text_secondary: Color::Indexed(252),
            text_muted: Color::Indexed(246),

            accent: Color::Indexed(42),

            success: Color::Indexed(42),
            warning: Color::Indexed(214),
            error: Color::Indexed(203),
            info: Color::Indexed(75),

            spinner: Color::Indexed(214),
        }
    }

    /// Terminal-adaptive theme using ANSI colors.
    pub fn terminal() -> Self {
        Self {
            bg: Color::Reset,
            bg_panel: Color::Reset,
            bg_selection: Color::DarkGray,

            border: Color::DarkGray,
            border_active: Color::Green,

            text: Color::Reset,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            accent: Color::Green,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,

            spinner: Color::Yellow,
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Architect => Self::architect(),
            ThemeMode::Terminal => Self::terminal(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::architect()
    }
}
