//! Color palettes for the two dashboard themes
//!
//! - dark: darkwall palette
//! - light: catppuccin latte

use ratatui::style::Color;

use crate::preference::ThemeMode;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background of the selected day
    pub selection_bg: Color,
    /// Text of the selected day
    pub selection_fg: Color,
    /// Accent color (borders, active tab, month heading)
    pub accent: Color,
    /// Dimmed text (placeholders, weekday header)
    pub dimmed: Color,
    /// Days outside the reference month
    pub other_month: Color,
    /// Keyboard cursor outline
    pub cursor: Color,
    /// Today's date
    pub today: Color,
    /// Load failures
    pub error: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(13, 17, 22),      // #0d1116
            foreground: Color::Rgb(229, 234, 241),   // #e5eaf1
            selection_bg: Color::Rgb(180, 83, 9),    // #b45309 (amber)
            selection_fg: Color::Rgb(229, 234, 241), // #e5eaf1
            accent: Color::Rgb(180, 83, 9),          // #b45309
            dimmed: Color::Rgb(156, 163, 175),       // #9ca3af
            other_month: Color::Rgb(75, 85, 99),     // #4b5563
            cursor: Color::Rgb(20, 28, 42),          // #141c2a
            today: Color::Rgb(34, 197, 94),          // #22c55e
            error: Color::Rgb(239, 68, 68),          // #ef4444
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(239, 241, 245),   // #eff1f5 (base)
            foreground: Color::Rgb(76, 79, 105),     // #4c4f69 (text)
            selection_bg: Color::Rgb(30, 102, 245),  // #1e66f5 (blue)
            selection_fg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
            accent: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
            dimmed: Color::Rgb(108, 111, 133),       // #6c6f85 (subtext0)
            other_month: Color::Rgb(172, 176, 190),  // #acb0be (surface2)
            cursor: Color::Rgb(204, 208, 218),       // #ccd0da (surface0)
            today: Color::Rgb(64, 160, 43),          // #40a02b (green)
            error: Color::Rgb(210, 15, 57),          // #d20f39 (red)
        }
    }
}
