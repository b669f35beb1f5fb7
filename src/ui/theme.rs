//! Color palette and style helpers
//!
//! A dark "screening room" palette: warm amber accents on a near-black
//! background, with a red heart for favorites.

use ratatui::style::{Color, Modifier, Style};

/// Palette and style constructors
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// #0d0b0a
    pub const BACKGROUND: Color = Color::Rgb(0x0d, 0x0b, 0x0a);
    /// #ffb238 amber
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb2, 0x38);
    /// #7fc8f8 sky
    pub const SECONDARY: Color = Color::Rgb(0x7f, 0xc8, 0xf8);
    /// #f2e8cf
    pub const TEXT: Color = Color::Rgb(0xf2, 0xe8, 0xcf);
    /// #6b6259
    pub const DIM: Color = Color::Rgb(0x6b, 0x62, 0x59);
    /// #ff4d6d heart red
    pub const FAVORITE: Color = Color::Rgb(0xff, 0x4d, 0x6d);
    /// #7ddf64
    pub const SUCCESS: Color = Color::Rgb(0x7d, 0xdf, 0x64);
    /// #f4d35e
    pub const WARNING: Color = Color::Rgb(0xf4, 0xd3, 0x5e);
    /// #ff5a36
    pub const ERROR: Color = Color::Rgb(0xff, 0x5a, 0x36);

    /// Panels and the status bar
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1c, 0x18, 0x15);
    pub const BORDER: Color = Color::Rgb(0x80, 0x59, 0x1c);
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected row in a list
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint
    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Filled heart
    pub fn favorite() -> Style {
        Style::default()
            .fg(Self::FAVORITE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn genre() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::ITALIC)
    }

    /// Vote average colored by band
    pub fn rating(vote: f32) -> Style {
        let color = if vote >= 7.5 {
            Self::SUCCESS
        } else if vote >= 6.0 {
            Self::WARNING
        } else if vote > 0.0 {
            Self::ERROR
        } else {
            Self::DIM
        };
        Style::default().fg(color)
    }
}

/// Heart glyph for a favorite flag
pub fn heart(favorite: bool) -> &'static str {
    if favorite {
        "♥"
    } else {
        "♡"
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRAST
// ═══════════════════════════════════════════════════════════════════════════

/// RGB triple of a `Color::Rgb`
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

/// WCAG 2.0 relative luminance
fn luminance((r, g, b): (u8, u8, u8)) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio from 1.0 (identical) to 21.0 (black on white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let (a, b) = (luminance(fg), luminance(bg));
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    (hi + 0.05) / (lo + 0.05)
}
