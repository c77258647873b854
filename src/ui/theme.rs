//! CodeScent theme
//!
//! Greyscale chrome; color is reserved for meaning (smell severity, code
//! quality, chart slices).

use crate::dashboard::QualityTier;
use crate::viewer::Severity;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    //  CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);
    pub const GREY_600: Color = Color::Rgb(45, 45, 45);
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);
    pub const GREY_800: Color = Color::Rgb(28, 28, 28);
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    pub const BG: Color = Self::GREY_900;

    // ─────────────────────────────────────────────────────────────────────
    // Severity colors: foreground for badges, muted background for lines
    // ─────────────────────────────────────────────────────────────────────

    pub const RED: Color = Color::Rgb(239, 68, 68);
    pub const YELLOW: Color = Color::Rgb(234, 179, 8);
    pub const GREEN: Color = Color::Rgb(34, 197, 94);

    pub const RED_BG: Color = Color::Rgb(69, 26, 26);
    pub const YELLOW_BG: Color = Color::Rgb(66, 54, 14);
    pub const GREEN_BG: Color = Color::Rgb(20, 56, 33);

    // ─────────────────────────────────────────────────────────────────────
    // Glyphs
    // ─────────────────────────────────────────────────────────────────────

    pub const BAR_FILLED: char = '█';
    pub const BAR_EMPTY: char = '░';
    pub const BULLET_FILLED: char = '●';
    pub const BULLET_EMPTY: char = '○';
    pub const ARROW_RIGHT: char = '▸';
    pub const DOT_SEPARATOR: char = '·';
    pub const CHECK_MARK: char = '✓';
    pub const CROSS_MARK: char = '✗';
    pub const WARNING_MARK: char = '⚠';
    pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

    pub const HEADER: &'static str = "◆ C O D E S C E N T";
    pub const TAGLINE: &'static str = "code smells, surfaced";

    // ═══════════════════════════════════════════════════════════════════════
    //  STYLE BUILDERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn bg() -> Style {
        Style::default().bg(Self::GREY_900)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Self::GREY_800)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn bold() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::GREY_600)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Focused panel
    pub fn border_active() -> Style {
        Style::default().fg(Self::GREY_200)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::GREY_400).bg(Self::GREY_800)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    pub fn input(focused: bool) -> Style {
        if focused {
            Style::default().fg(Self::WHITE).bg(Self::GREY_700)
        } else {
            Style::default().fg(Self::GREY_200)
        }
    }

    pub fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::High => Self::RED,
            Severity::Medium => Self::YELLOW,
            Severity::Low => Self::GREEN,
        }
    }

    /// Background for a highlighted source line
    pub fn severity_line(severity: Severity) -> Style {
        let bg = match severity {
            Severity::High => Self::RED_BG,
            Severity::Medium => Self::YELLOW_BG,
            Severity::Low => Self::GREEN_BG,
        };
        Style::default().fg(Self::GREY_50).bg(bg)
    }

    /// Badge pill above a smell's first line
    pub fn severity_badge(severity: Severity) -> Style {
        Style::default()
            .fg(Self::GREY_900)
            .bg(Self::severity_color(severity))
            .add_modifier(Modifier::BOLD)
    }

    pub fn quality_color(tier: QualityTier) -> Color {
        match tier {
            QualityTier::Good => Self::GREEN,
            QualityTier::Fair => Self::YELLOW,
            QualityTier::NeedsImprovement => Self::RED,
        }
    }
}

/// Horizontal gauge, `value` in 0..=100
pub fn bar_gauge(value: u8, width: usize) -> String {
    let filled = (value.min(100) as usize * width) / 100;
    (0..width)
        .map(|i| if i < filled { Theme::BAR_FILLED } else { Theme::BAR_EMPTY })
        .collect()
}

pub fn spinner(frame: usize) -> char {
    Theme::SPINNER_BRAILLE[frame % Theme::SPINNER_BRAILLE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_gauge() {
        let bar = bar_gauge(50, 10);
        assert_eq!(bar.chars().count(), 10);
        assert_eq!(bar.chars().filter(|&c| c == Theme::BAR_FILLED).count(), 5);
        assert_eq!(bar_gauge(250, 4), "████");
    }

    #[test]
    fn test_severity_palette() {
        assert_eq!(Theme::severity_color(Severity::High), Theme::RED);
        assert_eq!(Theme::severity_color(Severity::Medium), Theme::YELLOW);
        assert_eq!(Theme::severity_color(Severity::Low), Theme::GREEN);
    }
}
