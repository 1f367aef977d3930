//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Bar color for `iap` subscriptions
pub const IAP_COLOR: Color = Color::Rgb(0x00, 0xCC, 0x96);
/// Bar color for `ln` subscriptions
pub const LN_COLOR: Color = Color::Rgb(0xEF, 0x55, 0x3B);
/// Bar color for any other subscription type
pub const OTHER_COLOR: Color = Color::Rgb(0x63, 0x6E, 0xFA);

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints, axes)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date and axis label color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Current-date marker on the timeline
    pub fn marker(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Bar color for a subscription type. Same on both backgrounds.
    pub fn type_color(self, kind: &str) -> Color {
        match kind {
            "iap" => IAP_COLOR,
            "ln" => LN_COLOR,
            _ => OTHER_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        let t = Theme::Dark;
        assert_eq!(t.text(), Color::White);
        assert_eq!(t.accent(), Color::Cyan);
        assert_eq!(t.muted(), Color::DarkGray);
        assert_eq!(t.date(), Color::Yellow);
        assert_eq!(t.marker(), Color::Magenta);
    }

    #[test]
    fn test_light_theme_colors() {
        let t = Theme::Light;
        assert_eq!(t.text(), Color::Black);
        assert_eq!(t.accent(), Color::Indexed(25));
        assert_eq!(t.muted(), Color::Gray);
        assert_eq!(t.date(), Color::Indexed(130));
        assert_eq!(t.marker(), Color::Indexed(90));
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_type_colors() {
        let t = Theme::Dark;
        assert_eq!(t.type_color("iap"), Color::Rgb(0x00, 0xCC, 0x96));
        assert_eq!(t.type_color("ln"), Color::Rgb(0xEF, 0x55, 0x3B));
        assert_eq!(t.type_color("legacy"), Color::Rgb(0x63, 0x6E, 0xFA));
        assert_eq!(Theme::Light.type_color("iap"), t.type_color("iap"));
    }
}
