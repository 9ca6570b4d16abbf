use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Get the active theme (loaded once on first call).
pub fn current() -> &'static Theme {
    THEME.get_or_init(|| Theme::load().unwrap_or_default())
}

// Const fallbacks used in places that need compile-time styles
pub const HEADER_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const ERROR_STYLE: Style = Style::new().fg(Color::LightRed);

#[derive(Debug, Clone)]
pub struct Theme {
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    /// Next-event banner in the status bar.
    pub banner: Style,
    /// Titles of liturgical (read-only) events.
    pub liturgical: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: HEADER_STYLE,
            dim: DIM_STYLE,
            border: BORDER_STYLE,
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            banner: Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            liturgical: Style::default().add_modifier(Modifier::ITALIC),
        }
    }
}

impl Theme {
    pub fn load() -> Option<Self> {
        let path = parish_calendar::config::config_dir()?.join("theme.toml");
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<ThemeConfig>(&content) {
            Ok(config) => Some(config.into_theme()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid theme");
                None
            }
        }
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "liturgical" => Self::liturgical(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    /// Purple and gold, the colors of the Lent and Easter seasons.
    fn liturgical() -> Self {
        let purple = Color::Rgb(108, 52, 131);
        let gold = Color::Rgb(241, 196, 15);
        Self {
            today: Style::default().fg(Color::Black).bg(gold),
            selected: Style::default().fg(Color::White).bg(purple),
            header: Style::default().fg(gold).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(125, 110, 140)),
            border: Style::default().fg(purple),
            status: Style::default().fg(Color::White).bg(Color::Rgb(60, 30, 75)),
            banner: Style::default().fg(Color::Black).bg(gold).add_modifier(Modifier::BOLD),
            liturgical: Style::default().fg(gold).add_modifier(Modifier::ITALIC),
        }
    }

    fn nord() -> Self {
        let frost = Color::Rgb(136, 192, 208);
        let polar = Color::Rgb(67, 76, 94);
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(frost),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(polar),
            status: Style::default().fg(Color::Rgb(229, 233, 240)).bg(polar),
            banner: Style::default().fg(Color::Black).bg(frost).add_modifier(Modifier::BOLD),
            liturgical: Style::default().fg(Color::Rgb(180, 142, 173)).add_modifier(Modifier::ITALIC),
        }
    }
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    today_bg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    border_fg: Option<String>,
    status_bg: Option<String>,
    banner_bg: Option<String>,
    liturgical_fg: Option<String>,
}

impl ThemeConfig {
    fn into_theme(self) -> Theme {
        let mut theme = self.preset.as_deref().map(Theme::preset).unwrap_or_default();

        let color = |s: &Option<String>| s.as_deref().and_then(parse_color);
        if let Some(c) = color(&self.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&self.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&self.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&self.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&self.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&self.banner_bg) {
            theme.banner = theme.banner.bg(c);
        }
        if let Some(c) = color(&self.liturgical_fg) {
            theme.liturgical = theme.liturgical.fg(c);
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}

/// Display color of an event, white when its stored color is unreadable.
pub fn event_color(hex: &str) -> Color {
    parse_color(hex).unwrap_or(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_hex_colors() {
        assert_eq!(parse_color("#B03A2E"), Some(Color::Rgb(0xB0, 0x3A, 0x2E)));
        assert_eq!(parse_color("#28a745"), Some(Color::Rgb(0x28, 0xA7, 0x45)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(event_color("nonsense"), Color::White);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config: ThemeConfig = toml::from_str("preset = \"nord\"\nbanner_bg = \"red\"\n").unwrap();
        let theme = config.into_theme();
        assert_eq!(theme.banner.bg, Some(Color::Red));
        assert_eq!(theme.border.fg, Some(Color::Rgb(67, 76, 94)));
    }
}
