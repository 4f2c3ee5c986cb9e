use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use reminder_calendar::calendar::Priority;
use reminder_calendar::config::ThemeSettings;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from the config file. Later calls are ignored.
pub fn init(settings: &ThemeSettings) {
    if THEME.set(Theme::from_settings(settings)).is_err() {
        log::debug!("theme already initialised, ignoring new settings");
    }
}

/// Get the active theme (default until [`init`] runs).
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub high: Style,
    pub moderate: Style,
    pub low: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Green),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            high: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            moderate: Style::default().fg(Color::Yellow),
            low: Style::default().fg(Color::Blue),
        }
    }
}

impl Theme {
    pub fn priority(&self, priority: Priority) -> Style {
        match priority {
            Priority::High => self.high,
            Priority::Moderate => self.moderate,
            Priority::Low => self.low,
        }
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            other => {
                if other != "default" {
                    log::warn!("unknown theme preset {other:?}, using default");
                }
                Self::default()
            }
        }
    }

    fn dracula() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(80, 250, 123)), // green
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)), // cyan
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            highlight: Style::default()
                .bg(Color::Rgb(68, 71, 90))
                .add_modifier(Modifier::BOLD),
            high: Style::default().fg(Color::Rgb(255, 85, 85)).add_modifier(Modifier::BOLD),
            moderate: Style::default().fg(Color::Rgb(241, 250, 140)),
            low: Style::default().fg(Color::Rgb(189, 147, 249)),
        }
    }

    fn gruvbox() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(184, 187, 38)), // green
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)), // aqua
            header: Style::default().fg(Color::Rgb(235, 219, 178)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            highlight: Style::default()
                .bg(Color::Rgb(80, 73, 69))
                .add_modifier(Modifier::BOLD),
            high: Style::default().fg(Color::Rgb(251, 73, 52)).add_modifier(Modifier::BOLD),
            moderate: Style::default().fg(Color::Rgb(250, 189, 47)),
            low: Style::default().fg(Color::Rgb(131, 165, 152)),
        }
    }

    fn nord() -> Self {
        Self {
            today: Style::default().fg(Color::Black).bg(Color::Rgb(163, 190, 140)), // green
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)), // frost
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            highlight: Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
            high: Style::default().fg(Color::Rgb(191, 97, 106)).add_modifier(Modifier::BOLD),
            moderate: Style::default().fg(Color::Rgb(235, 203, 139)),
            low: Style::default().fg(Color::Rgb(129, 161, 193)),
        }
    }

    fn from_settings(settings: &ThemeSettings) -> Self {
        // Start from preset or default
        let mut theme = settings
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let fg = |style: &mut Style, value: &Option<String>| {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.fg(c);
            }
        };
        fg(&mut theme.today, &settings.today_fg);
        fg(&mut theme.selected, &settings.selected_fg);
        fg(&mut theme.header, &settings.header_fg);
        fg(&mut theme.dim, &settings.dim_fg);
        fg(&mut theme.border, &settings.border_fg);
        fg(&mut theme.status, &settings.status_fg);
        fg(&mut theme.high, &settings.high_fg);
        fg(&mut theme.moderate, &settings.moderate_fg);
        fg(&mut theme.low, &settings.low_fg);

        let bg = |style: &mut Style, value: &Option<String>| {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.bg(c);
            }
        };
        bg(&mut theme.today, &settings.today_bg);
        bg(&mut theme.selected, &settings.selected_bg);
        bg(&mut theme.status, &settings.status_bg);
        bg(&mut theme.highlight, &settings.highlight_bg);

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
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
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => {
            log::warn!("ignoring unknown colour {s:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" Grey "), Some(Color::Gray));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let settings = ThemeSettings {
            preset: Some("nord".into()),
            today_bg: Some("red".into()),
            high_fg: Some("#000000".into()),
            ..ThemeSettings::default()
        };
        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.today.bg, Some(Color::Red));
        assert_eq!(theme.high.fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(theme.selected, Theme::nord().selected);
    }

    #[test]
    fn second_init_keeps_first_theme() {
        let nord = ThemeSettings {
            preset: Some("nord".into()),
            ..ThemeSettings::default()
        };
        let dracula = ThemeSettings {
            preset: Some("dracula".into()),
            ..ThemeSettings::default()
        };
        init(&nord);
        let first = current().selected;
        init(&dracula);
        assert_eq!(current().selected, first);
    }
}
