use iocraft::prelude::Color;

use crate::color::Color as ConfigColor;
use crate::config::types::Theme;

/// Every colour slot the catalog view paints with, resolved to a terminal
/// colour (user config first, built-in default otherwise).
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub header: Color,
    pub text: Color,
    pub faint: Color,
    pub selected_bg: Color,
    pub border: Color,
    pub error: Color,
    pub active_filter: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            text: Color::Reset,
            faint: Color::DarkGrey,
            selected_bg: Color::AnsiValue(237),
            border: Color::DarkGrey,
            error: Color::Red,
            active_filter: Color::Yellow,
        }
    }
}

impl ResolvedTheme {
    pub fn resolve(theme: &Theme) -> Self {
        let d = Self::default();
        let pick = |c: Option<ConfigColor>, fallback: Color| {
            c.map_or(fallback, ConfigColor::to_crossterm_color)
        };
        Self {
            header: pick(theme.header, d.header),
            text: pick(theme.text, d.text),
            faint: pick(theme.faint, d.faint),
            selected_bg: pick(theme.selected_bg, d.selected_bg),
            border: pick(theme.border, d.border),
            error: pick(theme.error, d.error),
            active_filter: pick(theme.active_filter, d.active_filter),
        }
    }
}
