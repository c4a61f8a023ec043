use iocraft::prelude::*;

use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Help overlay
// ---------------------------------------------------------------------------

/// Key bindings grouped by where they apply.
pub const HELP_GROUPS: &[(&str, &[(&str, &str)])] = &[
    (
        "Table",
        &[
            ("j / \u{2193}", "Move down"),
            ("k / \u{2191}", "Move up"),
            ("g / G", "First / last row"),
            ("Enter / Space", "Expand or collapse row"),
            ("h / l", "Focus previous / next search column"),
            ("\u{2190} / \u{2192}", "Scroll table (narrow), else focus column"),
            ("d", "Sort by build date"),
            ("s", "Sort by security version"),
            ("c", "Clear all filters"),
            ("r", "Reload catalog"),
            ("o", "Open download link"),
            ("y", "Copy download link"),
            ("Esc", "Dismiss message"),
            ("q", "Quit"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Open search for focused column"),
            ("Enter", "Apply search"),
            ("Ctrl-R", "Reset column search"),
            ("\u{2191} / \u{2193}", "Pick suggestion"),
            ("Tab", "Complete suggestion"),
            ("Esc", "Close without applying"),
        ],
    ),
];

/// Pre-rendered help overlay data (owned, 'static-safe).
pub struct RenderedHelpOverlay {
    pub lines: Vec<(String, Color, Weight)>,
    pub border_fg: Color,
}

impl RenderedHelpOverlay {
    pub fn build(theme: &ResolvedTheme) -> Self {
        let mut lines = vec![
            ("Keybindings".to_owned(), theme.header, Weight::Bold),
            (String::new(), theme.text, Weight::Normal),
        ];
        for (title, rows) in HELP_GROUPS {
            lines.push((format!("  {title}"), theme.header, Weight::Bold));
            for (key, description) in *rows {
                lines.push((format!("    {key:>14}  {description}"), theme.text, Weight::Normal));
            }
            lines.push((String::new(), theme.text, Weight::Normal));
        }
        lines.push(("  Press ? to close".to_owned(), theme.faint, Weight::Normal));
        Self {
            lines,
            border_fg: theme.border,
        }
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct HelpOverlayProps {
    pub overlay: Option<RenderedHelpOverlay>,
    pub width: u16,
    pub height: u16,
}

#[component]
pub fn HelpOverlay(props: &mut HelpOverlayProps) -> impl Into<AnyElement<'static>> {
    let Some(overlay) = props.overlay.take() else {
        return element! { View }.into_any();
    };

    let width = u32::from(props.width);
    let height = u32::from(props.height);

    // Centered, ~60% width, up to 80% height.
    let overlay_width = (width * 3 / 5).max(40).min(width.saturating_sub(4));
    let overlay_height = (height * 4 / 5).max(10).min(height.saturating_sub(2));
    let pad_left = (width.saturating_sub(overlay_width)) / 2;
    let pad_top = (height.saturating_sub(overlay_height)) / 2;

    let mut lines = overlay.lines;
    lines.truncate(overlay_height.saturating_sub(2) as usize);

    element! {
        View(
            width,
            height,
            position: Position::Absolute,
        ) {
            View(
                margin_left: pad_left,
                margin_top: pad_top,
                width: overlay_width,
                height: overlay_height,
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Double,
                border_color: overlay.border_fg,
                background_color: Color::Black,
                padding_left: 1,
                padding_right: 1,
                overflow: Overflow::Hidden,
            ) {
                #(lines.into_iter().enumerate().map(|(i, (text, color, weight))| {
                    element! {
                        Text(key: i, content: text, color, weight, wrap: TextWrap::NoWrap)
                    }
                }))
            }
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_binding() {
        let overlay = RenderedHelpOverlay::build(&ResolvedTheme::default());
        let bindings: usize = HELP_GROUPS.iter().map(|(_, rows)| rows.len()).sum();
        // Title, blank, per group: heading + rows + blank, closing hint.
        assert_eq!(overlay.lines.len(), 2 + bindings + HELP_GROUPS.len() * 2 + 1);
    }
}
