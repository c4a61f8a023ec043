use iocraft::prelude::*;

use crate::facets::FacetSet;
use crate::search::{Dropdown, SearchDropdown};
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Pre-rendered search input
// ---------------------------------------------------------------------------

/// Most suggestions listed under the input at once.
const MAX_SUGGESTIONS: usize = 6;

pub struct RenderedTextInput {
    pub prompt: String,
    pub text: String,
    pub hint: String,
    pub text_fg: Color,
    pub prompt_fg: Color,
    pub hint_fg: Color,
    pub border_fg: Color,
    pub suggestions: Vec<RenderedSuggestion>,
}

pub struct RenderedSuggestion {
    pub text: String,
    pub is_selected: bool,
    pub fg: Color,
    pub selected_fg: Color,
}

impl RenderedTextInput {
    /// Render an open dropdown. Returns `None` when it is closed.
    pub fn build(
        dropdown: &SearchDropdown,
        facets: &FacetSet,
        theme: &ResolvedTheme,
    ) -> Option<Self> {
        let Dropdown::Open {
            draft, highlighted, ..
        } = dropdown.state()
        else {
            return None;
        };

        let suggestions = dropdown.suggestions(facets);
        // Keep the highlighted entry inside the visible slice.
        let first = highlighted.map_or(0, |h| (h + 1).saturating_sub(MAX_SUGGESTIONS));
        let rendered_suggestions = suggestions
            .into_iter()
            .enumerate()
            .skip(first)
            .take(MAX_SUGGESTIONS)
            .map(|(i, text)| RenderedSuggestion {
                text,
                is_selected: *highlighted == Some(i),
                fg: theme.text,
                selected_fg: theme.header,
            })
            .collect();

        let text = if dropdown.has_focus() {
            format!("{draft}\u{2588}")
        } else {
            draft.clone()
        };

        Some(Self {
            prompt: format!("Search {}:", dropdown.column().label()),
            text,
            hint: "Enter search \u{2022} Ctrl-R reset \u{2022} Esc close".to_owned(),
            text_fg: theme.text,
            prompt_fg: theme.header,
            hint_fg: theme.faint,
            border_fg: theme.border,
            suggestions: rendered_suggestions,
        })
    }
}

// ---------------------------------------------------------------------------
// TextInput component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct TextInputProps {
    pub input: Option<RenderedTextInput>,
}

#[component]
pub fn TextInput(props: &mut TextInputProps) -> impl Into<AnyElement<'static>> {
    let Some(input) = props.input.take() else {
        return element! { View }.into_any();
    };

    let suggestion_elements: Vec<_> = input
        .suggestions
        .iter()
        .map(|s| {
            let color = if s.is_selected { s.selected_fg } else { s.fg };
            let prefix = if s.is_selected { "> " } else { "  " };
            (format!("{prefix}{}", s.text), color)
        })
        .collect();

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: input.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: input.prompt, color: input.prompt_fg, wrap: TextWrap::NoWrap)
                Text(content: " ", color: input.text_fg)
                View(flex_grow: 1.0) {
                    Text(content: input.text, color: input.text_fg, wrap: TextWrap::NoWrap)
                }
                Text(content: input.hint, color: input.hint_fg, wrap: TextWrap::NoWrap)
            }
            #(suggestion_elements.into_iter().enumerate().map(|(i, (text, fg))| {
                element! {
                    Text(key: i, content: text, color: fg, wrap: TextWrap::NoWrap)
                }
            }))
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iocraft::prelude::{KeyCode, KeyModifiers};

    use crate::filter::{FilterColumn, FilterState};

    fn facets() -> FacetSet {
        FacetSet {
            sec_versions: vec![],
            types: (0..10).map(|i| format!("t{i}")).collect(),
        }
    }

    #[test]
    fn closed_dropdown_renders_nothing() {
        let d = SearchDropdown::new(FilterColumn::Type);
        assert!(RenderedTextInput::build(&d, &facets(), &ResolvedTheme::default()).is_none());
    }

    #[test]
    fn cursor_only_after_focus() {
        let mut filters = FilterState::default();
        filters.commit(FilterColumn::Version, "1.2");
        let mut d = SearchDropdown::new(FilterColumn::Version);
        d.open(&filters);
        let theme = ResolvedTheme::default();

        let before = RenderedTextInput::build(&d, &facets(), &theme).unwrap();
        assert_eq!(before.text, "1.2");
        assert_eq!(before.prompt, "Search Version:");
        d.tick();
        let after = RenderedTextInput::build(&d, &facets(), &theme).unwrap();
        assert_eq!(after.text, "1.2\u{2588}");
    }

    #[test]
    fn highlighted_suggestion_stays_visible() {
        let mut filters = FilterState::default();
        let f = facets();
        let mut d = SearchDropdown::new(FilterColumn::Type);
        d.open(&filters);
        d.tick();
        for _ in 0..8 {
            d.on_key(KeyCode::Down, KeyModifiers::NONE, &f, &mut filters);
        }
        let input = RenderedTextInput::build(&d, &f, &ResolvedTheme::default()).unwrap();
        assert_eq!(input.suggestions.len(), MAX_SUGGESTIONS);
        let selected: Vec<_> = input
            .suggestions
            .iter()
            .filter(|s| s.is_selected)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(selected, vec!["t7"]);
    }
}
