use iocraft::prelude::*;

use crate::fetch::FetchStatus;
use crate::notice::{Notice, NoticeLevel};
use crate::sort::SortState;
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Footer component: structured status bar
// ---------------------------------------------------------------------------

pub struct RenderedFooter {
    pub counts_text: String,
    pub filter_text: String,
    pub sort_text: String,
    /// Loading indicator, fetch error or transient notice.
    pub status_text: String,
    pub status_fg: Color,
    pub help_hint: String,
    pub text_fg: Color,
    pub filter_fg: Color,
    pub border_fg: Color,
    pub separator_fg: Color,
}

/// Inputs for [`RenderedFooter::build`].
pub struct FooterBuildConfig<'a> {
    pub shown: usize,
    pub total: usize,
    pub filter_summary: String,
    pub sort: SortState,
    pub status: &'a FetchStatus,
    pub notice: Option<&'a Notice>,
    pub theme: &'a ResolvedTheme,
}

impl RenderedFooter {
    pub fn build(cfg: FooterBuildConfig<'_>) -> Self {
        let theme = cfg.theme;
        let (status_text, status_fg) = match (cfg.notice, cfg.status) {
            (Some(n), _) => {
                let fg = match n.level {
                    NoticeLevel::Error => theme.error,
                    NoticeLevel::Info => theme.text,
                };
                (n.message.clone(), fg)
            }
            (None, FetchStatus::Loading) => ("Loading\u{2026}".to_owned(), theme.faint),
            (None, FetchStatus::Error(e)) => (format!("Error: {e}"), theme.error),
            (None, FetchStatus::Success) => (String::new(), theme.text),
        };

        Self {
            counts_text: format_counts(cfg.shown, cfg.total),
            filter_text: cfg.filter_summary,
            sort_text: format_sort(cfg.sort),
            status_text,
            status_fg,
            help_hint: "? help".to_owned(),
            text_fg: theme.faint,
            filter_fg: theme.active_filter,
            border_fg: theme.border,
            separator_fg: theme.faint,
        }
    }
}

/// "12 releases" when unfiltered, "3/12 releases" otherwise.
pub fn format_counts(shown: usize, total: usize) -> String {
    let noun = if total == 1 { "release" } else { "releases" };
    if shown == total {
        format!("{total} {noun}")
    } else {
        format!("{shown}/{total} {noun}")
    }
}

/// Sort label with direction arrow; marks the built-in default.
pub fn format_sort(sort: SortState) -> String {
    let order = sort.effective();
    let label = format!("{} {}", order.key.label(), order.direction.arrow());
    if sort.user().is_some() {
        label
    } else {
        format!("{label} (default)")
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let sep = || MixedTextContent::new("  \u{2022}  ").color(f.separator_fg);
    let mut context_contents = vec![MixedTextContent::new(&f.counts_text).color(f.text_fg)];
    if !f.filter_text.is_empty() {
        context_contents.push(sep());
        context_contents.push(MixedTextContent::new(&f.filter_text).color(f.filter_fg));
    }
    context_contents.push(sep());
    context_contents.push(MixedTextContent::new(&f.sort_text).color(f.text_fg));
    if !f.status_text.is_empty() {
        context_contents.push(sep());
        context_contents.push(MixedTextContent::new(&f.status_text).color(f.status_fg));
    }

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_grow: 1.0) {
                MixedText(contents: context_contents, wrap: TextWrap::NoWrap)
            }
            Text(content: " \u{2502} ", color: f.separator_fg, wrap: TextWrap::NoWrap)
            Text(content: f.help_hint.clone(), color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortKey;
    use crate::types::FetchError;

    #[test]
    fn counts_show_fraction_only_when_filtered() {
        assert_eq!(format_counts(12, 12), "12 releases");
        assert_eq!(format_counts(3, 12), "3/12 releases");
        assert_eq!(format_counts(1, 1), "1 release");
    }

    #[test]
    fn sort_label_marks_default() {
        let mut s = SortState::default();
        assert!(format_sort(s).ends_with("(default)"));
        s.cycle(SortKey::SecVersion);
        assert!(!format_sort(s).contains("default"));
        assert!(format_sort(s).starts_with(SortKey::SecVersion.label()));
    }

    #[test]
    fn fetch_error_shows_in_status() {
        let theme = ResolvedTheme::default();
        let status = FetchStatus::Error(FetchError::Status(500));
        let footer = RenderedFooter::build(FooterBuildConfig {
            shown: 0,
            total: 0,
            filter_summary: String::new(),
            sort: SortState::default(),
            status: &status,
            notice: None,
            theme: &theme,
        });
        assert!(footer.status_text.contains("500"));
        assert_eq!(footer.status_fg, theme.error);
    }
}
