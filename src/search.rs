use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::facets::FacetSet;
use crate::filter::{FilterColumn, FilterState};

// ---------------------------------------------------------------------------
// Dropdown state machine
// ---------------------------------------------------------------------------

/// Whether the text field of an open dropdown has received input focus yet.
///
/// Focus is requested on open and granted on the following tick, once the
/// input has been mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Pending,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Closed,
    Open {
        draft: String,
        focus: Focus,
        /// Index into the current suggestion list.
        highlighted: Option<usize>,
    },
}

/// What a key press did to the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Filter state changed; the row set must be recomputed.
    Refilter,
    /// Dropdown closed without touching filter state.
    Closed,
    /// Draft or highlight changed.
    Edited,
    /// Key not handled.
    Ignored,
}

/// Search control for a single column. Owns no data; its only side effect
/// is writing the column's entry in a `FilterState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDropdown {
    column: FilterColumn,
    state: Dropdown,
}

impl SearchDropdown {
    pub fn new(column: FilterColumn) -> Self {
        Self {
            column,
            state: Dropdown::Closed,
        }
    }

    pub fn column(&self) -> FilterColumn {
        self.column
    }

    pub fn state(&self) -> &Dropdown {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, Dropdown::Open { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            Dropdown::Open { draft, .. } => Some(draft),
            Dropdown::Closed => None,
        }
    }

    pub fn has_focus(&self) -> bool {
        matches!(
            self.state,
            Dropdown::Open {
                focus: Focus::Ready,
                ..
            }
        )
    }

    /// Open the control, seeding the draft with the committed query.
    pub fn open(&mut self, filters: &FilterState) {
        if self.is_open() {
            return;
        }
        self.state = Dropdown::Open {
            draft: filters.query(self.column).unwrap_or_default().to_owned(),
            focus: Focus::Pending,
            highlighted: None,
        };
    }

    /// Grant any pending focus request. Returns true if focus was applied.
    pub fn tick(&mut self) -> bool {
        if let Dropdown::Open { focus, .. } = &mut self.state
            && *focus == Focus::Pending
        {
            *focus = Focus::Ready;
            return true;
        }
        false
    }

    /// Close and store the draft as the column's query.
    pub fn commit(&mut self, filters: &mut FilterState) -> bool {
        let Dropdown::Open { draft, .. } = std::mem::replace(&mut self.state, Dropdown::Closed)
        else {
            return false;
        };
        filters.commit(self.column, &draft);
        tracing::debug!("search: commit {:?} = {draft:?}", self.column);
        true
    }

    /// Close and clear the column's query.
    pub fn reset(&mut self, filters: &mut FilterState) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = Dropdown::Closed;
        filters.reset(self.column);
        tracing::debug!("search: reset {:?}", self.column);
        true
    }

    /// Close without changing the committed query.
    pub fn cancel(&mut self) {
        self.state = Dropdown::Closed;
    }

    /// Facet values offered for this column, narrowed by the draft.
    pub fn suggestions(&self, facets: &FacetSet) -> Vec<String> {
        let candidates: &[String] = match self.column {
            FilterColumn::SecVersion => &facets.sec_versions,
            FilterColumn::Type => &facets.types,
            FilterColumn::Version | FilterColumn::Signature => &[],
        };
        filter_suggestions(candidates, self.draft().unwrap_or_default())
    }

    /// Route a key press while open.
    pub fn on_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        facets: &FacetSet,
        filters: &mut FilterState,
    ) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        let suggestions = self.suggestions(facets);
        let focused = self.has_focus();
        let Dropdown::Open {
            draft, highlighted, ..
        } = &mut self.state
        else {
            return KeyOutcome::Ignored;
        };

        match code {
            KeyCode::Esc => {
                self.cancel();
                KeyOutcome::Closed
            }
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset(filters);
                KeyOutcome::Refilter
            }
            KeyCode::Enter if !draft.is_empty() => {
                self.commit(filters);
                KeyOutcome::Refilter
            }
            KeyCode::Down if !suggestions.is_empty() => {
                *highlighted = Some(highlighted.map_or(0, |i| (i + 1) % suggestions.len()));
                KeyOutcome::Edited
            }
            KeyCode::Up if !suggestions.is_empty() => {
                let last = suggestions.len() - 1;
                *highlighted = Some(highlighted.map_or(last, |i| i.checked_sub(1).unwrap_or(last)));
                KeyOutcome::Edited
            }
            KeyCode::Tab => {
                let pick = highlighted.unwrap_or(0);
                if let Some(s) = suggestions.get(pick) {
                    draft.clone_from(s);
                    *highlighted = None;
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Backspace if focused => {
                draft.pop();
                *highlighted = None;
                KeyOutcome::Edited
            }
            KeyCode::Char(c) if focused && !modifiers.contains(KeyModifiers::CONTROL) => {
                draft.push(c);
                *highlighted = None;
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Case-insensitive substring narrowing of suggestion candidates.
pub(crate) fn filter_suggestions(candidates: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return candidates.to_vec();
    }
    let lower = query.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().contains(&lower))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// One dropdown per column
// ---------------------------------------------------------------------------

/// The table's dropdowns. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownSet {
    dropdowns: [SearchDropdown; 4],
}

impl Default for DropdownSet {
    fn default() -> Self {
        Self {
            dropdowns: FilterColumn::ALL.map(SearchDropdown::new),
        }
    }
}

impl DropdownSet {
    pub fn get(&self, column: FilterColumn) -> &SearchDropdown {
        &self.dropdowns[column.index()]
    }

    pub fn get_mut(&mut self, column: FilterColumn) -> &mut SearchDropdown {
        &mut self.dropdowns[column.index()]
    }

    /// Open `column`'s dropdown, cancelling whichever other one is open.
    pub fn open(&mut self, column: FilterColumn, filters: &FilterState) {
        for d in &mut self.dropdowns {
            if d.column() != column {
                d.cancel();
            }
        }
        self.get_mut(column).open(filters);
    }

    pub fn open_dropdown(&self) -> Option<&SearchDropdown> {
        self.dropdowns.iter().find(|d| d.is_open())
    }

    pub fn open_dropdown_mut(&mut self) -> Option<&mut SearchDropdown> {
        self.dropdowns.iter_mut().find(|d| d.is_open())
    }

    pub fn tick(&mut self) -> bool {
        self.open_dropdown_mut().is_some_and(SearchDropdown::tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_focused(column: FilterColumn, filters: &FilterState) -> SearchDropdown {
        let mut d = SearchDropdown::new(column);
        d.open(filters);
        d.tick();
        d
    }

    fn type_text(d: &mut SearchDropdown, text: &str, filters: &mut FilterState) {
        for c in text.chars() {
            d.on_key(KeyCode::Char(c), KeyModifiers::NONE, &FacetSet::default(), filters);
        }
    }

    #[test]
    fn focus_is_deferred_one_tick() {
        let mut filters = FilterState::default();
        let mut d = SearchDropdown::new(FilterColumn::Version);
        d.open(&filters);
        assert!(!d.has_focus());
        assert_eq!(
            d.on_key(KeyCode::Char('x'), KeyModifiers::NONE, &FacetSet::default(), &mut filters),
            KeyOutcome::Ignored
        );
        assert!(d.tick());
        assert!(d.has_focus());
        assert!(!d.tick());
    }

    #[test]
    fn commit_stores_query_and_closes() {
        let mut filters = FilterState::default();
        let mut d = open_focused(FilterColumn::Version, &filters);
        type_text(&mut d, "1.2", &mut filters);
        assert!(d.commit(&mut filters));
        assert!(!d.is_open());
        assert_eq!(filters.query(FilterColumn::Version), Some("1.2"));
        assert!(filters.get(FilterColumn::Version).active);
    }

    #[test]
    fn enter_with_draft_equals_commit() {
        let mut filters = FilterState::default();
        let mut d = open_focused(FilterColumn::Signature, &filters);
        type_text(&mut d, "abc", &mut filters);
        let outcome = d.on_key(KeyCode::Enter, KeyModifiers::NONE, &FacetSet::default(), &mut filters);
        assert_eq!(outcome, KeyOutcome::Refilter);
        assert!(!d.is_open());
        assert_eq!(filters.query(FilterColumn::Signature), Some("abc"));
    }

    #[test]
    fn enter_with_empty_draft_stays_open() {
        let mut filters = FilterState::default();
        let mut d = open_focused(FilterColumn::Signature, &filters);
        let outcome = d.on_key(KeyCode::Enter, KeyModifiers::NONE, &FacetSet::default(), &mut filters);
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(d.is_open());
    }

    #[test]
    fn reset_clears_query() {
        let mut filters = FilterState::default();
        filters.commit(FilterColumn::Type, "bin");
        let mut d = open_focused(FilterColumn::Type, &filters);
        assert_eq!(d.draft(), Some("bin"));
        assert!(d.reset(&mut filters));
        assert!(!d.is_open());
        assert_eq!(filters.query(FilterColumn::Type), None);
        assert!(!d.reset(&mut filters), "reset when closed is a no-op");
    }

    #[test]
    fn escape_cancels_without_touching_filters() {
        let mut filters = FilterState::default();
        filters.commit(FilterColumn::Version, "2");
        let mut d = open_focused(FilterColumn::Version, &filters);
        type_text(&mut d, "99", &mut filters);
        let outcome = d.on_key(KeyCode::Esc, KeyModifiers::NONE, &FacetSet::default(), &mut filters);
        assert_eq!(outcome, KeyOutcome::Closed);
        assert_eq!(filters.query(FilterColumn::Version), Some("2"));
    }

    #[test]
    fn ctrl_r_resets() {
        let mut filters = FilterState::default();
        filters.commit(FilterColumn::Version, "2");
        let mut d = open_focused(FilterColumn::Version, &filters);
        let outcome = d.on_key(
            KeyCode::Char('r'),
            KeyModifiers::CONTROL,
            &FacetSet::default(),
            &mut filters,
        );
        assert_eq!(outcome, KeyOutcome::Refilter);
        assert_eq!(filters.query(FilterColumn::Version), None);
    }

    #[test]
    fn tab_completes_from_facets() {
        let facets = FacetSet {
            sec_versions: vec!["20".to_owned(), "12".to_owned(), "2".to_owned()],
            types: vec!["bin".to_owned(), "zip".to_owned()],
        };
        let mut filters = FilterState::default();
        let mut d = open_focused(FilterColumn::Type, &filters);
        d.on_key(KeyCode::Char('z'), KeyModifiers::NONE, &facets, &mut filters);
        assert_eq!(d.suggestions(&facets), vec!["zip"]);
        d.on_key(KeyCode::Tab, KeyModifiers::NONE, &facets, &mut filters);
        assert_eq!(d.draft(), Some("zip"));

        let mut s = open_focused(FilterColumn::SecVersion, &filters);
        s.on_key(KeyCode::Down, KeyModifiers::NONE, &facets, &mut filters);
        s.on_key(KeyCode::Down, KeyModifiers::NONE, &facets, &mut filters);
        s.on_key(KeyCode::Tab, KeyModifiers::NONE, &facets, &mut filters);
        assert_eq!(s.draft(), Some("12"));
    }

    #[test]
    fn text_columns_have_no_suggestions() {
        let facets = FacetSet {
            sec_versions: vec!["1".to_owned()],
            types: vec!["bin".to_owned()],
        };
        let d = open_focused(FilterColumn::Version, &FilterState::default());
        assert!(d.suggestions(&facets).is_empty());
    }

    #[test]
    fn set_keeps_one_open() {
        let filters = FilterState::default();
        let mut set = DropdownSet::default();
        set.open(FilterColumn::Version, &filters);
        set.open(FilterColumn::Type, &filters);
        assert!(!set.get(FilterColumn::Version).is_open());
        assert_eq!(
            set.open_dropdown().map(SearchDropdown::column),
            Some(FilterColumn::Type)
        );
        assert!(set.tick());
        assert!(set.get(FilterColumn::Type).has_focus());
    }

    #[test]
    fn suggestion_filter_is_case_insensitive() {
        let candidates = vec!["BIN".to_owned(), "zip".to_owned()];
        assert_eq!(filter_suggestions(&candidates, "bi"), vec!["BIN"]);
        assert_eq!(filter_suggestions(&candidates, "").len(), 2);
    }
}
