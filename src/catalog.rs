use iocraft::prelude::{KeyCode, KeyModifiers};

use crate::detail::{self, ExpandedRows, RowDetail};
use crate::engine::Event;
use crate::facets::{FacetSet, facets};
use crate::fetch::{DatasetFetcher, FetchRequest, FetchStatus, FetchTicket, Resolution};
use crate::filter::{FilterColumn, FilterState};
use crate::search::{DropdownSet, KeyOutcome};
use crate::sort::{SortKey, SortState, sort_indices};
use crate::types::{FetchError, FirmwareRecord};

/// All interactive state of one catalog table.
///
/// Facets and the visible row set are derived here and nowhere else, so
/// they are always consistent with the dataset currently held.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fetcher: DatasetFetcher,
    facets: FacetSet,
    filters: FilterState,
    sort: SortState,
    dropdowns: DropdownSet,
    expanded: ExpandedRows,
    /// Dataset indices after filtering and sorting.
    rows: Vec<usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // -- fetching -----------------------------------------------------------

    pub fn request(&mut self, request: FetchRequest) -> Option<FetchTicket> {
        self.fetcher.request(request)
    }

    pub fn refetch(&mut self) -> Option<FetchTicket> {
        self.fetcher.refetch()
    }

    /// Feed an engine reply. Returns the error to report if the reply was a
    /// failure for the current request.
    pub fn apply_event(&mut self, event: Event) -> Option<FetchError> {
        let (generation, outcome) = event.into_outcome();
        let error = outcome.as_ref().err().cloned();
        match self.fetcher.resolve(generation, outcome) {
            Resolution::Applied => {
                self.install_dataset();
                error
            }
            Resolution::Stale => None,
        }
    }

    fn install_dataset(&mut self) {
        let data = self.fetcher.data();
        self.facets = facets(data.records());
        self.expanded.retain_known(data);
        self.refresh_rows();
    }

    fn refresh_rows(&mut self) {
        let records = self.fetcher.data().records();
        let mut rows = self.filters.apply(records);
        sort_indices(records, &mut rows, self.sort.effective());
        self.rows = rows;
    }

    pub fn status(&self) -> &FetchStatus {
        self.fetcher.status()
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn generation(&self) -> u64 {
        self.fetcher.generation()
    }

    // -- rows ---------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_count(&self) -> usize {
        self.fetcher.data().len()
    }

    pub fn row(&self, pos: usize) -> Option<&FirmwareRecord> {
        self.rows.get(pos).and_then(|&i| self.fetcher.data().get(i))
    }

    pub fn visible(&self) -> impl Iterator<Item = &FirmwareRecord> + '_ {
        self.rows
            .iter()
            .filter_map(|&i| self.fetcher.data().get(i))
    }

    pub fn facets(&self) -> &FacetSet {
        &self.facets
    }

    // -- filtering ----------------------------------------------------------

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn dropdowns(&self) -> &DropdownSet {
        &self.dropdowns
    }

    pub fn search_open(&self) -> bool {
        self.dropdowns.open_dropdown().is_some()
    }

    pub fn open_search(&mut self, column: FilterColumn) {
        self.dropdowns.open(column, &self.filters);
    }

    /// Deliver the deferred focus of a freshly opened dropdown.
    pub fn tick(&mut self) -> bool {
        self.dropdowns.tick()
    }

    /// Route a key to the open dropdown, re-filtering if it committed or
    /// reset.
    pub fn search_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        let Some(dropdown) = self.dropdowns.open_dropdown_mut() else {
            return KeyOutcome::Ignored;
        };
        let outcome = dropdown.on_key(code, modifiers, &self.facets, &mut self.filters);
        if outcome == KeyOutcome::Refilter {
            self.refresh_rows();
        }
        outcome
    }

    /// Set a column query directly (non-interactive callers).
    pub fn set_filter(&mut self, column: FilterColumn, query: &str) {
        self.filters.commit(column, query);
        self.refresh_rows();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.refresh_rows();
    }

    // -- sorting ------------------------------------------------------------

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn cycle_sort(&mut self, key: SortKey) {
        self.sort.cycle(key);
        self.refresh_rows();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.refresh_rows();
    }

    // -- expansion ----------------------------------------------------------

    /// Toggle the detail row under visible row `pos`.
    pub fn toggle_expanded(&mut self, pos: usize) -> Option<bool> {
        let signature = self.row(pos)?.signature.clone();
        Some(self.expanded.toggle(&signature))
    }

    pub fn is_expanded(&self, signature: &str) -> bool {
        self.expanded.is_expanded(signature)
    }

    pub fn detail(&self, pos: usize) -> Option<RowDetail> {
        self.row(pos).map(detail::project)
    }
}
