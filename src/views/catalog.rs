use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::actions::clipboard::{self, resolve_download_url};
use crate::catalog::Catalog;
use crate::components::footer::{Footer, FooterBuildConfig, RenderedFooter};
use crate::components::help_overlay::{HelpOverlay, RenderedHelpOverlay};
use crate::components::table::{
    Cell, Column, RenderedTable, Row, ScrollableTable, TableBuildConfig, follow_cursor,
};
use crate::components::text_input::{RenderedTextInput, TextInput};
use crate::config::types::AppConfig;
use crate::engine::{EngineHandle, Event};
use crate::fetch::FetchStatus;
use crate::filter::FilterColumn;
use crate::layout::Viewport;
use crate::notice::{NoticeLevel, Notices};
use crate::search::KeyOutcome;
use crate::sort::SortKey;
use crate::theme::ResolvedTheme;
use crate::types::FirmwareRecord;
use crate::util::{self, Align};

/// Columns scrolled per Left/Right press in constrained layout.
const H_SCROLL_STEP: u16 = 8;

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

fn column_id(column: FilterColumn) -> &'static str {
    match column {
        FilterColumn::Version => "version",
        FilterColumn::SecVersion => "sec",
        FilterColumn::Signature => "signature",
        FilterColumn::Type => "type",
    }
}

fn catalog_columns(catalog: &Catalog) -> Vec<Column> {
    let order = catalog.sort().effective();
    let sorted = |key: SortKey, header: &str| {
        if order.key == key {
            format!("{header} {}", order.direction.arrow())
        } else {
            header.to_owned()
        }
    };
    vec![
        Column {
            id: "date",
            header: sorted(SortKey::FirmwareDate, "Build Date"),
            default_width_pct: 0.0,
            align: Align::Left,
            fixed_width: Some(14),
        },
        Column {
            id: "version",
            header: "Version".to_owned(),
            default_width_pct: 0.25,
            align: Align::Left,
            fixed_width: None,
        },
        Column {
            id: "sec",
            header: sorted(SortKey::SecVersion, "Sec"),
            default_width_pct: 0.0,
            align: Align::Right,
            fixed_width: Some(8),
        },
        Column {
            id: "signature",
            header: "Signature".to_owned(),
            default_width_pct: 0.35,
            align: Align::Left,
            fixed_width: None,
        },
        Column {
            id: "type",
            header: "Type".to_owned(),
            default_width_pct: 0.0,
            align: Align::Center,
            fixed_width: Some(6),
        },
        Column {
            id: "download",
            header: "Download".to_owned(),
            default_width_pct: 0.4,
            align: Align::Left,
            fixed_width: None,
        },
    ]
}

fn record_to_row(
    record: &FirmwareRecord,
    expanded: bool,
    theme: &ResolvedTheme,
    date_format: &str,
) -> Row {
    let mut cells = HashMap::new();
    cells.insert("date", Cell::plain(util::format_date(record, date_format)));
    cells.insert("version", Cell::plain(record.firmware_version.clone()));
    cells.insert(
        "sec",
        Cell::plain(record.sec_version.clone().unwrap_or_default()),
    );
    cells.insert("signature", Cell::colored(record.signature.clone(), theme.faint));
    cells.insert("type", Cell::plain(record.file_type().unwrap_or_default()));
    cells.insert(
        "download",
        Cell::colored(record.download_url.clone().unwrap_or_default(), theme.header),
    );

    let detail = if expanded {
        let d = crate::detail::project(record);
        vec![format!("Signature: {}", d.signature), format!("MD5:       {}", d.md5)]
    } else {
        Vec::new()
    };
    Row { cells, detail }
}

/// Left/Right: scroll in constrained layout, otherwise step column focus.
fn arrow_step(
    forward: bool,
    vp: &Viewport,
    h_offset: u16,
    focused: FilterColumn,
) -> (u16, FilterColumn) {
    if vp.layout().is_constrained() {
        let offset = if forward {
            (h_offset + H_SCROLL_STEP).min(vp.max_scroll())
        } else {
            h_offset.saturating_sub(H_SCROLL_STEP)
        };
        (offset, focused)
    } else if forward {
        (h_offset, focused.next())
    } else {
        (h_offset, focused.prev())
    }
}

fn download_link(catalog: &Catalog, pos: usize, endpoint: &str) -> Result<String, String> {
    let record = catalog.row(pos).ok_or_else(|| "No release selected".to_owned())?;
    let link = record.download_url.as_deref().unwrap_or_default();
    resolve_download_url(endpoint, link)
        .ok_or_else(|| format!("No download link for {}", record.firmware_version))
}

// ---------------------------------------------------------------------------
// CatalogView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct CatalogViewProps<'a> {
    pub config: Option<&'a AppConfig>,
    /// Engine handle.
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub width: u16,
    pub height: u16,
    pub should_exit: Option<State<bool>>,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn CatalogView<'a>(props: &CatalogViewProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let default_config = AppConfig::default();
    let config = props.config.unwrap_or(&default_config);
    let theme = props.theme.cloned().unwrap_or_default();
    let should_exit = props.should_exit;
    let width = props.width;
    let endpoint = config.endpoint.url.clone();
    let units_per_cell = config.layout.cell_width_units;
    let notice_ttl = config.defaults.notice_ttl();

    let mut catalog = hooks.use_state(Catalog::new);
    let mut cursor = hooks.use_state(|| 0usize);
    let mut scroll_offset = hooks.use_state(|| 0usize);
    let mut h_offset = hooks.use_state(|| 0u16);
    let mut focused = hooks.use_state(|| FilterColumn::Version);
    let mut help_visible = hooks.use_state(|| false);
    let mut notices = hooks.use_state(move || Notices::new(notice_ttl));
    let mut viewport = hooks.use_state(move || Viewport::new(units_per_cell, width));
    let mut started = hooks.use_state(|| false);

    // Event channel: engine pushes events back to UI.
    let event_channel = hooks.use_state(|| {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        (tx, Arc::new(Mutex::new(rx)))
    });
    let (event_tx, event_rx_arc) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    // Initial retrieval, once per mount.
    if !started.get()
        && let Some(ref eng) = engine
    {
        started.set(true);
        if let Some(ticket) = catalog.write().request(config.endpoint.to_request()) {
            eng.fetch(ticket, &event_tx);
        }
    }

    // Track terminal width; a layout switch resets horizontal scroll.
    let mut vp = viewport.get();
    if let Some(layout) = vp.observe(width) {
        tracing::debug!("layout: {layout:?} at {} units", vp.width_units());
        viewport.set(vp);
        h_offset.set(0);
    } else if vp.columns() != viewport.get().columns() {
        viewport.set(vp);
    }
    if h_offset.get() > vp.max_scroll() {
        h_offset.set(vp.max_scroll());
    }

    // Event polling: drain engine replies, grant dropdown focus, age notices.
    {
        let rx_for_poll = event_rx_arc.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(Duration::from_millis(100)).await;
                let events: Vec<Event> = match rx_for_poll.lock() {
                    Ok(rx) => rx.try_iter().collect(),
                    Err(_) => Vec::new(),
                };
                for evt in events {
                    let generation = evt.generation();
                    if let Some(err) = catalog.write().apply_event(evt) {
                        tracing::warn!("catalog: generation {generation} failed: {err}");
                        notices
                            .write()
                            .raise(NoticeLevel::Error, format!("Could not load releases: {err}"));
                    }
                    let rows = catalog.read().row_count();
                    if cursor.get() >= rows {
                        cursor.set(rows.saturating_sub(1));
                    }
                }

                let focus_pending = catalog
                    .read()
                    .dropdowns()
                    .open_dropdown()
                    .is_some_and(|d| !d.has_focus());
                if focus_pending {
                    catalog.write().tick();
                }

                let mut n = notices.read().clone();
                if n.expire(Instant::now()) {
                    notices.set(n);
                }
            }
        });
    }

    // -- layout ---------------------------------------------------------------

    let search_open = catalog.read().search_open();
    let overlay_lines: u16 = if search_open { 9 } else { 0 };
    // Header + its border, footer + its border.
    let body_lines = usize::from(props.height.saturating_sub(4 + overlay_lines)).max(1);
    let date_format = config.defaults.date_format.clone();

    let rows: Vec<Row> = {
        let cat = catalog.read();
        cat.visible()
            .map(|r| record_to_row(r, cat.is_expanded(&r.signature), &theme, &date_format))
            .collect()
    };
    let total_rows = rows.len();

    let followed = follow_cursor(&rows, cursor.get(), scroll_offset.get(), body_lines);
    if followed != scroll_offset.get() {
        scroll_offset.set(followed);
    }

    // -- keyboard -------------------------------------------------------------

    let engine_kb = engine.clone();
    let event_tx_kb = event_tx.clone();
    let endpoint_kb = endpoint.clone();
    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                if help_visible.get() {
                    if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
                        help_visible.set(false);
                    }
                    return;
                }

                if catalog.read().search_open() {
                    if catalog.write().search_key(code, modifiers) == KeyOutcome::Refilter {
                        cursor.set(0);
                        scroll_offset.set(0);
                    }
                    return;
                }

                let vp = viewport.get();
                match code {
                    KeyCode::Char('q') => {
                        if let Some(mut exit) = should_exit {
                            exit.set(true);
                        }
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        if let Some(mut exit) = should_exit {
                            exit.set(true);
                        }
                    }
                    KeyCode::Char('?') => help_visible.set(true),
                    KeyCode::Esc => {
                        notices.write().dismiss();
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        if total_rows > 0 {
                            cursor.set((cursor.get() + 1).min(total_rows - 1));
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        cursor.set(cursor.get().saturating_sub(1));
                    }
                    KeyCode::Char('g') | KeyCode::Home => {
                        cursor.set(0);
                        scroll_offset.set(0);
                    }
                    KeyCode::Char('G') | KeyCode::End => {
                        cursor.set(total_rows.saturating_sub(1));
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        catalog.write().toggle_expanded(cursor.get());
                    }
                    KeyCode::Char('h') => focused.set(focused.get().prev()),
                    KeyCode::Char('l') => focused.set(focused.get().next()),
                    KeyCode::Left | KeyCode::Right => {
                        let forward = code == KeyCode::Right;
                        let (offset, column) =
                            arrow_step(forward, &vp, h_offset.get(), focused.get());
                        h_offset.set(offset);
                        focused.set(column);
                    }
                    KeyCode::Char('/') => {
                        catalog.write().open_search(focused.get());
                    }
                    KeyCode::Char('d') => {
                        catalog.write().cycle_sort(SortKey::FirmwareDate);
                        cursor.set(0);
                    }
                    KeyCode::Char('s') => {
                        catalog.write().cycle_sort(SortKey::SecVersion);
                        cursor.set(0);
                    }
                    KeyCode::Char('c') => {
                        catalog.write().clear_filters();
                        cursor.set(0);
                        scroll_offset.set(0);
                    }
                    KeyCode::Char('r') => {
                        let ticket = catalog.write().refetch();
                        if let (Some(ticket), Some(eng)) = (ticket, engine_kb.as_ref()) {
                            eng.fetch(ticket, &event_tx_kb);
                            notices.write().raise(NoticeLevel::Info, "Reloading\u{2026}");
                        }
                    }
                    KeyCode::Char('o') => {
                        let outcome = download_link(&catalog.read(), cursor.get(), &endpoint_kb)
                            .and_then(|url| clipboard::open_in_browser(&url).map(|()| url));
                        let (level, message) = match outcome {
                            Ok(url) => (NoticeLevel::Info, format!("Opened {url}")),
                            Err(e) => (NoticeLevel::Error, format!("Open failed: {e}")),
                        };
                        notices.write().raise(level, message);
                    }
                    KeyCode::Char('y') => {
                        let outcome = download_link(&catalog.read(), cursor.get(), &endpoint_kb)
                            .and_then(|url| clipboard::copy_to_clipboard(&url).map(|()| url));
                        let (level, message) = match outcome {
                            Ok(url) => (NoticeLevel::Info, format!("Copied {url}")),
                            Err(e) => (NoticeLevel::Error, format!("Copy failed: {e}")),
                        };
                        notices.write().raise(level, message);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    });

    // -- render ---------------------------------------------------------------

    let cat = catalog.read();
    let columns = catalog_columns(&cat);
    let highlighted: HashSet<&'static str> = FilterColumn::ALL
        .into_iter()
        .filter(|c| cat.filters().get(*c).active)
        .map(column_id)
        .collect();

    let empty_message = match cat.status() {
        FetchStatus::Loading => "Loading firmware releases\u{2026}",
        FetchStatus::Error(_) => "Could not load firmware releases. Press r to retry.",
        FetchStatus::Success if cat.total_count() == 0 => "The catalog is empty.",
        FetchStatus::Success => "No releases match the current filters. Press c to clear.",
    };

    let rendered_table = RenderedTable::build(&TableBuildConfig {
        columns: &columns,
        rows: &rows,
        cursor: cursor.get(),
        scroll_offset: followed,
        body_lines,
        table_width: vp.table_cells(),
        viewport_width: width,
        h_offset: h_offset.get().min(vp.max_scroll()),
        highlighted: &highlighted,
        focused: Some(column_id(focused.get())),
        theme: &theme,
        empty_message: Some(empty_message),
    });

    let rendered_text_input = cat
        .dropdowns()
        .open_dropdown()
        .and_then(|d| RenderedTextInput::build(d, cat.facets(), &theme));

    let notice_snapshot = notices.read().clone();
    let rendered_footer = RenderedFooter::build(FooterBuildConfig {
        shown: cat.row_count(),
        total: cat.total_count(),
        filter_summary: cat.filters().summary(),
        sort: cat.sort(),
        status: cat.status(),
        notice: notice_snapshot.current(),
        theme: &theme,
    });

    let rendered_help = help_visible
        .get()
        .then(|| RenderedHelpOverlay::build(&theme));

    let view_width = u32::from(width);
    let view_height = u32::from(props.height);

    element! {
        View(flex_direction: FlexDirection::Column, width: view_width, height: view_height) {
            View(flex_grow: 1.0, flex_direction: FlexDirection::Column, overflow: Overflow::Hidden) {
                ScrollableTable(table: rendered_table)
            }
            TextInput(input: rendered_text_input)
            Footer(footer: rendered_footer)
            HelpOverlay(overlay: rendered_help, width, height: props.height)
        }
    }
    .into_any()
}
