use std::collections::{HashMap, HashSet};

use iocraft::prelude::*;

use crate::theme::ResolvedTheme;
use crate::util::{self, Align};

// ---------------------------------------------------------------------------
// Column definition
// ---------------------------------------------------------------------------

/// Defines a column in the table.
#[derive(Debug, Clone)]
pub struct Column {
    /// Unique identifier (e.g., "date", "version", "download").
    pub id: &'static str,
    /// Display header text.
    pub header: String,
    /// Share of the width left after fixed columns (0.0..1.0).
    pub default_width_pct: f32,
    pub align: Align,
    /// Exact width in cells; overrides the percentage.
    pub fixed_width: Option<u16>,
}

/// A single cell value to display.
#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub color: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }
}

/// A complete row of cells indexed by column id, plus the detail lines shown
/// under it when expanded.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub cells: HashMap<&'static str, Cell>,
    pub detail: Vec<String>,
}

impl Row {
    /// Screen lines this row occupies.
    pub fn height(&self) -> usize {
        1 + self.detail.len()
    }
}

// ---------------------------------------------------------------------------
// Pre-rendered table data (all owned)
// ---------------------------------------------------------------------------

/// Pre-render table data into fully owned structures that can be passed
/// into the `element!` macro without lifetime issues.
pub struct RenderedTable {
    pub header: RenderedLine,
    pub lines: Vec<RenderedLine>,
    pub width: u32,
    pub border_fg: Color,
    /// Message to display when there are no rows.
    pub empty_message: Option<String>,
    pub empty_fg: Color,
}

pub struct RenderedLine {
    pub key: String,
    pub bg: Option<Color>,
    pub segments: Vec<RenderedSegment>,
}

pub struct RenderedSegment {
    pub text: String,
    pub fg: Color,
    pub weight: Weight,
}

/// Configuration for building a `RenderedTable`.
pub struct TableBuildConfig<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Row],
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Screen lines available for the body.
    pub body_lines: usize,
    /// Width the columns are laid out across.
    pub table_width: u16,
    /// Width actually shown; less than `table_width` when scrolling.
    pub viewport_width: u16,
    pub h_offset: u16,
    /// Column ids rendered with the active-filter colour.
    pub highlighted: &'a HashSet<&'static str>,
    /// Column id with keyboard focus for search.
    pub focused: Option<&'static str>,
    pub theme: &'a ResolvedTheme,
    pub empty_message: Option<&'a str>,
}

impl RenderedTable {
    pub fn build(cfg: &TableBuildConfig<'_>) -> Self {
        let theme = cfg.theme;
        let widths = compute_column_widths(cfg.columns, cfg.table_width);
        let window = (usize::from(cfg.h_offset), usize::from(cfg.viewport_width));

        let header_cells: Vec<(String, Color, Weight)> = cfg
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| {
                let label = if cfg.focused == Some(col.id) {
                    format!("[{}]", col.header)
                } else {
                    col.header.clone()
                };
                let fg = if cfg.highlighted.contains(col.id) {
                    theme.active_filter
                } else {
                    theme.header
                };
                (util::fit(&label, usize::from(w), col.align), fg, Weight::Bold)
            })
            .collect();
        let header = RenderedLine {
            key: "header".to_owned(),
            bg: None,
            segments: clip_segments(header_cells, window),
        };

        let mut lines = Vec::new();
        let mut budget = cfg.body_lines;
        for (i, row) in cfg.rows.iter().enumerate().skip(cfg.scroll_offset) {
            if budget == 0 {
                break;
            }
            let selected = i == cfg.cursor;
            let bg = selected.then_some(theme.selected_bg);
            let cells: Vec<(String, Color, Weight)> = cfg
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| {
                    let cell = row.cells.get(col.id);
                    let text = cell.map_or("", |c| c.text.as_str());
                    let fg = cell.and_then(|c| c.color).unwrap_or(theme.text);
                    let weight = if cell.is_some_and(|c| c.bold) {
                        Weight::Bold
                    } else {
                        Weight::Normal
                    };
                    (util::fit(text, usize::from(w), col.align), fg, weight)
                })
                .collect();
            lines.push(RenderedLine {
                key: format!("row-{i}"),
                bg,
                segments: clip_segments(cells, window),
            });
            budget -= 1;

            for (d, text) in row.detail.iter().enumerate() {
                if budget == 0 {
                    break;
                }
                let padded = util::fit(
                    &format!("    {text}"),
                    usize::from(cfg.table_width),
                    Align::Left,
                );
                let segment = vec![(padded, theme.faint, Weight::Normal)];
                lines.push(RenderedLine {
                    key: format!("row-{i}-detail-{d}"),
                    bg,
                    segments: clip_segments(segment, window),
                });
                budget -= 1;
            }
        }

        let empty_message = if cfg.rows.is_empty() {
            cfg.empty_message.map(String::from)
        } else {
            None
        };

        Self {
            header,
            lines,
            width: u32::from(cfg.viewport_width),
            border_fg: theme.border,
            empty_message,
            empty_fg: theme.faint,
        }
    }
}

/// Keep only the display columns inside `(start, len)` of a line made of
/// consecutive fixed-width segments.
fn clip_segments(
    segments: Vec<(String, Color, Weight)>,
    (start, len): (usize, usize),
) -> Vec<RenderedSegment> {
    let end = start + len;
    let mut x = 0;
    let mut out = Vec::new();
    for (text, fg, weight) in segments {
        let w = unicode_width::UnicodeWidthStr::width(text.as_str());
        let (seg_start, seg_end) = (x, x + w);
        x = seg_end;
        if seg_end <= start || seg_start >= end {
            continue;
        }
        let from = start.saturating_sub(seg_start);
        let to = end.min(seg_end) - seg_start;
        out.push(RenderedSegment {
            text: util::slice_columns(&text, from, to - from),
            fg,
            weight,
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Scrolling
// ---------------------------------------------------------------------------

/// Smallest change to `scroll_offset` that keeps the cursor row (and its
/// detail lines) on screen.
pub fn follow_cursor(rows: &[Row], cursor: usize, scroll_offset: usize, body_lines: usize) -> usize {
    if rows.is_empty() {
        return 0;
    }
    let cursor = cursor.min(rows.len() - 1);
    let mut offset = scroll_offset.min(cursor);
    let lines_through_cursor =
        |from: usize| -> usize { rows[from..=cursor].iter().map(Row::height).sum() };
    while offset < cursor && lines_through_cursor(offset) > body_lines.max(1) {
        offset += 1;
    }
    offset
}

// ---------------------------------------------------------------------------
// ScrollableTable component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ScrollableTableProps {
    /// Pre-rendered table data.
    pub table: Option<RenderedTable>,
}

#[component]
pub fn ScrollableTable(props: &mut ScrollableTableProps) -> impl Into<AnyElement<'static>> {
    let Some(table) = props.table.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(flex_direction: FlexDirection::Column, width: table.width) {
            View(
                border_style: BorderStyle::Single,
                border_edges: Edges::Bottom,
                border_color: table.border_fg,
            ) {
                #(table.header.segments.into_iter().enumerate().map(|(i, seg)| {
                    element! {
                        Text(key: i, content: seg.text, color: seg.fg, weight: seg.weight, wrap: TextWrap::NoWrap)
                    }
                }))
            }

            #(table.empty_message.into_iter().map(|msg| {
                element! {
                    View(padding_top: 1, padding_left: 2) {
                        Text(content: msg, color: table.empty_fg)
                    }
                }
            }))
            #(table.lines.into_iter().map(|line| {
                element! {
                    View(key: line.key, background_color: line.bg) {
                        #(line.segments.into_iter().enumerate().map(|(ci, seg)| {
                            element! {
                                Text(key: ci, content: seg.text, color: seg.fg, weight: seg.weight, wrap: TextWrap::NoWrap)
                            }
                        }))
                    }
                }
            }))
        }
    }
    .into_any()
}

// ---------------------------------------------------------------------------
// Column width computation
// ---------------------------------------------------------------------------

fn compute_column_widths(columns: &[Column], total: u16) -> Vec<u16> {
    let fixed_total: u16 = columns.iter().filter_map(|c| c.fixed_width).sum();
    let remaining = total.saturating_sub(fixed_total);

    let flex_pct_sum: f32 = columns
        .iter()
        .filter(|c| c.fixed_width.is_none())
        .map(|c| c.default_width_pct)
        .sum();

    columns
        .iter()
        .map(|col| {
            if let Some(w) = col.fixed_width {
                return w;
            }
            let ratio = if flex_pct_sum > 0.0 {
                col.default_width_pct / flex_pct_sum
            } else {
                #[allow(clippy::cast_precision_loss)]
                {
                    1.0 / columns.len() as f32
                }
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let w = (f32::from(remaining) * ratio).floor() as u16;
            w.max(1)
        })
        .collect()
}
