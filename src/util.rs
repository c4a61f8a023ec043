use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::FirmwareRecord;

/// Format the record's build date with a `strftime` pattern.
///
/// Falls back to the raw string when the date does not parse, so the
/// column never goes blank.
pub(crate) fn format_date(record: &FirmwareRecord, date_format: &str) -> String {
    match record.parsed_date() {
        Some(d) if !date_format.is_empty() => d.format(date_format).to_string(),
        _ => record.firmware_date.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Pad or truncate `text` to exactly `width` display columns.
///
/// Truncated text ends with `…`.
pub(crate) fn fit(text: &str, width: usize, align: Align) -> String {
    if width == 0 {
        return String::new();
    }
    let text_width = text.width();
    let body = if text_width > width {
        let mut out = String::new();
        let mut used = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('\u{2026}');
        out
    } else {
        text.to_owned()
    };
    let pad = width.saturating_sub(body.width());
    match align {
        Align::Left => format!("{body}{}", " ".repeat(pad)),
        Align::Right => format!("{}{body}", " ".repeat(pad)),
        Align::Center => {
            let left = pad / 2;
            format!("{}{body}{}", " ".repeat(left), " ".repeat(pad - left))
        }
    }
}

/// The display columns `[start, start + len)` of `text`.
///
/// A wide character straddling either edge is replaced by spaces so the
/// result is always exactly `len` columns when `text` is long enough.
pub(crate) fn slice_columns(text: &str, start: usize, len: usize) -> String {
    let end = start + len;
    let mut out = String::new();
    let mut col = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        let next = col + w;
        if next <= start {
            col = next;
            continue;
        }
        if col >= end {
            break;
        }
        if col < start || next > end {
            let visible = next.min(end) - col.max(start);
            out.push_str(&" ".repeat(visible));
        } else {
            out.push(c);
        }
        col = next;
    }
    out
}
