use crate::catalog::Catalog;
use crate::util::{self, Align};

/// Plain-text rendering of the visible rows, for the `list` subcommand.
///
/// Columns are tab-free and padded so the output lines up in a terminal;
/// the download link is printed unpadded at the end of each line.
pub fn format_rows(catalog: &Catalog, date_format: &str) -> Vec<String> {
    let rows: Vec<[String; 5]> = catalog
        .visible()
        .map(|r| {
            [
                util::format_date(r, date_format),
                r.firmware_version.clone(),
                r.sec_version.clone().unwrap_or_default(),
                r.file_type().unwrap_or_default().to_owned(),
                r.download_url.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let header = [
        "DATE".to_owned(),
        "VERSION".to_owned(),
        "SEC".to_owned(),
        "TYPE".to_owned(),
        "DOWNLOAD".to_owned(),
    ];
    let mut widths = [0usize; 4];
    for row in std::iter::once(&header).chain(&rows) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(unicode_width::UnicodeWidthStr::width(cell.as_str()));
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            let aligns = [Align::Left, Align::Left, Align::Right, Align::Left];
            let mut line: Vec<String> = row[..4]
                .iter()
                .zip(widths)
                .zip(aligns)
                .map(|((cell, w), align)| util::fit(cell, w, align))
                .collect();
            line.push(row[4].clone());
            line.join("  ").trim_end().to_owned()
        })
        .collect()
}
