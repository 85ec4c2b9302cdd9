//! Semicolon-separated tables with Brazilian number formatting.
//!
//! Every file starts with a header row. Text is always quoted, numbers use a
//! comma as decimal separator without grouping, lines end in CRLF.

use rust_decimal::Decimal;

use crate::classify::{Classification, MissingNumber, MissingRange, SeriesSummary};
use crate::extract::{Cell, LINE_COLUMNS, LineRecord};

/// Header of the classification table.
pub const CLASSIFICATION_COLUMNS: [&str; 9] = [
    "ARQUIVO", "CHAVE", "MODELO", "SERIE", "NUMERO", "STATUS", "VALOR", "PASTA", "PROPRIO",
];

/// Header of the per-series summary table.
pub const SUMMARY_COLUMNS: [&str; 6] = ["MODELO", "SERIE", "INICIO", "FIM", "QUANTIDADE", "VALOR"];

/// Header of the missing-number table.
pub const MISSING_COLUMNS: [&str; 2] = ["SERIE", "NUMERO_FALTANTE"];

/// Header of the missing-range table.
pub const MISSING_RANGE_COLUMNS: [&str; 4] = ["SERIE", "INICIO", "FIM", "QUANTIDADE"];

/// Render extracted line records.
pub fn records_to_csv(records: &[LineRecord]) -> String {
    let mut out = header(&LINE_COLUMNS);
    for record in records {
        for (i, cell) in record.cells().iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            match cell {
                Cell::Text(s) => csv_field_str(&mut out, s),
                Cell::Number(d) => csv_field_decimal(&mut out, *d),
            }
        }
        out.push_str("\r\n");
    }
    out
}

/// Render the classification table.
pub fn classifications_to_csv<'a>(items: impl IntoIterator<Item = &'a Classification>) -> String {
    let mut out = header(&CLASSIFICATION_COLUMNS);
    for c in items {
        csv_field_str(&mut out, &c.filename);
        out.push(';');
        csv_field_str(&mut out, &c.key);
        out.push(';');
        csv_field_str(&mut out, c.model.label());
        out.push(';');
        csv_field_str(&mut out, &c.series);
        out.push(';');
        if let Some(n) = c.number {
            out.push_str(&n.to_string());
        }
        out.push(';');
        csv_field_str(&mut out, c.status.label());
        out.push(';');
        csv_field_decimal(&mut out, c.value);
        out.push(';');
        csv_field_str(&mut out, &c.folder);
        out.push(';');
        csv_field_str(&mut out, if c.owned { "SIM" } else { "NAO" });
        out.push_str("\r\n");
    }
    out
}

/// Render the per-series summary table.
pub fn summaries_to_csv(summaries: &[SeriesSummary]) -> String {
    let mut out = header(&SUMMARY_COLUMNS);
    for s in summaries {
        csv_field_str(&mut out, s.model.label());
        out.push(';');
        csv_field_str(&mut out, &s.series);
        out.push_str(&format!(";{};{};{};", s.first, s.last, s.count));
        csv_field_decimal(&mut out, s.total);
        out.push_str("\r\n");
    }
    out
}

/// Render the missing-number report.
pub fn missing_numbers_to_csv(missing: &[MissingNumber]) -> String {
    let mut out = header(&MISSING_COLUMNS);
    for m in missing {
        csv_field_str(&mut out, &m.series);
        out.push(';');
        out.push_str(&m.number.to_string());
        out.push_str("\r\n");
    }
    out
}

/// Render the missing numbers one run per row.
pub fn missing_ranges_to_csv(ranges: &[MissingRange]) -> String {
    let mut out = header(&MISSING_RANGE_COLUMNS);
    for r in ranges {
        csv_field_str(&mut out, &r.series);
        out.push_str(&format!(";{};{};{}\r\n", r.first, r.last, r.count()));
    }
    out
}

fn header(columns: &[&str]) -> String {
    let mut out = String::new();
    for (i, name) in columns.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        csv_field_str(&mut out, name);
    }
    out.push_str("\r\n");
    out
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    // Escape internal double quotes
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal) {
    out.push_str(&d.normalize().to_string().replace('.', ","));
}
