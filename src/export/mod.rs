//! Rows for the spreadsheet, CSV and print surfaces. Binary workbook and PDF
//! encoding happen outside this crate; everything here is plain text.

mod application_form;
mod report;

pub use application_form::{COLUMN_WIDTHS, SHEET_NAME, Sheet, application_form, file_name};
pub use report::{
    export_report_csv, print_summary, report_rows, summary_csv_file_name, summary_rows,
    printable_summary,
};

fn starts_like_formula(value: &str) -> bool {
    let trimmed = value.trim_start();
    match trimmed.chars().next() {
        Some('=' | '+' | '@') => true,
        Some('-') => trimmed.len() > 1,
        _ => false,
    }
}

/// Quote a CSV cell when needed. Cells a spreadsheet would evaluate as a
/// formula are prefixed with `'`.
pub fn csv_escape(value: &str) -> String {
    let safe = if starts_like_formula(value) {
        format!("'{value}")
    } else {
        value.to_string()
    };
    if safe.contains(',') || safe.contains('"') || safe.contains('\n') || safe.contains('\r') {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}

pub fn rows_to_csv(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| csv_escape(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
