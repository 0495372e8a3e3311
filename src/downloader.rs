use crate::error::{LiveloError, Result};
use crate::state::AppState;

/// Export the currently visible rows as CSV.
///
/// The header row carries the layout's column titles. Fields containing
/// commas, quotes or newlines are quoted with `""` escaping. An export with no
/// visible rows is refused.
///
/// # Arguments
/// * `state` - Dashboard state whose visible rows are written
///
/// # Returns
/// * `Result<String>` - CSV content, or `LiveloError::NothingToExport`
pub fn to_csv(state: &AppState) -> Result<String> {
    let rows: Vec<_> = state.visible_rows().collect();
    if rows.is_empty() {
        return Err(LiveloError::NothingToExport);
    }

    let mut csv_content = String::new();
    push_csv_line(&mut csv_content, state.table.layout.titles.iter().map(String::as_str));
    for row in &rows {
        push_csv_line(&mut csv_content, row.cells.iter().map(String::as_str));
    }

    log::info!("exported {} rows to CSV", rows.len());
    Ok(csv_content)
}

/// Export the currently visible rows as an XLSX workbook.
///
/// Numeric columns are written as numbers so spreadsheet tools can sum them;
/// every other cell is written as text.
#[cfg(feature = "web")]
pub fn to_xlsx(state: &AppState) -> Result<Vec<u8>> {
    use crate::sort::{ValueKind, numeric_value};
    use rust_xlsxwriter::{Workbook, Worksheet};

    let rows: Vec<_> = state.visible_rows().collect();
    if rows.is_empty() {
        return Err(LiveloError::NothingToExport);
    }

    let xlsx_err = |e: rust_xlsxwriter::XlsxError| LiveloError::Export(e.to_string());
    let layout = &state.table.layout;

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, title) in layout.titles.iter().enumerate() {
        worksheet
            .write_string(0, c as u16, title.as_str())
            .map_err(xlsx_err)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, cell) in row.cells.iter().enumerate() {
            if layout.kind_for(c) == ValueKind::Numeric {
                worksheet
                    .write_number(excel_row, c as u16, numeric_value(cell))
                    .map_err(xlsx_err)?;
            } else {
                worksheet
                    .write_string(excel_row, c as u16, cell.as_str())
                    .map_err(xlsx_err)?;
            }
        }
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer().map_err(xlsx_err)?;

    log::info!("exported {} rows to XLSX", rows.len());
    Ok(buffer)
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, value) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if value.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&value.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(value);
        }
    }
    out.push('\n');
}
