use crate::error::{LiveloError, Result};
use crate::row::ColumnLayout;
use crate::saving;
use crate::sort::ValueKind;
use crate::table::OfferTable;
use std::fs;
use std::path::Path;

/// Build the offers table from CSV text exported by the report generator.
///
/// The first line is the header; its titles replace the layout's titles
/// while the column-index mapping is kept. Blank lines are skipped.
///
/// # Examples
/// ```
/// use livelo_analytics::loader::from_csv_str;
/// use livelo_analytics::row::ColumnLayout;
///
/// let csv = "Parceiro,Moeda\nSmiles,Pontos\n";
/// let table = from_csv_str(csv, ColumnLayout::default()).unwrap();
/// assert_eq!(table.rows[0].partner, "Smiles");
/// ```
pub fn from_csv_str(content: &str, mut layout: ColumnLayout) -> Result<OfferTable> {
    let mut records = parse_csv_records(content)?.into_iter();

    let titles = records
        .next()
        .ok_or_else(|| LiveloError::Load("CSV file is empty".to_string()))?;

    if titles.len() <= layout.partner || titles.len() <= layout.currency {
        return Err(LiveloError::Load(format!(
            "header has {} columns; partner and currency columns are missing",
            titles.len()
        )));
    }

    layout.titles = titles.iter().map(|t| t.trim().to_string()).collect();
    if layout.kinds.len() < layout.titles.len() {
        layout.kinds.resize(layout.titles.len(), ValueKind::Text);
    }

    let mut table = OfferTable::new(layout);
    for cells in records {
        table.push_cells(cells);
    }

    log::info!("loaded {} offer rows from CSV", table.len());
    Ok(table)
}

pub fn from_csv(filepath: impl AsRef<Path>, layout: ColumnLayout) -> Result<OfferTable> {
    let path = filepath.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| LiveloError::Load(format!("{}: {}", path.display(), e)))?;
    from_csv_str(&content, layout)
}

/// Detect the file type by extension and load it.
///
/// `.csv` files are parsed with `layout`; `.gz` files are compressed
/// snapshots and carry their own layout.
pub fn load_table(filepath: impl AsRef<Path>, layout: ColumnLayout) -> Result<OfferTable> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("csv") => from_csv(path, layout),
        Some("gz") => saving::load_table(path),
        Some(ext) => Err(LiveloError::Load(format!("Unsupported file extension: {}", ext))),
        None => Err(LiveloError::Load("File has no extension".to_string())),
    }
}

// Split CSV text into records. Quoted fields may span lines; blank lines
// outside quotes are skipped.
fn parse_csv_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote inside a quoted field
                    current_field.push('"');
                    chars.next();
                } else {
                    if !in_quotes {
                        quote_line = line;
                    }
                    in_quotes = !in_quotes;
                    quoted = true;
                }
            }
            ',' if !in_quotes => {
                record.push(std::mem::take(&mut current_field));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                line += 1;
                end_record(&mut records, &mut record, &mut current_field, quoted);
                quoted = false;
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                current_field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(LiveloError::Load(format!(
            "unterminated quoted field starting on line {}",
            quote_line
        )));
    }

    end_record(&mut records, &mut record, &mut current_field, quoted);
    Ok(records)
}

fn end_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    current_field: &mut String,
    quoted: bool,
) {
    let field = std::mem::take(current_field);
    if record.is_empty() && !quoted && field.trim().is_empty() {
        return;
    }
    record.push(field);
    records.push(std::mem::take(record));
}
