use crate::row::{ColumnLayout, OfferRow};
use serde::{Deserialize, Serialize};

/// The in-memory dataset behind the dashboard.
///
/// Rows are held in display order; sorting permutes `rows` in place. The table
/// is loaded once at startup and every engine reads from it instead of from
/// rendered markup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferTable {
    pub layout: ColumnLayout,
    pub rows: Vec<OfferRow>,
}

impl OfferTable {
    pub fn new(layout: ColumnLayout) -> Self {
        OfferTable {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(layout: ColumnLayout, rows: Vec<OfferRow>) -> Self {
        OfferTable { layout, rows }
    }

    /// Append a row built from raw cell text.
    pub fn push_cells(&mut self, cells: Vec<String>) {
        let row = OfferRow::from_cells(cells, &self.layout);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose partner cell equals `partner` exactly.
    ///
    /// Duplicate partner names are not de-duplicated; the earliest row in
    /// display order wins.
    pub fn find_by_partner(&self, partner: &str) -> Option<&OfferRow> {
        self.rows
            .iter()
            .find(|row| row.cell(self.layout.partner).map(str::trim) == Some(partner))
    }
}
