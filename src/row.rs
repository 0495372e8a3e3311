use crate::sort::ValueKind;
use serde::{Deserialize, Serialize};

/// Column-index-to-meaning mapping of the offers table.
///
/// The report generator emits cells in a fixed order. Every lookup made by the
/// extractor, the filters and the renderer goes through this mapping, so a
/// generator that moves columns only needs a different layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Partner name, the row identity column
    pub partner: usize,

    /// Program currency label
    pub currency: usize,

    /// Partner category
    pub category: usize,

    /// Partner tier
    pub tier: usize,

    /// Offer flag ("Sim" / "Não")
    pub offer: usize,

    /// Experience classification
    pub experience: usize,

    /// Offer frequency classification
    pub frequency: usize,

    /// Date of the last recorded offer
    pub last_offer: usize,

    /// Points awarded per currency unit
    pub points: usize,

    /// Header titles, one per column
    pub titles: Vec<String>,

    /// Value kind used when a column header is sorted without an explicit kind
    pub kinds: Vec<ValueKind>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let columns = [
            ("Parceiro", ValueKind::Text),
            ("Moeda", ValueKind::Text),
            ("Categoria", ValueKind::Text),
            ("Tier", ValueKind::Text),
            ("Oferta", ValueKind::Text),
            ("Experiência", ValueKind::Text),
            ("Frequência", ValueKind::Text),
            ("Última Oferta", ValueKind::Date),
            ("Pontos", ValueKind::Numeric),
        ];

        ColumnLayout {
            partner: 0,
            currency: 1,
            category: 2,
            tier: 3,
            offer: 4,
            experience: 5,
            frequency: 6,
            last_offer: 7,
            points: 8,
            titles: columns.iter().map(|(t, _)| t.to_string()).collect(),
            kinds: columns.iter().map(|(_, k)| *k).collect(),
        }
    }
}

impl ColumnLayout {
    pub fn column_count(&self) -> usize {
        self.titles.len()
    }

    /// Default value kind for a column; unknown columns sort as text.
    pub fn kind_for(&self, column: usize) -> ValueKind {
        self.kinds.get(column).copied().unwrap_or(ValueKind::Text)
    }
}

/// One offer row of the table.
///
/// Cells are kept as trimmed display text in source order. The identity pair
/// (`partner`, `currency`) is copied out on construction because it is what
/// favorite controls carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferRow {
    pub partner: String,
    pub currency: String,
    pub cells: Vec<String>,
}

impl OfferRow {
    /// Build a row from raw cell text using `layout` to find the identity columns.
    pub fn from_cells(cells: Vec<String>, layout: &ColumnLayout) -> Self {
        let cells: Vec<String> = cells.into_iter().map(|c| c.trim().to_string()).collect();
        let partner = cells.get(layout.partner).cloned().unwrap_or_default();
        let currency = cells.get(layout.currency).cloned().unwrap_or_default();
        OfferRow {
            partner,
            currency,
            cells,
        }
    }

    /// Trimmed text of a cell, `None` when the row is shorter than `column`.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Cell text or the empty string; used where a missing cell must compare
    /// like an empty one.
    pub fn cell_or_empty(&self, column: usize) -> &str {
        self.cell(column).unwrap_or("")
    }

    pub fn category<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.category)
    }

    pub fn tier<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.tier)
    }

    pub fn offer<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.offer)
    }

    pub fn points<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.points)
    }
}
