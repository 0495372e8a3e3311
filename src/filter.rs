use crate::row::{ColumnLayout, OfferRow};
use crate::table::OfferTable;
use serde::{Deserialize, Serialize};

/// Values of the five filter controls. Empty strings impose no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFilters {
    pub category: String,
    pub tier: String,
    pub offer: String,
    pub experience: String,
    pub frequency: String,
}

impl ColumnFilters {
    /// Active (column, needle) pairs under `layout`.
    pub fn predicates(&self, layout: &ColumnLayout) -> Vec<(usize, &str)> {
        [
            (layout.category, self.category.as_str()),
            (layout.tier, self.tier.as_str()),
            (layout.offer, self.offer.as_str()),
            (layout.experience, self.experience.as_str()),
            (layout.frequency, self.frequency.as_str()),
        ]
        .into_iter()
        .filter(|(_, needle)| !needle.is_empty())
        .collect()
    }

    /// True when every non-empty control is a substring of its cell.
    pub fn matches(&self, row: &OfferRow, layout: &ColumnLayout) -> bool {
        self.predicates(layout)
            .into_iter()
            .all(|(column, needle)| row.cell(column).is_some_and(|cell| cell.contains(needle)))
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_empty()
            && self.tier.is_empty()
            && self.offer.is_empty()
            && self.experience.is_empty()
            && self.frequency.is_empty()
    }
}

/// Current filter controls plus the partner search box.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub columns: ColumnFilters,
    pub search: String,
}

impl FilterState {
    /// Case-insensitive substring match of the search text on the partner cell.
    pub fn matches_search(&self, row: &OfferRow, layout: &ColumnLayout) -> bool {
        let needle = self.search.to_lowercase();
        needle.is_empty() || row.cell_or_empty(layout.partner).to_lowercase().contains(&needle)
    }

    pub fn matches(&self, row: &OfferRow, layout: &ColumnLayout) -> bool {
        self.columns.matches(row, layout) && self.matches_search(row, layout)
    }

    /// Recompute visibility for every row from scratch.
    pub fn visibility(&self, table: &OfferTable) -> Vec<bool> {
        table
            .rows
            .iter()
            .map(|row| self.matches(row, &table.layout))
            .collect()
    }

    /// Replace the column controls and rescan.
    ///
    /// The search text stays in effect, so both mechanisms always combine as
    /// one conjunction.
    pub fn apply_column_filters(&mut self, filters: ColumnFilters, table: &OfferTable) -> Vec<bool> {
        self.columns = filters;
        let visible = self.visibility(table);
        log::debug!(
            "column filters applied: {}/{} rows visible",
            visible.iter().filter(|v| **v).count(),
            visible.len()
        );
        visible
    }

    /// Replace the search text and rescan, keeping the column controls.
    pub fn apply_search(&mut self, query: &str, table: &OfferTable) -> Vec<bool> {
        self.search = query.to_string();
        let visible = self.visibility(table);
        log::debug!(
            "search {:?}: {}/{} rows visible",
            query,
            visible.iter().filter(|v| **v).count(),
            visible.len()
        );
        visible
    }
}
