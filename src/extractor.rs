use crate::table::OfferTable;
use serde::{Deserialize, Serialize};

/// Affirmative marker used by the report generator in the offer column.
pub const DEFAULT_AFFIRMATIVE: &str = "Sim";

/// Normalized values read from one row at the moment it is favorited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub points: String,
    pub category: String,
    pub tier: String,
    pub has_offer: bool,
}

/// Read the favorite-relevant cells of the first row whose partner matches.
///
/// Returns `None` when no row matches; callers treat that as an ordinary
/// outcome. Short rows fall back to `"0"` for points and `"N/A"` for category
/// and tier.
pub fn extract(table: &OfferTable, partner_key: &str, affirmative: &str) -> Option<RowSnapshot> {
    let layout = &table.layout;
    let row = table.find_by_partner(partner_key)?;

    let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

    Some(RowSnapshot {
        points: non_empty(row.points(layout)).unwrap_or_else(|| "0".to_string()),
        category: non_empty(row.category(layout)).unwrap_or_else(|| "N/A".to_string()),
        tier: non_empty(row.tier(layout)).unwrap_or_else(|| "N/A".to_string()),
        has_offer: row.offer(layout) == Some(affirmative),
    })
}
