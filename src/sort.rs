use crate::table::OfferTable;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

lazy_static! {
    static ref NON_NUMERIC_REGEX: Regex = Regex::new(r"[^0-9.,\-]").unwrap();
    static ref GROUPED_REGEX: Regex =
        Regex::new(r"^(-?[0-9]{1,3}(?:\.[0-9]{3})+)(?:[^0-9.]|$)").unwrap();
    static ref FLOAT_PREFIX_REGEX: Regex = Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]+)").unwrap();
    static ref DATE_REGEX: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap();
}

/// How a column's cell text is interpreted when sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Numeric,
    Date,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Numeric => "numeric",
            ValueKind::Date => "date",
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "texto" => Ok(ValueKind::Text),
            "numeric" | "number" | "numero" | "número" => Ok(ValueKind::Numeric),
            "date" | "data" => Ok(ValueKind::Date),
            other => Err(format!("unknown value kind `{}`", other)),
        }
    }
}

/// Active sort column and direction.
///
/// There is exactly one descriptor per application state and at most one
/// active column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub column: Option<usize>,
    pub ascending: bool,
}

impl Default for SortDescriptor {
    fn default() -> Self {
        SortDescriptor {
            column: None,
            ascending: true,
        }
    }
}

impl SortDescriptor {
    /// Apply a header click: the same column flips direction, a new column
    /// becomes active in ascending order.
    pub fn advance(&mut self, column: usize) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    pub fn direction_for(&self, column: usize) -> Option<bool> {
        match self.column {
            Some(active) if active == column => Some(self.ascending),
            _ => None,
        }
    }
}

/// Comparable key extracted from one cell.
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    Text(String),
    Numeric(f64),
    Date(NaiveDate),
}

impl SortKey {
    pub fn from_cell(text: &str, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => SortKey::Text(text.trim().to_string()),
            ValueKind::Numeric => SortKey::Numeric(numeric_value(text)),
            ValueKind::Date => SortKey::Date(date_value(text)),
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Numeric(a), SortKey::Numeric(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            // Keys of one sort always share a kind
            _ => Ordering::Equal,
        }
    }
}

/// Parse a points-style cell into a number.
///
/// Everything except digits, sign and separators is dropped. A comma is the
/// decimal separator (`"1.234,5"`); dots followed by groups of exactly three
/// digits are thousands separators (`"10.000"`). The longest leading number
/// is read, so a range like `"10.000 - 12.000"` sorts by its lower bound.
/// A cell with no leading number is 0.
pub fn numeric_value(text: &str) -> f64 {
    let stripped = NON_NUMERIC_REGEX.replace_all(text.trim(), "");
    let normalized = if stripped.contains(',') {
        stripped.replace('.', "").replace(',', ".")
    } else if let Some(caps) = GROUPED_REGEX.captures(&stripped) {
        caps[1].replace('.', "")
    } else {
        stripped.to_string()
    };

    FLOAT_PREFIX_REGEX
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a `DD/MM/YYYY` cell; malformed input maps to the epoch so it sorts
/// as the oldest date.
pub fn date_value(text: &str) -> NaiveDate {
    DATE_REGEX
        .captures(text.trim())
        .and_then(|caps| {
            let iso = format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]);
            NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok()
        })
        .unwrap_or_default()
}

/// Stable in-place sort of the table rows by one column.
///
/// `visibility`, when given, is permuted together with the rows so that each
/// row keeps its visibility flag. Rows with equal keys keep their relative
/// order.
pub fn sort_rows(
    table: &mut OfferTable,
    visibility: Option<&mut Vec<bool>>,
    column: usize,
    kind: ValueKind,
    ascending: bool,
) {
    let rows = std::mem::take(&mut table.rows);
    let flags = match &visibility {
        Some(v) if v.len() == rows.len() => v.to_vec(),
        _ => vec![true; rows.len()],
    };

    let mut keyed: Vec<(SortKey, bool, _)> = rows
        .into_iter()
        .zip(flags)
        .map(|(row, flag)| (SortKey::from_cell(row.cell_or_empty(column), kind), flag, row))
        .collect();

    keyed.sort_by(|(a, _, _), (b, _, _)| {
        let ord = a.compare(b);
        if ascending { ord } else { ord.reverse() }
    });

    let mut new_flags = Vec::with_capacity(keyed.len());
    for (_, flag, row) in keyed {
        new_flags.push(flag);
        table.rows.push(row);
    }

    if let Some(v) = visibility {
        if v.len() == new_flags.len() {
            *v = new_flags;
        }
    }
}

/// Advance the descriptor for a header click and reorder the table.
pub fn sort_by_column(
    table: &mut OfferTable,
    descriptor: &mut SortDescriptor,
    visibility: Option<&mut Vec<bool>>,
    column: usize,
    kind: ValueKind,
) {
    descriptor.advance(column);
    log::debug!(
        "sorting column {} as {:?} ({})",
        column,
        kind,
        if descriptor.ascending { "asc" } else { "desc" }
    );
    sort_rows(table, visibility, column, kind, descriptor.ascending);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_value_handles_grouping() {
        assert_eq!(numeric_value("1.200"), 1200.0);
        assert_eq!(numeric_value("10.000"), 10000.0);
        assert_eq!(numeric_value("850"), 850.0);
        assert_eq!(numeric_value("1.234,5"), 1234.5);
        assert_eq!(numeric_value("2.5"), 2.5);
        assert_eq!(numeric_value("R$ 3,00"), 3.0);
        assert_eq!(numeric_value("-4"), -4.0);
        assert_eq!(numeric_value("1.2345"), 1.2345);
    }

    #[test]
    fn numeric_value_reads_leading_number() {
        assert_eq!(numeric_value("1-2"), 1.0);
        assert_eq!(numeric_value("10.000 - 12.000"), 10000.0);
        assert_eq!(numeric_value("850 a 900"), 850900.0);
        assert_eq!(numeric_value("1.2.3"), 1.2);
        assert_eq!(numeric_value("2,5 - 3,5"), 2.5);
    }

    #[test]
    fn numeric_value_defaults_to_zero() {
        assert_eq!(numeric_value(""), 0.0);
        assert_eq!(numeric_value("Nunca"), 0.0);
        assert_eq!(numeric_value("-"), 0.0);
        assert_eq!(numeric_value("--3"), 0.0);
    }

    #[test]
    fn date_value_reverses_tokens() {
        assert_eq!(
            date_value("05/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert!(date_value("31/12/2023") < date_value("05/01/2024"));
    }

    #[test]
    fn date_value_defaults_to_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_value("ontem"), epoch);
        assert_eq!(date_value("31/02/2024"), epoch);
        assert_eq!(date_value(""), epoch);
    }

    #[test]
    fn descriptor_transitions() {
        let mut d = SortDescriptor::default();
        assert_eq!(d.column, None);

        d.advance(3);
        assert_eq!((d.column, d.ascending), (Some(3), true));
        d.advance(3);
        assert_eq!((d.column, d.ascending), (Some(3), false));
        d.advance(8);
        assert_eq!((d.column, d.ascending), (Some(8), true));
        assert_eq!(d.direction_for(3), None);
        assert_eq!(d.direction_for(8), Some(true));
    }

    #[test]
    fn value_kind_tokens() {
        assert_eq!("numero".parse::<ValueKind>(), Ok(ValueKind::Numeric));
        assert_eq!("data".parse::<ValueKind>(), Ok(ValueKind::Date));
        assert_eq!("Texto".parse::<ValueKind>(), Ok(ValueKind::Text));
        assert!("money".parse::<ValueKind>().is_err());
    }
}
