use crate::error::{LiveloError, Result};
use crate::favorites::{ClearOutcome, Confirmation, ToggleOutcome};
use crate::filter::ColumnFilters;
use crate::sort::{ValueKind, sort_by_column};
use crate::state::AppState;
use crate::view::ViewUpdate;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The closed set of user interactions the dashboard understands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    ToggleFavorite {
        partner: String,
        currency: String,
    },
    ApplyFilter {
        #[serde(default)]
        filters: ColumnFilters,
    },
    Search {
        query: String,
    },
    Sort {
        column: usize,
        /// Defaults to the layout's kind for the column
        #[serde(default)]
        kind: Option<ValueKind>,
    },
    ClearWallet {
        confirmed: bool,
    },
    ToggleTheme,
}

/// What an intent changed; the view is always re-derived afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Favorite(ToggleOutcome),
    Cleared(ClearOutcome),
    Filtered,
    Sorted,
    Theme,
}

/// Apply one intent to the state. No rendering happens here.
pub fn apply(state: &mut AppState, intent: Intent) -> Result<Transition> {
    match intent {
        Intent::ToggleFavorite { partner, currency } => {
            let outcome = state.favorites.toggle(
                &state.table,
                &partner,
                &currency,
                &state.affirmative,
                Utc::now(),
                &mut *state.storage,
            )?;
            Ok(Transition::Favorite(outcome))
        }
        Intent::ApplyFilter { filters } => {
            state.visibility = state.filters.apply_column_filters(filters, &state.table);
            Ok(Transition::Filtered)
        }
        Intent::Search { query } => {
            state.visibility = state.filters.apply_search(&query, &state.table);
            Ok(Transition::Filtered)
        }
        Intent::Sort { column, kind } => {
            // An inactive column would leave no indicator showing the sort
            if column >= state.table.layout.column_count() {
                return Err(LiveloError::UnknownColumn(column));
            }
            let kind = kind.unwrap_or_else(|| state.table.layout.kind_for(column));
            sort_by_column(
                &mut state.table,
                &mut state.sort,
                Some(&mut state.visibility),
                column,
                kind,
            );
            Ok(Transition::Sorted)
        }
        Intent::ClearWallet { confirmed } => {
            let confirmation: &dyn Confirmation = &confirmed;
            let outcome = state
                .favorites
                .clear_all(confirmation, &mut *state.storage)?;
            Ok(Transition::Cleared(outcome))
        }
        Intent::ToggleTheme => {
            state.theme = state.theme.toggled();
            state.theme.persist(&mut *state.storage)?;
            Ok(Transition::Theme)
        }
    }
}

/// Apply an intent, then re-derive the full view.
///
/// On error the state may hold an in-memory change that did not reach
/// storage; it stays authoritative for the session.
pub fn dispatch(state: &mut AppState, intent: Intent) -> Result<ViewUpdate> {
    log::debug!("dispatch {:?}", intent);
    let transition = apply(state, intent)?;
    log::trace!("transition {:?}", transition);
    Ok(ViewUpdate::from_state(state))
}
