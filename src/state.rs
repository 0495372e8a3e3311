use crate::error::Result;
use crate::extractor::DEFAULT_AFFIRMATIVE;
use crate::favorites::Favorites;
use crate::filter::FilterState;
use crate::sort::SortDescriptor;
use crate::storage::Storage;
use crate::table::OfferTable;
use crate::theme::Theme;

/// The single owned state of a dashboard session.
///
/// Created once at startup and handed to the dispatcher by `&mut`. The table
/// is the dataset, the storage backs favorites and theme, and the remaining
/// fields are session-only view state.
pub struct AppState {
    pub table: OfferTable,
    pub favorites: Favorites,
    pub sort: SortDescriptor,
    pub filters: FilterState,
    pub visibility: Vec<bool>,
    pub theme: Theme,
    pub affirmative: String,
    pub storage: Box<dyn Storage>,
}

impl AppState {
    /// Build the session, restoring favorites and theme from `storage`.
    pub fn new(table: OfferTable, storage: Box<dyn Storage>) -> Result<Self> {
        let favorites = Favorites::load(&*storage)?;
        let theme = Theme::load(&*storage)?;
        let visibility = vec![true; table.len()];

        Ok(AppState {
            table,
            favorites,
            sort: SortDescriptor::default(),
            filters: FilterState::default(),
            visibility,
            theme,
            affirmative: DEFAULT_AFFIRMATIVE.to_string(),
            storage,
        })
    }

    pub fn with_affirmative(mut self, affirmative: impl Into<String>) -> Self {
        self.affirmative = affirmative.into();
        self
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &crate::row::OfferRow> {
        self.table
            .rows
            .iter()
            .zip(self.visibility.iter().copied().chain(std::iter::repeat(true)))
            .filter(|(_, visible)| *visible)
            .map(|(row, _)| row)
    }
}
