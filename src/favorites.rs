use crate::error::Result;
use crate::extractor::extract;
use crate::storage::{FAVORITES_KEY, Storage};
use crate::table::OfferTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Separator between partner and currency in a composite key.
pub const KEY_SEPARATOR: char = '|';

/// Identity of a favorite: `partner|currency`.
pub fn composite_key(partner: &str, currency: &str) -> String {
    format!("{}{}{}", partner, KEY_SEPARATOR, currency)
}

/// A partner/currency pairing saved to the wallet.
///
/// The stats are a snapshot taken when the favorite was added and are never
/// refreshed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub key: String,
    pub partner: String,
    pub currency: String,
    pub points: String,
    pub category: String,
    pub tier: String,
    pub has_offer: bool,
    pub added_at: DateTime<Utc>,
}

/// Result of a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The row could not be resolved; nothing changed.
    Skipped,
}

/// Result of a clear-all request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

/// Interactive confirmation for destructive actions.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl Confirmation for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

impl<F: Fn(&str) -> bool> Confirmation for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub const CLEAR_PROMPT: &str = "Deseja realmente limpar todos os favoritos?";

/// Subscriber to favorites changes, e.g. a remote backup sync.
///
/// Called after every persisted change with the full list. Implementations
/// must not assume delivery succeeded anywhere else.
pub trait FavoritesListener: Send {
    fn favorites_changed(&self, favorites: &[FavoriteRecord]);
}

/// The wallet: an insertion-ordered set of favorites keyed by composite key.
#[derive(Default)]
pub struct Favorites {
    records: Vec<FavoriteRecord>,
    listeners: Vec<Box<dyn FavoritesListener>>,
}

impl std::fmt::Debug for Favorites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Favorites")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the wallet from storage.
    ///
    /// A missing key is an empty wallet. Unreadable JSON is logged and
    /// discarded rather than blocking startup. Duplicate keys keep the first
    /// record.
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let mut favorites = Favorites::new();
        let Some(raw) = storage.get(FAVORITES_KEY)? else {
            return Ok(favorites);
        };

        match serde_json::from_str::<Vec<FavoriteRecord>>(&raw) {
            Ok(records) => {
                let mut seen = HashSet::new();
                favorites.records = records
                    .into_iter()
                    .filter(|r| seen.insert(r.key.clone()))
                    .collect();
                log::info!("loaded {} favorites", favorites.records.len());
            }
            Err(e) => log::warn!("discarding unreadable favorites: {}", e),
        }
        Ok(favorites)
    }

    pub fn records(&self) -> &[FavoriteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, partner: &str, currency: &str) -> bool {
        self.contains_key(&composite_key(partner, currency))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.iter().any(|r| r.key == key)
    }

    pub fn subscribe(&mut self, listener: Box<dyn FavoritesListener>) {
        self.listeners.push(listener);
    }

    /// Add or remove the pairing.
    ///
    /// Adding snapshots the row found by `partner` in `table`; when no row
    /// matches the call is a silent no-op. Added and removed outcomes persist
    /// the whole list and notify listeners.
    pub fn toggle(
        &mut self,
        table: &OfferTable,
        partner: &str,
        currency: &str,
        affirmative: &str,
        now: DateTime<Utc>,
        storage: &mut dyn Storage,
    ) -> Result<ToggleOutcome> {
        let key = composite_key(partner, currency);

        let outcome = if self.contains_key(&key) {
            self.records.retain(|r| r.key != key);
            ToggleOutcome::Removed
        } else {
            let Some(snapshot) = extract(table, partner, affirmative) else {
                log::debug!("no row for partner {:?}; toggle ignored", partner);
                return Ok(ToggleOutcome::Skipped);
            };
            self.records.push(FavoriteRecord {
                key: key.clone(),
                partner: partner.to_string(),
                currency: currency.to_string(),
                points: snapshot.points,
                category: snapshot.category,
                tier: snapshot.tier,
                has_offer: snapshot.has_offer,
                added_at: now,
            });
            ToggleOutcome::Added
        };

        log::info!("favorite {} {:?}", key, outcome);
        self.persist(storage)?;
        Ok(outcome)
    }

    /// Empty the wallet after confirmation.
    pub fn clear_all(
        &mut self,
        confirmation: &dyn Confirmation,
        storage: &mut dyn Storage,
    ) -> Result<ClearOutcome> {
        if !confirmation.confirm(CLEAR_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }
        self.records.clear();
        log::info!("wallet cleared");
        self.persist(storage)?;
        Ok(ClearOutcome::Cleared)
    }

    /// Write the full list to storage, then notify listeners.
    pub fn persist(&self, storage: &mut dyn Storage) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        storage.set(FAVORITES_KEY, &json)?;
        for listener in &self.listeners {
            listener.favorites_changed(&self.records);
        }
        Ok(())
    }
}
