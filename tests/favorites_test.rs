mod common;

use chrono::{TimeZone, Utc};
use common::sample_table;
use livelo_analytics::favorites::{
    ClearOutcome, FavoriteRecord, Favorites, FavoritesListener, ToggleOutcome, composite_key,
};
use livelo_analytics::storage::{FAVORITES_KEY, FileStorage, MemoryStorage, Storage};
use livelo_analytics::view::{EMPTY_WALLET_MESSAGE, render_wallet};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap()
}

#[test]
fn toggle_adds_then_removes_smiles() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();

    let outcome = favorites
        .toggle(&table, "Smiles", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Added);
    assert_eq!(favorites.len(), 1);

    let record = &favorites.records()[0];
    assert_eq!(record.key, "Smiles|Pontos");
    assert_eq!(record.points, "1.200");
    assert_eq!(record.category, "Viagem");
    assert_eq!(record.tier, "1");
    assert!(record.has_offer);
    assert_eq!(record.added_at, now());
    println!("✓ Smiles|Pontos added with a snapshot of its row");

    let outcome = favorites
        .toggle(&table, "Smiles", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Removed);
    assert!(favorites.is_empty());

    let panel = render_wallet(favorites.records());
    assert!(panel.empty);
    assert!(panel.html.contains(EMPTY_WALLET_MESSAGE));
    println!("✓ Second toggle removed it and the wallet shows the empty state");
}

#[test]
fn double_toggle_restores_persisted_serialization() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();

    favorites
        .toggle(&table, "Latam", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    let before = storage.get(FAVORITES_KEY).unwrap();

    favorites
        .toggle(&table, "Amazon", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    favorites
        .toggle(&table, "Amazon", "Pontos", "Sim", now(), &mut storage)
        .unwrap();

    assert_eq!(storage.get(FAVORITES_KEY).unwrap(), before);
}

#[test]
fn keys_stay_unique_across_toggle_sequences() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();

    let sequence = [
        "Smiles", "Latam", "Smiles", "Amazon", "Smiles", "Latam", "Netshoes", "Amazon", "Smiles",
    ];
    for partner in sequence {
        favorites
            .toggle(&table, partner, "Pontos", "Sim", now(), &mut storage)
            .unwrap();
        let keys: HashSet<&str> = favorites.records().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys.len(), favorites.len());
    }

    // Smiles toggled 4 times, Latam 2, Amazon 2, Netshoes 1
    let keys: Vec<&str> = favorites.records().iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Netshoes|Pontos"]);
}

#[test]
fn insertion_order_is_display_order() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();

    for partner in ["Amazon", "Smiles", "Latam"] {
        favorites
            .toggle(&table, partner, "Pontos", "Sim", now(), &mut storage)
            .unwrap();
    }
    let order: Vec<&str> = favorites.records().iter().map(|r| r.partner.as_str()).collect();
    assert_eq!(order, vec!["Amazon", "Smiles", "Latam"]);
}

#[test]
fn unknown_row_is_silent_noop() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();

    let outcome = favorites
        .toggle(&table, "Azul", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Skipped);
    assert!(favorites.is_empty());
    assert_eq!(storage.get(FAVORITES_KEY).unwrap(), None);
}

#[test]
fn clear_all_requires_confirmation() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();
    favorites
        .toggle(&table, "Smiles", "Pontos", "Sim", now(), &mut storage)
        .unwrap();

    let declined = favorites.clear_all(&false, &mut storage).unwrap();
    assert_eq!(declined, ClearOutcome::Declined);
    assert_eq!(favorites.len(), 1);

    let asked = Mutex::new(Vec::new());
    let confirm = |prompt: &str| {
        asked.lock().unwrap().push(prompt.to_string());
        true
    };
    let cleared = favorites.clear_all(&confirm, &mut storage).unwrap();
    assert_eq!(cleared, ClearOutcome::Cleared);
    assert!(favorites.is_empty());
    assert_eq!(asked.lock().unwrap().len(), 1);
    assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
}

struct Recorder(Arc<Mutex<Vec<usize>>>);

impl FavoritesListener for Recorder {
    fn favorites_changed(&self, favorites: &[FavoriteRecord]) {
        self.0.lock().unwrap().push(favorites.len());
    }
}

#[test]
fn listeners_see_every_persisted_change() {
    let table = sample_table();
    let mut storage = MemoryStorage::new();
    let mut favorites = Favorites::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    favorites.subscribe(Box::new(Recorder(seen.clone())));

    favorites
        .toggle(&table, "Smiles", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    favorites
        .toggle(&table, "Latam", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    favorites
        .toggle(&table, "Azul", "Pontos", "Sim", now(), &mut storage)
        .unwrap();
    favorites.clear_all(&true, &mut storage).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0]);
}

#[test]
fn favorites_survive_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let table = sample_table();

    {
        let mut storage = FileStorage::open(dir.path()).unwrap();
        let mut favorites = Favorites::new();
        favorites
            .toggle(&table, "Amazon", "Pontos", "Sim", now(), &mut storage)
            .unwrap();
        favorites
            .toggle(&table, "Latam", "Pontos", "Sim", now(), &mut storage)
            .unwrap();
    }

    let storage = FileStorage::open(dir.path()).unwrap();
    let favorites = Favorites::load(&storage).unwrap();
    assert_eq!(favorites.len(), 2);
    assert!(favorites.contains("Amazon", "Pontos"));
    assert!(favorites.contains_key(&composite_key("Latam", "Pontos")));
    assert!(!favorites.records()[1].has_offer);

    let raw = storage.get(FAVORITES_KEY).unwrap().unwrap();
    assert!(raw.contains("\"hasOffer\""));
    assert!(raw.contains("\"addedAt\""));
}

#[test]
fn unreadable_or_duplicated_storage_is_tolerated() {
    let mut storage = MemoryStorage::new();
    storage.set(FAVORITES_KEY, "{not json").unwrap();
    assert!(Favorites::load(&storage).unwrap().is_empty());

    let record = FavoriteRecord {
        key: composite_key("Smiles", "Pontos"),
        partner: "Smiles".into(),
        currency: "Pontos".into(),
        points: "1.200".into(),
        category: "Viagem".into(),
        tier: "1".into(),
        has_offer: true,
        added_at: now(),
    };
    let json = serde_json::to_string(&vec![record.clone(), record]).unwrap();
    storage.set(FAVORITES_KEY, &json).unwrap();
    assert_eq!(Favorites::load(&storage).unwrap().len(), 1);
}
