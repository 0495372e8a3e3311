#![allow(dead_code)]

use livelo_analytics::row::ColumnLayout;
use livelo_analytics::state::AppState;
use livelo_analytics::storage::MemoryStorage;
use livelo_analytics::table::OfferTable;

// Helper to build a row in the default column order
pub fn cells(
    partner: &str,
    category: &str,
    tier: &str,
    offer: &str,
    last_offer: &str,
    points: &str,
) -> Vec<String> {
    [
        partner, "Pontos", category, tier, offer, "Alta", "Mensal", last_offer, points,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn sample_table() -> OfferTable {
    let mut table = OfferTable::new(ColumnLayout::default());
    table.push_cells(cells("Smiles", "Viagem", "1", "Sim", "05/01/2024", "1.200"));
    table.push_cells(cells("Latam", "Viagem", "2", "Não", "31/12/2023", "850"));
    table.push_cells(cells("Amazon", "Varejo", "1", "Sim", "15/06/2023", "10.000"));
    table.push_cells(cells("Netshoes", "Esporte", "3", "Não", "sem data", "2"));
    table
}

pub fn sample_state() -> AppState {
    AppState::new(sample_table(), Box::new(MemoryStorage::new())).expect("state")
}

pub fn partners(table: &OfferTable) -> Vec<&str> {
    table.rows.iter().map(|r| r.partner.as_str()).collect()
}
