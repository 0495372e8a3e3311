mod common;

use common::{cells, sample_table};
use livelo_analytics::filter::{ColumnFilters, FilterState};
use livelo_analytics::row::ColumnLayout;
use livelo_analytics::table::OfferTable;

fn visible_partners<'a>(table: &'a OfferTable, visibility: &[bool]) -> Vec<&'a str> {
    table
        .rows
        .iter()
        .zip(visibility)
        .filter(|(_, v)| **v)
        .map(|(r, _)| r.partner.as_str())
        .collect()
}

#[test]
fn offer_filter_hides_latam() {
    let mut table = OfferTable::new(ColumnLayout::default());
    table.push_cells(cells("Smiles", "Viagem", "1", "Sim", "01/01/2024", "1"));
    table.push_cells(cells("Latam", "Viagem", "1", "Não", "01/01/2024", "1"));

    let mut state = FilterState::default();
    let filters = ColumnFilters {
        offer: "Sim".into(),
        ..Default::default()
    };
    let visibility = state.apply_column_filters(filters, &table);
    assert_eq!(visibility, vec![true, false]);
    println!("✓ Offer filter 'Sim' shows Smiles and hides Latam");
}

#[test]
fn empty_controls_are_wildcards() {
    let table = sample_table();
    let mut state = FilterState::default();

    let visibility = state.apply_column_filters(ColumnFilters::default(), &table);
    assert!(visibility.iter().all(|v| *v));
}

#[test]
fn controls_match_substrings() {
    let table = sample_table();
    let mut state = FilterState::default();

    let filters = ColumnFilters {
        category: "Via".into(),
        ..Default::default()
    };
    let visibility = state.apply_column_filters(filters, &table);
    assert_eq!(visible_partners(&table, &visibility), vec!["Smiles", "Latam"]);
}

#[test]
fn visibility_is_conjunction_of_each_predicate() {
    let table = sample_table();
    let layout = &table.layout;

    let combos = [
        ColumnFilters {
            category: "Viagem".into(),
            tier: "1".into(),
            ..Default::default()
        },
        ColumnFilters {
            tier: "1".into(),
            offer: "Sim".into(),
            ..Default::default()
        },
        ColumnFilters {
            category: "Varejo".into(),
            offer: "Não".into(),
            ..Default::default()
        },
        ColumnFilters {
            experience: "Alta".into(),
            frequency: "Mensal".into(),
            offer: "Não".into(),
            ..Default::default()
        },
    ];

    for filters in combos {
        let mut state = FilterState::default();
        let visibility = state.apply_column_filters(filters.clone(), &table);

        for (row, visible) in table.rows.iter().zip(&visibility) {
            let expected = filters
                .predicates(layout)
                .into_iter()
                .all(|(column, needle)| row.cell(column).is_some_and(|cell| cell.contains(needle)));
            assert_eq!(*visible, expected, "row {} with {:?}", row.partner, filters);
        }
    }
}

#[test]
fn search_is_case_insensitive_on_partner() {
    let table = sample_table();
    let mut state = FilterState::default();

    let visibility = state.apply_search("SMI", &table);
    assert_eq!(visible_partners(&table, &visibility), vec!["Smiles"]);

    let visibility = state.apply_search("", &table);
    assert_eq!(visibility.len(), table.len());
    assert!(visibility.iter().all(|v| *v));
}

#[test]
fn search_and_column_filters_always_combine() {
    let table = sample_table();
    let mut state = FilterState::default();

    state.apply_column_filters(
        ColumnFilters {
            offer: "Sim".into(),
            ..Default::default()
        },
        &table,
    );
    // "a" matches Latam and Amazon by name; only Amazon is on offer
    let visibility = state.apply_search("a", &table);
    assert_eq!(visible_partners(&table, &visibility), vec!["Amazon"]);

    // Re-running the column filters keeps the search in effect
    let visibility = state.apply_column_filters(
        ColumnFilters {
            tier: "2".into(),
            ..Default::default()
        },
        &table,
    );
    assert_eq!(visible_partners(&table, &visibility), vec!["Latam"]);
}
