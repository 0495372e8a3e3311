#![cfg(not(tarpaulin_include))]

use livelo_analytics::config::Config;
use livelo_analytics::dispatch::{Intent, dispatch};
use livelo_analytics::downloader;
use livelo_analytics::filter::ColumnFilters;
use livelo_analytics::loader;
use livelo_analytics::row::ColumnLayout;
use livelo_analytics::saving;
use livelo_analytics::state::AppState;
use livelo_analytics::storage::FileStorage;
use livelo_analytics::view::{SortGlyph, ViewUpdate};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("livelo_analytics=warn"))
        .init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    let data_path = args
        .get(1)
        .map(std::path::PathBuf::from)
        .or_else(|| config.data_path.clone());
    let Some(data_path) = data_path else {
        eprintln!("Usage: {} <offers.csv|offers.bin.gz>", args[0]);
        return Ok(());
    };

    let table = loader::load_table(&data_path, ColumnLayout::default())?;
    let storage = FileStorage::open(&config.storage_dir)?;
    let mut state = AppState::new(table, Box::new(storage))?.with_affirmative(config.affirmative);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut start_time = Instant::now();
    let mut status = String::from("ok");
    let mut show = true;
    let mut view = ViewUpdate::from_state(&state);

    loop {
        if show {
            display(&state, &view);
        }

        print!("[{:.1}] ({}) > ", start_time.elapsed().as_secs_f64(), status);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let command = line.trim();
        start_time = Instant::now();

        match command {
            "" => {
                status = String::from("invalid command");
                continue;
            }
            "q" => break,
            "help" => {
                print_help();
                continue;
            }
            "disable_output" => {
                show = false;
                status = String::from("ok");
                continue;
            }
            "enable_output" => {
                show = true;
                status = String::from("ok");
                continue;
            }
            _ => {}
        }

        if let Some(path) = command.strip_prefix("export ") {
            status = match downloader::to_csv(&state).map(|csv| std::fs::write(path.trim(), csv)) {
                Ok(Ok(())) => String::from("ok"),
                Ok(Err(e)) => e.to_string(),
                Err(e) => e.to_string(),
            };
            continue;
        }
        if let Some(path) = command.strip_prefix("snapshot ") {
            status = match saving::save_table(&state.table, path.trim()) {
                Ok(()) => String::from("ok"),
                Err(e) => e.to_string(),
            };
            continue;
        }

        let intent = match parse_command(command, &state, &mut lines) {
            Some(intent) => intent,
            None => {
                status = String::from("invalid command");
                continue;
            }
        };

        match dispatch(&mut state, intent) {
            Ok(update) => {
                view = update;
                status = String::from("ok");
            }
            Err(e) => status = e.to_string(),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  fav <partner>|<currency>: Toggle a favorite");
    println!("  search <text>: Filter rows by partner name");
    println!("  filter <field>=<value> ...: Set column filters (category, tier, offer, experience, frequency)");
    println!("  sort <column> [texto|numero|data]: Sort by column");
    println!("  clear: Empty the wallet");
    println!("  theme: Toggle light/dark");
    println!("  export <file.csv>: Write visible rows as CSV");
    println!("  snapshot <file.bin.gz>: Save the table snapshot");
    println!("  disable_output / enable_output: Toggle the table display");
}

fn parse_command(
    command: &str,
    state: &AppState,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Option<Intent> {
    let (verb, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();

    match verb {
        "fav" => {
            let (partner, currency) = rest.split_once('|')?;
            Some(Intent::ToggleFavorite {
                partner: partner.trim().to_string(),
                currency: currency.trim().to_string(),
            })
        }
        "search" => Some(Intent::Search {
            query: rest.to_string(),
        }),
        "filter" => {
            let mut filters = state.filters.columns.clone();
            for pair in rest.split_whitespace() {
                let (field, value) = pair.split_once('=')?;
                let slot = match field {
                    "category" => &mut filters.category,
                    "tier" => &mut filters.tier,
                    "offer" => &mut filters.offer,
                    "experience" => &mut filters.experience,
                    "frequency" => &mut filters.frequency,
                    _ => return None,
                };
                *slot = value.to_string();
            }
            if rest.is_empty() {
                filters = ColumnFilters::default();
            }
            Some(Intent::ApplyFilter { filters })
        }
        "sort" => {
            let mut parts = rest.split_whitespace();
            let column = parts.next()?.parse().ok()?;
            let kind = match parts.next() {
                Some(kind) => Some(kind.parse().ok()?),
                None => None,
            };
            Some(Intent::Sort { column, kind })
        }
        "clear" => {
            print!("Deseja realmente limpar todos os favoritos? [s/N] ");
            io::stdout().flush().ok()?;
            let answer = lines.next()?.ok()?;
            let confirmed = matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes");
            Some(Intent::ClearWallet { confirmed })
        }
        "theme" => Some(Intent::ToggleTheme),
        _ => None,
    }
}

fn display(state: &AppState, view: &ViewUpdate) {
    let layout = &state.table.layout;

    println!("Minha Carteira ({} favoritos)", view.wallet.count);
    if state.favorites.is_empty() {
        println!("  (vazia)");
    }
    for fav in state.favorites.records() {
        println!(
            "  ★ {} • {} • Tier {} • {} • {} pts{}",
            fav.partner,
            fav.category,
            fav.tier,
            fav.currency,
            fav.points,
            if fav.has_offer { " [Em Oferta]" } else { "" }
        );
    }
    println!();

    let header: Vec<String> = layout
        .titles
        .iter()
        .zip(&view.indicators)
        .map(|(title, indicator)| match indicator.glyph {
            SortGlyph::Up => format!("{} ▲", title),
            SortGlyph::Down => format!("{} ▼", title),
            SortGlyph::Neutral => title.clone(),
        })
        .collect();
    println!("   {}", header.join(" | "));

    for row in view.rows.iter().filter(|r| r.visible) {
        println!(
            "{}  {}",
            if row.favorite { "★" } else { "☆" },
            row.cells.join(" | ")
        );
    }
    println!("({} of {} rows)", view.visible_count(), view.rows.len());
}
