/*!
# Livelo Analytics

Table interaction engine for a rewards-point comparison dashboard, built in Rust.

## Overview

The dashboard shows one table of partner offers (points per currency unit,
category, tier, offer status). Users pin partner/currency pairs to a wallet
("Minha Carteira"), filter rows by column values or partner name, and sort by
any column. This crate holds that behavior; the page itself is a render target.

## Architecture

### Data
- **row / table**: typed offer rows held in display order, loaded once at
  startup. `ColumnLayout` maps column indices to meanings.
- **loader / saving**: CSV import from the report generator and gzip+bincode
  table snapshots.
- **storage**: scoped key-value region (`FileStorage`, `MemoryStorage`).

### Engines
- **extractor**: snapshot of a row's favorite-relevant cells.
- **favorites**: insertion-ordered set of favorites keyed by `partner|currency`.
- **filter**: conjunction of column substring predicates and partner search.
- **sort**: single active column, toggling direction, type-aware stable sort.

### Presentation
- **view**: derives the wallet panel, star buttons, sort indicators and row
  visibility from state.
- **state / dispatch**: one owned `AppState` per session and a closed set of
  `Intent`s, each a state transition followed by a view derivation.
- **app** (feature `web`): axum server exposing the dashboard and intents.

## Storage layout

- `livelo_favoritos`: JSON array of favorite records
- `livelo_theme`: `"light"` or `"dark"`
*/

pub mod config;
pub mod dispatch;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod favorites;
pub mod filter;
pub mod loader;
pub mod row;
pub mod saving;
pub mod sort;
pub mod state;
pub mod storage;
pub mod table;
pub mod theme;
pub mod view;

#[cfg(feature = "web")]
pub mod app;

pub use dispatch::{Intent, dispatch};
pub use error::{LiveloError, Result};
pub use favorites::{FavoriteRecord, Favorites, composite_key};
pub use state::AppState;
pub use table::OfferTable;
