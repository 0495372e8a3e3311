use crate::favorites::{FavoriteRecord, Favorites, composite_key};
use crate::row::ColumnLayout;
use crate::sort::SortDescriptor;
use crate::state::AppState;
use crate::table::OfferTable;
use crate::theme::Theme;
use serde::Serialize;

pub const EMPTY_WALLET_MESSAGE: &str = "Adicione parceiros aos favoritos clicando na estrela ⭐";
pub const EMPTY_WALLET_HINT: &str = "Seus favoritos ficarão sempre visíveis aqui";
pub const TITLE_ADD: &str = "Adicionar aos favoritos";
pub const TITLE_REMOVE: &str = "Remover dos favoritos";

/// Everything the page needs to redraw after an intent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewUpdate {
    pub wallet: WalletPanel,
    pub buttons: Vec<FavoriteButton>,
    pub indicators: Vec<SortIndicator>,
    pub rows: Vec<RowView>,
    pub theme: Theme,
    pub theme_icon: &'static str,
}

impl ViewUpdate {
    pub fn from_state(state: &AppState) -> Self {
        ViewUpdate {
            wallet: render_wallet(state.favorites.records()),
            buttons: render_buttons(&state.table, &state.favorites),
            indicators: render_indicators(&state.table.layout, &state.sort),
            rows: render_rows(&state.table, &state.visibility, &state.favorites),
            theme: state.theme,
            theme_icon: state.theme.icon(),
        }
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|r| r.visible).count()
    }
}

/// The "Minha Carteira" summary panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WalletPanel {
    pub count: usize,
    pub empty: bool,
    pub html: String,
}

/// Visual state of one star control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FavoriteButton {
    pub partner: String,
    pub currency: String,
    pub active: bool,
    pub title: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortGlyph {
    Neutral,
    Up,
    Down,
}

impl SortGlyph {
    pub fn class(self) -> &'static str {
        match self {
            SortGlyph::Neutral => "bi-arrows-expand",
            SortGlyph::Up => "bi-sort-up",
            SortGlyph::Down => "bi-sort-down",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortIndicator {
    pub column: usize,
    pub glyph: SortGlyph,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub key: String,
    pub cells: Vec<String>,
    pub visible: bool,
    pub favorite: bool,
}

/// Render the wallet panel from the current favorites.
pub fn render_wallet(records: &[FavoriteRecord]) -> WalletPanel {
    if records.is_empty() {
        let html = format!(
            concat!(
                "<div class=\"carteira-vazia\">",
                "<i class=\"bi bi-star text-muted\"></i>",
                "<p class=\"mb-0 mt-2\">{}</p>",
                "<small class=\"text-muted\">{}</small>",
                "</div>"
            ),
            EMPTY_WALLET_MESSAGE, EMPTY_WALLET_HINT
        );
        return WalletPanel {
            count: 0,
            empty: true,
            html,
        };
    }

    let html = records
        .iter()
        .map(|fav| {
            let badge = if fav.has_offer {
                "<span class=\"badge bg-success ms-1\">Em Oferta</span>"
            } else {
                ""
            };
            format!(
                concat!(
                    "<div class=\"carteira-item\">",
                    "<div><div class=\"carteira-nome\">{}</div>",
                    "<div class=\"carteira-info\">{} • Tier {} • {}{}</div></div>",
                    "<div class=\"carteira-pontos\">{} pts</div>",
                    "</div>"
                ),
                escape_html(&fav.partner),
                escape_html(&fav.category),
                escape_html(&fav.tier),
                escape_html(&fav.currency),
                badge,
                escape_html(&fav.points),
            )
        })
        .collect::<String>();

    WalletPanel {
        count: records.len(),
        empty: false,
        html,
    }
}

/// Star control state for every row in the table.
pub fn render_buttons(table: &OfferTable, favorites: &Favorites) -> Vec<FavoriteButton> {
    table
        .rows
        .iter()
        .map(|row| {
            let active = favorites.contains(&row.partner, &row.currency);
            FavoriteButton {
                partner: row.partner.clone(),
                currency: row.currency.clone(),
                active,
                title: if active { TITLE_REMOVE } else { TITLE_ADD },
            }
        })
        .collect()
}

/// One indicator per column; only the active column shows a direction.
pub fn render_indicators(layout: &ColumnLayout, sort: &SortDescriptor) -> Vec<SortIndicator> {
    (0..layout.column_count())
        .map(|column| match sort.direction_for(column) {
            Some(true) => SortIndicator {
                column,
                glyph: SortGlyph::Up,
                active: true,
            },
            Some(false) => SortIndicator {
                column,
                glyph: SortGlyph::Down,
                active: true,
            },
            None => SortIndicator {
                column,
                glyph: SortGlyph::Neutral,
                active: false,
            },
        })
        .collect()
}

pub fn render_rows(table: &OfferTable, visibility: &[bool], favorites: &Favorites) -> Vec<RowView> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| RowView {
            key: composite_key(&row.partner, &row.currency),
            cells: row.cells.clone(),
            visible: visibility.get(i).copied().unwrap_or(true),
            favorite: favorites.contains(&row.partner, &row.currency),
        })
        .collect()
}

/// `<thead>` markup with clickable, indicator-carrying headers.
pub fn table_head_html(layout: &ColumnLayout, indicators: &[SortIndicator]) -> String {
    let mut html = String::from("<tr><th></th>");
    for (column, title) in layout.titles.iter().enumerate() {
        let glyph = indicators
            .get(column)
            .map(|i| (i.glyph.class(), if i.active { " active" } else { "" }))
            .unwrap_or((SortGlyph::Neutral.class(), ""));
        html.push_str(&format!(
            "<th data-column=\"{}\" data-kind=\"{}\">{} <i class=\"bi {} sort-indicator{}\"></i></th>",
            column,
            layout.kind_for(column).as_str(),
            escape_html(title),
            glyph.0,
            glyph.1
        ));
    }
    html.push_str("</tr>");
    html
}

/// `<tbody>` markup; hidden rows carry `display: none`.
pub fn table_body_html(rows: &[RowView], buttons: &[FavoriteButton]) -> String {
    let mut html = String::new();
    for (row, button) in rows.iter().zip(buttons) {
        let style = if row.visible { "" } else { " style=\"display: none\"" };
        html.push_str(&format!("<tr{}>", style));
        html.push_str(&format!(
            "<td><button class=\"favorito-btn{}\" data-parceiro=\"{}\" data-moeda=\"{}\" title=\"{}\">★</button></td>",
            if button.active { " ativo" } else { "" },
            escape_html(&button.partner),
            escape_html(&button.currency),
            button.title
        ));
        for cell in &row.cells {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>");
    }
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
