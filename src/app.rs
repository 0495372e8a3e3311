#![cfg(feature = "web")]

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::dispatch::{Intent, dispatch};
use crate::downloader;
use crate::error::LiveloError;
use crate::loader;
use crate::row::ColumnLayout;
use crate::saving;
use crate::state::AppState;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::table::OfferTable;
use crate::view::{ViewUpdate, table_body_html, table_head_html};

pub type SharedState = Arc<Mutex<AppState>>;

#[derive(Serialize)]
struct ViewResponse {
    status: &'static str,
    view: ViewUpdate,
    head_html: String,
    body_html: String,
}

impl ViewResponse {
    fn new(view: ViewUpdate, state: &AppState) -> Self {
        ViewResponse {
            status: "ok",
            head_html: table_head_html(&state.table.layout, &view.indicators),
            body_html: table_body_html(&view.rows, &view.buttons),
            view,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

impl IntoResponse for LiveloError {
    fn into_response(self) -> Response {
        let code = match self {
            LiveloError::NothingToExport | LiveloError::UnknownColumn(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::warn!("request failed: {}", self);
        (
            code,
            Json(ErrorResponse {
                status: "error",
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the session state described by `config`.
///
/// An unusable storage directory degrades to in-memory storage for the
/// session instead of refusing to start.
pub fn build_state(config: &Config) -> Result<AppState, LiveloError> {
    let table = match &config.data_path {
        Some(path) => loader::load_table(path, ColumnLayout::default())?,
        None => {
            log::warn!("LIVELO_DATA not set; starting with an empty table");
            OfferTable::new(ColumnLayout::default())
        }
    };

    let storage: Box<dyn Storage> = match FileStorage::open(&config.storage_dir) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}; favorites will not survive this session", e);
            Box::new(MemoryStorage::new())
        }
    };

    Ok(AppState::new(table, storage)?.with_affirmative(config.affirmative.clone()))
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/view", get(get_view))
        .route("/api/intent", post(post_intent))
        .route("/api/export.csv", get(export_csv))
        .route("/api/export.xlsx", get(export_xlsx))
        .route("/api/snapshot", get(export_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(Mutex::new(build_state(&config)?));
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    log::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// A panic mid-intent leaves the state usable; keep serving it.
fn lock(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn serve_dashboard(State(state): State<SharedState>) -> Html<String> {
    let state = lock(&state);
    let view = ViewUpdate::from_state(&state);

    let page = include_str!("./static/dashboard.html")
        .replace("{{THEME}}", state.theme.as_str())
        .replace("{{THEME_ICON}}", state.theme.icon())
        .replace("{{WALLET_COUNT}}", &view.wallet.count.to_string())
        .replace("{{WALLET}}", &view.wallet.html)
        .replace(
            "{{TABLE_HEAD}}",
            &table_head_html(&state.table.layout, &view.indicators),
        )
        .replace("{{TABLE_BODY}}", &table_body_html(&view.rows, &view.buttons));

    Html(page)
}

async fn get_view(State(state): State<SharedState>) -> impl IntoResponse {
    let state = lock(&state);
    let view = ViewUpdate::from_state(&state);
    Json(ViewResponse::new(view, &state))
}

async fn post_intent(
    State(state): State<SharedState>,
    Json(intent): Json<Intent>,
) -> Result<Json<ViewResponse>, LiveloError> {
    let mut state = lock(&state);
    let view = dispatch(&mut state, intent)?;
    Ok(Json(ViewResponse::new(view, &state)))
}

async fn export_csv(State(state): State<SharedState>) -> Result<Response, LiveloError> {
    let state = lock(&state);
    let csv = downloader::to_csv(&state)?;
    Ok(download(csv.into_bytes(), "text/csv; charset=utf-8", "livelo.csv"))
}

async fn export_xlsx(State(state): State<SharedState>) -> Result<Response, LiveloError> {
    let state = lock(&state);
    let xlsx = downloader::to_xlsx(&state)?;
    Ok(download(
        xlsx,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "livelo.xlsx",
    ))
}

async fn export_snapshot(State(state): State<SharedState>) -> Result<Response, LiveloError> {
    let state = lock(&state);
    let bytes = saving::to_bytes(&state.table)?;
    Ok(download(bytes, "application/gzip", "livelo.bin.gz"))
}

fn download(bytes: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(bytes),
    )
        .into_response()
}
