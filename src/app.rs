use crate::cache::ResultCache;
use crate::catalog::{Catalog, CatalogApi};
use crate::config::Config;
use crate::error::{TmdbError, ValidationError};
use crate::models::HomePage;
use crate::tmdb::TmdbClient;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const MOVIE_FETCH_FAILED: &str = "Failed to fetch movie details.";
const TRAILER_FETCH_FAILED: &str = "Failed to fetch movie trailer.";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub cache: Arc<ResultCache>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            catalog,
            cache: Arc::new(ResultCache::new()),
        }
    }
}

/// `{error: message}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn upstream(err: &TmdbError, fallback: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.public_message().unwrap_or(fallback).to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb = TmdbClient::from_config(&config)?;
    let catalog: Arc<dyn CatalogApi> = Arc::new(Catalog::new(tmdb));
    let app = build_router(AppState::new(catalog));

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home))
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/:id", get(movie_details))
        .route("/api/movies/:id/similar", get(similar_movies))
        .route("/api/movies/:id/trailer", get(movie_trailer))
        .route("/api/trailer/:id", get(movie_trailer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

pub fn parse_movie_id(raw: &str) -> Result<u64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingMovieId);
    }
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidMovieId),
    }
}

async fn home(State(state): State<AppState>) -> Json<HomePage> {
    let page = state.catalog.home_page().await;
    if let Some(details) = page.selected_movie.clone() {
        state.cache.put(details.id, details).await;
    }
    Json(page)
}

async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_movie_id(&id)?;
    let catalog = state.catalog.clone();
    match state
        .cache
        .get_or_fetch(id, || async move { catalog.movie_by_id(id).await })
        .await
    {
        Ok(details) => Ok(Json(json!({ "movieDetails": *details }))),
        Err(e) => {
            error!("Error fetching movie details for {}: {}", id, e);
            Err(ApiError::upstream(&e, MOVIE_FETCH_FAILED))
        }
    }
}

async fn similar_movies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_movie_id(&id)?;
    let similar = state.catalog.similar(id).await;
    Ok(Json(json!({ "similarMovies": similar })))
}

async fn movie_trailer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_movie_id(&id)?;
    match state.catalog.trailer(id).await {
        Ok(trailer) => Ok(Json(json!({ "trailer": trailer }))),
        Err(e) => {
            error!("Error fetching movie trailer for {}: {}", id, e);
            Err(ApiError::upstream(&e, TRAILER_FETCH_FAILED))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    keyword: Option<String>,
    page: Option<String>,
}

async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let keyword = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(ValidationError::MissingKeyword)?;
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let movies = state.catalog.search(keyword, page).await;
    Ok(Json(json!({ "movies": movies })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
