//! Browsing session state: details modal, hover card, landing page data and favorites.
//!
//! Each piece is published on a `tokio::sync::watch` channel so a renderer can subscribe
//! and redraw on change.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::catalog::CatalogApi;
use crate::favorites::{FavoritesStore, Toggle};
use crate::models::{ApiConfig, HomePage, MovieDetails, MovieSummary, Trailer};

/// Where a dismissed hover card is parked.
pub const OFFSCREEN_X: f32 = -500.0;

pub const MODAL_LOAD_ERROR: &str = "Failed to load movie data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalState {
    pub is_open: bool,
    pub video_id: String,
    pub movie_id: String,
    pub movie_data: Option<Arc<MovieDetails>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ModalState {
    fn opening(video_id: &str, movie_id: String) -> Self {
        Self {
            is_open: true,
            video_id: video_id.to_string(),
            movie_id,
            movie_data: None,
            loading: true,
            error: None,
        }
    }

    fn loaded(video_id: &str, movie_id: String, details: Arc<MovieDetails>) -> Self {
        Self {
            is_open: true,
            video_id: video_id.to_string(),
            movie_id,
            movie_data: Some(details),
            loading: false,
            error: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        match (self.is_open, self.loading, &self.movie_data, &self.error) {
            (false, ..) => ModalPhase::Closed,
            (true, true, ..) => ModalPhase::Opening,
            (true, false, Some(_), _) => ModalPhase::Loaded,
            (true, false, None, _) => ModalPhase::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardContent {
    pub title: String,
    pub description: String,
    pub poster_path: Option<String>,
}

/// Hover preview. `position` only means something while `is_hovered` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardViewState {
    pub is_hovered: bool,
    pub card_id: Option<u64>,
    pub item: Option<MovieSummary>,
    pub position: Position,
    pub dimensions: Dimensions,
    pub content: Option<CardContent>,
}

impl CardViewState {
    fn dismiss(&mut self) {
        self.is_hovered = false;
        self.item = None;
        self.content = None;
        self.position = Position {
            x: OFFSCREEN_X,
            y: 0.0,
        };
    }
}

pub struct ViewStore {
    catalog: Arc<dyn CatalogApi>,
    cache: Arc<ResultCache>,
    favorites: FavoritesStore,
    generation: AtomicU64,
    modal: watch::Sender<ModalState>,
    card: watch::Sender<CardViewState>,
    card_view: watch::Sender<bool>,
    home: watch::Sender<HomePage>,
    trailer: watch::Sender<Option<Trailer>>,
    favorites_refresh: watch::Sender<bool>,
}

impl ViewStore {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        cache: Arc<ResultCache>,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            catalog,
            cache,
            favorites,
            generation: AtomicU64::new(0),
            modal: watch::Sender::new(ModalState::default()),
            card: watch::Sender::new(CardViewState::default()),
            card_view: watch::Sender::new(false),
            home: watch::Sender::new(HomePage::default()),
            trailer: watch::Sender::new(None),
            favorites_refresh: watch::Sender::new(false),
        }
    }

    pub fn modal(&self) -> ModalState {
        self.modal.borrow().clone()
    }

    pub fn subscribe_modal(&self) -> watch::Receiver<ModalState> {
        self.modal.subscribe()
    }

    pub fn card(&self) -> CardViewState {
        self.card.borrow().clone()
    }

    pub fn subscribe_card(&self) -> watch::Receiver<CardViewState> {
        self.card.subscribe()
    }

    pub fn home(&self) -> HomePage {
        self.home.borrow().clone()
    }

    pub fn subscribe_home(&self) -> watch::Receiver<HomePage> {
        self.home.subscribe()
    }

    pub fn config(&self) -> Option<ApiConfig> {
        self.home.borrow().config.clone()
    }

    pub fn selected_trailer(&self) -> Option<Trailer> {
        self.trailer.borrow().clone()
    }

    pub fn card_view(&self) -> bool {
        *self.card_view.borrow()
    }

    pub fn subscribe_favorites_refresh(&self) -> watch::Receiver<bool> {
        self.favorites_refresh.subscribe()
    }

    /// Publishes the landing page data for the rest of the session.
    pub fn load_home(&self, page: HomePage) {
        self.home.send_replace(page);
    }

    /// Fetches the landing page and publishes it.
    pub async fn refresh_home(&self) {
        let page = self.catalog.home_page().await;
        self.load_home(page);
    }

    /// Opens the details modal for `movie_id`, reading through the result cache.
    ///
    /// A result that arrives after the modal was closed or re-targeted is dropped.
    pub async fn open_modal(&self, video_id: &str, movie_id: u64) {
        info!("Opening modal with video id '{}' and movie id {}", video_id, movie_id);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let movie_key = movie_id.to_string();
        self.card.send_modify(CardViewState::dismiss);

        if let Some(hit) = self.cache.get(movie_id).await {
            if !self.publish_current(generation, ModalState::loaded(video_id, movie_key, hit)) {
                debug!(movie_id, "Discarding stale cached modal result");
            }
            return;
        }

        if !self.publish_current(generation, ModalState::opening(video_id, movie_key.clone())) {
            debug!(movie_id, "Modal closed or re-targeted before loading");
            return;
        }

        let catalog = self.catalog.clone();
        let result = self
            .cache
            .get_or_fetch(movie_id, || async move { catalog.movie_by_id(movie_id).await })
            .await;

        self.modal.send_if_modified(|state| {
            let current = self.generation.load(Ordering::SeqCst) == generation
                && state.is_open
                && state.movie_id == movie_key;
            if !current {
                debug!(movie_id, "Discarding stale modal result");
                return false;
            }
            state.loading = false;
            match &result {
                Ok(details) => {
                    state.movie_data = Some(details.clone());
                    state.error = None;
                }
                Err(e) => {
                    warn!("Error fetching movie data for {}: {}", movie_id, e);
                    state.movie_data = None;
                    state.error = Some(MODAL_LOAD_ERROR.to_string());
                }
            }
            true
        });
    }

    /// Replaces the modal state unless a newer open or a close has happened since `generation`.
    fn publish_current(&self, generation: u64, next: ModalState) -> bool {
        self.modal.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Resets the modal whatever it is doing; in-flight loads are discarded.
    pub fn close_modal(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.modal.send_replace(ModalState::default());
    }

    pub fn hover_enter(&self, item: MovieSummary, position: Position, dimensions: Dimensions) {
        let content = CardContent {
            title: item.title.clone(),
            description: item.overview.clone().unwrap_or_default(),
            poster_path: item.poster_path.clone(),
        };
        self.card.send_replace(CardViewState {
            is_hovered: true,
            card_id: Some(item.id),
            item: Some(item),
            position,
            dimensions,
            content: Some(content),
        });
    }

    pub fn hover_leave(&self) {
        self.card.send_modify(CardViewState::dismiss);
    }

    /// Flips between row and grid listing; the hover card never survives the switch.
    pub fn toggle_card_view(&self) {
        self.card_view.send_modify(|v| *v = !*v);
        self.card.send_modify(CardViewState::dismiss);
    }

    /// Looks up the trailer for `movie_id` and publishes it as the selected one.
    pub async fn load_trailer(&self, movie_id: u64) -> Option<Trailer> {
        let trailer = match self.catalog.trailer(movie_id).await {
            Ok(trailer) => trailer,
            Err(e) => {
                warn!("Failed to fetch trailer for {}: {}", movie_id, e);
                None
            }
        };
        if trailer.is_none() {
            debug!(movie_id, "No trailer found");
        }
        self.trailer.send_replace(trailer.clone());
        trailer
    }

    pub fn favorites(&self) -> Vec<MovieSummary> {
        self.favorites.load()
    }

    /// Adds or removes `movie`; a removal dismisses the hover card and signals list refresh.
    pub fn toggle_favorite(&self, movie: &MovieSummary) -> Result<Toggle> {
        let outcome = self.favorites.toggle(movie)?;
        if outcome == Toggle::Removed {
            self.card.send_modify(CardViewState::dismiss);
            self.favorites_refresh.send_modify(|v| *v = !*v);
        }
        Ok(outcome)
    }
}
