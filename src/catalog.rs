use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::TmdbResult;
use crate::mapper;
use crate::models::{ApiConfig, Genre, GenreGroup, HomePage, MovieDetails, MovieSummary, Trailer};
use crate::tmdb::{RawGenreList, RawPage, RawVideos, TmdbClient};

/// One operation per browsing use case.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn config(&self) -> Option<ApiConfig>;
    async fn popular(&self) -> Vec<MovieSummary>;
    async fn trending(&self) -> Vec<MovieSummary>;
    async fn top_rated(&self) -> Vec<MovieSummary>;
    async fn genres(&self) -> Option<Vec<Genre>>;
    async fn movies_by_genre(&self, genre_id: u64) -> Vec<MovieSummary>;
    async fn search(&self, keyword: &str, page: u32) -> Vec<MovieSummary>;
    async fn movie_by_id(&self, id: u64) -> TmdbResult<MovieDetails>;
    async fn similar(&self, id: u64) -> Vec<MovieSummary>;
    async fn trailer(&self, id: u64) -> TmdbResult<Option<Trailer>>;
    async fn home_page(&self) -> HomePage;
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tmdb: Arc<TmdbClient>,
}

impl Catalog {
    pub fn new(tmdb: TmdbClient) -> Self {
        Self {
            tmdb: Arc::new(tmdb),
        }
    }

    async fn list(&self, endpoint: &str, params: &[(&str, String)]) -> Vec<MovieSummary> {
        match self.tmdb.get::<RawPage>(endpoint, params).await {
            Ok(page) => mapper::summaries_from_page(&page),
            Err(e) => {
                warn!("Returning empty list for {}: {}", endpoint, e);
                Vec::new()
            }
        }
    }

    /// Landing page with an explicit index picker for the featured movie.
    ///
    /// `pick` receives the number of popular movies (always > 0) and returns an index;
    /// out-of-range indices are clamped.
    pub async fn home_page_with(&self, pick: impl FnOnce(usize) -> usize + Send) -> HomePage {
        let (config, popular, trending, top_rated, genres) = tokio::join!(
            self.config(),
            self.popular(),
            self.trending(),
            self.top_rated(),
            self.genres(),
        );

        let movies_with_genre = match genres {
            Some(genres) => self.genre_groups(genres).await,
            None => Vec::new(),
        };

        let selected_movie = if popular.is_empty() {
            warn!("No popular movies available to feature");
            None
        } else {
            let index = pick(popular.len()).min(popular.len() - 1);
            let featured = popular[index].id;
            match self.movie_by_id(featured).await {
                Ok(details) => Some(details),
                Err(e) => {
                    warn!("Featured movie {} unavailable: {}", featured, e);
                    None
                }
            }
        };

        info!(
            popular = popular.len(),
            trending = trending.len(),
            top_rated = top_rated.len(),
            genres = movies_with_genre.len(),
            featured = selected_movie.is_some(),
            "Home page assembled"
        );

        HomePage {
            config,
            popular_shows: popular,
            trending_shows: trending,
            top_rated_shows: top_rated,
            movies_with_genre,
            selected_movie,
        }
    }

    /// One discovery task per genre. A task that dies is dropped; the rest keep genre order.
    async fn genre_groups(&self, genres: Vec<Genre>) -> Vec<GenreGroup> {
        let mut tasks = JoinSet::new();
        for (index, genre) in genres.into_iter().enumerate() {
            let catalog = self.clone();
            tasks.spawn(async move {
                let movies = catalog.movies_by_genre(genre.id).await;
                (index, GenreGroup { genre, movies })
            });
        }

        let mut groups = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(group) => groups.push(group),
                Err(e) => warn!("Genre discovery task failed: {}", e),
            }
        }
        groups.sort_by_key(|(index, _)| *index);
        groups.into_iter().map(|(_, group)| group).collect()
    }
}

#[async_trait]
impl CatalogApi for Catalog {
    async fn config(&self) -> Option<ApiConfig> {
        match self.tmdb.get::<ApiConfig>("configuration", &[]).await {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("TMDB configuration unavailable: {}", e);
                None
            }
        }
    }

    async fn popular(&self) -> Vec<MovieSummary> {
        self.list("movie/popular", &[]).await
    }

    async fn trending(&self) -> Vec<MovieSummary> {
        self.list("trending/movie/week", &[]).await
    }

    async fn top_rated(&self) -> Vec<MovieSummary> {
        self.list("movie/top_rated", &[]).await
    }

    async fn genres(&self) -> Option<Vec<Genre>> {
        match self.tmdb.get::<RawGenreList>("genre/movie/list", &[]).await {
            Ok(list) => Some(mapper::genres_from_raw(list)),
            Err(e) => {
                warn!("Genre list unavailable: {}", e);
                None
            }
        }
    }

    async fn movies_by_genre(&self, genre_id: u64) -> Vec<MovieSummary> {
        self.list(
            "discover/movie",
            &[("with_genres", genre_id.to_string()), ("page", 1.to_string())],
        )
        .await
    }

    async fn search(&self, keyword: &str, page: u32) -> Vec<MovieSummary> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }
        self.list(
            "search/movie",
            &[("query", keyword.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    async fn movie_by_id(&self, id: u64) -> TmdbResult<MovieDetails> {
        let value = self
            .tmdb
            .request(&format!("movie/{id}"), &[("language", "en-US".to_string())])
            .await?;
        mapper::details_from_raw(value)
    }

    async fn similar(&self, id: u64) -> Vec<MovieSummary> {
        self.list(
            &format!("movie/{id}/similar"),
            &[("language", "en-US".to_string()), ("page", 1.to_string())],
        )
        .await
    }

    async fn trailer(&self, id: u64) -> TmdbResult<Option<Trailer>> {
        let videos: RawVideos = self
            .tmdb
            .get(
                &format!("movie/{id}/videos"),
                &[("language", "en-US".to_string())],
            )
            .await?;
        Ok(mapper::select_trailer(&videos.results))
    }

    async fn home_page(&self) -> HomePage {
        self.home_page_with(|len| rand::random_range(0..len)).await
    }
}
