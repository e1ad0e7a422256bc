//! Raw TMDB shapes to domain records. Everything here is pure.

use crate::error::TmdbResult;
use crate::models::{Genre, MovieDetails, MovieSummary, Trailer};
use crate::tmdb::{self, RawGenreList, RawListItem, RawPage, RawVideo};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/";
pub const DEFAULT_IMAGE_SIZE: &str = "w500";

pub fn default_image_url(path: &str) -> String {
    format!("{IMAGE_BASE}{DEFAULT_IMAGE_SIZE}{path}")
}

/// List rows carry the backdrop in `poster_path`; cards are landscape.
pub fn summary_from_raw(item: &RawListItem) -> MovieSummary {
    let title = item
        .title
        .clone()
        .or_else(|| item.name.clone())
        .unwrap_or_default();
    let image_path = item.backdrop_path.clone().filter(|p| !p.is_empty());
    MovieSummary {
        id: item.id,
        title,
        image: image_path.as_deref().map(default_image_url),
        poster_path: image_path,
        overview: item.overview.clone().filter(|o| !o.is_empty()),
    }
}

pub fn summaries_from_page(page: &RawPage) -> Vec<MovieSummary> {
    page.results.iter().map(summary_from_raw).collect()
}

pub fn details_from_raw(value: serde_json::Value) -> TmdbResult<MovieDetails> {
    tmdb::parse("movie details", value)
}

/// First YouTube entry typed "Trailer". `None` is "no trailer", not a failure.
pub fn select_trailer(videos: &[RawVideo]) -> Option<Trailer> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| Trailer { key: v.key.clone() })
}

pub fn genres_from_raw(list: RawGenreList) -> Vec<Genre> {
    list.genres
}
