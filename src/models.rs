use serde::{Deserialize, Serialize};

/// One movie as it appears in list, search, discover and similar results.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    /// Relative image path. Filled from the upstream backdrop, not the poster.
    pub poster_path: Option<String>,
    /// Viewable `w500` URL composed from `poster_path`.
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A genre with the movies discovered under it, in upstream order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenreGroup {
    #[serde(flatten)]
    pub genre: Genre,
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Trailer {
    pub key: String,
}

impl Trailer {
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub base_url: String,
    pub secure_base_url: String,
}

/// Image hosts published by the `configuration` endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub images: ImageConfig,
}

impl ApiConfig {
    /// Composes a viewable URL, e.g. `image_url("/abc.jpg", "w500")`.
    pub fn image_url(&self, path: &str, size: &str) -> String {
        format!("{}{}{}", self.images.secure_base_url, size, path)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
}

/// Full record from `movie/{id}`. Field names follow the upstream payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieDetails {
    /// Runtime as `"2h 16m"`, or `"45m"` under an hour.
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime?;
        let hours = minutes / 60;
        let mins = minutes % 60;
        if hours == 0 {
            Some(format!("{mins}m"))
        } else {
            Some(format!("{hours}h {mins}m"))
        }
    }

    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.backdrop_path.clone(),
            image: self
                .backdrop_path
                .as_deref()
                .map(crate::mapper::default_image_url),
            overview: Some(self.overview.clone()).filter(|o| !o.is_empty()),
        }
    }
}

/// Everything the landing page needs, gathered in one pass.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub config: Option<ApiConfig>,
    pub popular_shows: Vec<MovieSummary>,
    pub trending_shows: Vec<MovieSummary>,
    pub top_rated_shows: Vec<MovieSummary>,
    pub movies_with_genre: Vec<GenreGroup>,
    pub selected_movie: Option<MovieDetails>,
}
