#![allow(dead_code)]

use async_trait::async_trait;
use cinebrowse::catalog::Catalog;
use cinebrowse::tmdb::{HttpResponse, HttpTransport, TmdbClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "https://tmdb.test/3";

#[derive(Clone)]
enum Reply {
    Json(u16, String),
    Down,
}

struct Route {
    path: String,
    query_contains: Option<String>,
    reply: Reply,
}

/// Canned TMDB. Unknown paths answer 404 with a TMDB-style error body.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.push(path, None, Reply::Json(status, body.to_string()));
    }

    pub fn respond_when(&self, path: &str, query_contains: &str, status: u16, body: Value) {
        self.push(
            path,
            Some(query_contains),
            Reply::Json(status, body.to_string()),
        );
    }

    pub fn respond_raw(&self, path: &str, status: u16, body: &str) {
        self.push(path, None, Reply::Json(status, body.to_string()));
    }

    pub fn go_down(&self, path: &str) {
        self.push(path, None, Reply::Down);
    }

    fn push(&self, path: &str, query_contains: Option<&str>, reply: Reply) {
        self.routes.lock().unwrap().push(Route {
            path: path.to_string(),
            query_contains: query_contains.map(str::to_string),
            reply,
        });
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| split(url).0 == path)
            .count()
    }

    pub fn last_call_to(&self, path: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|url| split(url).0 == path)
            .cloned()
    }
}

fn split(url: &str) -> (&str, &str) {
    let rest = url
        .strip_prefix(BASE)
        .unwrap_or(url)
        .trim_start_matches('/');
    rest.split_once('?').unwrap_or((rest, ""))
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let (path, query) = split(url);
        let routes = self.routes.lock().unwrap();
        let matching = |r: &&Route| r.path == path;
        let reply = routes
            .iter()
            .filter(matching)
            .find(|r| {
                r.query_contains
                    .as_deref()
                    .is_some_and(|needle| query.contains(needle))
            })
            .or_else(|| {
                routes
                    .iter()
                    .filter(matching)
                    .find(|r| r.query_contains.is_none())
            })
            .map(|r| r.reply.clone());

        match reply {
            Some(Reply::Json(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Down) => Err(anyhow::anyhow!("connection refused")),
            None => Ok(HttpResponse {
                status: 404,
                body: json!({
                    "success": false,
                    "status_code": 34,
                    "status_message": "The resource you requested could not be found."
                })
                .to_string(),
            }),
        }
    }
}

pub fn catalog(transport: &Arc<FakeTransport>) -> Catalog {
    Catalog::new(TmdbClient::new(transport.clone(), BASE, "test-key"))
}

pub fn page(items: &[(u64, &str)]) -> Value {
    let results: Vec<Value> = items
        .iter()
        .map(|(id, title)| {
            json!({
                "id": id,
                "title": title,
                "backdrop_path": format!("/backdrop-{id}.jpg"),
                "poster_path": format!("/poster-{id}.jpg"),
                "overview": format!("About {title}")
            })
        })
        .collect();
    json!({ "page": 1, "results": results, "total_pages": 1, "total_results": items.len() })
}

pub fn matrix_details() -> Value {
    json!({
        "adult": false,
        "backdrop_path": "/fNG7i7RqMErkcqhohV2a6cV1Ehy.jpg",
        "budget": 63000000,
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
        "homepage": "http://www.warnerbros.com/matrix",
        "id": 603,
        "imdb_id": "tt0133093",
        "original_language": "en",
        "original_title": "The Matrix",
        "overview": "Set in the 22nd century, The Matrix tells the story of a computer hacker.",
        "popularity": 71.2,
        "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
        "production_companies": [{"id": 79, "logo_path": null, "name": "Village Roadshow Pictures", "origin_country": "US"}],
        "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
        "release_date": "1999-03-30",
        "revenue": 463517383,
        "runtime": 136,
        "spoken_languages": [{"english_name": "English", "iso_639_1": "en", "name": "English"}],
        "status": "Released",
        "tagline": "Welcome to the Real World.",
        "title": "The Matrix",
        "video": false,
        "vote_average": 8.2,
        "vote_count": 24000
    })
}

pub fn details(id: u64, title: &str) -> Value {
    json!({ "id": id, "title": title, "runtime": 100 })
}

pub fn config_body() -> Value {
    json!({
        "images": {
            "base_url": "http://image.tmdb.org/t/p/",
            "secure_base_url": "https://image.tmdb.org/t/p/",
            "poster_sizes": ["w92", "w500", "original"]
        },
        "change_keys": []
    })
}
