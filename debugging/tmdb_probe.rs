//! Query TMDB through the catalog and print the mapped records as JSON.
//! Usage:
//!   cargo run --bin tmdb_probe -- movie <tmdb_id>
//!   cargo run --bin tmdb_probe -- similar <tmdb_id>
//!   cargo run --bin tmdb_probe -- trailer <tmdb_id>
//!   cargo run --bin tmdb_probe -- search <keyword> [page]
//!   cargo run --bin tmdb_probe -- home
//!   cargo run --bin tmdb_probe -- favorites
//!   cargo run --bin tmdb_probe -- favorite <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinebrowse::catalog::{Catalog, CatalogApi};
use cinebrowse::config::Config;
use cinebrowse::favorites::FavoritesStore;
use cinebrowse::tmdb::TmdbClient;
use dotenvy::dotenv;
use serde_json::json;
use std::env;

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin tmdb_probe -- movie|similar|trailer <tmdb_id>");
    eprintln!("       cargo run --bin tmdb_probe -- search <keyword> [page]");
    eprintln!("       cargo run --bin tmdb_probe -- home");
    eprintln!("       cargo run --bin tmdb_probe -- favorites | favorite <tmdb_id>");
    std::process::exit(1);
}

fn id_arg(args: &[String]) -> Result<u64> {
    args.get(2)
        .ok_or_else(|| anyhow::anyhow!("missing tmdb id"))?
        .parse()
        .context("tmdb_id must be an integer")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let config = Config::from_env()?;
    let catalog = Catalog::new(TmdbClient::from_config(&config)?);
    let favorites = FavoritesStore::new(&config.favorites_dir);

    let out = match args[1].as_str() {
        "movie" => {
            let details = catalog.movie_by_id(id_arg(&args)?).await?;
            json!({
                "runtime_label": details.runtime_label(),
                "year": details.release_year(),
                "movieDetails": details,
            })
        }
        "similar" => json!({ "similarMovies": catalog.similar(id_arg(&args)?).await }),
        "trailer" => {
            let trailer = catalog.trailer(id_arg(&args)?).await?;
            json!({
                "trailer": trailer,
                "url": trailer.as_ref().map(|t| t.youtube_url()),
            })
        }
        "search" => {
            let keyword = args.get(2).map(String::as_str).unwrap_or_default();
            let page = args.get(3).and_then(|p| p.parse().ok()).unwrap_or(1);
            json!({ "movies": catalog.search(keyword, page).await })
        }
        "home" => serde_json::to_value(catalog.home_page().await)?,
        "favorites" => json!({
            "path": favorites.path().display().to_string(),
            "list": favorites.load(),
        }),
        "favorite" => {
            let details = catalog.movie_by_id(id_arg(&args)?).await?;
            let outcome = favorites.toggle(&details.summary())?;
            json!({
                "id": details.id,
                "outcome": format!("{outcome:?}"),
                "list": favorites.load(),
            })
        }
        _ => usage(),
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
