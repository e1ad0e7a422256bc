use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::MovieSummary;

/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Favorites persisted as a JSON array in `<dir>/list.json`.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{FAVORITES_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current list. A missing file is empty; an unreadable one is discarded.
    pub fn load(&self) -> Vec<MovieSummary> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!(
                    "Error parsing favorites at {}: {} - resetting list",
                    self.path.display(),
                    e
                );
                if let Err(e) = fs::remove_file(&self.path) {
                    warn!("Could not remove corrupt favorites file: {}", e);
                }
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.load().iter().any(|m| m.id == id)
    }

    /// Adds the movie, or removes it when its id is already listed.
    pub fn toggle(&self, movie: &MovieSummary) -> Result<Toggle> {
        let mut list = self.load();
        let outcome = if list.iter().any(|m| m.id == movie.id) {
            list.retain(|m| m.id != movie.id);
            info!("Removed '{}' from favorites", movie.title);
            Toggle::Removed
        } else {
            list.push(movie.clone());
            info!("Added '{}' to favorites", movie.title);
            Toggle::Added
        };
        self.save(&list)?;
        Ok(outcome)
    }

    fn save(&self, list: &[MovieSummary]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let body = serde_json::to_string(list).context("Failed to encode favorites")?;
        fs::write(&self.path, body)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            image: None,
            overview: None,
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());
        assert!(store.load().is_empty());

        assert_eq!(store.toggle(&movie(1, "One")).unwrap(), Toggle::Added);
        assert_eq!(store.toggle(&movie(2, "Two")).unwrap(), Toggle::Added);
        assert!(store.contains(1));
        assert_eq!(
            store.load().iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        assert_eq!(store.toggle(&movie(1, "One")).unwrap(), Toggle::Removed);
        assert!(!store.contains(1));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn list_is_stored_as_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());
        store.toggle(&movie(7, "Seven")).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 7);
        assert!(store.path().ends_with("list.json"));
    }

    #[test]
    fn corrupt_list_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_empty());
        assert!(!store.path().exists());
        assert_eq!(store.toggle(&movie(3, "Three")).unwrap(), Toggle::Added);
        assert_eq!(store.load().len(), 1);
    }
}
