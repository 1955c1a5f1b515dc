use std::collections::BTreeSet;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use anyhow::Context;
use thiserror::Error;

use crate::config::AppConfig;

const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites storage failed: {0}")]
    Storage(#[from] sled::Error),
    #[error("favorites payload is malformed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Where the favorites list lives between runs.
pub trait FavoritesStore: Send + Sync {
    fn load(&self) -> Result<Vec<u32>, FavoritesError>;
    fn save(&self, ids: &[u32]) -> Result<(), FavoritesError>;
}

#[derive(Clone)]
pub struct SledFavoritesStore {
    tree: sled::Tree,
}

impl SledFavoritesStore {
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let db = sled::open(config.favorites_db_path()).with_context(|| {
            format!(
                "Failed to open favorites database at {}",
                config.favorites_db_path().display()
            )
        })?;
        let tree = db
            .open_tree("favorites")
            .context("Unable to open favorites tree")?;
        Ok(Self { tree })
    }
}

impl FavoritesStore for SledFavoritesStore {
    fn load(&self) -> Result<Vec<u32>, FavoritesError> {
        match self.tree.get(FAVORITES_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, ids: &[u32]) -> Result<(), FavoritesError> {
        let value = serde_json::to_vec(ids)?;
        self.tree.insert(FAVORITES_KEY, value)?;
        self.tree.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryFavoritesStore {
    ids: Arc<Mutex<Vec<u32>>>,
}

#[cfg(test)]
impl MemoryFavoritesStore {
    pub fn with_ids(ids: Vec<u32>) -> Self {
        Self {
            ids: Arc::new(Mutex::new(ids)),
        }
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.ids.lock().map(|ids| ids.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> Result<Vec<u32>, FavoritesError> {
        Ok(self.snapshot())
    }

    fn save(&self, ids: &[u32]) -> Result<(), FavoritesError> {
        if let Ok(mut guard) = self.ids.lock() {
            *guard = ids.to_vec();
        }
        Ok(())
    }
}

/// In-memory favorites set, loaded once and written through on every toggle.
pub struct FavoritesService {
    store: Box<dyn FavoritesStore>,
    ids: BTreeSet<u32>,
}

impl FavoritesService {
    pub fn load(store: Box<dyn FavoritesStore>) -> Result<Self, FavoritesError> {
        let ids = store.load()?.into_iter().collect();
        Ok(Self { store, ids })
    }

    pub fn get(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Flips `id` and persists. Returns the new membership. On a storage
    /// failure the set is left as it was.
    pub fn toggle(&mut self, id: u32) -> Result<bool, FavoritesError> {
        let now_favorite = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };

        if let Err(err) = self.store.save(&self.get()) {
            if now_favorite {
                self.ids.remove(&id);
            } else {
                self.ids.insert(id);
            }
            return Err(err);
        }

        Ok(now_favorite)
    }
}
