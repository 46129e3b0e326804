use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Show,
    services::tags::extract_tags,
};

/// Fixed key the main application persists its state under
pub const STORAGE_KEY: &str = "media-tracker-v3";

/// Only blobs written with this schema version are read
pub const SCHEMA_VERSION: u32 = 3;

/// Where the loaded shows came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    SharedState,
    PersistedStore,
}

/// Versioned blob written by the main application
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedBlob {
    pub version: u32,
    #[serde(default)]
    pub shows: Vec<Show>,
}

/// Read-only view of the persisted blob on disk
#[derive(Debug, Clone)]
pub struct PersistedStore {
    path: PathBuf,
}

impl PersistedStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the shows from the blob, `None` when nothing has been persisted
    pub async fn read(&self) -> AppResult<Option<Vec<Show>>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let blob: PersistedBlob = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Persisted blob is corrupt");
            AppError::DataUnavailable(format!("persisted data is unreadable: {}", e))
        })?;

        if blob.version != SCHEMA_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                found = blob.version,
                expected = SCHEMA_VERSION,
                "Persisted blob has an unsupported schema version"
            );
            return Err(AppError::DataUnavailable(format!(
                "persisted data has schema version {}, expected {}",
                blob.version, SCHEMA_VERSION
            )));
        }

        Ok(Some(blob.shows))
    }
}

/// The show collection for one page load, with its derived tag list
#[derive(Debug, Clone)]
pub struct Catalog {
    pub shows: Vec<Show>,
    pub tags: Vec<String>,
    pub origin: CatalogOrigin,
}

impl Catalog {
    pub fn from_shows(shows: Vec<Show>, origin: CatalogOrigin) -> Self {
        let tags = extract_tags(&shows);
        Self { shows, tags, origin }
    }

    /// Loads shows from the shared state, falling back to the persisted store
    pub async fn load(shared: Option<&[Show]>, store: &PersistedStore) -> AppResult<Self> {
        if let Some(shows) = shared {
            tracing::debug!(count = shows.len(), "Loaded shows from shared state");
            return Ok(Self::from_shows(shows.to_vec(), CatalogOrigin::SharedState));
        }

        match store.read().await? {
            Some(shows) => {
                tracing::debug!(
                    count = shows.len(),
                    path = %store.path().display(),
                    "Loaded shows from persisted store"
                );
                Ok(Self::from_shows(shows, CatalogOrigin::PersistedStore))
            }
            None => Err(AppError::DataUnavailable(
                "no shows in shared state and nothing persisted; open the main application first"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn write_blob(dir: &Path, value: serde_json::Value) {
        std::fs::write(
            dir.join(format!("{}.json", STORAGE_KEY)),
            serde_json::to_string(&value).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_shared_state_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write_blob(
            dir.path(),
            json!({ "version": 3, "shows": [{ "title": "From disk" }] }),
        );
        let store = PersistedStore::new(dir.path());
        let shared = vec![Show::new("From memory", "movie", "planned")];

        let catalog = assert_ok!(Catalog::load(Some(&shared), &store).await);
        assert_eq!(catalog.origin, CatalogOrigin::SharedState);
        assert_eq!(catalog.shows[0].title, "From memory");
    }

    #[tokio::test]
    async fn test_falls_back_to_persisted_store() {
        let dir = tempfile::tempdir().unwrap();
        write_blob(
            dir.path(),
            json!({
                "version": 3,
                "settings": { "theme": "dark" },
                "shows": [
                    { "title": "Dune", "type": "movie", "status": "planned", "tags": "Sci-Fi, desert" },
                    { "title": "Shogun", "type": "series", "status": "watching", "tags": ["history"] }
                ]
            }),
        );
        let store = PersistedStore::new(dir.path());

        let catalog = assert_ok!(Catalog::load(None, &store).await);
        assert_eq!(catalog.origin, CatalogOrigin::PersistedStore);
        assert_eq!(catalog.shows.len(), 2);
        assert_eq!(catalog.tags, vec!["desert", "history", "sci-fi"]);
    }

    #[tokio::test]
    async fn test_missing_everything_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistedStore::new(dir.path());

        let err = assert_err!(Catalog::load(None, &store).await);
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_other_schema_versions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_blob(dir.path(), json!({ "version": 2, "shows": [{ "title": "Old" }] }));
        let store = PersistedStore::new(dir.path());

        let err = assert_err!(store.read().await);
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{}.json", STORAGE_KEY)), "{ not json").unwrap();
        let store = PersistedStore::new(dir.path());

        let err = assert_err!(Catalog::load(None, &store).await);
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
