use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::config::DataSource;
use crate::models::Dataset;
use crate::providers::{stations, trips, DataClient, LoadError};

/// Current dataset plus the outcome of the latest load attempt
#[derive(Debug, Default)]
pub struct DatasetState {
    pub dataset: Option<Arc<Dataset>>,
    pub last_error: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub loading: bool,
}

/// Shared handle to the loaded dataset
pub type DatasetStore = Arc<RwLock<DatasetState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

impl DatasetState {
    pub fn status(&self) -> LoadStatus {
        if self.dataset.is_some() {
            LoadStatus::Ready
        } else if self.last_error.is_some() && !self.loading {
            LoadStatus::Failed
        } else {
            LoadStatus::Loading
        }
    }
}

/// Fetches the station feed and trip table and publishes them as one dataset
pub struct DatasetLoader {
    client: DataClient,
    stations: DataSource,
    trips: DataSource,
    store: DatasetStore,
    /// Held for the whole of a reload so overlapping reloads run one after another
    reload_lock: Mutex<()>,
}

impl DatasetLoader {
    pub fn new(client: DataClient, stations: DataSource, trips: DataSource) -> Self {
        Self {
            client,
            stations,
            trips,
            store: Arc::new(RwLock::new(DatasetState::default())),
            reload_lock: Mutex::new(()),
        }
    }

    /// Get a reference to the dataset store for API access
    pub fn store(&self) -> DatasetStore {
        self.store.clone()
    }

    /// Fetch both datasets concurrently. Nothing is published unless both succeed.
    pub async fn fetch(&self) -> Result<Dataset, LoadError> {
        let stations_fut = async {
            let body = self.client.fetch_text(&self.stations).await?;
            stations::parse_stations(&body)
        };
        let trips_fut = async {
            let body = self.client.fetch_text(&self.trips).await?;
            trips::parse_trips(&body)
        };

        let (stations, trips) = futures::future::try_join(stations_fut, trips_fut).await?;

        Ok(Dataset {
            stations,
            trips,
            loaded_at: Utc::now(),
        })
    }

    /// Load and swap in a new dataset. On failure the previous dataset stays in place.
    pub async fn reload(&self) -> Result<Arc<Dataset>, LoadError> {
        let _guard = self.reload_lock.lock().await;
        {
            let mut state = self.store.write().await;
            state.loading = true;
            state.last_attempt = Some(Utc::now());
        }

        info!(stations = %self.stations, trips = %self.trips, "Loading datasets");
        let result = self.fetch().await;

        let mut state = self.store.write().await;
        state.loading = false;
        match result {
            Ok(dataset) => {
                info!(
                    stations = dataset.stations.len(),
                    trips = dataset.trips.len(),
                    "Loaded datasets"
                );
                let dataset = Arc::new(dataset);
                state.dataset = Some(dataset.clone());
                state.last_error = None;
                Ok(dataset)
            }
            Err(e) => {
                error!(error = %e, kept_previous = state.dataset.is_some(), "Failed to load datasets");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run the initial load in the background so the server can start answering status requests
    pub fn spawn_initial_load(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.reload().await {
                debug!(error = %e, "Initial load failed, waiting for POST /api/reload");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn fixture(name: &str) -> DataSource {
        DataSource::Path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("fixtures")
                .join(name),
        )
    }

    fn loader(stations: DataSource, trips: DataSource) -> DatasetLoader {
        let client = DataClient::new(Duration::from_secs(5)).unwrap();
        DatasetLoader::new(client, stations, trips)
    }

    #[tokio::test]
    async fn test_reload_publishes_dataset() {
        let loader = loader(fixture("stations.json"), fixture("trips.csv"));
        assert_eq!(loader.store().read().await.status(), LoadStatus::Loading);

        let dataset = loader.reload().await.unwrap();
        assert_eq!(dataset.stations.len(), 4);
        assert_eq!(dataset.trips.len(), 8);

        let store = loader.store();
        let state = store.read().await;
        assert_eq!(state.status(), LoadStatus::Ready);
        assert!(state.last_error.is_none());
        assert!(state.last_attempt.is_some());
    }

    #[tokio::test]
    async fn test_failed_load_without_dataset() {
        let loader = loader(fixture("stations.json"), fixture("missing.csv"));
        assert!(matches!(loader.reload().await, Err(LoadError::ReadError(_))));

        let store = loader.store();
        let state = store.read().await;
        assert_eq!(state.status(), LoadStatus::Failed);
        assert!(state.dataset.is_none());
        assert!(state.last_error.as_deref().unwrap().contains("missing.csv"));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_dataset() {
        let good = loader(fixture("stations.json"), fixture("trips.csv"));
        let previous = good.reload().await.unwrap();

        let broken = DatasetLoader {
            trips: fixture("stations.json"),
            ..good
        };
        assert!(broken.reload().await.is_err());

        let store = broken.store();
        let state = store.read().await;
        assert_eq!(state.status(), LoadStatus::Ready);
        assert!(Arc::ptr_eq(state.dataset.as_ref().unwrap(), &previous));
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn test_overlapping_reloads_run_in_turn() {
        let loader = loader(fixture("stations.json"), fixture("trips.csv"));

        let (first, second) = tokio::join!(loader.reload(), loader.reload());
        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(!Arc::ptr_eq(&first, &second));

        let store = loader.store();
        let state = store.read().await;
        assert!(!state.loading);
        assert_eq!(state.status(), LoadStatus::Ready);
        let current = state.dataset.as_ref().unwrap();
        assert!(Arc::ptr_eq(current, &first) || Arc::ptr_eq(current, &second));
        assert_eq!(current.loaded_at, first.loaded_at.max(second.loaded_at));
    }

    #[tokio::test]
    async fn test_spawned_initial_load_records_failure() {
        let loader = Arc::new(loader(fixture("stations.json"), fixture("missing.csv")));
        loader.clone().spawn_initial_load().await.unwrap();

        let store = loader.store();
        let state = store.read().await;
        assert_eq!(state.status(), LoadStatus::Failed);
    }
}
