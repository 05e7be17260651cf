//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Retriever;
use crate::store::ArtifactStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: ArtifactStore,
    retriever: Retriever,
}

impl AppState {
    /// Create the application state, ensuring the storage root exists.
    pub async fn new(config: Config) -> Result<Self> {
        let store = ArtifactStore::new(config.storage.root.clone());
        store.init().await?;

        let retriever = Retriever::new(&config.fetch)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                retriever,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.inner.store
    }

    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }
}
