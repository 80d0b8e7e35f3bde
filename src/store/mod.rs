use async_trait::async_trait;

use crate::config::StoreSettings;
use crate::error::StoreResult;
use crate::models::{IdeaRecord, IdeaStatus, NewIdea};

mod http;
mod memory;
mod postgres;
mod seed;

pub use http::HttpIdeaStore;
pub use memory::MemoryIdeaStore;
pub use postgres::PgIdeaStore;
pub use seed::sample_ideas;

/// CRUD access to the ideas backing the progress view.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn list_ideas(&self) -> StoreResult<Vec<IdeaRecord>>;

    async fn get_idea(&self, id: &str) -> StoreResult<IdeaRecord>;

    async fn create_idea(&self, idea: &NewIdea) -> StoreResult<IdeaRecord>;

    async fn update_idea_status(&self, id: &str, status: &IdeaStatus) -> StoreResult<IdeaRecord>;

    async fn upvote_idea(&self, id: &str) -> StoreResult<IdeaRecord>;

    async fn delete_idea(&self, id: &str) -> StoreResult<()>;
}

/// Builds the store chosen by configuration.
pub async fn open(settings: &StoreSettings) -> StoreResult<Box<dyn IdeaStore>> {
    let store: Box<dyn IdeaStore> = match settings {
        StoreSettings::Memory => Box::new(MemoryIdeaStore::seeded()),
        StoreSettings::Http {
            base_url,
            token,
            timeout,
        } => Box::new(HttpIdeaStore::new(base_url, token.clone(), *timeout)?),
        StoreSettings::Postgres {
            database_url,
            max_connections,
        } => Box::new(PgIdeaStore::connect(database_url, *max_connections).await?),
    };

    tracing::debug!(backend = store.backend(), "idea store ready");
    Ok(store)
}
