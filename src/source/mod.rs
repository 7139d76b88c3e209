mod api_football;
mod retry;

use async_trait::async_trait;

use crate::{
    error::SourceResult,
    models::{ExternalKey, ExternalTeam},
};

pub use api_football::ApiFootballClient;
pub use retry::{RetryConfig, RetryingSource};

#[async_trait]
pub trait TeamSource: Send + Sync {
    async fn fetch_all(&self) -> SourceResult<Vec<ExternalTeam>>;

    /// `SourceError::NotFound` when upstream has no match.
    async fn fetch_by_external_key(&self, key: ExternalKey) -> SourceResult<ExternalTeam>;
}
