mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    models::{ExternalKey, NewTeam, Team},
};

pub use memory::InMemoryTeamRepository;
pub use postgres::PgTeamRepository;

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn init(&self) -> StoreResult<()>;

    async fn get_by_external_key(&self, key: ExternalKey) -> StoreResult<Option<Team>>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Team>>;

    async fn list(&self) -> StoreResult<Vec<Team>>;

    /// Fails with `StoreError::Conflict` when `external_key` is already taken.
    async fn create(&self, team: NewTeam) -> StoreResult<Team>;

    /// Writes `name` and bumps `updated_at`; `StoreError::NotFound` when `team.id` is missing.
    async fn update(&self, team: &Team) -> StoreResult<Team>;

    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
