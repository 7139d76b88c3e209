use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TeamRepository;
use crate::{
    error::{StoreError, StoreResult},
    models::{ExternalKey, NewTeam, Team},
};

#[derive(Debug, Default)]
struct TeamTable {
    next_id: i64,
    rows: BTreeMap<i64, Team>,
    by_external_key: HashMap<ExternalKey, i64>,
}

/// Process-local store used for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    table: RwLock<TeamTable>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_by_external_key(&self, key: ExternalKey) -> StoreResult<Option<Team>> {
        let table = self.table.read().await;
        let team = table
            .by_external_key
            .get(&key)
            .and_then(|id| table.rows.get(id))
            .cloned();
        Ok(team)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Team>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Team>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn create(&self, team: NewTeam) -> StoreResult<Team> {
        let mut table = self.table.write().await;

        if table.by_external_key.contains_key(&team.external_key) {
            return Err(StoreError::conflict(format!(
                "team with external key {} already exists",
                team.external_key
            )));
        }

        table.next_id += 1;
        let now = Utc::now();
        let created = Team {
            id: table.next_id,
            external_key: team.external_key,
            name: team.name,
            created_at: now,
            updated_at: now,
        };

        table
            .by_external_key
            .insert(created.external_key, created.id);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, team: &Team) -> StoreResult<Team> {
        let mut table = self.table.write().await;
        let Some(stored) = table.rows.get_mut(&team.id) else {
            return Err(StoreError::not_found(format!("team with id {}", team.id)));
        };

        stored.name = team.name.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let Some(removed) = table.rows.remove(&id) else {
            return Ok(false);
        };
        table.by_external_key.remove(&removed.external_key);
        Ok(true)
    }
}
