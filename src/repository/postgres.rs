use async_trait::async_trait;
use sqlx::PgPool;

use super::TeamRepository;
use crate::{
    error::{StoreError, StoreResult},
    models::{ExternalKey, NewTeam, Team},
};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    id BIGSERIAL PRIMARY KEY,
    external_key BIGINT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn init(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn get_by_external_key(&self, key: ExternalKey) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, external_key, name, created_at, updated_at
            FROM teams
            WHERE external_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, external_key, name, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    async fn list(&self) -> StoreResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, external_key, name, created_at, updated_at
            FROM teams
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn create(&self, team: NewTeam) -> StoreResult<Team> {
        let created = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (external_key, name)
            VALUES ($1, $2)
            RETURNING id, external_key, name, created_at, updated_at
            "#,
        )
        .bind(team.external_key)
        .bind(team.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, team: &Team) -> StoreResult<Team> {
        let updated = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, external_key, name, created_at, updated_at
            "#,
        )
        .bind(&team.name)
        .bind(team.id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| StoreError::not_found(format!("team with id {}", team.id)))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
