use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Identifier assigned to a team by the upstream data source.
///
/// Stable across sync runs and used as the join key between upstream records
/// and local rows. Never reused for a different upstream team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ExternalKey(i64);

impl ExternalKey {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ExternalKey {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ExternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team as reported by the upstream source. Produced fresh on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTeam {
    pub external_key: ExternalKey,
    pub name: String,
}

impl ExternalTeam {
    pub fn new(external_key: i64, name: impl Into<String>) -> Self {
        Self {
            external_key: ExternalKey::new(external_key),
            name: name.into(),
        }
    }
}

/// A persisted team row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub external_key: ExternalKey,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload. The store assigns `id` and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub external_key: ExternalKey,
    pub name: String,
}

impl From<&ExternalTeam> for NewTeam {
    fn from(team: &ExternalTeam) -> Self {
        Self {
            external_key: team.external_key,
            name: team.name.clone(),
        }
    }
}

/// The store call that failed for a skipped team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    Lookup,
    Create,
    Update,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Lookup => "lookup",
            Self::Create => "create",
            Self::Update => "update",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub external_key: ExternalKey,
    pub stage: SyncStage,
    pub reason: String,
}

/// Terminal state of one reconciled team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "team", rename_all = "snake_case")]
pub enum SyncOutcome {
    Created(Team),
    Updated(Team),
}

impl SyncOutcome {
    pub fn team(&self) -> &Team {
        match self {
            Self::Created(team) | Self::Updated(team) => team,
        }
    }
}

/// Aggregate result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub cancelled: bool,
    pub skips: Vec<SkipRecord>,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created(_) => self.created += 1,
            SyncOutcome::Updated(_) => self.updated += 1,
        }
    }

    pub fn record_skip(&mut self, skip: SkipRecord) {
        self.skipped += 1;
        self.skips.push(skip);
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
