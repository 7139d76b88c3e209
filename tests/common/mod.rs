#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use fantasy_sync::{
    ExternalKey, ExternalTeam, InMemoryTeamRepository, NewTeam, SourceError, StoreError, Team,
    TeamRepository, TeamSource,
    error::{SourceResult, StoreResult},
};

/// Source returning a scripted team list, or a scripted failure.
#[derive(Default)]
pub struct ScriptedSource {
    teams: Mutex<Vec<ExternalTeam>>,
    failure: Mutex<Option<fn() -> SourceError>>,
}

impl ScriptedSource {
    pub fn new(teams: Vec<ExternalTeam>) -> Self {
        Self {
            teams: Mutex::new(teams),
            failure: Mutex::new(None),
        }
    }

    pub fn failing(failure: fn() -> SourceError) -> Self {
        Self {
            teams: Mutex::new(Vec::new()),
            failure: Mutex::new(Some(failure)),
        }
    }

    pub fn set_teams(&self, teams: Vec<ExternalTeam>) {
        *self.teams.lock().expect("teams lock") = teams;
    }

    fn check_failure(&self) -> SourceResult<()> {
        match *self.failure.lock().expect("failure lock") {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TeamSource for ScriptedSource {
    async fn fetch_all(&self) -> SourceResult<Vec<ExternalTeam>> {
        self.check_failure()?;
        Ok(self.teams.lock().expect("teams lock").clone())
    }

    async fn fetch_by_external_key(&self, key: ExternalKey) -> SourceResult<ExternalTeam> {
        self.check_failure()?;
        self.teams
            .lock()
            .expect("teams lock")
            .iter()
            .find(|team| team.external_key == key)
            .cloned()
            .ok_or(SourceError::NotFound(key))
    }
}

/// Counts of calls that reached the store.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub lookups: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
            + self.creates.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
    }
}

/// In-memory store with per-key fault injection and call counting.
#[derive(Default)]
pub struct FaultyRepository {
    inner: InMemoryTeamRepository,
    pub calls: CallCounts,
    fail_lookup: Mutex<HashSet<ExternalKey>>,
    fail_create: Mutex<HashSet<ExternalKey>>,
    fail_update: Mutex<HashSet<ExternalKey>>,
}

impl FaultyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_lookup_for(&self, key: i64) {
        self.fail_lookup
            .lock()
            .expect("lock")
            .insert(ExternalKey::new(key));
    }

    pub fn fail_create_for(&self, key: i64) {
        self.fail_create
            .lock()
            .expect("lock")
            .insert(ExternalKey::new(key));
    }

    pub fn fail_update_for(&self, key: i64) {
        self.fail_update
            .lock()
            .expect("lock")
            .insert(ExternalKey::new(key));
    }

    pub fn heal(&self) {
        self.fail_lookup.lock().expect("lock").clear();
        self.fail_create.lock().expect("lock").clear();
        self.fail_update.lock().expect("lock").clear();
    }

    fn injected(set: &Mutex<HashSet<ExternalKey>>, key: ExternalKey) -> bool {
        set.lock().expect("lock").contains(&key)
    }
}

#[async_trait]
impl TeamRepository for FaultyRepository {
    async fn init(&self) -> StoreResult<()> {
        self.inner.init().await
    }

    async fn get_by_external_key(&self, key: ExternalKey) -> StoreResult<Option<Team>> {
        self.calls.lookups.fetch_add(1, Ordering::SeqCst);
        if Self::injected(&self.fail_lookup, key) {
            return Err(StoreError::backend("connection reset during lookup"));
        }
        self.inner.get_by_external_key(key).await
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Team>> {
        self.inner.get_by_id(id).await
    }

    async fn list(&self) -> StoreResult<Vec<Team>> {
        self.inner.list().await
    }

    async fn create(&self, team: NewTeam) -> StoreResult<Team> {
        self.calls.creates.fetch_add(1, Ordering::SeqCst);
        if Self::injected(&self.fail_create, team.external_key) {
            return Err(StoreError::conflict("duplicate key value violates unique constraint"));
        }
        self.inner.create(team).await
    }

    async fn update(&self, team: &Team) -> StoreResult<Team> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        if Self::injected(&self.fail_update, team.external_key) {
            return Err(StoreError::backend("statement timeout"));
        }
        self.inner.update(team).await
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.inner.delete(id).await
    }
}

pub fn team(key: i64, name: &str) -> ExternalTeam {
    ExternalTeam::new(key, name)
}
