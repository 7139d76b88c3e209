//! Team reconciliation. Only a failed upstream fetch fails a pass; store
//! failures for one team are recorded in the [`SyncReport`] as skips.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
    error::{StoreError, SyncError, SyncResult},
    models::{ExternalKey, ExternalTeam, NewTeam, SkipRecord, SyncOutcome, SyncReport, SyncStage},
    repository::TeamRepository,
    source::TeamSource,
};

struct StageFailure {
    stage: SyncStage,
    source: StoreError,
}

impl StageFailure {
    fn at(stage: SyncStage) -> impl FnOnce(StoreError) -> Self {
        move |source| Self { stage, source }
    }

    fn into_skip(self, external_key: ExternalKey) -> SkipRecord {
        SkipRecord {
            external_key,
            stage: self.stage,
            reason: self.source.to_string(),
        }
    }

    fn into_error(self, key: ExternalKey) -> SyncError {
        SyncError::store(self.stage, key, self.source)
    }
}

#[derive(Clone)]
pub struct TeamSyncService {
    source: Arc<dyn TeamSource>,
    repo: Arc<dyn TeamRepository>,
}

impl TeamSyncService {
    pub fn new(source: Arc<dyn TeamSource>, repo: Arc<dyn TeamRepository>) -> Self {
        Self { source, repo }
    }

    pub async fn run_sync(&self) -> SyncResult<SyncReport> {
        self.run_pass(None).await
    }

    /// Like [`run_sync`](Self::run_sync), but stops before the next team once
    /// `cancel` reads `true`. The partial report has `cancelled` set.
    pub async fn run_sync_until(&self, cancel: &watch::Receiver<bool>) -> SyncResult<SyncReport> {
        self.run_pass(Some(cancel)).await
    }

    /// Any failure is returned rather than recorded.
    #[instrument(skip(self), fields(external_key = %key))]
    pub async fn sync_single(&self, key: ExternalKey) -> SyncResult<SyncOutcome> {
        let team = self.source.fetch_by_external_key(key).await?;

        let outcome = self
            .reconcile(&team)
            .await
            .map_err(|failure| failure.into_error(team.external_key))?;

        info!(name = %outcome.team().name, "team sync completed");
        Ok(outcome)
    }

    async fn run_pass(&self, cancel: Option<&watch::Receiver<bool>>) -> SyncResult<SyncReport> {
        info!("starting team sync");

        let teams = self.source.fetch_all().await?;
        info!(count = teams.len(), "fetched teams from upstream");

        let mut report = SyncReport::default();
        for team in &teams {
            if cancel.is_some_and(|rx| *rx.borrow()) {
                warn!(
                    remaining = teams.len() - report.processed(),
                    "team sync cancelled"
                );
                report.cancelled = true;
                break;
            }

            match self.reconcile(team).await {
                Ok(outcome) => report.record(&outcome),
                Err(failure) => {
                    warn!(
                        external_key = %team.external_key,
                        stage = %failure.stage,
                        error = %failure.source,
                        "skipping team"
                    );
                    report.record_skip(failure.into_skip(team.external_key));
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "team sync finished"
        );
        Ok(report)
    }

    async fn reconcile(&self, team: &ExternalTeam) -> Result<SyncOutcome, StageFailure> {
        let existing = self
            .repo
            .get_by_external_key(team.external_key)
            .await
            .map_err(StageFailure::at(SyncStage::Lookup))?;

        match existing {
            Some(mut local) => {
                // Written even when the name is unchanged so updated_at always moves.
                local.name = team.name.clone();
                let updated = self
                    .repo
                    .update(&local)
                    .await
                    .map_err(StageFailure::at(SyncStage::Update))?;
                info!(external_key = %team.external_key, name = %updated.name, "updated team");
                Ok(SyncOutcome::Updated(updated))
            }
            None => {
                let created = self
                    .repo
                    .create(NewTeam::from(team))
                    .await
                    .map_err(StageFailure::at(SyncStage::Create))?;
                info!(
                    external_key = %team.external_key,
                    name = %created.name,
                    id = created.id,
                    "created team"
                );
                Ok(SyncOutcome::Created(created))
            }
        }
    }
}
