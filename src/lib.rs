// ============================================================================
// fantasy_sync
// ============================================================================

//! Fantasy football data backend.
//!
//! The heart of the crate is [`TeamSyncService`]: it pulls the canonical team
//! list from API-Football and merges it into local storage, creating teams the
//! first time their external key is seen and renaming them afterwards.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fantasy_sync::{
//!     ApiFootballClient, ApiFootballConfig, InMemoryTeamRepository, TeamSyncService,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiFootballClient::new(&ApiFootballConfig::new(
//!     "https://api-football-v1.p.rapidapi.com/v3",
//!     "my-rapidapi-key",
//! ))?;
//! let service = TeamSyncService::new(Arc::new(client), Arc::new(InMemoryTeamRepository::new()));
//!
//! let report = service.run_sync().await?;
//! println!("created {} updated {} skipped {}", report.created, report.updated, report.skipped);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod source;
pub mod state;
pub mod sync;

pub use app::build_router;
pub use config::{ApiFootballConfig, AppConfig, DatabaseBackend};
pub use error::{AppError, SourceError, StoreError, SyncError};
pub use models::{
    ExternalKey, ExternalTeam, NewTeam, SkipRecord, SyncOutcome, SyncReport, SyncStage, Team,
};
pub use repository::{InMemoryTeamRepository, PgTeamRepository, TeamRepository};
pub use source::{ApiFootballClient, RetryConfig, RetryingSource, TeamSource};
pub use sync::TeamSyncService;
