use std::sync::Arc;

use crate::{repository::TeamRepository, sync::TeamSyncService};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TeamRepository>,
    pub sync: TeamSyncService,
}

impl AppState {
    pub fn new(repo: Arc<dyn TeamRepository>, sync: TeamSyncService) -> Self {
        Self { repo, sync }
    }
}
