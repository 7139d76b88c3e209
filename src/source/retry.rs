use std::{future::Future, time::Duration};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};

use super::TeamSource;
use crate::{
    error::SourceResult,
    models::{ExternalKey, ExternalTeam},
};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
    /// Extra attempts after the first one. Zero disables retrying.
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryConfig {
    #[must_use]
    pub fn none() -> Self {
        Self::with_retries(0)
    }

    /// Backoff starting at 500ms, doubling, capped at 10s.
    #[must_use]
    pub fn with_retries(max_retries: usize) -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            factor: 2.0,
            max_retries,
        }
    }
}

pub struct RetryingSource<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: TeamSource> RetryingSource<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    async fn retry<T, F, Fut>(&self, operation: &str, mut call: F) -> SourceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SourceResult<T>>,
    {
        let mut delay = self.config.initial_delay;
        let mut retries = 0;

        loop {
            match call().await {
                Ok(value) => {
                    if retries > 0 {
                        info!(operation, retries, "upstream call succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && retries < self.config.max_retries => {
                    retries += 1;
                    warn!(
                        operation,
                        attempt = retries,
                        max_retries = self.config.max_retries,
                        error = %err,
                        "upstream call failed, retrying in {:?}",
                        delay
                    );
                    sleep(delay).await;
                    delay = delay.mul_f64(self.config.factor).min(self.config.max_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl<S: TeamSource> TeamSource for RetryingSource<S> {
    async fn fetch_all(&self) -> SourceResult<Vec<ExternalTeam>> {
        self.retry("fetch_all", move || self.inner.fetch_all())
            .await
    }

    async fn fetch_by_external_key(&self, key: ExternalKey) -> SourceResult<ExternalTeam> {
        self.retry("fetch_by_external_key", move || {
            self.inner.fetch_by_external_key(key)
        })
        .await
    }
}
