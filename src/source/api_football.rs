use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::TeamSource;
use crate::{
    config::ApiFootballConfig,
    error::{ConfigError, SourceError, SourceResult},
    models::{ExternalKey, ExternalTeam},
};

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

#[derive(Debug, Deserialize)]
struct TeamsEnvelope {
    response: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: WireTeam,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    id: i64,
    name: String,
}

impl From<TeamEntry> for ExternalTeam {
    fn from(entry: TeamEntry) -> Self {
        ExternalTeam::new(entry.team.id, entry.team.name)
    }
}

#[derive(Clone)]
pub struct ApiFootballClient {
    client: Client,
    base_url: String,
    league: Option<String>,
    season: Option<String>,
}

impl ApiFootballClient {
    pub fn new(config: &ApiFootballConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            header_value("API_FOOTBALL_API_KEY", &config.api_key)?,
        );
        headers.insert(
            API_HOST_HEADER,
            header_value("API_FOOTBALL_HOST", &config.api_host)?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            league: config.league.clone(),
            season: config.season.clone(),
        })
    }

    fn teams_url(&self) -> String {
        format!("{}/teams", self.base_url)
    }

    fn competition_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(league) = &self.league {
            query.push(("league", league.clone()));
        }
        if let Some(season) = &self.season {
            query.push(("season", season.clone()));
        }
        query
    }

    async fn get_teams(&self, query: &[(&'static str, String)]) -> SourceResult<Vec<TeamEntry>> {
        let response = self
            .client
            .get(self.teams_url())
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::unavailable(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::unavailable(Some(status.as_u16()), body));
        }

        let envelope: TeamsEnvelope =
            serde_json::from_str(&body).map_err(|e| SourceError::decode(e.to_string()))?;
        debug!(count = envelope.response.len(), "decoded teams response");
        Ok(envelope.response)
    }
}

fn header_value(key: &'static str, raw: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(raw).map_err(|e| ConfigError::Invalid {
        key,
        message: format!("not a valid header value: {e}"),
    })
}

#[async_trait]
impl TeamSource for ApiFootballClient {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> SourceResult<Vec<ExternalTeam>> {
        let entries = self.get_teams(&self.competition_query()).await?;
        Ok(entries.into_iter().map(ExternalTeam::from).collect())
    }

    #[instrument(skip(self), fields(external_key = %key))]
    async fn fetch_by_external_key(&self, key: ExternalKey) -> SourceResult<ExternalTeam> {
        let entries = self.get_teams(&[("id", key.to_string())]).await?;
        entries
            .into_iter()
            .next()
            .map(ExternalTeam::from)
            .ok_or(SourceError::NotFound(key))
    }
}
