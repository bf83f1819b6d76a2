use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::http_cache::ResponseCache;
use crate::http_client::api_client;
use crate::model::{StandingsTable, WhatIfScenario, decode, parse_trophy_cases};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Every route of the statistics API this client talks to.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    LeagueInfo,
    Teams,
    Standings,
    Matchups { week: Option<u32> },
    Rivalries,
    Streaks,
    PointsTrends,
    Consistency,
    Blowouts,
    BadBeats,
    WeeklyAwards,
    Clutch,
    TeamDna,
    TrophyCase,
    LowestScoringWeeks,
    HallOfFame,
    HallOfShame,
    HeadToHead { team1: String, team2: String },
    TeamStats { team_name: String },
    TeamStatsAllTime,
    HistoricalStats,
    ScoringTitles,
    WinPctByYear,
    PlayoffScenarios,
    TrashTalk { team1: String, team2: String },
    WeeklyRecap { year: i32, week: u32 },
    Transactions { limit: u32 },
    Refresh,
    WhatIf { scenario: WhatIfScenario },
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::LeagueInfo => "league-info",
            Endpoint::Teams => "teams",
            Endpoint::Standings => "standings",
            Endpoint::Matchups { .. } => "matchups",
            Endpoint::Rivalries => "rivalries",
            Endpoint::Streaks => "streaks",
            Endpoint::PointsTrends => "points-trends",
            Endpoint::Consistency => "consistency",
            Endpoint::Blowouts => "blowouts",
            Endpoint::BadBeats => "bad-beats",
            Endpoint::WeeklyAwards => "weekly-awards",
            Endpoint::Clutch => "clutch",
            Endpoint::TeamDna => "team-dna",
            Endpoint::TrophyCase => "trophy-case",
            Endpoint::LowestScoringWeeks => "lowest-scoring-weeks",
            Endpoint::HallOfFame => "hall-of-fame",
            Endpoint::HallOfShame => "hall-of-shame",
            Endpoint::HeadToHead { .. } => "head-to-head",
            Endpoint::TeamStats { .. } => "team-stats",
            Endpoint::TeamStatsAllTime => "team-stats-all-time",
            Endpoint::HistoricalStats => "historical-stats",
            Endpoint::ScoringTitles => "scoring-titles",
            Endpoint::WinPctByYear => "win-pct-by-year",
            Endpoint::PlayoffScenarios => "playoff-scenarios",
            Endpoint::TrashTalk { .. } => "trash-talk",
            Endpoint::WeeklyRecap { .. } => "weekly-recap",
            Endpoint::Transactions { .. } => "transactions",
            Endpoint::Refresh => "refresh",
            Endpoint::WhatIf { .. } => "what-if",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Refresh | Endpoint::WhatIf { .. } => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Matchups { week: Some(week) } => vec![("week", week.to_string())],
            Endpoint::HeadToHead { team1, team2 } | Endpoint::TrashTalk { team1, team2 } => {
                vec![("team1", team1.clone()), ("team2", team2.clone())]
            }
            Endpoint::TeamStats { team_name } => vec![("team_name", team_name.clone())],
            Endpoint::WeeklyRecap { year, week } => {
                vec![("year", year.to_string()), ("week", week.to_string())]
            }
            Endpoint::Transactions { limit } => vec![("limit", limit.to_string())],
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Endpoint::WhatIf { scenario } => Some(serde_json::json!({ "scenario": scenario })),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.method() {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        write!(f, "{method} /{}", self.path())
    }
}

/// Raw request seam. The HTTP implementation talks to the real API; tests script responses.
pub trait Transport: Send + Sync {
    fn send(&self, endpoint: &Endpoint) -> Result<String>;
}

pub struct HttpTransport {
    config: Config,
    cache: Option<ResponseCache>,
}

impl HttpTransport {
    pub fn new(config: Config) -> Self {
        let cache = config
            .http_cache
            .then(|| ResponseCache::open(ResponseCache::default_location()));
        Self { config, cache }
    }

    fn url_for(&self, endpoint: &Endpoint) -> Result<Url> {
        let raw = self.config.endpoint_url(endpoint.path());
        let mut url = Url::parse(&raw).with_context(|| format!("invalid api url {raw}"))?;
        let query = endpoint.query();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: &Endpoint) -> Result<String> {
        let client = api_client(&self.config)?;
        let url = self.url_for(endpoint)?;
        match (endpoint.method(), self.cache.as_ref()) {
            (Method::Get, Some(cache)) => cache.get(client, url.as_str()),
            (Method::Get, None) => {
                let resp = client.get(url).send().context("request failed")?;
                read_body(resp)
            }
            (Method::Post, _) => {
                let mut req = client.post(url);
                if let Some(body) = endpoint.body() {
                    req = req.json(&body);
                }
                let resp = req.send().context("request failed")?;
                read_body(resp)
            }
        }
    }
}

fn read_body(resp: reqwest::blocking::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}"));
    }
    Ok(body)
}

/// `{ success, data?, error? }` wrapper shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Result of one request, classified the way slots react to it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// `success: true`; the data (or an empty default when absent).
    Loaded(T),
    /// Well-formed response with `success: false`. The slot keeps its previous value.
    Rejected(String),
    /// Transport, status or decode failure. The slot is reset to its empty default.
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loaded(value) => FetchOutcome::Loaded(f(value)),
            FetchOutcome::Rejected(msg) => FetchOutcome::Rejected(msg),
            FetchOutcome::Failed(msg) => FetchOutcome::Failed(msg),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            FetchOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshSummary {
    pub message: Option<String>,
    pub updated_at: Option<String>,
}

/// Typed calls over a [`Transport`].
#[derive(Clone)]
pub struct LeagueApi {
    transport: Arc<dyn Transport>,
}

impl LeagueApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn http(config: Config) -> Self {
        Self::new(Arc::new(HttpTransport::new(config)))
    }

    pub fn envelope(&self, endpoint: &Endpoint) -> FetchOutcome<Envelope> {
        let body = match self.transport.send(endpoint) {
            Ok(body) => body,
            Err(err) => return FetchOutcome::Failed(format!("{err:#}")),
        };
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return FetchOutcome::Failed("empty response body".to_string());
        }
        let envelope: Envelope = match serde_json::from_str(trimmed) {
            Ok(envelope) => envelope,
            Err(err) => return FetchOutcome::Failed(format!("invalid json: {err}")),
        };
        if !envelope.success {
            let msg = envelope
                .error
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "request rejected".to_string());
            return FetchOutcome::Rejected(msg);
        }
        FetchOutcome::Loaded(envelope)
    }

    pub fn fetch_with<T>(
        &self,
        endpoint: &Endpoint,
        decode_data: impl FnOnce(Value) -> serde_json::Result<T>,
    ) -> FetchOutcome<T>
    where
        T: Default,
    {
        match self.envelope(endpoint) {
            FetchOutcome::Loaded(envelope) => match envelope.data {
                None | Some(Value::Null) => FetchOutcome::Loaded(T::default()),
                Some(data) => match decode_data(data) {
                    Ok(value) => FetchOutcome::Loaded(value),
                    Err(err) => FetchOutcome::Failed(format!("unexpected payload: {err}")),
                },
            },
            FetchOutcome::Rejected(msg) => FetchOutcome::Rejected(msg),
            FetchOutcome::Failed(msg) => FetchOutcome::Failed(msg),
        }
    }

    pub fn fetch<T>(&self, endpoint: &Endpoint) -> FetchOutcome<T>
    where
        T: DeserializeOwned + Default,
    {
        self.fetch_with(endpoint, decode)
    }

    pub fn trophy_cases(&self) -> FetchOutcome<Vec<crate::model::TrophyCase>> {
        self.fetch_with(&Endpoint::TrophyCase, parse_trophy_cases)
    }

    pub fn standings(&self) -> FetchOutcome<StandingsTable> {
        match self.envelope(&Endpoint::Standings) {
            FetchOutcome::Loaded(envelope) => {
                let year = envelope.year;
                let teams = match envelope.data {
                    None | Some(Value::Null) => Vec::new(),
                    Some(data) => match decode(data) {
                        Ok(teams) => teams,
                        Err(err) => {
                            return FetchOutcome::Failed(format!("unexpected payload: {err}"));
                        }
                    },
                };
                FetchOutcome::Loaded(StandingsTable { teams, year })
            }
            FetchOutcome::Rejected(msg) => FetchOutcome::Rejected(msg),
            FetchOutcome::Failed(msg) => FetchOutcome::Failed(msg),
        }
    }

    pub fn refresh(&self) -> FetchOutcome<RefreshSummary> {
        self.envelope(&Endpoint::Refresh).map(|envelope| RefreshSummary {
            message: envelope.message,
            updated_at: envelope.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_follow_endpoint() {
        let h2h = Endpoint::HeadToHead {
            team1: "Pels".to_string(),
            team2: "Woody".to_string(),
        };
        assert_eq!(
            h2h.query(),
            vec![("team1", "Pels".to_string()), ("team2", "Woody".to_string())]
        );
        assert!(Endpoint::Matchups { week: None }.query().is_empty());
        assert_eq!(Endpoint::Refresh.method(), Method::Post);
        assert_eq!(Endpoint::Rivalries.to_string(), "GET /rivalries");
    }

    #[test]
    fn what_if_body_wraps_scenario() {
        let endpoint = Endpoint::WhatIf {
            scenario: WhatIfScenario {
                year: 2025,
                week: 15,
                team1: "A".to_string(),
                team2: "B".to_string(),
                new_winner: "B".to_string(),
            },
        };
        let body = endpoint.body().unwrap();
        assert_eq!(body["scenario"]["newWinner"], "B");
        assert_eq!(body["scenario"]["week"], 15);
    }

    #[test]
    fn http_transport_encodes_query() {
        let transport = HttpTransport::new(Config {
            api_base: "http://localhost:5001/api".to_string(),
            ..Config::default()
        });
        let url = transport
            .url_for(&Endpoint::TeamStats {
                team_name: "Maggi's Mighty Ducks".to_string(),
            })
            .unwrap();
        assert_eq!(url.path(), "/api/team-stats");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].1, "Maggi's Mighty Ducks");
    }
}
