use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5001/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub request_timeout: Duration,
    pub fetch_parallelism: usize,
    pub league_poll: Duration,
    pub transactions_limit: u32,
    pub http_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
            fetch_parallelism: 6,
            league_poll: Duration::from_secs(300),
            transactions_limit: 50,
            http_cache: true,
        }
    }
}

impl Config {
    /// Reads the `API_*`, `FETCH_PARALLELISM`, `LEAGUE_POLL_SECS`, `TRANSACTIONS_LIMIT` and
    /// `HTTP_CACHE` variables. Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base = env::var("API_BASE")
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let timeout_secs = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(10)
            .max(1);
        let fetch_parallelism = env::var("FETCH_PARALLELISM")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(6)
            .clamp(2, 32);
        let poll_secs = env::var("LEAGUE_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(300)
            .max(30);
        let transactions_limit = env::var("TRANSACTIONS_LIMIT")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(50)
            .clamp(1, 500);
        let http_cache = env::var("HTTP_CACHE")
            .map(|val| val.trim() != "0")
            .unwrap_or(true);

        Self {
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            fetch_parallelism,
            league_poll: Duration::from_secs(poll_secs),
            transactions_limit,
            http_cache,
        }
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        let config = Config {
            api_base: "http://host:5001/api".to_string(),
            ..Config::default()
        };
        assert_eq!(config.endpoint_url("/standings"), "http://host:5001/api/standings");
        assert_eq!(config.endpoint_url("teams"), "http://host:5001/api/teams");
    }
}
