use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::Config;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Blocking client shared by every fetch thread. Built from the first config it sees.
pub fn api_client(config: &Config) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Client::builder()
            .user_agent(concat!("gridiron_terminal/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(config.request_timeout))
            .build()
            .context("failed to build api client")
    })
}
