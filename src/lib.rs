pub mod api;
pub mod config;
pub mod http_cache;
pub mod http_client;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod state;
pub mod team_meta;
pub mod views;
