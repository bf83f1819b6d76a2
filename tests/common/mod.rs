#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, mpsc};

use anyhow::{Result, anyhow};
use gridiron_terminal::api::{Endpoint, LeagueApi, Transport};
use gridiron_terminal::config::Config;
use gridiron_terminal::orchestrator::run_request;
use gridiron_terminal::state::{AppState, Delta, Query, Request, RequestId, Screen, apply_delta};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn ok(data: serde_json::Value) -> String {
    serde_json::json!({ "success": true, "data": data }).to_string()
}

pub fn rejected(error: &str) -> String {
    serde_json::json!({ "success": false, "error": error }).to_string()
}

#[derive(Clone)]
enum Reply {
    Body(String),
    Fail(String),
}

/// Answers by route path and records every request it sees. Unscripted routes fail like a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Endpoint>>,
}

impl ScriptedTransport {
    pub fn reply(&self, path: &str, body: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .expect("replies lock")
            .insert(path.to_string(), Reply::Body(body.into()));
        self
    }

    pub fn reply_fixture(&self, path: &str, fixture: &str) -> &Self {
        self.reply(path, read_fixture(fixture))
    }

    pub fn fail(&self, path: &str, msg: &str) -> &Self {
        self.replies
            .lock()
            .expect("replies lock")
            .insert(path.to_string(), Reply::Fail(msg.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_labels(&self) -> Vec<String> {
        self.calls().iter().map(|e| e.to_string()).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("calls lock").clear();
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, endpoint: &Endpoint) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(endpoint.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .get(endpoint.path())
            .cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("http 404 Not Found")),
        }
    }
}

/// App state wired to a scripted API. Requests run to completion on the calling thread.
pub struct Harness {
    pub state: AppState,
    pub transport: Arc<ScriptedTransport>,
    api: LeagueApi,
    config: Config,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let api = LeagueApi::new(transport.clone());
        Self {
            state: AppState::new(),
            transport,
            api,
            config: Config {
                fetch_parallelism: 4,
                ..Config::default()
            },
        }
    }

    /// Same path the UI takes: validate, start a generation, run, apply every delta.
    pub fn dispatch(&mut self, query: Query) -> bool {
        let Some(request) = self.state.request_for(query) else {
            return false;
        };
        let id = self.state.begin(query);
        for delta in self.execute(id, &request) {
            apply_delta(&mut self.state, delta);
        }
        true
    }

    pub fn execute(&self, id: RequestId, request: &Request) -> Vec<Delta> {
        let (tx, rx) = mpsc::channel();
        run_request(&self.api, id, request, &self.config, &tx);
        drop(tx);
        rx.into_iter().collect()
    }

    /// One UI tick's worth of automatic work: queued follow-ups, then mounting the visible screen.
    pub fn settle(&mut self) {
        loop {
            let follow_ups = self.state.take_follow_ups();
            let mount = self.state.needs_mount();
            if follow_ups.is_empty() && !mount {
                break;
            }
            for query in follow_ups {
                self.dispatch(query);
            }
            if self.state.needs_mount() {
                let screen = self.state.screen;
                self.dispatch(Query::Mount(screen));
            }
        }
    }

    pub fn show(&mut self, screen: Screen) {
        self.state.set_screen(screen);
        self.settle();
    }
}

/// Scripts every route the Stats screen mounts with, plus the default weekly recap.
pub fn script_stats(transport: &ScriptedTransport) {
    transport
        .reply_fixture("teams", "teams.json")
        .reply_fixture("rivalries", "rivalries.json")
        .reply_fixture("streaks", "streaks.json")
        .reply_fixture("trophy-case", "trophy_case.json")
        .reply(
            "points-trends",
            ok(serde_json::json!([{
                "team": "Pels",
                "yearly_averages": [{"year": 2024, "avg_score": 118.2}, {"year": 2025, "avg_score": 126.9}],
                "trend": "up",
                "current_avg": 126.9,
                "overall_avg": 115.0
            }])),
        )
        .reply(
            "consistency",
            ok(serde_json::json!([{
                "team": "Woody", "avg_score": 112.4, "std_dev": 14.2,
                "coefficient_of_variation": 12.6, "games_played": 195
            }])),
        )
        .reply(
            "blowouts",
            ok(serde_json::json!([{
                "winner": "Pels", "loser": "Scrubs", "winner_score": 170.2,
                "loser_score": 61.0, "margin": 109.2, "year": 2021, "week": 6
            }])),
        )
        .reply(
            "bad-beats",
            ok(serde_json::json!({
                "high_score_losses": [{"team": "Woody", "opponent": "Pels", "team_score": 150.1, "opponent_score": 151.0, "year": 2022, "week": 3}],
                "low_score_wins": []
            })),
        )
        .reply(
            "weekly-awards",
            ok(serde_json::json!({
                "highest_scores": [{"team": "Pels", "score": 187.3, "opponent": "Scrubs", "opponent_score": 90.0, "year": 2021, "week": 6}],
                "lowest_winning_scores": [],
                "biggest_margins": []
            })),
        )
        .reply(
            "lowest-scoring-weeks",
            ok(serde_json::json!([{
                "team": "Scrubs", "score": 41.2, "opponent": "Woody",
                "opponent_score": 99.0, "year": 2016, "week": 11
            }])),
        )
        .reply(
            "clutch",
            ok(serde_json::json!([{
                "team": "Pels", "close_games": 20, "close_wins": 14, "close_losses": 6,
                "close_win_pct": 70.0, "all_win_pct": 61.5, "clutch_factor": 8.5
            }])),
        )
        .reply(
            "weekly-recap",
            ok(serde_json::json!({
                "year": 2025, "week": 15, "total_games": 6,
                "summary": "Pels clinch the top seed",
                "highest_score": {"team": "Pels", "score": 171.4, "opponent": "Scrubs", "opponent_score": 88.0},
                "biggest_blowout": null,
                "closest_game": null
            })),
        )
        .reply(
            "team-dna",
            ok(serde_json::json!([{
                "team": "Woody", "personality": "The Grinder", "traits": ["Consistent", "Stubborn"],
                "seasons": 14, "championships": 1, "playoff_rate": 57.1
            }])),
        );
}
