use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;

use rayon::prelude::*;

use crate::api::{Endpoint, FetchOutcome, LeagueApi};
use crate::config::Config;
use crate::model::{Matchup, teams_from_matchups, text_lines};
use crate::state::{Delta, Request, RequestId, Screen, SlotData};

type FetchFn = fn(&LeagueApi, &Endpoint, &mut Vec<String>) -> SlotData;

/// One request feeding one slot. `notes` collects extra log lines the fetch wants to report.
pub struct SlotJob {
    pub endpoint: Endpoint,
    fetch: FetchFn,
}

impl SlotJob {
    fn new(endpoint: Endpoint, fetch: FetchFn) -> Self {
        Self { endpoint, fetch }
    }

    pub fn run(&self, api: &LeagueApi, notes: &mut Vec<String>) -> SlotData {
        (self.fetch)(api, &self.endpoint, notes)
    }
}

/// The fetches a request fans out into, one per slot.
pub fn plan(request: &Request, transactions_limit: u32) -> Vec<SlotJob> {
    match request {
        Request::Mount { screen, week } => screen_jobs(*screen, *week, transactions_limit),
        Request::LeagueInfo => vec![league_info_job()],
        // Sequential; see `run_refresh`.
        Request::Refresh => Vec::new(),
        Request::HeadToHead { team1, team2 } => vec![SlotJob::new(
            Endpoint::HeadToHead {
                team1: team1.clone(),
                team2: team2.clone(),
            },
            |api, ep, _| SlotData::HeadToHead(api.fetch(ep)),
        )],
        Request::TeamStats { team } => vec![SlotJob::new(
            Endpoint::TeamStats {
                team_name: team.clone(),
            },
            |api, ep, _| SlotData::TeamStats(api.fetch(ep)),
        )],
        Request::TrashTalk { team1, team2 } => vec![SlotJob::new(
            Endpoint::TrashTalk {
                team1: team1.clone(),
                team2: team2.clone(),
            },
            |api, ep, _| SlotData::TrashTalk(api.fetch_with(ep, text_lines)),
        )],
        Request::WhatIf(scenario) => vec![SlotJob::new(
            Endpoint::WhatIf {
                scenario: scenario.clone(),
            },
            |api, ep, _| SlotData::WhatIf(api.fetch(ep)),
        )],
        Request::Recap { year, week } => vec![SlotJob::new(
            Endpoint::WeeklyRecap {
                year: *year,
                week: *week,
            },
            |api, ep, _| SlotData::Recap(api.fetch(ep)),
        )],
    }
}

fn league_info_job() -> SlotJob {
    SlotJob::new(Endpoint::LeagueInfo, |api, ep, _| {
        SlotData::League(api.fetch(ep))
    })
}

fn screen_jobs(screen: Screen, week: Option<u32>, transactions_limit: u32) -> Vec<SlotJob> {
    match screen {
        Screen::Standings => vec![SlotJob::new(Endpoint::Standings, |api, _, _| {
            SlotData::Standings(api.standings())
        })],
        Screen::Playoffs => vec![
            SlotJob::new(Endpoint::PlayoffScenarios, |api, ep, _| {
                SlotData::PlayoffScenarios(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::Standings, |api, _, _| {
                SlotData::PlayoffStandings(api.standings())
            }),
        ],
        Screen::Almanac => vec![
            SlotJob::new(Endpoint::HistoricalStats, |api, ep, _| {
                SlotData::AlmanacHistorical(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::ScoringTitles, |api, ep, _| {
                SlotData::AlmanacScoringTitles(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::TeamStatsAllTime, |api, ep, _| {
                SlotData::AlmanacAllTime(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::WinPctByYear, |api, ep, _| {
                SlotData::AlmanacWinPct(api.fetch(ep))
            }),
        ],
        Screen::HeadToHead => vec![SlotJob::new(Endpoint::Teams, |api, ep, notes| {
            SlotData::HeadToHeadTeams(teams_with_fallback(api, ep, notes))
        })],
        Screen::Stats => vec![
            SlotJob::new(Endpoint::Teams, |api, ep, notes| {
                SlotData::StatsTeams(teams_with_fallback(api, ep, notes))
            }),
            SlotJob::new(Endpoint::Rivalries, |api, ep, _| {
                SlotData::Rivalries(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::Streaks, |api, ep, _| SlotData::Streaks(api.fetch(ep))),
            SlotJob::new(Endpoint::PointsTrends, |api, ep, _| {
                SlotData::PointsTrends(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::Consistency, |api, ep, _| {
                SlotData::Consistency(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::Blowouts, |api, ep, _| SlotData::Blowouts(api.fetch(ep))),
            SlotJob::new(Endpoint::BadBeats, |api, ep, _| SlotData::BadBeats(api.fetch(ep))),
            SlotJob::new(Endpoint::WeeklyAwards, |api, ep, _| {
                SlotData::WeeklyAwards(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::LowestScoringWeeks, |api, ep, _| {
                SlotData::LowestScoringWeeks(api.fetch(ep))
            }),
            SlotJob::new(Endpoint::Clutch, |api, ep, _| SlotData::Clutch(api.fetch(ep))),
            SlotJob::new(Endpoint::TeamDna, |api, ep, _| SlotData::TeamDna(api.fetch(ep))),
            SlotJob::new(Endpoint::TrophyCase, |api, _, _| {
                SlotData::TrophyCases(api.trophy_cases())
            }),
        ],
        Screen::TeamStats => vec![SlotJob::new(Endpoint::Standings, |api, _, _| {
            SlotData::TeamStatsStandings(api.standings())
        })],
        Screen::Matchups => vec![SlotJob::new(Endpoint::Matchups { week }, |api, ep, _| {
            SlotData::Matchups(api.fetch(ep))
        })],
        Screen::Transactions => vec![SlotJob::new(
            Endpoint::Transactions {
                limit: transactions_limit,
            },
            |api, ep, _| SlotData::Transactions(api.fetch(ep)),
        )],
        Screen::HallOfFame => vec![SlotJob::new(Endpoint::HallOfFame, |api, ep, _| {
            SlotData::HallOfFame(api.fetch(ep))
        })],
        Screen::HallOfShame => vec![SlotJob::new(Endpoint::HallOfShame, |api, ep, _| {
            SlotData::HallOfShame(api.fetch(ep))
        })],
    }
}

/// `/teams`, or the distinct names seen in `/matchups` when that route fails or is rejected.
fn teams_with_fallback(
    api: &LeagueApi,
    endpoint: &Endpoint,
    notes: &mut Vec<String>,
) -> FetchOutcome<Vec<String>> {
    match api.fetch_with(endpoint, text_lines) {
        FetchOutcome::Loaded(mut teams) => {
            teams.sort();
            teams.dedup();
            FetchOutcome::Loaded(teams)
        }
        FetchOutcome::Rejected(msg) | FetchOutcome::Failed(msg) => {
            notes.push(format!(
                "[INFO] {endpoint} unavailable ({msg}), using team names from matchups"
            ));
            api.fetch::<Vec<Matchup>>(&Endpoint::Matchups { week: None })
                .map(|matchups| teams_from_matchups(&matchups))
        }
    }
}

/// Runs every job concurrently and streams each slot write as soon as its request completes.
/// Returns once all of them have settled; a failure in one never stops the others.
pub fn join_settled(
    api: &LeagueApi,
    id: RequestId,
    jobs: &[SlotJob],
    parallelism: usize,
    tx: &Sender<Delta>,
) {
    with_fetch_pool(parallelism, || {
        jobs.par_iter().for_each(|job| {
            let mut notes = Vec::new();
            let data = job.run(api, &mut notes);
            for note in notes {
                let _ = tx.send(Delta::Log(note));
            }
            let _ = tx.send(Delta::Slot {
                id,
                label: job.endpoint.to_string(),
                data,
            });
        });
    });
}

/// POST `/refresh`, then GET `/league-info`. A transport failure on the POST skips the
/// follow-up read.
fn run_refresh(api: &LeagueApi, id: RequestId, tx: &Sender<Delta>) {
    let outcome = api.refresh();
    let proceed = !matches!(outcome, FetchOutcome::Failed(_));
    let _ = tx.send(Delta::Slot {
        id,
        label: Endpoint::Refresh.to_string(),
        data: SlotData::Refresh(outcome),
    });
    if proceed {
        let job = league_info_job();
        let mut notes = Vec::new();
        let data = job.run(api, &mut notes);
        let _ = tx.send(Delta::Slot {
            id,
            label: job.endpoint.to_string(),
            data,
        });
    }
}

/// Executes `request` to completion and always finishes with `Delta::Settled`.
pub fn run_request(
    api: &LeagueApi,
    id: RequestId,
    request: &Request,
    config: &Config,
    tx: &Sender<Delta>,
) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match request {
        Request::Refresh => run_refresh(api, id, tx),
        _ => {
            let jobs = plan(request, config.transactions_limit);
            join_settled(api, id, &jobs, config.fetch_parallelism, tx);
        }
    }));
    if result.is_err() {
        let _ = tx.send(Delta::Log(format!(
            "[WARN] {:?} aborted before every fetch completed",
            request.query()
        )));
    }
    let _ = tx.send(Delta::Settled(id));
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_mount_covers_every_stats_slot() {
        let jobs = plan(
            &Request::Mount {
                screen: Screen::Stats,
                week: None,
            },
            50,
        );
        let paths: Vec<&str> = jobs.iter().map(|j| j.endpoint.path()).collect();
        assert_eq!(jobs.len(), 12);
        assert!(paths.contains(&"teams"));
        assert!(paths.contains(&"trophy-case"));
        assert!(!paths.contains(&"what-if"));
    }

    #[test]
    fn matchups_mount_carries_week_filter() {
        let jobs = plan(
            &Request::Mount {
                screen: Screen::Matchups,
                week: Some(3),
            },
            50,
        );
        assert_eq!(jobs[0].endpoint, Endpoint::Matchups { week: Some(3) });
    }

    #[test]
    fn transactions_use_configured_limit() {
        let jobs = plan(
            &Request::Mount {
                screen: Screen::Transactions,
                week: None,
            },
            25,
        );
        assert_eq!(jobs[0].endpoint, Endpoint::Transactions { limit: 25 });
    }
}
