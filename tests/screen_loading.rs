mod common;

use common::{Harness, rejected, script_stats};
use gridiron_terminal::api::Endpoint;
use gridiron_terminal::model::{Streak, WhatIfScenario};
use gridiron_terminal::state::{Delta, Query, Screen, StatsView, apply_delta};
use gridiron_terminal::views;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

#[test]
fn stats_mount_fills_every_slot() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    h.show(Screen::Stats);

    assert!(!h.state.is_loading(Query::Mount(Screen::Stats)));
    assert!(!h.state.needs_mount());
    assert_eq!(h.transport.calls().len(), 13);
    assert_eq!(
        h.transport.calls().last(),
        Some(&Endpoint::WeeklyRecap {
            year: 2025,
            week: 15
        })
    );
    assert!(!h.state.is_loading(Query::Recap));

    let stats = &h.state.stats;
    assert_eq!(
        stats.teams,
        names(&["Mebs Militia", "Pels", "Wolfpack", "Woody"])
    );
    assert_eq!(stats.rivalries.len(), 2);
    assert_eq!(stats.streaks.current.len(), 2);
    assert_eq!(stats.streaks.all_time[0].streak, 11);
    assert_eq!(stats.points_trends[0].yearly_averages.len(), 2);
    assert_eq!(stats.blowouts[0].margin, 109.2);
    assert_eq!(stats.bad_beats.high_score_losses.len(), 1);
    assert_eq!(stats.weekly_awards.highest_scores[0].score, 187.3);
    assert_eq!(stats.lowest_weeks[0].team, "Scrubs");
    assert_eq!(stats.clutch[0].close_wins, 14);
    assert_eq!(stats.team_dna[0].traits, names(&["Consistent", "Stubborn"]));
    assert_eq!(stats.trophy_cases.len(), 2);
    // On-demand slots are untouched by the mount.
    assert!(stats.trash_talk.is_empty());
    assert!(stats.what_if.message.is_none());
    assert_eq!(stats.recap.total_games, 6);
    assert_eq!(stats.recap.summary, "Pels clinch the top seed");
    assert!(h.state.logs.is_empty());
}

#[test]
fn one_failing_route_leaves_the_rest_loaded() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    h.transport
        .fail("rivalries", "connection refused")
        .reply("streaks", rejected("Database busy"));
    h.state.stats.streaks.current = vec![Streak {
        team: "Pels".to_string(),
        streak: 2,
        kind: "win".to_string(),
        ..Streak::default()
    }];

    h.show(Screen::Stats);

    assert!(!h.state.is_loading(Query::Mount(Screen::Stats)));
    assert!(h.state.stats.rivalries.is_empty());
    assert_eq!(h.state.stats.streaks.current.len(), 1, "rejection keeps the old value");
    assert_eq!(h.state.stats.clutch.len(), 1);
    assert_eq!(h.state.stats.trophy_cases.len(), 2);
    assert!(
        h.state
            .logs
            .iter()
            .any(|l| l == "[WARN] GET /rivalries failed: connection refused")
    );
    assert!(
        h.state
            .logs
            .iter()
            .any(|l| l == "[WARN] GET /streaks rejected: Database busy")
    );

    let body = views::dispatch(&h.state);
    assert!(body.contains("No rivalries data available"));
    h.state.cycle_view(true);
    assert_eq!(h.state.stats.view, StatsView::CurrentStreaks);
    assert!(views::dispatch(&h.state).contains("Pels"));
}

#[test]
fn rejection_keeps_slot_and_failure_resets_it() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    h.show(Screen::Stats);
    assert_eq!(h.state.stats.rivalries.len(), 2);

    h.transport.reply("rivalries", rejected("Not ready"));
    h.dispatch(Query::Mount(Screen::Stats));
    assert_eq!(h.state.stats.rivalries.len(), 2);

    h.transport.fail("rivalries", "timed out");
    h.dispatch(Query::Mount(Screen::Stats));
    assert!(h.state.stats.rivalries.is_empty());
}

#[test]
fn superseded_head_to_head_response_is_dropped() {
    let mut h = Harness::new();
    h.state.head_to_head.teams = names(&["Pels", "Wolfpack", "Woody"]);
    h.state.head_to_head.team_a = Some("Pels".to_string());
    h.state.head_to_head.team_b = Some("Woody".to_string());
    h.transport
        .reply_fixture("head-to-head", "head_to_head.json");

    let first = h.state.request_for(Query::HeadToHead).expect("valid pair");
    let first_id = h.state.begin(Query::HeadToHead);
    let stale = h.execute(first_id, &first);

    h.state.head_to_head.team_b = Some("Wolfpack".to_string());
    h.transport
        .reply_fixture("head-to-head", "head_to_head_empty.json");
    let second = h.state.request_for(Query::HeadToHead).expect("valid pair");
    let second_id = h.state.begin(Query::HeadToHead);

    for delta in stale {
        apply_delta(&mut h.state, delta);
    }
    assert!(h.state.head_to_head.compared.is_none());
    assert_eq!(h.state.head_to_head.result.total_games, 0);
    assert!(h.state.is_loading(Query::HeadToHead));

    for delta in h.execute(second_id, &second) {
        apply_delta(&mut h.state, delta);
    }
    assert_eq!(
        h.state.head_to_head.compared,
        Some(("Pels".to_string(), "Wolfpack".to_string()))
    );
    assert!(!h.state.is_loading(Query::HeadToHead));
}

#[test]
fn team_names_fall_back_to_matchups() {
    let mut h = Harness::new();
    h.transport
        .fail("teams", "http 500 Internal Server Error")
        .reply_fixture("matchups", "matchups.json");

    h.show(Screen::HeadToHead);

    assert_eq!(
        h.state.head_to_head.teams,
        names(&["Pels", "Scrubs", "Wolfpack", "Woody"])
    );
    assert_eq!(h.transport.call_labels(), vec!["GET /teams", "GET /matchups"]);
    assert!(
        h.state
            .logs
            .iter()
            .any(|l| l.starts_with("[INFO] GET /teams unavailable"))
    );
}

#[test]
fn team_stats_selects_first_team_and_loads_it() {
    let mut h = Harness::new();
    h.transport
        .reply_fixture("standings", "standings.json")
        .reply_fixture("team-stats", "team_stats.json");

    h.show(Screen::TeamStats);

    let ts = &h.state.team_stats;
    assert_eq!(ts.selected.as_deref(), Some("Pels"));
    assert_eq!(ts.stats_team.as_deref(), Some("Pels"));
    assert_eq!(ts.stats.current.wins, 10);
    assert_eq!(ts.stats.opponent_records[0].opponent, "Woody");
    assert_eq!(
        h.transport.calls()[1],
        Endpoint::TeamStats {
            team_name: "Pels".to_string()
        }
    );

    assert_eq!(h.state.adjust_selection(true), Some(Query::TeamStats));
    h.dispatch(Query::TeamStats);
    assert_eq!(h.state.team_stats.stats_team.as_deref(), Some("Woody"));
    assert_eq!(
        h.transport.calls().last(),
        Some(&Endpoint::TeamStats {
            team_name: "Woody".to_string()
        })
    );
}

#[test]
fn refresh_posts_then_reads_league_info() {
    let mut h = Harness::new();
    h.transport
        .reply_fixture("refresh", "refresh.json")
        .reply_fixture("league-info", "league_info.json")
        .reply_fixture("standings", "standings.json");
    h.show(Screen::Standings);
    h.transport.clear_calls();

    let request = h.state.request_for(Query::Refresh).expect("refresh request");
    let id = h.state.begin(Query::Refresh);
    assert!(h.state.refreshing());

    let deltas = h.execute(id, &request);
    let (settled, rest) = deltas.split_last().expect("deltas");
    assert!(matches!(settled, Delta::Settled(_)));
    for delta in rest.iter().cloned() {
        apply_delta(&mut h.state, delta);
    }
    assert!(h.state.refreshing(), "still refreshing until settled");
    assert_eq!(h.state.league.name, "The Greatest League");
    assert_eq!(h.state.league.current_week, Some(14));

    apply_delta(&mut h.state, settled.clone());
    assert!(!h.state.refreshing());
    assert_eq!(
        h.transport.call_labels(),
        vec!["POST /refresh", "GET /league-info"]
    );
    assert_eq!(
        h.state.refresh_message.as_deref(),
        Some("Data refreshed successfully")
    );

    // The visible screen reloads after a successful refresh.
    assert!(h.state.needs_mount());
    h.settle();
    assert_eq!(
        h.transport.call_labels().last().map(String::as_str),
        Some("GET /standings")
    );
}

#[test]
fn refresh_transport_failure_skips_league_info() {
    let mut h = Harness::new();
    h.transport
        .fail("refresh", "connection refused")
        .reply_fixture("standings", "standings.json");
    h.show(Screen::Standings);
    h.transport.clear_calls();

    h.dispatch(Query::Refresh);

    assert_eq!(h.transport.call_labels(), vec!["POST /refresh"]);
    assert!(!h.state.refreshing());
    assert!(!h.state.needs_mount());
    assert!(
        h.state
            .logs
            .iter()
            .any(|l| l.starts_with("[WARN] POST /refresh failed"))
    );
}

#[test]
fn rejected_refresh_still_reads_league_info() {
    let mut h = Harness::new();
    h.transport
        .reply("refresh", rejected("Refresh already running"))
        .reply_fixture("league-info", "league_info.json");

    h.dispatch(Query::Refresh);

    assert_eq!(
        h.transport.call_labels(),
        vec!["POST /refresh", "GET /league-info"]
    );
    assert!(h.state.refresh_message.is_none());
    assert_eq!(h.state.league.total_teams, 12);
}

#[test]
fn what_if_failure_shows_scenario_error() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::Stats);
    h.state.stats.view = StatsView::WhatIf;
    h.state.stats.form.team1 = Some("Pels".to_string());
    h.state.stats.form.team2 = Some("Woody".to_string());
    h.transport.fail("what-if", "http 500 Internal Server Error");

    assert!(h.dispatch(Query::WhatIf));

    assert_eq!(
        h.transport.calls(),
        vec![Endpoint::WhatIf {
            scenario: WhatIfScenario {
                year: 2025,
                week: 15,
                team1: "Pels".to_string(),
                team2: "Woody".to_string(),
                new_winner: "Pels".to_string(),
            }
        }]
    );
    assert_eq!(
        h.state.stats.what_if.error.as_deref(),
        Some("Failed to calculate scenario")
    );
    assert!(views::dispatch(&h.state).contains("Failed to calculate scenario"));
}

#[test]
fn recap_failure_shows_load_error() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::Stats);
    h.state.stats.view = StatsView::WeeklyRecap;
    h.state.stats.form.year = 2024;
    h.state.stats.form.week = 3;
    h.transport.fail("weekly-recap", "connection refused");

    assert!(h.dispatch(Query::Recap));

    assert_eq!(
        h.transport.calls(),
        vec![Endpoint::WeeklyRecap {
            year: 2024,
            week: 3
        }]
    );
    assert_eq!(
        h.state.stats.recap.error.as_deref(),
        Some("Failed to load recap")
    );
    assert!(
        h.state
            .logs
            .iter()
            .any(|l| l == "[WARN] GET /weekly-recap failed: connection refused")
    );
    let body = views::dispatch(&h.state);
    assert!(body.contains("Failed to load recap"));
    assert!(!body.contains("Pick a year and week"));
}

#[test]
fn what_if_needs_both_teams() {
    let mut h = Harness::new();
    h.state.stats.form.team1 = Some("Pels".to_string());

    assert!(!h.dispatch(Query::WhatIf));
    assert!(h.transport.calls().is_empty());
    assert!(h.state.logs.iter().any(|l| l.starts_with("[WARN] What-if")));
}

#[test]
fn matchups_week_filter_refetches() {
    let mut h = Harness::new();
    h.transport.reply_fixture("matchups", "matchups.json");
    h.show(Screen::Matchups);
    assert_eq!(h.state.matchups.matchups.len(), 3);

    let query = h.state.adjust_selection(true);
    assert_eq!(query, Some(Query::Mount(Screen::Matchups)));
    h.dispatch(Query::Mount(Screen::Matchups));

    assert_eq!(
        h.transport.calls().last(),
        Some(&Endpoint::Matchups { week: Some(1) })
    );
}
