mod common;

use common::{Harness, ok, script_stats};
use gridiron_terminal::state::{AlmanacView, Query, Screen, StatsView};
use gridiron_terminal::views::{self, ChartSpec, RIVALRY_LIMIT};

fn pair(h: &mut Harness, a: &str, b: &str) {
    h.state.head_to_head.teams = ["Pels", "Wolfpack", "Woody"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    h.state.head_to_head.team_a = Some(a.to_string());
    h.state.head_to_head.team_b = Some(b.to_string());
}

#[test]
fn switching_view_tags_never_fetches() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    h.show(Screen::Stats);
    h.show(Screen::Almanac);
    h.transport.clear_calls();

    let mut titles = Vec::new();
    for _ in 0..AlmanacView::ALL.len() * 3 {
        h.state.cycle_view(true);
        titles.push(views::dispatch(&h.state).title);
        assert!(!h.state.needs_mount());
    }
    h.state.set_screen(Screen::Stats);
    for _ in 0..StatsView::ALL.len() * 3 {
        h.state.cycle_view(false);
        titles.push(views::dispatch(&h.state).title);
        assert!(!h.state.needs_mount());
    }

    assert!(h.transport.calls().is_empty());
    titles.sort();
    titles.dedup();
    assert_eq!(titles.len(), AlmanacView::ALL.len() + StatsView::ALL.len());
}

#[test]
fn rivalries_render_as_ranked_cards() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    h.show(Screen::Stats);

    let body = views::dispatch(&h.state);
    let lines: Vec<&str> = body.lines.iter().map(|l| l.text.as_str()).collect();
    let start = lines.iter().position(|l| *l == "#1").expect("first card");
    assert_eq!(
        &lines[start..start + 5],
        &[
            "#1",
            "  Pels  5W",
            "  vs",
            "  Woody  3W",
            "  8 games • Avg margin: 12.5 pts",
        ]
    );
    assert!(body.contains("Trash Talk Generator"));
}

#[test]
fn rivalries_are_capped() {
    let mut h = Harness::new();
    script_stats(&h.transport);
    let many: Vec<serde_json::Value> = (0..20)
        .map(|i| {
            serde_json::json!({
                "team1": format!("Team {i}"), "team2": "Pels",
                "team1_wins": 1, "team2_wins": 1, "games_played": 2, "avg_margin": 3.0
            })
        })
        .collect();
    h.transport.reply("rivalries", ok(serde_json::Value::Array(many)));
    h.show(Screen::Stats);

    let body = views::dispatch(&h.state);
    assert!(body.lines.iter().any(|l| l.text == format!("#{RIVALRY_LIMIT}")));
    assert!(!body.lines.iter().any(|l| l.text == format!("#{}", RIVALRY_LIMIT + 1)));
}

#[test]
fn empty_head_to_head_shows_message_without_charts() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::HeadToHead);
    pair(&mut h, "Pels", "Woody");
    h.transport
        .reply_fixture("head-to-head", "head_to_head_empty.json");

    assert!(h.dispatch(Query::HeadToHead));

    let body = views::dispatch(&h.state);
    assert!(body.contains("No head-to-head history found between Pels and Woody"));
    assert!(body.charts.is_empty());
}

#[test]
fn head_to_head_history_is_newest_first() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::HeadToHead);
    pair(&mut h, "Pels", "Woody");
    h.transport.reply_fixture("head-to-head", "head_to_head.json");

    assert!(h.dispatch(Query::HeadToHead));

    let body = views::dispatch(&h.state);
    let lines: Vec<&str> = body.lines.iter().map(|l| l.text.as_str()).collect();
    let heading = lines
        .iter()
        .position(|l| *l == "Matchup history")
        .expect("history heading");
    assert!(lines[heading + 1].starts_with("  2025 W9"));
    assert!(lines[heading + 2].starts_with("  2025 W2"));
    assert!(lines[heading + 3].starts_with("  2023 W4"));
    // Pels scored 90.5 in the game listed with Woody as team 1.
    assert!(lines[heading + 2].contains("Pels 90.50 - 120.00 Woody"));
    assert!(matches!(
        body.charts.as_slice(),
        [ChartSpec::Bars { bars, .. }] if bars.len() == 2
    ));
}

#[test]
fn failed_head_to_head_with_both_teams_shows_placeholder() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::HeadToHead);
    pair(&mut h, "Pels", "Woody");
    h.transport.fail("head-to-head", "http 502 Bad Gateway");

    assert!(h.dispatch(Query::HeadToHead));

    assert!(h.state.head_to_head.compared.is_none());
    let body = views::dispatch(&h.state);
    assert!(body.contains("No head-to-head data available"));
    assert!(!body.contains("Pick two teams to compare"));
}

#[test]
fn same_team_pair_is_not_sent() {
    let mut h = Harness::new();
    h.state.set_screen(Screen::HeadToHead);
    pair(&mut h, "Pels", "Pels");

    assert!(!h.dispatch(Query::HeadToHead));

    assert!(h.transport.calls().is_empty());
    assert!(views::dispatch(&h.state).contains("Please select two different teams"));
}

#[test]
fn loading_screen_is_marked_in_title() {
    let mut h = Harness::new();
    h.state.begin(Query::Mount(Screen::Standings));
    let body = views::dispatch(&h.state);
    assert!(body.title.ends_with("(loading...)"));
    assert!(body.contains("No standings data available"));
}

#[test]
fn standings_rank_by_place_with_points_chart() {
    let mut h = Harness::new();
    h.transport.reply_fixture("standings", "standings.json");
    h.show(Screen::Standings);

    let body = views::dispatch(&h.state);
    assert_eq!(body.title, "Standings 2025");
    assert!(body.contains("Highest scorer: Pels (1650.42 points)"));
    assert!(body.contains("Soaring High"));
    assert!(matches!(
        body.charts.as_slice(),
        [ChartSpec::Bars { bars, .. }] if bars.len() == 3 && bars[0].value == 1650
    ));
}
