use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use gridiron_terminal::api::{Endpoint, FetchOutcome};
use gridiron_terminal::model::{Matchup, Rivalry, Standing, teams_from_matchups};
use gridiron_terminal::state::{AppState, Delta, Query, Screen, SlotData, StatsView, apply_delta};
use gridiron_terminal::views;

const TEAMS: [&str; 12] = [
    "Maggi's Mighty Ducks",
    "Mebs Militia",
    "Pels",
    "Wolfpack",
    "The Brotherhood",
    "The Generous",
    "The Ratpack",
    "Woody",
    "cheeseheads",
    "DirtyBirds",
    "Killer Cam",
    "Scrubs",
];

fn matchups_json() -> String {
    let mut rows = Vec::new();
    for year in 2012..=2025 {
        for week in 1..=17 {
            for pair in 0..6 {
                let home = TEAMS[pair * 2];
                let away = TEAMS[pair * 2 + 1];
                let home_score = 80.0 + ((year + week * 7 + pair as i32) % 60) as f64;
                let away_score = 85.0 + ((year * 3 + week + pair as i32) % 55) as f64;
                let winner = if home_score >= away_score { home } else { away };
                rows.push(serde_json::json!({
                    "year": year,
                    "week": week,
                    "team1_name": home,
                    "team2_name": away,
                    "team1_score": home_score,
                    "team2_score": away_score,
                    "winner": winner,
                }));
            }
        }
    }
    serde_json::Value::Array(rows).to_string()
}

fn standings_json() -> String {
    let rows: Vec<serde_json::Value> = TEAMS
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            serde_json::json!({
                "id": idx.to_string(),
                "name": name,
                "wins": 13 - idx,
                "losses": idx,
                "ties": null,
                "points_for": format!("{:.2}", 1700.0 - idx as f64 * 21.5),
                "points_against": 1500.0 + idx as f64 * 9.0,
                "place": idx + 1,
                "logo": format!("https://cdn.example.com/{idx}.png?x=40&y=40"),
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

fn bench_matchups_parse(c: &mut Criterion) {
    let raw = matchups_json();
    c.bench_function("matchups_parse", |b| {
        b.iter(|| {
            let rows: Vec<Matchup> = serde_json::from_str(black_box(&raw)).unwrap();
            black_box(teams_from_matchups(&rows).len());
        })
    });
}

fn bench_standings_parse(c: &mut Criterion) {
    let raw = standings_json();
    c.bench_function("standings_parse", |b| {
        b.iter(|| {
            let rows: Vec<Standing> = serde_json::from_str(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_matchups_slot_apply(c: &mut Criterion) {
    let rows: Vec<Matchup> = serde_json::from_str(&matchups_json()).unwrap();
    c.bench_function("matchups_slot_apply", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            let id = state.begin(Query::Mount(Screen::Matchups));
            apply_delta(
                &mut state,
                Delta::Slot {
                    id,
                    label: Endpoint::Matchups { week: None }.to_string(),
                    data: SlotData::Matchups(FetchOutcome::Loaded(rows.clone())),
                },
            );
            apply_delta(&mut state, Delta::Settled(id));
            black_box(state.matchups.matchups.len());
        })
    });
}

fn bench_stats_views_render(c: &mut Criterion) {
    let mut state = AppState::new();
    state.set_screen(Screen::Stats);
    state.stats.rivalries = (0..66)
        .map(|idx| Rivalry {
            team1: TEAMS[idx % 12].to_string(),
            team2: TEAMS[(idx + 5) % 12].to_string(),
            team1_wins: (idx % 9) as u32,
            team2_wins: (idx % 7) as u32,
            games_played: 16,
            avg_margin: 10.0 + idx as f64 / 3.0,
            ..Rivalry::default()
        })
        .collect();

    c.bench_function("stats_views_render", |b| {
        b.iter(|| {
            let mut lines = 0;
            for view in StatsView::ALL {
                state.stats.view = view;
                lines += views::dispatch(black_box(&state)).lines.len();
            }
            black_box(lines);
        })
    });
}

fn bench_matchups_view_render(c: &mut Criterion) {
    let mut state = AppState::new();
    state.set_screen(Screen::Matchups);
    state.matchups.matchups = serde_json::from_str(&matchups_json()).unwrap();
    c.bench_function("matchups_view_render", |b| {
        b.iter(|| {
            let body = views::dispatch(black_box(&state));
            black_box(body.lines.len());
        })
    });
}

criterion_group!(
    benches,
    bench_matchups_parse,
    bench_standings_parse,
    bench_matchups_slot_apply,
    bench_stats_views_render,
    bench_matchups_view_render
);
criterion_main!(benches);
