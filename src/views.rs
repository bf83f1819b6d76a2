use std::collections::BTreeMap;

use ratatui::style::Color;

use crate::model::{
    Achievement, BadBeat, HeadToHeadGame, Matchup, PlayoffTeam, PointsTotal, Standing,
    WeeklyAward, ranked_achievements,
};
use crate::state::{AlmanacView, AppState, FormField, Query, Screen, Side, StatsView};
use crate::team_meta::{self, team_color};

pub const RIVALRY_LIMIT: usize = 15;
pub const BLOWOUT_LIMIT: usize = 30;
pub const AWARD_LIMIT: usize = 20;
pub const TREND_SERIES: usize = 8;
pub const WIN_PCT_SERIES: usize = 8;

const SERIES_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
    Color::White,
    Color::LightGreen,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
    Good,
    Bad,
    Accent,
    Team(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewLine {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub label: String,
    pub value: u64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bars {
        title: String,
        bars: Vec<BarSpec>,
    },
    Lines {
        title: String,
        series: Vec<SeriesSpec>,
        x_bounds: [f64; 2],
        y_bounds: [f64; 2],
    },
}

/// Everything the visible screen shows: a title, text lines and optional charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBody {
    pub title: String,
    pub lines: Vec<ViewLine>,
    pub charts: Vec<ChartSpec>,
}

impl ViewBody {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            charts: Vec::new(),
        }
    }

    fn push(&mut self, text: impl Into<String>, tone: Tone) {
        self.lines.push(ViewLine {
            text: text.into(),
            tone,
        });
    }

    fn line(&mut self, text: impl Into<String>) {
        self.push(text, Tone::Plain);
    }

    fn heading(&mut self, text: impl Into<String>) {
        self.push(text, Tone::Heading);
    }

    fn muted(&mut self, text: impl Into<String>) {
        self.push(text, Tone::Muted);
    }

    fn team(&mut self, text: impl Into<String>, team: &str) {
        self.push(text, Tone::Team(team_color(team)));
    }

    fn blank(&mut self) {
        self.push(String::new(), Tone::Plain);
    }

    fn placeholder(&mut self, what: &str) {
        self.muted(format!("No {what} data available"));
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

/// Renders exactly one sub-view for the selected screen and view tag. Reads slots only.
pub fn dispatch(state: &AppState) -> ViewBody {
    let mut body = match state.screen {
        Screen::Standings => standings_view(state),
        Screen::Playoffs => playoffs_view(state),
        Screen::Almanac => almanac_view(state),
        Screen::HeadToHead => head_to_head_view(state),
        Screen::Stats => stats_view(state),
        Screen::TeamStats => team_stats_view(state),
        Screen::Matchups => matchups_view(state),
        Screen::Transactions => transactions_view(state),
        Screen::HallOfFame => hall_of_fame_view(state),
        Screen::HallOfShame => hall_of_shame_view(state),
    };
    if state.screen_loading() {
        body.title.push_str(" (loading...)");
    }
    body
}

fn standings_view(state: &AppState) -> ViewBody {
    let table = &state.standings.table;
    let title = match table.year {
        Some(year) => format!("Standings {year}"),
        None => "Standings".to_string(),
    };
    let mut body = ViewBody::new(title);
    if table.teams.is_empty() {
        body.placeholder("standings");
        return body;
    }

    let mut teams: Vec<&Standing> = table.teams.iter().collect();
    teams.sort_by_key(|t| if t.place == 0 { u32::MAX } else { t.place });

    if let Some(top) = table
        .teams
        .iter()
        .max_by(|a, b| a.points_for.total_cmp(&b.points_for))
    {
        body.push(
            format!("Highest scorer: {} ({:.2} points)", top.name, top.points_for),
            Tone::Accent,
        );
    }
    if let Some(best) = table
        .teams
        .iter()
        .max_by(|a, b| a.win_pct().total_cmp(&b.win_pct()))
    {
        body.push(
            format!(
                "Best record: {} ({}-{}-{})",
                best.name, best.wins, best.losses, best.ties
            ),
            Tone::Accent,
        );
    }
    let avg = table.teams.iter().map(|t| t.points_for).sum::<f64>() / table.teams.len() as f64;
    body.push(format!("League average: {avg:.2} points"), Tone::Accent);
    body.blank();

    body.heading(format!(
        "{:<4} {:<2} {:<24} {:>8} {:>6} {:>9} {:>9}",
        "Rk", "", "Team", "W-L-T", "Win%", "PF", "PA"
    ));
    for team in &teams {
        let place = if team.place == 0 {
            "-".to_string()
        } else {
            team.place.to_string()
        };
        body.team(
            format!(
                "{:<4} {:<2} {:<24} {:>8} {:>5.1}% {:>9.2} {:>9.2}  {}",
                place,
                medal(team.place),
                team.name,
                format!("{}-{}-{}", team.wins, team.losses, team.ties),
                team.win_pct(),
                team.points_for,
                team.points_against,
                team_meta::tagline(&team.name)
            ),
            &team.name,
        );
    }

    body.charts.push(ChartSpec::Bars {
        title: "Points For".to_string(),
        bars: teams
            .iter()
            .map(|t| BarSpec {
                label: short_name(&t.name),
                value: t.points_for.max(0.0).round() as u64,
                color: team_color(&t.name),
            })
            .collect(),
    });
    body
}

fn medal(place: u32) -> &'static str {
    match place {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        4 => "🎯",
        _ => "",
    }
}

fn playoffs_view(state: &AppState) -> ViewBody {
    let scenarios = &state.playoffs.scenarios;
    let mut body = ViewBody::new("Playoff Tracker");
    if scenarios.is_empty() {
        body.placeholder("playoff");
        return body;
    }

    let week = scenarios
        .current_week
        .map(|w| w.to_string())
        .unwrap_or_else(|| "-".to_string());
    body.muted(format!(
        "Week {week} • {} teams make the playoffs • Tiebreaker: Points For",
        scenarios.playoff_spots
    ));
    body.blank();

    if !scenarios.locked.is_empty() {
        body.push(
            format!("Locked for Playoffs ({})", scenarios.locked.len()),
            Tone::Good,
        );
        for team in &scenarios.locked {
            playoff_team_lines(&mut body, state, team, "🔒 Locked");
        }
        body.blank();
    }
    if !scenarios.can_make_it.is_empty() {
        body.push(
            format!("In Contention ({})", scenarios.can_make_it.len()),
            Tone::Accent,
        );
        for team in &scenarios.can_make_it {
            playoff_team_lines(&mut body, state, team, &team.status);
            let needs = team.needs.items();
            if !needs.is_empty() {
                body.muted(format!("      Needs: {}", needs.join("; ")));
            }
            if let Some(opponent) = team.opponent.as_deref().filter(|o| !o.is_empty()) {
                let record = team.opponent_record.as_deref().unwrap_or("-");
                body.muted(format!("      vs {opponent} ({record})"));
            }
        }
        body.blank();
    }
    if !scenarios.eliminated.is_empty() {
        body.push(
            format!("Eliminated ({})", scenarios.eliminated.len()),
            Tone::Bad,
        );
        for team in &scenarios.eliminated {
            playoff_team_lines(&mut body, state, team, "❌ Eliminated");
        }
        body.blank();
    }
    if !scenarios.week15_matchups.is_empty() {
        body.heading("Week 15 Matchups");
        for m in &scenarios.week15_matchups {
            body.line(format!(
                "  {} ({})  vs  {} ({})",
                m.team1, m.team1_record, m.team2, m.team2_record
            ));
        }
    }
    body
}

fn playoff_team_lines(body: &mut ViewBody, state: &AppState, team: &PlayoffTeam, badge: &str) {
    body.team(
        format!(
            "  {:<24} {:>8}  PF: {:.2}  {}",
            team.team, team.record, team.points_for, badge
        ),
        &team.team,
    );
    let logo = state
        .playoffs
        .standings
        .teams
        .iter()
        .find(|s| s.name == team.team)
        .and_then(|s| s.logo.as_deref());
    if logo.is_some() {
        let meta = team_meta::resolve(&team.team, logo);
        body.muted(format!("      {}", meta.logo));
    }
}

fn almanac_view(state: &AppState) -> ViewBody {
    let almanac = &state.almanac;
    let mut body = ViewBody::new(format!("The Almanac: {}", almanac.view.label()));
    body.muted(view_strip(
        AlmanacView::ALL.iter().map(|v| (v.label(), *v == almanac.view)),
    ));
    body.blank();

    match almanac.view {
        AlmanacView::Championships => {
            achievement_lines(&mut body, &almanac.historical.super_bowls, "Super Bowl", "🏆");
        }
        AlmanacView::Spoons => {
            achievement_lines(&mut body, &almanac.historical.spoons, "spoon", "🥄");
        }
        AlmanacView::Playoffs => {
            let rows = ranked_achievements(&almanac.historical.playoffs);
            if rows.is_empty() {
                body.placeholder("playoff");
            }
            for (idx, row) in rows.iter().enumerate() {
                body.team(
                    format!("#{:<3} {:<24} {:>3} appearances", idx + 1, row.team, row.count),
                    &row.team,
                );
            }
        }
        AlmanacView::ScoringTitles => {
            if almanac.scoring_titles.is_empty() {
                body.placeholder("scoring title");
            }
            let mut titles: Vec<_> = almanac.scoring_titles.iter().collect();
            titles.sort_by(|a, b| b.count.cmp(&a.count));
            for (idx, title) in titles.iter().enumerate() {
                body.team(
                    format!("#{:<3} {:<24} {}x", idx + 1, title.team, title.count),
                    &title.team,
                );
                let years: Vec<String> = title
                    .years
                    .iter()
                    .map(|y| format!("{} ({:.2} pts)", y.year, y.points))
                    .collect();
                if !years.is_empty() {
                    body.muted(format!("      {}", years.join(", ")));
                }
            }
        }
        AlmanacView::PointsFor => {
            points_total_lines(&mut body, &almanac.all_time.most_points_scored, "points for");
        }
        AlmanacView::PointsAgainst => {
            points_total_lines(
                &mut body,
                &almanac.all_time.most_points_against,
                "points against",
            );
        }
        AlmanacView::WinPct => win_pct_lines(&mut body, state),
    }
    body
}

fn achievement_lines(
    body: &mut ViewBody,
    map: &BTreeMap<String, Achievement>,
    what: &str,
    icon: &str,
) {
    let rows = ranked_achievements(map);
    if rows.is_empty() {
        body.placeholder(what);
        return;
    }
    for (idx, row) in rows.iter().enumerate() {
        let years = if row.years.is_empty() {
            String::new()
        } else {
            format!("  ({})", row.years.join(", "))
        };
        body.team(
            format!(
                "#{:<3} {:<24} {} {}x{years}",
                idx + 1,
                row.team,
                icon,
                row.count
            ),
            &row.team,
        );
    }
    body.charts.push(ChartSpec::Bars {
        title: format!("{icon} count"),
        bars: rows
            .iter()
            .map(|row| BarSpec {
                label: short_name(&row.team),
                value: u64::from(row.count),
                color: team_color(&row.team),
            })
            .collect(),
    });
}

fn points_total_lines(body: &mut ViewBody, rows: &[PointsTotal], what: &str) {
    if rows.is_empty() {
        body.placeholder(what);
        return;
    }
    body.heading(format!("{:<4} {:<24} {:>12} {:>8}", "Rk", "Team", "Points", "Seasons"));
    for (idx, row) in rows.iter().enumerate() {
        body.team(
            format!(
                "#{:<3} {:<24} {:>12.2} {:>8}",
                idx + 1,
                row.team,
                row.points,
                row.seasons
            ),
            &row.team,
        );
    }
}

fn win_pct_lines(body: &mut ViewBody, state: &AppState) {
    let almanac = &state.almanac;
    let rows = &almanac.win_pct;
    if rows.is_empty() {
        body.placeholder("win percentage");
        return;
    }

    // Top teams by all-time win %, or by their mean across seasons when that list is missing.
    let mut top: Vec<(String, f64)> = if almanac.all_time.highest_win_pct.is_empty() {
        let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
        for row in rows {
            for (team, pct) in &row.teams {
                if let Some(pct) = pct {
                    let entry = totals.entry(team.as_str()).or_insert((0.0, 0));
                    entry.0 += pct;
                    entry.1 += 1;
                }
            }
        }
        totals
            .into_iter()
            .map(|(team, (sum, n))| (team.to_string(), sum / f64::from(n.max(1))))
            .collect()
    } else {
        almanac
            .all_time
            .highest_win_pct
            .iter()
            .map(|t| (t.team.clone(), t.win_pct))
            .collect()
    };
    top.sort_by(|a, b| b.1.total_cmp(&a.1));
    top.truncate(WIN_PCT_SERIES);

    body.heading("All-time win % leaders");
    for (idx, (team, pct)) in top.iter().enumerate() {
        body.team(format!("#{:<3} {:<24} {:>6.1}%", idx + 1, team, pct), team);
    }

    let series: Vec<SeriesSpec> = top
        .iter()
        .enumerate()
        .map(|(idx, (team, _))| SeriesSpec {
            name: team.clone(),
            color: SERIES_COLORS[idx % SERIES_COLORS.len()],
            points: rows
                .iter()
                .filter_map(|row| {
                    row.teams
                        .get(team)
                        .copied()
                        .flatten()
                        .map(|pct| (f64::from(row.year), pct))
                })
                .collect(),
        })
        .collect();
    let years = rows.iter().map(|r| f64::from(r.year));
    let x_bounds = bounds(years);
    body.charts.push(ChartSpec::Lines {
        title: "Win % by year".to_string(),
        series,
        x_bounds,
        y_bounds: [0.0, 100.0],
    });
}

fn head_to_head_view(state: &AppState) -> ViewBody {
    let h2h = &state.head_to_head;
    let mut body = ViewBody::new("Head-to-Head Statistics");
    if h2h.teams.is_empty() {
        body.placeholder("team");
        return body;
    }

    let team_a = h2h.team_a.as_deref().unwrap_or("Select Team A");
    let team_b = h2h.team_b.as_deref().unwrap_or("Select Team B");
    let marker = |side: Side| if h2h.focus == side { ">" } else { " " };
    body.line(format!(
        "{} Team A: [{team_a}]   vs   {} Team B: [{team_b}]",
        marker(Side::A),
        marker(Side::B)
    ));
    body.blank();

    if h2h.same_team() {
        body.push("Please select two different teams", Tone::Bad);
        return body;
    }
    let Some((a, b)) = h2h.compared.as_ref() else {
        if state.is_loading(Query::HeadToHead) {
            return body;
        }
        if h2h.team_a.is_some() && h2h.team_b.is_some() {
            body.placeholder("head-to-head");
        } else {
            body.muted("Pick two teams to compare");
        }
        return body;
    };

    let result = &h2h.result;
    if result.total_games == 0 {
        body.muted(format!("No head-to-head history found between {a} and {b}"));
        return body;
    }

    body.team(
        format!("{a}: {} wins ({:.1}%)", result.team1_wins, result.team1_win_pct),
        a,
    );
    body.line(format!("Ties: {}", result.ties));
    body.team(
        format!("{b}: {} wins ({:.1}%)", result.team2_wins, result.team2_win_pct),
        b,
    );
    body.line(format!("Total games: {}", result.total_games));
    body.blank();

    let mut by_year: BTreeMap<i32, (u32, u32, u32)> = BTreeMap::new();
    for game in &result.games {
        let entry = by_year.entry(game.year.unwrap_or(0)).or_default();
        match game.winner.as_deref() {
            Some(w) if w == a => entry.0 += 1,
            Some(w) if w == b => entry.1 += 1,
            _ => entry.2 += 1,
        }
    }
    if !by_year.is_empty() {
        body.heading("Year by year");
        for (year, (wa, wb, ties)) in &by_year {
            let year = if *year == 0 {
                "Unknown".to_string()
            } else {
                year.to_string()
            };
            body.line(format!("  {year}: {a} {wa} - {wb} {b}  (ties {ties})"));
        }
        body.blank();
    }

    let mut games: Vec<&HeadToHeadGame> = result.games.iter().collect();
    games.sort_by(|x, y| {
        y.year
            .unwrap_or(0)
            .cmp(&x.year.unwrap_or(0))
            .then(y.week.unwrap_or(0).cmp(&x.week.unwrap_or(0)))
    });
    if !games.is_empty() {
        body.heading("Matchup history");
        for game in games {
            let winner = game.winner.as_deref().unwrap_or("Tie");
            body.line(format!(
                "  {} W{}  {a} {:.2} - {:.2} {b}  winner: {winner}",
                game.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
                game.week.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string()),
                game.score_for(a),
                game.score_for(b),
            ));
        }
    }

    let mut bars = vec![
        BarSpec {
            label: short_name(a),
            value: u64::from(result.team1_wins),
            color: team_color(a),
        },
        BarSpec {
            label: short_name(b),
            value: u64::from(result.team2_wins),
            color: team_color(b),
        },
    ];
    if result.ties > 0 {
        bars.push(BarSpec {
            label: "Ties".to_string(),
            value: u64::from(result.ties),
            color: Color::Gray,
        });
    }
    bars.retain(|bar| bar.value > 0);
    body.charts.push(ChartSpec::Bars {
        title: "Win distribution".to_string(),
        bars,
    });
    body
}

fn stats_view(state: &AppState) -> ViewBody {
    let stats = &state.stats;
    let mut body = ViewBody::new(format!("Stats: {}", stats.view.label()));
    body.muted(view_strip(
        StatsView::ALL.iter().map(|v| (v.label(), *v == stats.view)),
    ));
    body.blank();

    match stats.view {
        StatsView::Rivalries => rivalries_lines(&mut body, state),
        StatsView::CurrentStreaks | StatsView::AllTimeStreaks => {
            let current = stats.view == StatsView::CurrentStreaks;
            let (streaks, label) = if current {
                (&stats.streaks.current, "current streaks")
            } else {
                (&stats.streaks.all_time, "all-time streaks")
            };
            if streaks.is_empty() {
                body.placeholder(label);
            }
            for (idx, streak) in streaks.iter().enumerate() {
                let (kind, tone) = if streak.is_win() {
                    ("W", Tone::Good)
                } else {
                    ("L", Tone::Bad)
                };
                body.push(
                    format!("#{:<3} {:<24} {}{kind} streak", idx + 1, streak.team, streak.streak),
                    tone,
                );
            }
        }
        StatsView::PointsTrends => points_trend_lines(&mut body, state),
        StatsView::Consistency => {
            if stats.consistency.is_empty() {
                body.placeholder("consistency");
            } else {
                body.heading(format!(
                    "{:<4} {:<24} {:>9} {:>8} {:>7} {:>6}",
                    "Rk", "Team", "Avg Score", "Std Dev", "CV", "Games"
                ));
            }
            for (idx, c) in stats.consistency.iter().enumerate() {
                body.team(
                    format!(
                        "#{:<3} {:<24} {:>9.2} {:>8.2} {:>6.1}% {:>6}",
                        idx + 1,
                        c.team,
                        c.avg_score,
                        c.std_dev,
                        c.coefficient_of_variation,
                        c.games_played
                    ),
                    &c.team,
                );
            }
        }
        StatsView::Blowouts => {
            if stats.blowouts.is_empty() {
                body.placeholder("blowouts");
            }
            for (idx, b) in stats.blowouts.iter().take(BLOWOUT_LIMIT).enumerate() {
                body.line(format!(
                    "#{:<3} {} {:.2} - {:.2} {}  margin {:.2}  {}",
                    idx + 1,
                    b.winner,
                    b.winner_score,
                    b.loser_score,
                    b.loser,
                    b.margin,
                    year_week(b.year, b.week)
                ));
            }
        }
        StatsView::BadBeats => {
            let beats = &stats.bad_beats;
            if beats.high_score_losses.is_empty() && beats.low_score_wins.is_empty() {
                body.placeholder("bad beats");
            } else {
                bad_beat_table(&mut body, "Highest scores in a loss", &beats.high_score_losses);
                body.blank();
                bad_beat_table(&mut body, "Lowest scores in a win", &beats.low_score_wins);
            }
        }
        StatsView::WeeklyAwards => {
            let awards = &stats.weekly_awards;
            if awards.highest_scores.is_empty()
                && awards.lowest_winning_scores.is_empty()
                && awards.biggest_margins.is_empty()
            {
                body.placeholder("weekly awards");
            } else {
                award_table(&mut body, "Highest weekly scores", &awards.highest_scores);
                body.blank();
                award_table(
                    &mut body,
                    "Lowest winning scores",
                    &awards.lowest_winning_scores,
                );
                body.blank();
                award_table(&mut body, "Biggest margins", &awards.biggest_margins);
            }
        }
        StatsView::LowestScoringWeeks => {
            if stats.lowest_weeks.is_empty() {
                body.placeholder("lowest scoring weeks");
            }
            for (idx, w) in stats.lowest_weeks.iter().enumerate() {
                body.team(
                    format!(
                        "#{:<3} {:<24} {:>7.2}  vs {} ({:.2})  {}",
                        idx + 1,
                        w.team,
                        w.score,
                        w.opponent,
                        w.opponent_score,
                        year_week(w.year, w.week)
                    ),
                    &w.team,
                );
            }
        }
        StatsView::Clutch => {
            if stats.clutch.is_empty() {
                body.placeholder("clutch");
            } else {
                body.heading(format!(
                    "{:<4} {:<24} {:>6} {:>7} {:>7} {:>7} {:>7}",
                    "Rk", "Team", "Close", "W-L", "Close%", "All%", "Factor"
                ));
            }
            for (idx, c) in stats.clutch.iter().enumerate() {
                body.team(
                    format!(
                        "#{:<3} {:<24} {:>6} {:>7} {:>6.1}% {:>6.1}% {:>+7.1}",
                        idx + 1,
                        c.team,
                        c.close_games,
                        format!("{}-{}", c.close_wins, c.close_losses),
                        c.close_win_pct,
                        c.all_win_pct,
                        c.clutch_factor
                    ),
                    &c.team,
                );
            }
        }
        StatsView::TeamDna => {
            if stats.team_dna.is_empty() {
                body.placeholder("team DNA");
            }
            for dna in &stats.team_dna {
                body.team(format!("{}: {}", dna.team, dna.personality), &dna.team);
                if !dna.traits.is_empty() {
                    body.muted(format!("    {}", dna.traits.join(" • ")));
                }
                body.muted(format!(
                    "    {} seasons • {} championships • {:.1}% playoff rate",
                    dna.seasons, dna.championships, dna.playoff_rate
                ));
            }
        }
        StatsView::TrophyCase => {
            if stats.trophy_cases.is_empty() {
                body.placeholder("trophy case");
            }
            for case in &stats.trophy_cases {
                body.team(&case.team, &case.team);
                body.line(format!("    Championships: {}", list_or_none(&case.championships)));
                body.line(format!("    Scoring titles: {}", list_or_none(&case.scoring_titles)));
                let high = &case.highest_weekly_score;
                body.line(format!(
                    "    Highest weekly score: {:.1} pts ({})",
                    high.score,
                    year_week(high.year, high.week)
                ));
                body.line(format!(
                    "    Longest win streak: {}",
                    case.longest_win_streak
                ));
            }
        }
        StatsView::WhatIf => what_if_lines(&mut body, state),
        StatsView::WeeklyRecap => recap_lines(&mut body, state),
    }
    body
}

fn rivalries_lines(body: &mut ViewBody, state: &AppState) {
    let stats = &state.stats;
    if stats.rivalries.is_empty() {
        body.placeholder("rivalries");
    }
    for (idx, r) in stats.rivalries.iter().take(RIVALRY_LIMIT).enumerate() {
        body.push(format!("#{}", idx + 1), Tone::Accent);
        body.team(format!("  {}  {}W", r.team1, r.team1_wins), &r.team1);
        body.muted("  vs");
        body.team(format!("  {}  {}W", r.team2, r.team2_wins), &r.team2);
        body.muted(format!(
            "  {} games • Avg margin: {} pts",
            r.games_played, r.avg_margin
        ));
    }

    body.blank();
    body.heading("Trash Talk Generator");
    form_lines(body, state);
    if state.is_loading(Query::TrashTalk) {
        body.muted("Generating...");
    }
    for line in &stats.trash_talk {
        body.line(format!("  \"{line}\""));
    }
}

fn form_lines(body: &mut ViewBody, state: &AppState) {
    let stats = &state.stats;
    let focused = stats.focused_field();
    for field in stats.view.fields() {
        let form = &stats.form;
        let value = match field {
            FormField::Team1 => form.team1.clone().unwrap_or_else(|| "-".to_string()),
            FormField::Team2 => form.team2.clone().unwrap_or_else(|| "-".to_string()),
            FormField::Year => form.year.to_string(),
            FormField::Week => form.week.to_string(),
            FormField::Winner => form.new_winner().unwrap_or("-").to_string(),
        };
        let marker = if focused == Some(*field) { ">" } else { " " };
        body.line(format!("{marker} {:<11} [{value}]", field.label()));
    }
    body.muted("  ↑/↓: field  ←/→: change  Enter: submit");
}

fn what_if_lines(body: &mut ViewBody, state: &AppState) {
    body.heading("What-If Machine");
    body.muted("Calculate how different outcomes would affect playoff scenarios");
    form_lines(body, state);
    body.blank();
    if state.is_loading(Query::WhatIf) {
        body.muted("Calculating...");
        return;
    }
    let result = &state.stats.what_if;
    if let Some(err) = result.error.as_deref() {
        body.push(err, Tone::Bad);
        return;
    }
    if let Some(message) = result.message.as_deref() {
        body.push(message, Tone::Good);
    }
    if let Some(s) = result.scenario.as_ref() {
        body.muted(format!(
            "{} W{}: {} vs {}, new winner {}",
            s.year, s.week, s.team1, s.team2, s.new_winner
        ));
    }
}

fn recap_lines(body: &mut ViewBody, state: &AppState) {
    form_lines(body, state);
    body.blank();
    if state.is_loading(Query::Recap) {
        body.muted("Loading recap...");
        return;
    }
    let recap = &state.stats.recap;
    if let Some(err) = recap.error.as_deref() {
        body.push(err, Tone::Bad);
        return;
    }
    if recap.week.is_none() && recap.total_games == 0 && recap.summary.is_empty() {
        body.muted("Pick a year and week, then press Enter");
        return;
    }
    body.heading(format!(
        "Week {} Recap, {}",
        recap.week.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string()),
        recap.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
    ));
    if !recap.summary.is_empty() {
        body.line(&recap.summary);
    }
    if let Some(high) = recap.highest_score.as_ref() {
        let against = match high.opponent.as_deref() {
            Some(opp) => format!(" against {opp} ({:.1} pts)", high.opponent_score),
            None => String::new(),
        };
        body.team(
            format!("Highest score: {} {:.1} pts{against}", high.team, high.score),
            &high.team,
        );
    }
    if let Some(blowout) = recap.biggest_blowout.as_ref() {
        body.line(format!(
            "Biggest blowout: {} {:.1} - {:.1} {} (margin {:.1})",
            blowout.winner,
            blowout.winner_score,
            blowout.loser_score,
            blowout.loser,
            blowout.margin
        ));
    }
    if let Some(close) = recap.closest_game.as_ref() {
        body.line(format!(
            "Closest game: {} {:.1} - {:.1} {} (winner {}, margin {:.2})",
            close.team1, close.score1, close.score2, close.team2, close.winner, close.margin
        ));
    }
    body.muted(format!("Total games: {}", recap.total_games));
}

fn points_trend_lines(body: &mut ViewBody, state: &AppState) {
    let trends = &state.stats.points_trends;
    if trends.is_empty() {
        body.placeholder("points trends");
        return;
    }
    let mut ranked: Vec<_> = trends.iter().collect();
    ranked.sort_by(|a, b| b.overall_avg.total_cmp(&a.overall_avg));
    for (idx, t) in ranked.iter().enumerate() {
        let tone = match t.trend.as_str() {
            "up" | "improving" => Tone::Good,
            "down" | "declining" => Tone::Bad,
            _ => Tone::Team(team_color(&t.team)),
        };
        body.push(
            format!(
                "#{:<3} {:<24} Current: {:.2} pts  Overall: {:.2} pts  {}",
                idx + 1,
                t.team,
                t.current_avg,
                t.overall_avg,
                t.trend
            ),
            tone,
        );
    }

    let top: Vec<_> = ranked.into_iter().take(TREND_SERIES).collect();
    let series: Vec<SeriesSpec> = top
        .iter()
        .enumerate()
        .map(|(idx, t)| SeriesSpec {
            name: t.team.clone(),
            color: SERIES_COLORS[idx % SERIES_COLORS.len()],
            points: t
                .yearly_averages
                .iter()
                .map(|y| (f64::from(y.year), y.avg_score))
                .collect(),
        })
        .collect();
    let x_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let y_bounds = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    body.charts.push(ChartSpec::Lines {
        title: "Average points by year".to_string(),
        series,
        x_bounds,
        y_bounds,
    });
}

fn bad_beat_table(body: &mut ViewBody, title: &str, rows: &[BadBeat]) {
    body.heading(title);
    for (idx, beat) in rows.iter().take(AWARD_LIMIT).enumerate() {
        body.team(
            format!(
                "#{:<3} {:<24} {:>7.2}  vs {} ({:.2})  {}",
                idx + 1,
                beat.team,
                beat.team_score,
                beat.opponent,
                beat.opponent_score,
                year_week(beat.year, beat.week)
            ),
            &beat.team,
        );
    }
}

fn award_table(body: &mut ViewBody, title: &str, rows: &[WeeklyAward]) {
    body.heading(title);
    for (idx, award) in rows.iter().take(AWARD_LIMIT).enumerate() {
        let detail = match (award.margin, award.winner.as_deref(), award.loser.as_deref()) {
            (Some(margin), Some(winner), Some(loser)) => format!(
                "{winner} over {loser} by {margin:.2} ({:.2} - {:.2})",
                award.winner_score.unwrap_or(0.0),
                award.loser_score.unwrap_or(0.0)
            ),
            _ => {
                let opponent = award
                    .opponent
                    .as_deref()
                    .map(|o| format!("  vs {o} ({:.2})", award.opponent_score.unwrap_or(0.0)))
                    .unwrap_or_default();
                format!("{:<24} {:>7.2}{opponent}", award.team, award.score)
            }
        };
        body.line(format!(
            "#{:<3} {detail}  {}",
            idx + 1,
            year_week(award.year, award.week)
        ));
    }
}

fn team_stats_view(state: &AppState) -> ViewBody {
    let ts = &state.team_stats;
    let mut body = ViewBody::new("Team Stats");
    if ts.standings.teams.is_empty() {
        body.placeholder("team");
        return body;
    }
    let selected = ts.selected.as_deref().unwrap_or("-");
    body.line(format!("> Team: [{selected}]"));
    body.muted(format!("  {}", team_meta::tagline(selected)));
    body.blank();

    let Some(team) = ts.stats_team.as_deref() else {
        if !state.is_loading(Query::TeamStats) {
            body.placeholder("team stats");
        }
        return body;
    };

    let stats = &ts.stats;
    body.heading(format!("{team}: current season"));
    body.line(format!(
        "  Record: {}-{}-{}   Points for: {:.2}",
        stats.current.wins, stats.current.losses, stats.current.ties, stats.current.points_for
    ));
    body.heading("All-time");
    body.line(format!(
        "  Record: {}-{}-{}   Total points: {:.2}",
        stats.historical.total_wins,
        stats.historical.total_losses,
        stats.historical.total_ties,
        stats.historical.total_points
    ));
    body.blank();

    if stats.opponent_records.is_empty() {
        body.placeholder("opponent record");
        return body;
    }
    body.heading(format!("{:<24} {:>8} {:>7}", "Opponent", "W-L-T", "Win%"));
    for rec in &stats.opponent_records {
        let tone = if rec.win_pct >= 50.0 {
            Tone::Good
        } else {
            Tone::Bad
        };
        body.push(
            format!(
                "{:<24} {:>8} {:>6.1}%",
                rec.opponent,
                format!("{}-{}-{}", rec.wins, rec.losses, rec.ties),
                rec.win_pct
            ),
            tone,
        );
    }
    body.charts.push(ChartSpec::Bars {
        title: "Win % vs opponent".to_string(),
        bars: stats
            .opponent_records
            .iter()
            .map(|rec| BarSpec {
                label: short_name(&rec.opponent),
                value: rec.win_pct.clamp(0.0, 100.0).round() as u64,
                color: team_color(&rec.opponent),
            })
            .collect(),
    });
    body
}

fn matchups_view(state: &AppState) -> ViewBody {
    let screen = &state.matchups;
    let filter = match screen.week {
        Some(week) => format!("Week {week}"),
        None => "All weeks".to_string(),
    };
    let mut body = ViewBody::new(format!("Matchups ({filter})"));
    if screen.matchups.is_empty() {
        body.muted("No matchup data available. Data will appear as it's collected.");
        return body;
    }

    let mut by_week: BTreeMap<(i32, u32), Vec<&Matchup>> = BTreeMap::new();
    for m in &screen.matchups {
        by_week
            .entry((m.year.unwrap_or(0), m.week.unwrap_or(0)))
            .or_default()
            .push(m);
    }
    for ((year, week), games) in by_week.iter().rev() {
        let label = match (*year, *week) {
            (0, 0) => "Unscheduled".to_string(),
            (0, w) => format!("Week {w}"),
            (y, w) => format!("{y} Week {w}"),
        };
        body.heading(label);
        for m in games {
            let home = m.home_name();
            let away = m.away_name();
            let tone = match m.winner.as_deref() {
                Some(w) if w == home => Tone::Team(team_color(home)),
                Some(w) if w == away => Tone::Team(team_color(away)),
                _ => Tone::Plain,
            };
            body.push(
                format!(
                    "  {:<24} {:>7.2} - {:<7.2} {}",
                    home,
                    m.home_score(),
                    m.away_score(),
                    away
                ),
                tone,
            );
        }
    }
    body
}

fn transactions_view(state: &AppState) -> ViewBody {
    let rows = &state.transactions.transactions;
    let mut body = ViewBody::new("Transactions");
    if rows.is_empty() {
        body.muted("No transaction data available. Data will appear as it's collected.");
        return body;
    }
    body.heading(format!(
        "{:<20} {:<10} {:<24} {}",
        "Date", "Type", "Team", "Player(s)"
    ));
    for tx in rows {
        let players = match (tx.player.as_deref(), tx.player1.as_deref(), tx.player2.as_deref()) {
            (Some(p), _, _) => p.to_string(),
            (None, Some(a), Some(b)) => format!("{a} ↔ {b}"),
            (None, Some(a), None) => a.to_string(),
            _ => "-".to_string(),
        };
        let team = tx.team.as_deref().unwrap_or("-");
        body.line(format!(
            "{:<20} {:<10} {:<24} {players}",
            tx.date.as_deref().unwrap_or("-"),
            tx.kind,
            team
        ));
    }
    body
}

fn hall_of_fame_view(state: &AppState) -> ViewBody {
    let mut body = ViewBody::new("Hall of Fame");
    let entries = &state.hall_of_fame.entries;
    if entries.is_empty() {
        body.placeholder("hall of fame");
        return body;
    }
    for entry in entries {
        body.team(format!("🏆 {}", entry.team), &entry.team);
        if !entry.blurb.is_empty() {
            body.line(format!("    {}", entry.blurb));
        }
        body.blank();
    }
    body
}

fn hall_of_shame_view(state: &AppState) -> ViewBody {
    let mut body = ViewBody::new("Hall of Shame");
    let entries = &state.hall_of_shame.entries;
    if entries.is_empty() {
        body.muted("Congratulations! No teams qualify for the Hall of Shame!");
        return body;
    }
    for entry in entries {
        body.team(
            format!(
                "{}  ({} seasons, {})",
                entry.team, entry.years_active, entry.years_range
            ),
            &entry.team,
        );
        if !entry.blurb.is_empty() {
            body.line(format!("    {}", entry.blurb));
        }
        body.blank();
    }
    body
}

fn view_strip<'a>(views: impl Iterator<Item = (&'a str, bool)>) -> String {
    views
        .map(|(label, active)| {
            if active {
                format!("[{label}]")
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn year_week(year: Option<i32>, week: Option<u32>) -> String {
    match (year, week) {
        (Some(y), Some(w)) => format!("{y} W{w}"),
        (Some(y), None) => y.to_string(),
        (None, Some(w)) => format!("W{w}"),
        (None, None) => "-".to_string(),
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn short_name(name: &str) -> String {
    name.chars().take(10).collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}
