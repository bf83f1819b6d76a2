use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Payload records returned by the statistics API. Every field tolerates being absent or null so a
// partial payload still renders.

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeagueInfo {
    #[serde(default, deserialize_with = "string_or_default")]
    pub league_id: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_count")]
    pub current_week: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_teams: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_seasons: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    #[serde(default, deserialize_with = "string_or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub losses: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points_for: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points_against: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub place: u32,
    #[serde(default)]
    pub logo: Option<String>,
}

impl Standing {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage in 0..=100, ties counted as half a win.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 * 0.5) / games as f64 * 100.0
    }
}

/// Standings plus the season year the endpoint reports next to the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsTable {
    pub teams: Vec<Standing>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Matchup {
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
    #[serde(default)]
    pub team1_name: Option<String>,
    #[serde(default)]
    pub team2_name: Option<String>,
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default, deserialize_with = "opt_float")]
    pub team1_score: Option<f64>,
    #[serde(default, deserialize_with = "opt_float")]
    pub team2_score: Option<f64>,
    #[serde(default, deserialize_with = "opt_float")]
    pub score1: Option<f64>,
    #[serde(default, deserialize_with = "opt_float")]
    pub score2: Option<f64>,
    #[serde(default)]
    pub winner: Option<String>,
}

impl Matchup {
    pub fn home_name(&self) -> &str {
        self.team1_name
            .as_deref()
            .or(self.team1.as_deref())
            .unwrap_or("")
    }

    pub fn away_name(&self) -> &str {
        self.team2_name
            .as_deref()
            .or(self.team2.as_deref())
            .unwrap_or("")
    }

    pub fn home_score(&self) -> f64 {
        self.team1_score.or(self.score1).unwrap_or(0.0)
    }

    pub fn away_score(&self) -> f64 {
        self.team2_score.or(self.score2).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rivalry {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2: String,
    #[serde(default)]
    pub team1_logo: Option<String>,
    #[serde(default)]
    pub team2_logo: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub games_played: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub team1_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub team2_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub avg_margin: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub rivalry_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Streak {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub streak: u32,
    #[serde(rename = "type", default, deserialize_with = "string_or_default")]
    pub kind: String,
}

impl Streak {
    pub fn is_win(&self) -> bool {
        self.kind == "win"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Streaks {
    #[serde(default, deserialize_with = "or_default")]
    pub current: Vec<Streak>,
    #[serde(default, deserialize_with = "or_default")]
    pub all_time: Vec<Streak>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct YearlyAverage {
    #[serde(default, deserialize_with = "year_or_zero")]
    pub year: i32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub avg_score: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub games: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PointsTrend {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "or_default")]
    pub yearly_averages: Vec<YearlyAverage>,
    #[serde(default, deserialize_with = "string_or_default")]
    pub trend: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub current_avg: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub overall_avg: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Consistency {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub avg_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub std_dev: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub coefficient_of_variation: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub games_played: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Blowout {
    #[serde(default, deserialize_with = "string_or_default")]
    pub winner: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub loser: String,
    #[serde(default)]
    pub winner_logo: Option<String>,
    #[serde(default)]
    pub loser_logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub winner_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub loser_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub margin: f64,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BadBeat {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub opponent: String,
    #[serde(default)]
    pub team_logo: Option<String>,
    #[serde(default)]
    pub opponent_logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub team_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub opponent_score: f64,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BadBeats {
    #[serde(default, deserialize_with = "or_default")]
    pub high_score_losses: Vec<BadBeat>,
    #[serde(default, deserialize_with = "or_default")]
    pub low_score_wins: Vec<BadBeat>,
}

/// One row of the weekly awards tables. Score awards fill `team`/`score`, margin awards fill
/// `winner`/`loser`/`margin`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyAward {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub team_logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default, deserialize_with = "opt_float")]
    pub opponent_score: Option<f64>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub loser: Option<String>,
    #[serde(default, deserialize_with = "opt_float")]
    pub winner_score: Option<f64>,
    #[serde(default, deserialize_with = "opt_float")]
    pub loser_score: Option<f64>,
    #[serde(default, deserialize_with = "opt_float")]
    pub margin: Option<f64>,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyAwards {
    #[serde(default, deserialize_with = "or_default")]
    pub highest_scores: Vec<WeeklyAward>,
    #[serde(default, deserialize_with = "or_default")]
    pub lowest_winning_scores: Vec<WeeklyAward>,
    #[serde(default, deserialize_with = "or_default")]
    pub biggest_margins: Vec<WeeklyAward>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClutchRecord {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub close_games: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub close_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub close_losses: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub close_win_pct: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub all_win_pct: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub clutch_factor: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamDna {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "string_or_default")]
    pub personality: String,
    #[serde(default, deserialize_with = "labels_or_default")]
    pub traits: Vec<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub seasons: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub championships: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub playoff_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyHigh {
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score: f64,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrophyCase {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "labels_or_default")]
    pub championships: Vec<String>,
    #[serde(default, deserialize_with = "labels_or_default")]
    pub scoring_titles: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub highest_weekly_score: WeeklyHigh,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub longest_win_streak: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LowestScoringWeek {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub team_logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score: f64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub opponent: String,
    #[serde(default)]
    pub opponent_logo: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub opponent_score: f64,
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HallOfFameEntry {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "string_or_default")]
    pub blurb: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HallOfShameEntry {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub years_active: u32,
    #[serde(default, deserialize_with = "string_or_default")]
    pub years_range: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub blurb: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeadToHeadGame {
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1_name: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2_name: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub team1_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub team2_score: f64,
    #[serde(default)]
    pub winner: Option<String>,
}

impl HeadToHeadGame {
    /// Score of `team` in this game, whichever side it played on.
    pub fn score_for(&self, team: &str) -> f64 {
        if self.team1_name == team {
            self.team1_score
        } else {
            self.team2_score
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeadToHead {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub team1_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub team2_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_games: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub team1_win_pct: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub team2_win_pct: f64,
    #[serde(default, deserialize_with = "or_default")]
    pub games: Vec<HeadToHeadGame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentRecord {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub losses: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points_for: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_losses: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_ties: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub total_points: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OpponentRecord {
    #[serde(default, deserialize_with = "string_or_default")]
    pub opponent: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub losses: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub win_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    #[serde(default, deserialize_with = "or_default")]
    pub current: CurrentRecord,
    #[serde(default, deserialize_with = "or_default")]
    pub historical: HistoricalRecord,
    #[serde(default, deserialize_with = "or_default")]
    pub opponent_records: Vec<OpponentRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PointsTotal {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub seasons: u32,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WinPctTotal {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub win_pct: f64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub wins: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub losses: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ties: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub seasons: u32,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllTimeStats {
    #[serde(default, deserialize_with = "or_default")]
    pub most_points_scored: Vec<PointsTotal>,
    #[serde(default, deserialize_with = "or_default")]
    pub highest_win_pct: Vec<WinPctTotal>,
    #[serde(default, deserialize_with = "or_default")]
    pub most_points_against: Vec<PointsTotal>,
}

/// Historical achievement entries come either as a bare count or as a detailed object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Achievement {
    Count(u32),
    Detail {
        #[serde(default, deserialize_with = "count_or_zero")]
        count: u32,
        #[serde(default, deserialize_with = "labels_or_default")]
        years: Vec<String>,
        #[serde(default)]
        logo: Option<String>,
    },
}

impl Achievement {
    pub fn count(&self) -> u32 {
        match self {
            Achievement::Count(count) => *count,
            Achievement::Detail { count, .. } => *count,
        }
    }

    pub fn years(&self) -> &[String] {
        match self {
            Achievement::Count(_) => &[],
            Achievement::Detail { years, .. } => years,
        }
    }

    pub fn logo(&self) -> Option<&str> {
        match self {
            Achievement::Count(_) => None,
            Achievement::Detail { logo, .. } => logo.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoricalStats {
    #[serde(default, deserialize_with = "or_default")]
    pub super_bowls: BTreeMap<String, Achievement>,
    #[serde(default, deserialize_with = "or_default")]
    pub playoffs: BTreeMap<String, Achievement>,
    #[serde(default, deserialize_with = "or_default")]
    pub spoons: BTreeMap<String, Achievement>,
}

/// A ranked achievement row derived from one of the historical maps.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementRow {
    pub team: String,
    pub count: u32,
    pub years: Vec<String>,
    pub logo: Option<String>,
}

/// Flattens an achievement map into rows sorted by count, most first. Ties keep team order.
pub fn ranked_achievements(map: &BTreeMap<String, Achievement>) -> Vec<AchievementRow> {
    let mut rows: Vec<AchievementRow> = map
        .iter()
        .map(|(team, entry)| AchievementRow {
            team: team.clone(),
            count: entry.count(),
            years: entry.years().to_vec(),
            logo: entry.logo().map(|v| v.to_string()),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TitleYear {
    #[serde(default, deserialize_with = "year_or_zero")]
    pub year: i32,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoringTitle {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub count: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub years: Vec<TitleYear>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// One season of the win-percentage trend: `{year: 2019, "<team>": 62.5 | null, ...}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WinPctRow {
    #[serde(default, deserialize_with = "year_or_zero")]
    pub year: i32,
    #[serde(flatten)]
    pub teams: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Needs {
    One(String),
    Many(Vec<String>),
}

impl Default for Needs {
    fn default() -> Self {
        Needs::Many(Vec::new())
    }
}

impl Needs {
    pub fn items(&self) -> Vec<&str> {
        match self {
            Needs::One(need) if need.trim().is_empty() => Vec::new(),
            Needs::One(need) => vec![need.as_str()],
            Needs::Many(needs) => needs
                .iter()
                .map(|n| n.as_str())
                .filter(|n| !n.trim().is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayoffTeam {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub record: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub points_for: f64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub status: String,
    #[serde(default, deserialize_with = "or_default")]
    pub needs: Needs,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub opponent_record: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayoffMatchup {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1_record: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2_record: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayoffScenarios {
    #[serde(default, deserialize_with = "opt_count")]
    pub current_week: Option<u32>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub playoff_spots: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub locked: Vec<PlayoffTeam>,
    #[serde(default, deserialize_with = "or_default")]
    pub can_make_it: Vec<PlayoffTeam>,
    #[serde(default, deserialize_with = "or_default")]
    pub eliminated: Vec<PlayoffTeam>,
    #[serde(default, deserialize_with = "or_default")]
    pub week15_matchups: Vec<PlayoffMatchup>,
}

impl PlayoffScenarios {
    pub fn is_empty(&self) -> bool {
        self.locked.is_empty()
            && self.can_make_it.is_empty()
            && self.eliminated.is_empty()
            && self.week15_matchups.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "string_or_default")]
    pub kind: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub player1: Option<String>,
    #[serde(default)]
    pub player2: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecapHighScore {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub opponent_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecapBlowout {
    #[serde(default, deserialize_with = "string_or_default")]
    pub winner: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub loser: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub winner_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub loser_score: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub margin: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecapCloseGame {
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score1: f64,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub score2: f64,
    #[serde(default, deserialize_with = "string_or_default")]
    pub winner: String,
    #[serde(default, deserialize_with = "float_or_zero")]
    pub margin: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRecap {
    #[serde(default, deserialize_with = "opt_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "opt_count")]
    pub week: Option<u32>,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_games: u32,
    #[serde(default, deserialize_with = "string_or_default")]
    pub summary: String,
    #[serde(default)]
    pub highest_score: Option<RecapHighScore>,
    #[serde(default)]
    pub biggest_blowout: Option<RecapBlowout>,
    #[serde(default)]
    pub closest_game: Option<RecapCloseGame>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WhatIfScenario {
    #[serde(default, deserialize_with = "year_or_zero")]
    pub year: i32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub week: u32,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team1: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team2: String,
    #[serde(rename = "newWinner", default, deserialize_with = "string_or_default")]
    pub new_winner: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WhatIfResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub scenario: Option<WhatIfScenario>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Trophy cases arrive either as a list or as an object keyed by team name.
pub fn parse_trophy_cases(value: Value) -> serde_json::Result<Vec<TrophyCase>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            let mut cases = Vec::with_capacity(map.len());
            for (team, entry) in map {
                let mut case: TrophyCase = serde_json::from_value(entry)?;
                if case.team.is_empty() {
                    case.team = team;
                }
                cases.push(case);
            }
            Ok(cases)
        }
        other => serde_json::from_value(other),
    }
}

/// A list of display strings (team names, trash-talk lines). Non-string entries are stringified
/// and blanks dropped.
pub fn text_lines(value: Value) -> serde_json::Result<Vec<String>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(value_to_string)
            .filter(|line| !line.trim().is_empty())
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a list, found {other}"
        ))),
    }
}

/// Distinct team names mentioned by a list of matchups, sorted.
pub fn teams_from_matchups(matchups: &[Matchup]) -> Vec<String> {
    let mut teams: Vec<String> = matchups
        .iter()
        .flat_map(|m| [m.home_name(), m.away_name()])
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect();
    teams.sort();
    teams.dedup();
    teams
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    serde_json::from_value(value)
}

fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_string).unwrap_or_default())
}

fn labels_or_default<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .map(value_to_string)
        .filter(|label| !label.is_empty())
        .collect())
}

fn float_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_float(deserializer)?.unwrap_or(0.0))
}

fn opt_float<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn count_or_zero<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_count(deserializer)?.unwrap_or(0))
}

fn opt_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_f64)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u32))
}

fn year_or_zero<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_year(deserializer)?.unwrap_or(0))
}

fn opt_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64).map(|v| v.round() as i32))
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_tolerates_nulls() {
        let raw = r#"{"name":"Pels","wins":null,"losses":3,"points_for":"1402.5","place":2}"#;
        let standing: Standing = serde_json::from_str(raw).unwrap();
        assert_eq!(standing.wins, 0);
        assert_eq!(standing.losses, 3);
        assert_eq!(standing.ties, 0);
        assert!((standing.points_for - 1402.5).abs() < 1e-9);
        assert!(standing.logo.is_none());
    }

    #[test]
    fn win_pct_counts_ties_as_half() {
        let standing = Standing {
            wins: 9,
            losses: 4,
            ties: 1,
            ..Standing::default()
        };
        assert!((standing.win_pct() - (9.5 / 14.0 * 100.0)).abs() < 1e-9);
        assert_eq!(Standing::default().win_pct(), 0.0);
    }

    #[test]
    fn achievements_accept_counts_and_details() {
        let raw = r#"{"super_bowls":{"Pels":{"count":2,"years":[2019,2021],"logo":"http://l"},"Woody":1}}"#;
        let stats: HistoricalStats = serde_json::from_str(raw).unwrap();
        let rows = ranked_achievements(&stats.super_bowls);
        assert_eq!(rows[0].team, "Pels");
        assert_eq!(rows[0].years, vec!["2019".to_string(), "2021".to_string()]);
        assert_eq!(rows[1].count, 1);
        assert!(rows[1].years.is_empty());
        assert!(stats.spoons.is_empty());
    }

    #[test]
    fn needs_accepts_string_or_list() {
        let single: PlayoffTeam = serde_json::from_str(r#"{"team":"A","needs":"Win"}"#).unwrap();
        assert_eq!(single.needs.items(), vec!["Win"]);
        let many: PlayoffTeam =
            serde_json::from_str(r#"{"team":"A","needs":["Win","B loses"]}"#).unwrap();
        assert_eq!(many.needs.items().len(), 2);
        let blank: PlayoffTeam = serde_json::from_str(r#"{"team":"A","needs":""}"#).unwrap();
        assert!(blank.needs.items().is_empty());
    }

    #[test]
    fn trophy_cases_accept_object_form() {
        let raw = serde_json::json!({
            "Pels": {"championships": [2019], "longest_win_streak": 7},
        });
        let cases = parse_trophy_cases(raw).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].team, "Pels");
        assert_eq!(cases[0].championships, vec!["2019".to_string()]);
    }

    #[test]
    fn win_pct_rows_keep_nulls() {
        let row: WinPctRow =
            serde_json::from_str(r#"{"year":2019,"Pels":61.5,"Woody":null}"#).unwrap();
        assert_eq!(row.year, 2019);
        assert_eq!(row.teams.get("Pels"), Some(&Some(61.5)));
        assert_eq!(row.teams.get("Woody"), Some(&None));
    }

    #[test]
    fn matchup_names_fall_back_to_short_keys() {
        let m: Matchup =
            serde_json::from_str(r#"{"team1":"A","team2_name":"B","score1":101.2}"#).unwrap();
        assert_eq!(m.home_name(), "A");
        assert_eq!(m.away_name(), "B");
        assert!((m.home_score() - 101.2).abs() < 1e-9);
        assert_eq!(teams_from_matchups(&[m]), vec!["A".to_string(), "B".to_string()]);
    }
}
