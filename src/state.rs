use std::collections::{HashMap, HashSet, VecDeque};

use crate::api::{FetchOutcome, RefreshSummary};
use crate::model::{
    AllTimeStats, BadBeats, Blowout, ClutchRecord, Consistency, HallOfFameEntry, HallOfShameEntry,
    HeadToHead, HistoricalStats, LeagueInfo, LowestScoringWeek, Matchup, PlayoffScenarios,
    PointsTrend, Rivalry, ScoringTitle, StandingsTable, Streaks, TeamDna, TeamStats, Transaction,
    TrophyCase, WeeklyAwards, WeeklyRecap, WhatIfResult, WhatIfScenario, WinPctRow,
};

pub const MAX_LOGS: usize = 200;
pub const FIRST_YEAR: i32 = 2012;
pub const LAST_YEAR: i32 = 2025;
pub const MAX_WEEK: u32 = 17;
pub const DEFAULT_WEEK: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Standings,
    Playoffs,
    Almanac,
    HeadToHead,
    Stats,
    TeamStats,
    Matchups,
    Transactions,
    HallOfFame,
    HallOfShame,
}

impl Screen {
    pub const ALL: [Screen; 10] = [
        Screen::Standings,
        Screen::Playoffs,
        Screen::Almanac,
        Screen::HeadToHead,
        Screen::Stats,
        Screen::TeamStats,
        Screen::Matchups,
        Screen::Transactions,
        Screen::HallOfFame,
        Screen::HallOfShame,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Standings => "Standings",
            Screen::Playoffs => "Playoff Tracker",
            Screen::Almanac => "The Almanac",
            Screen::HeadToHead => "Head-to-Head",
            Screen::Stats => "Stats",
            Screen::TeamStats => "Team Stats",
            Screen::Matchups => "Matchups",
            Screen::Transactions => "Transactions",
            Screen::HallOfFame => "Hall of Fame",
            Screen::HallOfShame => "Hall of Shame",
        }
    }

    pub fn index(self) -> usize {
        Screen::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        let len = Screen::ALL.len();
        Screen::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlmanacView {
    #[default]
    Championships,
    ScoringTitles,
    Spoons,
    Playoffs,
    PointsFor,
    PointsAgainst,
    WinPct,
}

impl AlmanacView {
    pub const ALL: [AlmanacView; 7] = [
        AlmanacView::Championships,
        AlmanacView::ScoringTitles,
        AlmanacView::Spoons,
        AlmanacView::Playoffs,
        AlmanacView::PointsFor,
        AlmanacView::PointsAgainst,
        AlmanacView::WinPct,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AlmanacView::Championships => "championships",
            AlmanacView::ScoringTitles => "scoring-titles",
            AlmanacView::Spoons => "spoons",
            AlmanacView::Playoffs => "playoffs",
            AlmanacView::PointsFor => "points-for",
            AlmanacView::PointsAgainst => "points-against",
            AlmanacView::WinPct => "win-pct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlmanacView::Championships => "Championships",
            AlmanacView::ScoringTitles => "Scoring Titles",
            AlmanacView::Spoons => "Spoons",
            AlmanacView::Playoffs => "Playoff Appearances",
            AlmanacView::PointsFor => "All-Time Points For",
            AlmanacView::PointsAgainst => "All-Time Points Against",
            AlmanacView::WinPct => "Win % Trend",
        }
    }

    pub fn step(self, forward: bool) -> AlmanacView {
        step_in(&AlmanacView::ALL, self, forward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsView {
    #[default]
    Rivalries,
    CurrentStreaks,
    AllTimeStreaks,
    PointsTrends,
    Consistency,
    Blowouts,
    BadBeats,
    WeeklyAwards,
    LowestScoringWeeks,
    Clutch,
    TeamDna,
    TrophyCase,
    WhatIf,
    WeeklyRecap,
}

impl StatsView {
    pub const ALL: [StatsView; 14] = [
        StatsView::Rivalries,
        StatsView::CurrentStreaks,
        StatsView::AllTimeStreaks,
        StatsView::PointsTrends,
        StatsView::Consistency,
        StatsView::Blowouts,
        StatsView::BadBeats,
        StatsView::WeeklyAwards,
        StatsView::LowestScoringWeeks,
        StatsView::Clutch,
        StatsView::TeamDna,
        StatsView::TrophyCase,
        StatsView::WhatIf,
        StatsView::WeeklyRecap,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            StatsView::Rivalries => "rivalries",
            StatsView::CurrentStreaks => "current-streaks",
            StatsView::AllTimeStreaks => "all-time-streaks",
            StatsView::PointsTrends => "points-trends",
            StatsView::Consistency => "consistency",
            StatsView::Blowouts => "blowouts",
            StatsView::BadBeats => "bad-beats",
            StatsView::WeeklyAwards => "weekly-awards",
            StatsView::LowestScoringWeeks => "lowest-scoring-weeks",
            StatsView::Clutch => "clutch",
            StatsView::TeamDna => "team-dna",
            StatsView::TrophyCase => "trophy-case",
            StatsView::WhatIf => "what-if",
            StatsView::WeeklyRecap => "weekly-recap",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatsView::Rivalries => "Rivalries",
            StatsView::CurrentStreaks => "Current Streaks",
            StatsView::AllTimeStreaks => "All-Time Streaks",
            StatsView::PointsTrends => "Points Trends",
            StatsView::Consistency => "Consistency",
            StatsView::Blowouts => "Blowouts",
            StatsView::BadBeats => "Bad Beats",
            StatsView::WeeklyAwards => "Weekly Awards",
            StatsView::LowestScoringWeeks => "Lowest Scoring Weeks",
            StatsView::Clutch => "Clutch",
            StatsView::TeamDna => "Team DNA",
            StatsView::TrophyCase => "Trophy Case",
            StatsView::WhatIf => "What-If",
            StatsView::WeeklyRecap => "Weekly Recap",
        }
    }

    pub fn step(self, forward: bool) -> StatsView {
        step_in(&StatsView::ALL, self, forward)
    }

    /// Form fields the view exposes; empty for plain tables.
    pub fn fields(self) -> &'static [FormField] {
        match self {
            StatsView::Rivalries => &[FormField::Team1, FormField::Team2],
            StatsView::WhatIf => &[
                FormField::Year,
                FormField::Week,
                FormField::Team1,
                FormField::Team2,
                FormField::Winner,
            ],
            StatsView::WeeklyRecap => &[FormField::Year, FormField::Week],
            _ => &[],
        }
    }
}

fn step_in<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    if forward {
        all[(idx + 1) % len]
    } else {
        all[(idx + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Team1,
    Team2,
    Year,
    Week,
    Winner,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Team1 => "Team 1",
            FormField::Team2 => "Team 2",
            FormField::Year => "Year",
            FormField::Week => "Week",
            FormField::Winner => "New winner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    A,
    B,
}

/// One independently loading unit of work. Each carries its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Mount(Screen),
    LeagueInfo,
    Refresh,
    HeadToHead,
    TeamStats,
    TrashTalk,
    WhatIf,
    Recap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub query: Query,
    pub generation: u64,
}

/// Fully parameterized work for the provider, snapshotted from state at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Mount { screen: Screen, week: Option<u32> },
    LeagueInfo,
    Refresh,
    HeadToHead { team1: String, team2: String },
    TeamStats { team: String },
    TrashTalk { team1: String, team2: String },
    WhatIf(WhatIfScenario),
    Recap { year: i32, week: u32 },
}

impl Request {
    pub fn query(&self) -> Query {
        match self {
            Request::Mount { screen, .. } => Query::Mount(*screen),
            Request::LeagueInfo => Query::LeagueInfo,
            Request::Refresh => Query::Refresh,
            Request::HeadToHead { .. } => Query::HeadToHead,
            Request::TeamStats { .. } => Query::TeamStats,
            Request::TrashTalk { .. } => Query::TrashTalk,
            Request::WhatIf(_) => Query::WhatIf,
            Request::Recap { .. } => Query::Recap,
        }
    }
}

/// A fetched payload tagged with the slot it belongs to.
#[derive(Debug, Clone)]
pub enum SlotData {
    League(FetchOutcome<LeagueInfo>),
    Refresh(FetchOutcome<RefreshSummary>),
    Standings(FetchOutcome<StandingsTable>),
    PlayoffScenarios(FetchOutcome<PlayoffScenarios>),
    PlayoffStandings(FetchOutcome<StandingsTable>),
    AlmanacHistorical(FetchOutcome<HistoricalStats>),
    AlmanacScoringTitles(FetchOutcome<Vec<ScoringTitle>>),
    AlmanacAllTime(FetchOutcome<AllTimeStats>),
    AlmanacWinPct(FetchOutcome<Vec<WinPctRow>>),
    HeadToHeadTeams(FetchOutcome<Vec<String>>),
    HeadToHead(FetchOutcome<HeadToHead>),
    StatsTeams(FetchOutcome<Vec<String>>),
    Rivalries(FetchOutcome<Vec<Rivalry>>),
    Streaks(FetchOutcome<Streaks>),
    PointsTrends(FetchOutcome<Vec<PointsTrend>>),
    Consistency(FetchOutcome<Vec<Consistency>>),
    Blowouts(FetchOutcome<Vec<Blowout>>),
    BadBeats(FetchOutcome<BadBeats>),
    WeeklyAwards(FetchOutcome<WeeklyAwards>),
    LowestScoringWeeks(FetchOutcome<Vec<LowestScoringWeek>>),
    Clutch(FetchOutcome<Vec<ClutchRecord>>),
    TeamDna(FetchOutcome<Vec<TeamDna>>),
    TrophyCases(FetchOutcome<Vec<TrophyCase>>),
    TrashTalk(FetchOutcome<Vec<String>>),
    WhatIf(FetchOutcome<WhatIfResult>),
    Recap(FetchOutcome<WeeklyRecap>),
    TeamStatsStandings(FetchOutcome<StandingsTable>),
    TeamStats(FetchOutcome<TeamStats>),
    Matchups(FetchOutcome<Vec<Matchup>>),
    Transactions(FetchOutcome<Vec<Transaction>>),
    HallOfFame(FetchOutcome<Vec<HallOfFameEntry>>),
    HallOfShame(FetchOutcome<Vec<HallOfShameEntry>>),
}

#[derive(Debug, Clone)]
pub enum Delta {
    Slot {
        id: RequestId,
        label: String,
        data: SlotData,
    },
    /// Every fetch of the request has completed.
    Settled(RequestId),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Run { id: RequestId, request: Request },
}

#[derive(Debug, Clone, Default)]
pub struct StandingsScreen {
    pub table: StandingsTable,
}

#[derive(Debug, Clone, Default)]
pub struct PlayoffsScreen {
    pub scenarios: PlayoffScenarios,
    pub standings: StandingsTable,
}

#[derive(Debug, Clone, Default)]
pub struct AlmanacScreen {
    pub view: AlmanacView,
    pub historical: HistoricalStats,
    pub scoring_titles: Vec<ScoringTitle>,
    pub all_time: AllTimeStats,
    pub win_pct: Vec<WinPctRow>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadToHeadScreen {
    pub teams: Vec<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub focus: Side,
    pub result: HeadToHead,
    /// Pair the current `result` belongs to.
    pub compared: Option<(String, String)>,
}

impl HeadToHeadScreen {
    pub fn same_team(&self) -> bool {
        matches!((&self.team_a, &self.team_b), (Some(a), Some(b)) if a == b)
    }
}

#[derive(Debug, Clone)]
pub struct StatsForm {
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub year: i32,
    pub week: u32,
    pub winner_is_team2: bool,
    pub field: usize,
}

impl Default for StatsForm {
    fn default() -> Self {
        Self {
            team1: None,
            team2: None,
            year: LAST_YEAR,
            week: DEFAULT_WEEK,
            winner_is_team2: false,
            field: 0,
        }
    }
}

impl StatsForm {
    pub fn new_winner(&self) -> Option<&str> {
        if self.winner_is_team2 {
            self.team2.as_deref()
        } else {
            self.team1.as_deref()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsScreen {
    pub view: StatsView,
    pub teams: Vec<String>,
    pub rivalries: Vec<Rivalry>,
    pub streaks: Streaks,
    pub points_trends: Vec<PointsTrend>,
    pub consistency: Vec<Consistency>,
    pub blowouts: Vec<Blowout>,
    pub bad_beats: BadBeats,
    pub weekly_awards: WeeklyAwards,
    pub lowest_weeks: Vec<LowestScoringWeek>,
    pub clutch: Vec<ClutchRecord>,
    pub team_dna: Vec<TeamDna>,
    pub trophy_cases: Vec<TrophyCase>,
    pub trash_talk: Vec<String>,
    pub what_if: WhatIfResult,
    pub recap: WeeklyRecap,
    pub form: StatsForm,
}

impl StatsScreen {
    pub fn focused_field(&self) -> Option<FormField> {
        let fields = self.view.fields();
        if fields.is_empty() {
            return None;
        }
        Some(fields[self.form.field % fields.len()])
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamStatsScreen {
    pub standings: StandingsTable,
    pub selected: Option<String>,
    pub stats: TeamStats,
    /// Team the current `stats` belong to.
    pub stats_team: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchupsScreen {
    pub matchups: Vec<Matchup>,
    pub week: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionsScreen {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default)]
pub struct HallOfFameScreen {
    pub entries: Vec<HallOfFameEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct HallOfShameScreen {
    pub entries: Vec<HallOfShameEntry>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub league: LeagueInfo,
    pub refresh_message: Option<String>,
    pub standings: StandingsScreen,
    pub playoffs: PlayoffsScreen,
    pub almanac: AlmanacScreen,
    pub head_to_head: HeadToHeadScreen,
    pub stats: StatsScreen,
    pub team_stats: TeamStatsScreen,
    pub matchups: MatchupsScreen,
    pub transactions: TransactionsScreen,
    pub hall_of_fame: HallOfFameScreen,
    pub hall_of_shame: HallOfShameScreen,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub scroll: u16,
    generations: HashMap<Query, u64>,
    in_flight: HashSet<Query>,
    mounted: HashSet<Screen>,
    remount_after_refresh: bool,
    follow_ups: Vec<Query>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Standings,
            league: LeagueInfo::default(),
            refresh_message: None,
            standings: StandingsScreen::default(),
            playoffs: PlayoffsScreen::default(),
            almanac: AlmanacScreen::default(),
            head_to_head: HeadToHeadScreen::default(),
            stats: StatsScreen::default(),
            team_stats: TeamStatsScreen::default(),
            matchups: MatchupsScreen::default(),
            transactions: TransactionsScreen::default(),
            hall_of_fame: HallOfFameScreen::default(),
            hall_of_shame: HallOfShameScreen::default(),
            logs: VecDeque::new(),
            help_overlay: false,
            scroll: 0,
            generations: HashMap::new(),
            in_flight: HashSet::new(),
            mounted: HashSet::new(),
            remount_after_refresh: false,
            follow_ups: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Starts a new generation of `query`; responses from older generations are dropped.
    pub fn begin(&mut self, query: Query) -> RequestId {
        let generation = self.generations.entry(query).or_insert(0);
        *generation += 1;
        self.in_flight.insert(query);
        if let Query::Mount(screen) = query {
            self.mounted.insert(screen);
        }
        RequestId {
            query,
            generation: *generation,
        }
    }

    /// Supersedes any in-flight `query` without starting a new request.
    pub fn cancel(&mut self, query: Query) {
        *self.generations.entry(query).or_insert(0) += 1;
        self.in_flight.remove(&query);
    }

    pub fn is_current(&self, id: &RequestId) -> bool {
        self.generations.get(&id.query).copied() == Some(id.generation)
    }

    pub fn is_loading(&self, query: Query) -> bool {
        self.in_flight.contains(&query)
    }

    pub fn refreshing(&self) -> bool {
        self.is_loading(Query::Refresh)
    }

    /// Whether anything backing the visible screen is still in flight.
    pub fn screen_loading(&self) -> bool {
        if self.is_loading(Query::Mount(self.screen)) {
            return true;
        }
        match self.screen {
            Screen::HeadToHead => self.is_loading(Query::HeadToHead),
            Screen::TeamStats => self.is_loading(Query::TeamStats),
            Screen::Stats => match self.stats.view {
                StatsView::Rivalries => self.is_loading(Query::TrashTalk),
                StatsView::WhatIf => self.is_loading(Query::WhatIf),
                StatsView::WeeklyRecap => self.is_loading(Query::Recap),
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_mounted(&self, screen: Screen) -> bool {
        self.mounted.contains(&screen)
    }

    pub fn needs_mount(&self) -> bool {
        !self.is_mounted(self.screen)
    }

    pub fn take_follow_ups(&mut self) -> Vec<Query> {
        std::mem::take(&mut self.follow_ups)
    }

    /// Builds the request for `query` from the current selections. `None` means the inputs are
    /// incomplete and nothing should be sent.
    pub fn request_for(&mut self, query: Query) -> Option<Request> {
        match query {
            Query::Mount(screen) => Some(Request::Mount {
                screen,
                week: match screen {
                    Screen::Matchups => self.matchups.week,
                    _ => None,
                },
            }),
            Query::LeagueInfo => Some(Request::LeagueInfo),
            Query::Refresh => Some(Request::Refresh),
            Query::HeadToHead => {
                let h2h = &self.head_to_head;
                match (&h2h.team_a, &h2h.team_b) {
                    (Some(a), Some(b)) if a != b => Some(Request::HeadToHead {
                        team1: a.clone(),
                        team2: b.clone(),
                    }),
                    _ => {
                        self.cancel(Query::HeadToHead);
                        self.head_to_head.result = HeadToHead::default();
                        self.head_to_head.compared = None;
                        None
                    }
                }
            }
            Query::TeamStats => self
                .team_stats
                .selected
                .clone()
                .map(|team| Request::TeamStats { team }),
            Query::TrashTalk => {
                let form = &self.stats.form;
                match (&form.team1, &form.team2) {
                    (Some(a), Some(b)) => Some(Request::TrashTalk {
                        team1: a.clone(),
                        team2: b.clone(),
                    }),
                    _ => {
                        self.push_log("[WARN] Trash talk needs both teams selected");
                        None
                    }
                }
            }
            Query::WhatIf => {
                let form = &self.stats.form;
                match (&form.team1, &form.team2, form.new_winner()) {
                    (Some(a), Some(b), Some(winner)) => Some(Request::WhatIf(WhatIfScenario {
                        year: form.year,
                        week: form.week,
                        team1: a.clone(),
                        team2: b.clone(),
                        new_winner: winner.to_string(),
                    })),
                    _ => {
                        self.push_log("[WARN] What-if needs both teams selected");
                        None
                    }
                }
            }
            Query::Recap => Some(Request::Recap {
                year: self.stats.form.year,
                week: self.stats.form.week,
            }),
        }
    }

    pub fn next_screen(&mut self) {
        self.screen = self.screen.next();
        self.scroll = 0;
    }

    pub fn prev_screen(&mut self) {
        self.screen = self.screen.prev();
        self.scroll = 0;
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.scroll = 0;
        }
    }

    /// Moves the visible screen's view tag. Never fetches.
    pub fn cycle_view(&mut self, forward: bool) {
        match self.screen {
            Screen::Almanac => self.almanac.view = self.almanac.view.step(forward),
            Screen::Stats => {
                self.stats.view = self.stats.view.step(forward);
                self.stats.form.field = 0;
            }
            _ => return,
        }
        self.scroll = 0;
    }

    pub fn cycle_field(&mut self, forward: bool) {
        match self.screen {
            Screen::HeadToHead => {
                self.head_to_head.focus = match self.head_to_head.focus {
                    Side::A => Side::B,
                    Side::B => Side::A,
                };
            }
            Screen::Stats => {
                let len = self.stats.view.fields().len();
                if len > 0 {
                    let field = self.stats.form.field % len;
                    self.stats.form.field = if forward {
                        (field + 1) % len
                    } else {
                        (field + len - 1) % len
                    };
                }
            }
            _ => {}
        }
    }

    /// Adjusts the focused selector. Returns the query the change invalidates, if any.
    pub fn adjust_selection(&mut self, forward: bool) -> Option<Query> {
        match self.screen {
            Screen::HeadToHead => {
                let h2h = &mut self.head_to_head;
                let slot = match h2h.focus {
                    Side::A => &mut h2h.team_a,
                    Side::B => &mut h2h.team_b,
                };
                *slot = cycle_name(&h2h.teams, slot.as_deref(), forward);
                Some(Query::HeadToHead)
            }
            Screen::TeamStats => {
                let names: Vec<String> = self
                    .team_stats
                    .standings
                    .teams
                    .iter()
                    .map(|t| t.name.clone())
                    .collect();
                let next = cycle_name(&names, self.team_stats.selected.as_deref(), forward);
                if next.is_some() && next != self.team_stats.selected {
                    self.team_stats.selected = next;
                    Some(Query::TeamStats)
                } else {
                    None
                }
            }
            Screen::Matchups => {
                self.matchups.week = step_week_filter(self.matchups.week, forward);
                Some(Query::Mount(Screen::Matchups))
            }
            Screen::Stats => {
                let field = self.stats.focused_field()?;
                let teams = self.stats.teams.clone();
                let form = &mut self.stats.form;
                match field {
                    FormField::Team1 => {
                        form.team1 = cycle_name(&teams, form.team1.as_deref(), forward);
                    }
                    FormField::Team2 => {
                        form.team2 = cycle_name(&teams, form.team2.as_deref(), forward);
                    }
                    FormField::Year => {
                        form.year = step_clamped(form.year, forward, FIRST_YEAR, LAST_YEAR);
                    }
                    FormField::Week => {
                        form.week = step_clamped(form.week as i32, forward, 1, MAX_WEEK as i32) as u32;
                    }
                    FormField::Winner => form.winner_is_team2 = !form.winner_is_team2,
                }
                // Stats forms are submitted explicitly.
                None
            }
            _ => None,
        }
    }

    /// The query the visible form submits with Enter.
    pub fn submit_query(&self) -> Option<Query> {
        match self.screen {
            Screen::HeadToHead => Some(Query::HeadToHead),
            Screen::TeamStats => Some(Query::TeamStats),
            Screen::Stats => match self.stats.view {
                StatsView::Rivalries => Some(Query::TrashTalk),
                StatsView::WhatIf => Some(Query::WhatIf),
                StatsView::WeeklyRecap => Some(Query::Recap),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

fn cycle_name(names: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let len = names.len();
    let idx = match current.and_then(|c| names.iter().position(|n| n == c)) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(names[idx].clone())
}

fn step_clamped(value: i32, forward: bool, min: i32, max: i32) -> i32 {
    let next = if forward { value + 1 } else { value - 1 };
    next.clamp(min, max)
}

// None = all weeks, then 1..=MAX_WEEK.
fn step_week_filter(week: Option<u32>, forward: bool) -> Option<u32> {
    match (week, forward) {
        (None, true) => Some(1),
        (None, false) => Some(MAX_WEEK),
        (Some(w), true) if w >= MAX_WEEK => None,
        (Some(w), true) => Some(w + 1),
        (Some(w), false) if w <= 1 => None,
        (Some(w), false) => Some(w - 1),
    }
}

/// Writes an outcome into its slot. Loaded overwrites, a rejection keeps the previous value and
/// a failure resets the slot to its empty default. Returns the diagnostic to log, if any.
fn store<T: Default>(slot: &mut T, outcome: FetchOutcome<T>, label: &str) -> Option<String> {
    match outcome {
        FetchOutcome::Loaded(value) => {
            *slot = value;
            None
        }
        FetchOutcome::Rejected(msg) => Some(format!("[WARN] {label} rejected: {msg}")),
        FetchOutcome::Failed(msg) => {
            *slot = T::default();
            Some(format!("[WARN] {label} failed: {msg}"))
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Log(msg) => state.push_log(msg),
        Delta::Settled(id) => {
            if !state.is_current(&id) {
                return;
            }
            state.in_flight.remove(&id.query);
            // The recap opens on the form's default week.
            if id.query == Query::Mount(Screen::Stats) {
                state.follow_ups.push(Query::Recap);
            }
            if id.query == Query::Refresh && state.remount_after_refresh {
                state.remount_after_refresh = false;
                state.mounted.clear();
            }
        }
        Delta::Slot { id, label, data } => {
            if !state.is_current(&id) {
                return;
            }
            let label = label.as_str();
            let diagnostic = match data {
                SlotData::League(outcome) => store(&mut state.league, outcome, label),
                SlotData::Refresh(outcome) => match outcome {
                    FetchOutcome::Loaded(summary) => {
                        state.remount_after_refresh = true;
                        let msg = summary
                            .message
                            .unwrap_or_else(|| "Data refreshed".to_string());
                        state.refresh_message = Some(msg.clone());
                        Some(format!("[INFO] {msg}"))
                    }
                    FetchOutcome::Rejected(msg) => Some(format!("[WARN] {label} rejected: {msg}")),
                    FetchOutcome::Failed(msg) => Some(format!("[WARN] {label} failed: {msg}")),
                },
                SlotData::Standings(outcome) => store(&mut state.standings.table, outcome, label),
                SlotData::PlayoffScenarios(outcome) => {
                    store(&mut state.playoffs.scenarios, outcome, label)
                }
                SlotData::PlayoffStandings(outcome) => {
                    store(&mut state.playoffs.standings, outcome, label)
                }
                SlotData::AlmanacHistorical(outcome) => {
                    store(&mut state.almanac.historical, outcome, label)
                }
                SlotData::AlmanacScoringTitles(outcome) => {
                    store(&mut state.almanac.scoring_titles, outcome, label)
                }
                SlotData::AlmanacAllTime(outcome) => {
                    store(&mut state.almanac.all_time, outcome, label)
                }
                SlotData::AlmanacWinPct(outcome) => store(&mut state.almanac.win_pct, outcome, label),
                SlotData::HeadToHeadTeams(outcome) => {
                    let loaded = outcome.is_loaded();
                    let diagnostic = store(&mut state.head_to_head.teams, outcome, label);
                    if loaded {
                        let h2h = &mut state.head_to_head;
                        retain_known(&mut h2h.team_a, &h2h.teams);
                        retain_known(&mut h2h.team_b, &h2h.teams);
                        if h2h.team_a.is_some() && h2h.team_b.is_some() {
                            state.follow_ups.push(Query::HeadToHead);
                        }
                    }
                    diagnostic
                }
                SlotData::HeadToHead(outcome) => {
                    let h2h = &mut state.head_to_head;
                    match &outcome {
                        FetchOutcome::Loaded(_) => {
                            h2h.compared = h2h.team_a.clone().zip(h2h.team_b.clone());
                        }
                        FetchOutcome::Failed(_) => h2h.compared = None,
                        FetchOutcome::Rejected(_) => {}
                    }
                    store(&mut h2h.result, outcome, label)
                }
                SlotData::StatsTeams(outcome) => {
                    let loaded = outcome.is_loaded();
                    let diagnostic = store(&mut state.stats.teams, outcome, label);
                    if loaded {
                        let stats = &mut state.stats;
                        retain_known(&mut stats.form.team1, &stats.teams);
                        retain_known(&mut stats.form.team2, &stats.teams);
                    }
                    diagnostic
                }
                SlotData::Rivalries(outcome) => store(&mut state.stats.rivalries, outcome, label),
                SlotData::Streaks(outcome) => store(&mut state.stats.streaks, outcome, label),
                SlotData::PointsTrends(outcome) => {
                    store(&mut state.stats.points_trends, outcome, label)
                }
                SlotData::Consistency(outcome) => store(&mut state.stats.consistency, outcome, label),
                SlotData::Blowouts(outcome) => store(&mut state.stats.blowouts, outcome, label),
                SlotData::BadBeats(outcome) => store(&mut state.stats.bad_beats, outcome, label),
                SlotData::WeeklyAwards(outcome) => {
                    store(&mut state.stats.weekly_awards, outcome, label)
                }
                SlotData::LowestScoringWeeks(outcome) => {
                    store(&mut state.stats.lowest_weeks, outcome, label)
                }
                SlotData::Clutch(outcome) => store(&mut state.stats.clutch, outcome, label),
                SlotData::TeamDna(outcome) => store(&mut state.stats.team_dna, outcome, label),
                SlotData::TrophyCases(outcome) => store(&mut state.stats.trophy_cases, outcome, label),
                SlotData::TrashTalk(outcome) => store(&mut state.stats.trash_talk, outcome, label),
                SlotData::WhatIf(outcome) => {
                    let failed = matches!(outcome, FetchOutcome::Failed(_));
                    let diagnostic = store(&mut state.stats.what_if, outcome, label);
                    if failed {
                        state.stats.what_if.error = Some("Failed to calculate scenario".to_string());
                    }
                    diagnostic
                }
                SlotData::Recap(outcome) => {
                    let failed = matches!(outcome, FetchOutcome::Failed(_));
                    let diagnostic = store(&mut state.stats.recap, outcome, label);
                    if failed {
                        state.stats.recap.error = Some("Failed to load recap".to_string());
                    }
                    diagnostic
                }
                SlotData::TeamStatsStandings(outcome) => {
                    let loaded = outcome.is_loaded();
                    let diagnostic = store(&mut state.team_stats.standings, outcome, label);
                    if loaded {
                        let ts = &mut state.team_stats;
                        let known = ts
                            .selected
                            .as_ref()
                            .is_some_and(|sel| ts.standings.teams.iter().any(|t| &t.name == sel));
                        if !known {
                            ts.selected = ts.standings.teams.first().map(|t| t.name.clone());
                        }
                        if ts.selected.is_some() {
                            state.follow_ups.push(Query::TeamStats);
                        }
                    }
                    diagnostic
                }
                SlotData::TeamStats(outcome) => {
                    let loaded = outcome.is_loaded();
                    let diagnostic = store(&mut state.team_stats.stats, outcome, label);
                    if loaded {
                        state.team_stats.stats_team = state.team_stats.selected.clone();
                    }
                    diagnostic
                }
                SlotData::Matchups(outcome) => store(&mut state.matchups.matchups, outcome, label),
                SlotData::Transactions(outcome) => {
                    store(&mut state.transactions.transactions, outcome, label)
                }
                SlotData::HallOfFame(outcome) => store(&mut state.hall_of_fame.entries, outcome, label),
                SlotData::HallOfShame(outcome) => {
                    store(&mut state.hall_of_shame.entries, outcome, label)
                }
            };
            if let Some(msg) = diagnostic {
                state.push_log(msg);
            }
        }
    }
}

fn retain_known(selection: &mut Option<String>, names: &[String]) {
    if let Some(sel) = selection.as_ref()
        && !names.iter().any(|n| n == sel)
    {
        *selection = None;
    }
}
