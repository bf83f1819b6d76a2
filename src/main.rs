use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDateTime};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
};

use gridiron_terminal::api::LeagueApi;
use gridiron_terminal::config::Config;
use gridiron_terminal::provider::spawn_provider;
use gridiron_terminal::state::{
    self, AppState, ProviderCommand, Query, Screen, StatsView, apply_delta,
};
use gridiron_terminal::views::{self, ChartSpec, Tone, ViewBody};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    league_poll: Duration,
    last_league_poll: Instant,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, config: &Config) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            league_poll: config.league_poll,
            last_league_poll: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            if key.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '0'..='9') => {
                let idx = match c.to_digit(10) {
                    Some(0) => 9,
                    Some(d) => d as usize - 1,
                    None => return,
                };
                if let Some(screen) = Screen::ALL.get(idx) {
                    self.state.set_screen(*screen);
                }
            }
            KeyCode::Tab => self.state.next_screen(),
            KeyCode::BackTab => self.state.prev_screen(),
            KeyCode::Char(']') => self.state.cycle_view(true),
            KeyCode::Char('[') => self.state.cycle_view(false),
            KeyCode::Up if has_form(&self.state) => self.state.cycle_field(false),
            KeyCode::Down if has_form(&self.state) => self.state.cycle_field(true),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => self.state.scroll_up(),
            KeyCode::Left | KeyCode::Char('h') => self.adjust(false),
            KeyCode::Right | KeyCode::Char('l') => self.adjust(true),
            KeyCode::Enter => {
                if let Some(query) = self.state.submit_query() {
                    self.dispatch(query);
                }
            }
            KeyCode::Char('r') => {
                if self.state.refreshing() {
                    self.state.push_log("[INFO] Refresh already running");
                } else {
                    self.dispatch(Query::Refresh);
                }
            }
            KeyCode::Char('R') => self.dispatch(Query::Mount(self.state.screen)),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn adjust(&mut self, forward: bool) {
        if let Some(query) = self.state.adjust_selection(forward) {
            self.dispatch(query);
        }
    }

    /// Starts a new generation of `query` and hands it to the provider.
    fn dispatch(&mut self, query: Query) {
        let Some(request) = self.state.request_for(query) else {
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Fetching unavailable");
            return;
        };
        let id = self.state.begin(query);
        if tx.send(ProviderCommand::Run { id, request }).is_err() {
            self.state.push_log("[WARN] Provider stopped; request dropped");
            self.state.cancel(query);
        }
    }

    fn maybe_mount(&mut self) {
        if self.state.needs_mount() {
            self.dispatch(Query::Mount(self.state.screen));
        }
    }

    fn run_follow_ups(&mut self) {
        for query in self.state.take_follow_ups() {
            self.dispatch(query);
        }
    }

    fn maybe_poll_league(&mut self) {
        if self.last_league_poll.elapsed() < self.league_poll {
            return;
        }
        self.last_league_poll = Instant::now();
        if !self.state.is_loading(Query::LeagueInfo) && !self.state.refreshing() {
            self.dispatch(Query::LeagueInfo);
        }
    }
}

fn has_form(state: &AppState) -> bool {
    match state.screen {
        Screen::HeadToHead => true,
        Screen::Stats => !state.stats.view.fields().is_empty(),
        _ => false,
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(LeagueApi::http(config.clone()), config.clone(), tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx), &config);
    app.state
        .push_log(format!("[INFO] API base {}", config.api_base));
    app.dispatch(Query::LeagueInfo);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.run_follow_ups();
        app.maybe_mount();
        app.maybe_poll_league();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = views::dispatch(&app.state);
    render_body(frame, chunks[1], &body, app.state.scroll);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, area, &app.state);
    }
}

fn header_text(state: &AppState) -> String {
    let league = if state.league.name.is_empty() {
        "The Greatest League".to_string()
    } else {
        state.league.name.clone()
    };
    let week = state
        .league
        .current_week
        .map(|w| format!(" | Week {w}"))
        .unwrap_or_default();
    let updated = state
        .league
        .last_updated
        .as_deref()
        .map(format_updated)
        .map(|u| format!("Updated: {u} | "))
        .unwrap_or_default();
    let refresh = if state.refreshing() {
        "Refreshing...".to_string()
    } else {
        match state.refresh_message.as_deref() {
            Some(msg) => format!("r Refresh ({msg})"),
            None => "r Refresh".to_string(),
        }
    };
    let tabs = Screen::ALL
        .iter()
        .enumerate()
        .map(|(idx, screen)| {
            let key = (idx + 1) % 10;
            if *screen == state.screen {
                format!("[{key} {}]", screen.label())
            } else {
                format!("{key} {}", screen.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    format!("🏈 {league}{week}\n{updated}{refresh}\n{tabs}")
}

fn format_updated(raw: &str) -> String {
    let cleaned = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
    }
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    cleaned.to_string()
}

fn footer_text(state: &AppState) -> String {
    let common = "Tab/1-0 Screen | r Refresh | R Reload | ? Help | q Quit";
    match state.screen {
        Screen::Almanac => format!("[/] View | j/k Scroll | {common}"),
        Screen::Stats => match state.stats.view {
            StatsView::Rivalries | StatsView::WhatIf | StatsView::WeeklyRecap => {
                format!("[/] View | ↑/↓ Field | ←/→ Change | Enter Submit | {common}")
            }
            _ => format!("[/] View | j/k Scroll | {common}"),
        },
        Screen::HeadToHead => format!("↑/↓ Team A/B | ←/→ Change team | {common}"),
        Screen::TeamStats => format!("←/→ Team | j/k Scroll | {common}"),
        Screen::Matchups => format!("←/→ Week filter | j/k Scroll | {common}"),
        _ => format!("j/k Scroll | {common}"),
    }
}

fn render_body(frame: &mut Frame, area: Rect, body: &ViewBody, scroll: u16) {
    let text_area = if body.charts.is_empty() {
        area
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        render_charts(frame, columns[1], &body.charts);
        columns[0]
    };

    let lines: Vec<Line> = body
        .lines
        .iter()
        .map(|l| Line::from(Span::styled(l.text.as_str(), tone_style(l.tone))))
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(body.title.as_str()).borders(Borders::ALL))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, text_area);
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::default(),
        Tone::Heading => Style::default().add_modifier(Modifier::BOLD),
        Tone::Muted => Style::default().fg(Color::DarkGray),
        Tone::Good => Style::default().fg(Color::Green),
        Tone::Bad => Style::default().fg(Color::Red),
        Tone::Accent => Style::default().fg(Color::Yellow),
        Tone::Team(color) => Style::default().fg(color),
    }
}

fn render_charts(frame: &mut Frame, area: Rect, charts: &[ChartSpec]) {
    let constraints: Vec<Constraint> = charts
        .iter()
        .map(|_| Constraint::Ratio(1, charts.len() as u32))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (chart, row) in charts.iter().zip(rows.iter()) {
        match chart {
            ChartSpec::Bars { title, bars } => {
                let bars: Vec<Bar> = bars
                    .iter()
                    .map(|bar| {
                        Bar::default()
                            .value(bar.value)
                            .label(Line::from(bar.label.clone()))
                            .style(Style::default().fg(bar.color))
                    })
                    .collect();
                let widget = BarChart::default()
                    .block(Block::default().title(title.as_str()).borders(Borders::ALL))
                    .data(BarGroup::default().bars(&bars))
                    .direction(Direction::Horizontal)
                    .bar_width(1)
                    .bar_gap(0);
                frame.render_widget(widget, *row);
            }
            ChartSpec::Lines {
                title,
                series,
                x_bounds,
                y_bounds,
            } => {
                let datasets: Vec<Dataset> = series
                    .iter()
                    .map(|s| {
                        Dataset::default()
                            .name(s.name.clone())
                            .marker(symbols::Marker::Braille)
                            .graph_type(GraphType::Line)
                            .style(Style::default().fg(s.color))
                            .data(&s.points)
                    })
                    .collect();
                let widget = Chart::new(datasets)
                    .block(Block::default().title(title.as_str()).borders(Borders::ALL))
                    .x_axis(
                        Axis::default()
                            .bounds(*x_bounds)
                            .labels(vec![
                                Span::raw(format!("{:.0}", x_bounds[0])),
                                Span::raw(format!("{:.0}", x_bounds[1])),
                            ])
                            .style(Style::default().fg(Color::DarkGray)),
                    )
                    .y_axis(
                        Axis::default()
                            .bounds(*y_bounds)
                            .labels(vec![
                                Span::raw(format!("{:.0}", y_bounds[0])),
                                Span::raw(format!("{:.0}", y_bounds[1])),
                            ])
                            .style(Style::default().fg(Color::DarkGray)),
                    );
                frame.render_widget(widget, *row);
            }
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        "Gridiron Terminal - Help".to_string(),
        String::new(),
        "Global:".to_string(),
        "  1-9, 0        Jump to screen".to_string(),
        "  Tab / S-Tab   Next / previous screen".to_string(),
        "  r             Refresh server data".to_string(),
        "  R             Reload this screen".to_string(),
        "  ?             Toggle help".to_string(),
        "  q             Quit".to_string(),
        String::new(),
        "Screens:".to_string(),
        "  [ / ]         Almanac and Stats views".to_string(),
        "  ↑ / ↓         Form field (scroll elsewhere)".to_string(),
        "  ← / →         Change team, year, week".to_string(),
        "  Enter         Submit form".to_string(),
        "  j / k         Scroll".to_string(),
        String::new(),
        "Recent log:".to_string(),
    ];
    lines.extend(state.logs.iter().rev().take(8).map(|l| format!("  {l}")));

    let help = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
