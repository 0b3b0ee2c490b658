use crate::error::Result;
use crate::executor;
use crate::model::DisplayModel;
use crate::period::{Period, PeriodUnit};
use crate::planner::TimeWindow;
use crate::refresh::{CycleGuard, RefreshToken};
use crate::store::SqliteStore;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use std::io::{self, stdout};
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use super::ui;

/// Fixed period presets for zooming the chart window.
const PERIOD_PRESETS: &[Period] = &[
    Period::new(1, PeriodUnit::Hour),
    Period::new(6, PeriodUnit::Hour),
    Period::new(12, PeriodUnit::Hour),
    Period::new(1, PeriodUnit::Day),
    Period::new(7, PeriodUnit::Day),
    Period::new(30, PeriodUnit::Day),
    Period::new(90, PeriodUnit::Day),
    Period::new(1, PeriodUnit::Year),
];

/// The selected period and how many whole periods back from now the window
/// ends. `period == None` is latest-only mode (unparseable period string).
pub struct WindowState {
    period: Option<Period>,
    offset: i64,
}

impl WindowState {
    pub fn new(period: Option<Period>) -> Self {
        WindowState { period, offset: 0 }
    }

    /// The window to query, ending `offset` periods before `now`.
    pub fn window(&self, now: i64) -> Option<TimeWindow> {
        self.period
            .map(|p| p.window_ending(now - self.offset * p.secs()))
    }

    pub fn label(&self) -> String {
        match self.period {
            Some(period) if self.offset > 0 => format!("{period} (-{})", self.offset),
            Some(period) => period.to_string(),
            None => "latest only".to_string(),
        }
    }

    pub fn is_latest_only(&self) -> bool {
        self.period.is_none()
    }

    /// Shift the window one period further into the past.
    pub fn back(&mut self) {
        if self.period.is_some() {
            self.offset += 1;
        }
    }

    /// Shift the window one period toward now; never past it.
    pub fn forward(&mut self) {
        self.offset = (self.offset - 1).max(0);
    }

    /// Jump back to the window ending at now.
    pub fn follow(&mut self) {
        self.offset = 0;
    }

    /// Switch to the next shorter preset period.
    pub fn zoom_in(&mut self) {
        self.period = Some(match self.period {
            Some(current) => *PERIOD_PRESETS
                .iter()
                .rev()
                .find(|p| p.secs() < current.secs())
                .unwrap_or(&PERIOD_PRESETS[0]),
            // zooming from latest-only mode recovers a chartable window
            None => PERIOD_PRESETS[3],
        });
    }

    /// Switch to the next longer preset period.
    pub fn zoom_out(&mut self) {
        self.period = Some(match self.period {
            Some(current) => *PERIOD_PRESETS
                .iter()
                .find(|p| p.secs() > current.secs())
                .unwrap_or(&PERIOD_PRESETS[PERIOD_PRESETS.len() - 1]),
            None => PERIOD_PRESETS[3],
        });
    }
}

/// One refresh request for the worker thread.
pub struct Request {
    pub window: Option<TimeWindow>,
    pub resolution: u32,
    pub cycle: CycleGuard,
}

/// What a cycle reported back.
pub enum Outcome {
    Updated(DisplayModel),
    Abandoned,
    Failed(String),
}

/// Worker loop owning the store connection. Runs cycles as requested and
/// reports each outcome; exits when the request channel closes.
pub fn worker_loop(store: SqliteStore, rx: Receiver<Request>, tx: Sender<Outcome>) {
    while let Ok(request) = rx.recv() {
        let outcome = match executor::refresh_cycle(
            &store,
            request.window,
            request.resolution,
            &request.cycle,
        ) {
            Ok(Some(model)) => Outcome::Updated(model),
            Ok(None) => Outcome::Abandoned,
            Err(e) => Outcome::Failed(e.to_string()),
        };
        if tx.send(outcome).is_err() {
            break;
        }
    }
}

/// Dashboard application state.
pub struct App {
    req_tx: Sender<Request>,
    outcome_rx: Receiver<Outcome>,
    token: RefreshToken,

    window_state: WindowState,
    resolution_hint: u32,
    refresh_interval: Duration,

    model: DisplayModel,
    last_error: Option<String>,
    /// Requests sent whose outcome has not arrived yet
    pending: usize,
    last_completed: Instant,

    chart_area: Rect,
    running: bool,
}

impl App {
    pub fn new(
        req_tx: Sender<Request>,
        outcome_rx: Receiver<Outcome>,
        period: Option<Period>,
        resolution_hint: u32,
        refresh_interval: Duration,
    ) -> Self {
        App {
            req_tx,
            outcome_rx,
            token: RefreshToken::new(),
            window_state: WindowState::new(period),
            resolution_hint,
            refresh_interval,
            model: DisplayModel::default(),
            last_error: None,
            pending: 0,
            last_completed: Instant::now(),
            chart_area: Rect::default(),
            running: true,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        self.request_refresh();

        while self.running {
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            while let Ok(outcome) = self.outcome_rx.try_recv() {
                self.apply(outcome);
            }

            // The timer rearms only once the in-flight cycle reports an
            // outcome, so a slow cycle is never overlapped by the timer.
            if self.pending == 0 && self.last_completed.elapsed() >= self.refresh_interval {
                self.request_refresh();
            }

            terminal.draw(|frame| ui::render(frame, self))?;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,

            KeyCode::Char('r') => self.request_refresh(),

            // navigation requests go out immediately; the refresh token
            // makes whatever was in flight come back as Abandoned
            KeyCode::Char('h') | KeyCode::Left => {
                self.window_state.back();
                self.request_refresh();
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.window_state.forward();
                self.request_refresh();
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('k') | KeyCode::Up => {
                self.window_state.zoom_in();
                self.request_refresh();
            }
            KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => {
                self.window_state.zoom_out();
                self.request_refresh();
            }
            KeyCode::Char(' ') | KeyCode::Char('$') | KeyCode::Char('f') => {
                self.window_state.follow();
                self.request_refresh();
            }

            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        let now = Utc::now().timestamp();
        let request = Request {
            window: self.window_state.window(now),
            resolution: self.resolution(),
            cycle: self.token.begin(),
        };
        if self.req_tx.send(request).is_ok() {
            self.pending += 1;
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        self.pending = self.pending.saturating_sub(1);
        self.last_completed = Instant::now();
        match outcome {
            Outcome::Updated(model) => {
                self.model = model;
                self.last_error = None;
            }
            // a newer cycle superseded this one; nothing to show
            Outcome::Abandoned => {}
            // keep the previous display on screen
            Outcome::Failed(message) => self.last_error = Some(message),
        }
    }

    /// Target bucket count: roughly one per chart column, capped at the
    /// configured resolution.
    fn resolution(&self) -> u32 {
        if self.chart_area.width == 0 {
            return self.resolution_hint;
        }
        let columns = u32::from(self.chart_area.width.saturating_sub(10).max(1));
        columns.min(self.resolution_hint)
    }

    pub fn model(&self) -> &DisplayModel {
        &self.model
    }

    pub fn window_label(&self) -> String {
        self.window_state.label()
    }

    pub fn is_latest_only(&self) -> bool {
        self.window_state.is_latest_only()
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending > 0
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_chart_area(&mut self, area: Rect) {
        self.chart_area = area;
    }
}
