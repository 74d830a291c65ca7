//! Application state for the board TUI.

use std::time::{Duration, Instant};

use caseboard_core::config::BoardConfig;
use caseboard_core::source::CaseSource;
use caseboard_core::{reduce, BoardEvent, BoardState};
use chrono::{Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};

/// Whether keys drive the board or edit the search prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Main application state.
pub struct App {
    /// Board snapshot, paging, filters and selection
    pub state: BoardState,
    /// Where cases come from
    source: Box<dyn CaseSource>,
    /// Refresh and dwell timing
    timing: BoardConfig,
    /// When the next data refresh is due
    next_refresh: Instant,
    /// When the next automatic page advance is due
    next_advance: Instant,
    /// Current input mode
    pub input_mode: InputMode,
    /// Search text being edited
    pub search_input: String,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new app. Nothing is loaded until [`App::refresh`] runs.
    pub fn new(source: Box<dyn CaseSource>, timing: BoardConfig, page_size: usize) -> Self {
        let now = Instant::now();
        Self {
            state: BoardState::new(Local::now().date_naive(), page_size),
            source,
            next_refresh: now + timing.poll_interval(),
            next_advance: now + timing.dwell_for(0),
            timing,
            input_mode: InputMode::default(),
            search_input: String::new(),
            should_quit: false,
        }
    }

    /// Human-readable description of the case source.
    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    fn dispatch(&mut self, event: BoardEvent) {
        let today = self.state.today();
        let state = std::mem::replace(&mut self.state, BoardState::new(today, 1));
        self.state = reduce(state, event);
    }

    /// Fetch the case list now and fold the result into the board.
    pub fn refresh(&mut self) {
        let event = match self.source.list_cases() {
            Ok(cases) => {
                tracing::debug!(count = cases.len(), "Case list refreshed");
                BoardEvent::Loaded {
                    cases,
                    today: Local::now().date_naive(),
                    at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::warn!(source = %self.source.describe(), error = %e, "Refresh failed");
                BoardEvent::LoadFailed(e.to_string())
            }
        };
        self.dispatch(event);
    }

    /// How long the page now on screen stays up.
    pub fn current_dwell(&self) -> Duration {
        self.timing.dwell_for(self.state.current_page().len())
    }

    /// Auto-advance holds while a case is selected or the search prompt is open.
    pub fn is_paused(&self) -> bool {
        self.input_mode == InputMode::Search || self.state.selected_id().is_some()
    }

    /// Run whichever periodic tasks are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if now >= self.next_refresh {
            self.refresh();
            self.next_refresh = now + self.timing.poll_interval();
        }

        if self.is_paused() {
            self.next_advance = now + self.current_dwell();
        } else if now >= self.next_advance {
            if self.state.page_count() > 1 {
                self.dispatch(BoardEvent::AdvancePage);
            }
            self.next_advance = now + self.current_dwell();
        }
    }

    fn restart_dwell(&mut self) {
        self.next_advance = Instant::now() + self.current_dwell();
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_board_key(key),
            InputMode::Search => self.handle_search_key(key),
        }
    }

    /// Handle keyboard input on the board.
    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.refresh();
                self.next_refresh = Instant::now() + self.timing.poll_interval();
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.dispatch(BoardEvent::AdvancePage);
                self.restart_dwell();
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.dispatch(BoardEvent::PreviousPage);
                self.restart_dwell();
            }
            KeyCode::Char('/') => {
                self.search_input = self.state.filter().search.clone();
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('a') => {
                self.dispatch(BoardEvent::CycleAttentionFilter);
                self.restart_dwell();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.dispatch(BoardEvent::SelectNext);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.dispatch(BoardEvent::SelectPrevious);
            }
            KeyCode::Esc => {
                self.dispatch(BoardEvent::ClearSelection);
                self.restart_dwell();
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the search prompt. The filter follows every
    /// keystroke.
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.restart_dwell();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.dispatch(BoardEvent::SetSearch(self.search_input.clone()));
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.dispatch(BoardEvent::SetSearch(self.search_input.clone()));
            }
            _ => {}
        }
    }
}
