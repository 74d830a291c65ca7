//! Board state and its reducer.
//!
//! All mutable board state (latest snapshot, page position, filters and
//! selection) lives in [`BoardState`] and only changes through
//! [`reduce`]. The TUI loop feeds it events from its two timers and from
//! key presses; nothing here performs I/O.

use chrono::{DateTime, NaiveDate, Utc};

use crate::board::{flatten, group_and_sort, BoardGroup, BoardSummary, ClassifiedCase};
use crate::pager::{page_count, Pager};
use crate::types::{Attention, CaseSummary};

/// Attention filter position; cycles All → NeedsAttention → Waiting → None.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttentionFilter {
    #[default]
    All,
    Only(Attention),
}

impl AttentionFilter {
    pub fn next(self) -> Self {
        match self {
            AttentionFilter::All => AttentionFilter::Only(Attention::NeedsAttention),
            AttentionFilter::Only(Attention::NeedsAttention) => {
                AttentionFilter::Only(Attention::Waiting)
            }
            AttentionFilter::Only(Attention::Waiting) => AttentionFilter::Only(Attention::None),
            AttentionFilter::Only(Attention::None) => AttentionFilter::All,
        }
    }

    pub fn matches(&self, attention: Attention) -> bool {
        match self {
            AttentionFilter::All => true,
            AttentionFilter::Only(want) => *want == attention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttentionFilter::All => "all",
            AttentionFilter::Only(Attention::NeedsAttention) => "needs attention",
            AttentionFilter::Only(Attention::Waiting) => "waiting",
            AttentionFilter::Only(Attention::None) => "unflagged",
        }
    }
}

/// User-selected filters applied before grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// Case-insensitive subsequence match over client, case name and number
    pub search: String,
    pub attention: AttentionFilter,
}

impl BoardFilter {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.attention != AttentionFilter::All
    }

    pub fn matches(&self, case: &CaseSummary) -> bool {
        if !self.attention.matches(case.attention) {
            return false;
        }
        let needle = self.search.trim();
        if needle.is_empty() {
            return true;
        }
        [&case.client_name, &case.case_name, &case.case_number]
            .into_iter()
            .flatten()
            .any(|hay| fuzzy_match(hay, needle))
    }
}

/// True if every character of `needle` appears in `hay` in order.
pub fn fuzzy_match(hay: &str, needle: &str) -> bool {
    let hay = hay.to_lowercase();
    let mut rest = hay.chars();
    needle
        .to_lowercase()
        .chars()
        .all(|wanted| rest.by_ref().any(|c| c == wanted))
}

/// Events that move the board from one state to the next.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// A fetch succeeded
    Loaded {
        cases: Vec<CaseSummary>,
        today: NaiveDate,
        at: DateTime<Utc>,
    },
    /// A fetch failed; the last snapshot stays on screen
    LoadFailed(String),
    AdvancePage,
    PreviousPage,
    SetSearch(String),
    CycleAttentionFilter,
    SelectNext,
    SelectPrevious,
    ClearSelection,
}

/// Everything the board needs to render, owned by the display loop.
#[derive(Debug, Clone)]
pub struct BoardState {
    cases: Vec<CaseSummary>,
    today: NaiveDate,
    filter: BoardFilter,
    pager: Pager,
    selected_id: Option<String>,
    last_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    // Derived; rebuilt whenever data, day or filters change
    groups: Vec<BoardGroup>,
    flat: Vec<ClassifiedCase>,
    summary: BoardSummary,
}

impl BoardState {
    pub fn new(today: NaiveDate, page_size: usize) -> Self {
        Self {
            cases: Vec::new(),
            today,
            filter: BoardFilter::default(),
            pager: Pager::new(page_size),
            selected_id: None,
            last_error: None,
            loaded_at: None,
            groups: Vec::new(),
            flat: Vec::new(),
            summary: BoardSummary::default(),
        }
    }

    pub fn groups(&self) -> &[BoardGroup] {
        &self.groups
    }

    /// Every visible case in render order.
    pub fn flat(&self) -> &[ClassifiedCase] {
        &self.flat
    }

    pub fn summary(&self) -> BoardSummary {
        self.summary
    }

    pub fn filter(&self) -> &BoardFilter {
        &self.filter
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn page_index(&self) -> usize {
        self.pager.index()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.flat.len(), self.pager.page_size())
    }

    /// Cases on the current page.
    pub fn current_page(&self) -> &[ClassifiedCase] {
        self.pager.current(&self.flat)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&ClassifiedCase> {
        let id = self.selected_id.as_deref()?;
        self.flat.iter().find(|c| c.case.id == id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Whether at least one fetch has succeeded.
    pub fn has_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    fn rebuild(&mut self) {
        let visible: Vec<CaseSummary> = self
            .cases
            .iter()
            .filter(|c| self.filter.matches(c))
            .cloned()
            .collect();
        self.groups = group_and_sort(&visible, self.today);
        self.flat = flatten(&self.groups);
        self.summary = BoardSummary::from_groups(&self.groups);
        self.pager.clamp(self.flat.len());

        let still_visible = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.flat.iter().any(|c| c.case.id == id));
        if !still_visible {
            self.selected_id = None;
        }
    }

    fn step_selection(&mut self, forward: bool) {
        let page = self.current_page();
        if page.is_empty() {
            self.selected_id = None;
            return;
        }
        let position = self
            .selected_id
            .as_deref()
            .and_then(|id| page.iter().position(|c| c.case.id == id));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => page.len() - 1,
            (Some(i), true) => (i + 1).min(page.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.selected_id = Some(page[next].case.id.clone());
    }
}

/// Apply one event, returning the next state.
pub fn reduce(mut state: BoardState, event: BoardEvent) -> BoardState {
    match event {
        BoardEvent::Loaded { cases, today, at } => {
            state.cases = cases;
            state.today = today;
            state.loaded_at = Some(at);
            state.last_error = None;
            state.rebuild();
        }
        BoardEvent::LoadFailed(message) => {
            state.last_error = Some(message);
        }
        BoardEvent::AdvancePage => {
            state.pager.advance(state.flat.len());
            state.selected_id = None;
        }
        BoardEvent::PreviousPage => {
            state.pager.retreat(state.flat.len());
            state.selected_id = None;
        }
        BoardEvent::SetSearch(search) => {
            state.filter.search = search;
            state.pager.reset();
            state.rebuild();
        }
        BoardEvent::CycleAttentionFilter => {
            state.filter.attention = state.filter.attention.next();
            state.pager.reset();
            state.rebuild();
        }
        BoardEvent::SelectNext => state.step_selection(true),
        BoardEvent::SelectPrevious => state.step_selection(false),
        BoardEvent::ClearSelection => state.selected_id = None,
    }
    state
}
