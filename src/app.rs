//! Session state: the item collection, the active filters, refresh scheduling
//! and the detail popup.

use std::time::Instant;

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::detail::Detail;
use crate::fetch::Fetcher;
use crate::filter::filter_items;
use crate::grid::{Card, GridView};
use crate::model::{FilterState, History, Item};
use crate::refresh::RefreshController;
use crate::worker::{FetchMessage, Worker};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState {
    /// First price fetch still in flight
    Loading,
    Ready,
    /// First price fetch failed; nothing to show yet
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Detail,
}

/// Tracks clickable UI regions for mouse interaction
#[derive(Default, Clone, Debug)]
pub struct ClickableRegions {
    /// Category tabs: (rect, tab index) - index 0 = all categories
    pub category_tabs: Vec<(Rect, usize)>,
    /// Visible cards: (rect, card index in display order)
    pub cards: Vec<(Rect, usize)>,
    pub refresh_button: Rect,
    pub search_bar: Rect,
}

pub struct App {
    pub items: Vec<Item>,
    pub filter: FilterState,
    pub categories: Vec<String>,
    pub view: GridView,
    pub load_state: LoadState,
    pub input_mode: InputMode,
    pub detail: Option<Detail>,
    pub controller: RefreshController,
    pub selected: usize,
    /// Cards per grid row, as last laid out by the renderer
    pub grid_columns: usize,
    /// First visible grid line
    pub scroll: usize,
    pub clickable_regions: ClickableRegions,
    pub last_update: Option<DateTime<Local>>,
    pub refresh_failed: bool,
    pub source_label: String,
    worker: Worker,
    next_seq: u64,
    applied_seq: u64,
    pending: usize,
}

impl App {
    pub fn new(fetcher: Fetcher, controller: RefreshController) -> Self {
        let source_label = fetcher.describe();
        App {
            items: Vec::new(),
            filter: FilterState::default(),
            categories: Vec::new(),
            view: GridView::Empty,
            load_state: LoadState::Loading,
            input_mode: InputMode::Normal,
            detail: None,
            controller,
            selected: 0,
            grid_columns: 1,
            scroll: 0,
            clickable_regions: ClickableRegions::default(),
            last_update: None,
            refresh_failed: false,
            source_label,
            worker: Worker::new(fetcher),
            next_seq: 0,
            applied_seq: 0,
            pending: 0,
        }
    }

    /// Kick off the initial load and the refresh countdown.
    pub fn start(&mut self, now: Instant) {
        info!(source = %self.source_label, "starting price board");
        self.load_state = LoadState::Loading;
        self.controller.start(now);
        self.refresh();
    }

    pub fn is_fetching(&self) -> bool {
        self.pending > 0
    }

    /// Re-fetch the whole collection. The current filters are reapplied when
    /// the result arrives.
    pub fn refresh(&mut self) {
        self.next_seq += 1;
        self.pending += 1;
        self.worker.request_prices(self.next_seq);
    }

    /// Manual refresh; a no-op while the button is locked.
    pub fn request_manual_refresh(&mut self, now: Instant) -> bool {
        if !self.controller.request_manual(now) {
            debug!(lock = self.controller.lock_remaining(), "manual refresh rejected");
            return false;
        }
        info!("manual refresh");
        self.refresh();
        true
    }

    /// Advance the timers and start an automatic refresh when the countdown expires.
    pub fn on_tick(&mut self, now: Instant) {
        let due = self.controller.poll(now);
        if due > 0 {
            debug!(due, "automatic refresh");
            self.refresh();
        }
    }

    /// Drain finished fetches. Returns true if anything arrived.
    pub fn process_fetch_results(&mut self) -> bool {
        let mut updated = false;
        while let Some(msg) = self.worker.try_recv() {
            self.handle_message(msg);
            updated = true;
        }
        updated
    }

    #[cfg(test)]
    pub fn wait_for_fetches(&mut self) {
        use std::time::Duration;
        while self.pending > 0 {
            match self.worker.recv_timeout(Duration::from_secs(5)) {
                Some(msg) => self.handle_message(msg),
                None => panic!("fetch did not complete"),
            }
        }
    }

    fn handle_message(&mut self, msg: FetchMessage) {
        match msg {
            FetchMessage::Prices { seq, items } => {
                self.pending = self.pending.saturating_sub(1);
                self.on_prices(seq, items);
            }
            FetchMessage::History { material, history } => {
                self.pending = self.pending.saturating_sub(1);
                self.on_history(&material, history);
            }
        }
    }

    fn on_prices(&mut self, seq: u64, items: Option<Vec<Item>>) {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "dropping stale price result");
            return;
        }

        let Some(items) = items else {
            self.refresh_failed = true;
            if self.load_state == LoadState::Loading {
                self.load_state = LoadState::Failed;
            }
            return;
        };

        info!(seq, count = items.len(), "prices updated");
        self.applied_seq = seq;
        self.items = items;
        self.refresh_failed = false;
        self.load_state = LoadState::Ready;
        self.last_update = Some(Local::now());

        let mut categories: Vec<String> = self.items.iter().map(|i| i.category.clone()).collect();
        categories.sort();
        categories.dedup();
        self.categories = categories;

        self.apply_filters();
    }

    fn on_history(&mut self, material: &str, history: Option<History>) {
        let Some(detail) = self.detail.as_mut().filter(|d| d.material == material) else {
            debug!(material, "history arrived for a closed detail view");
            return;
        };
        match history {
            Some(history) => detail.show_history(history),
            None => warn!(material, "no price history available"),
        }
    }

    /// The one place filters turn into a view; every trigger goes through here.
    pub fn apply_filters(&mut self) {
        let filtered = filter_items(&self.items, &self.filter);
        self.view = GridView::build(&filtered, !self.category_active());

        let count = self.view.len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    fn category_active(&self) -> bool {
        self.filter.selected_category.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Tab index of the current category: 0 = all, then `categories` order.
    pub fn category_index(&self) -> usize {
        match &self.filter.selected_category {
            Some(selected) => self
                .categories
                .iter()
                .position(|c| c == selected)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn select_category_tab(&mut self, index: usize) {
        let category = index.checked_sub(1).and_then(|i| self.categories.get(i)).cloned();
        self.set_category(category);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.selected_category = category;
        self.selected = 0;
        self.scroll = 0;
        self.apply_filters();
    }

    pub fn next_category(&mut self) {
        let tabs = self.categories.len() + 1;
        self.select_category_tab((self.category_index() + 1) % tabs);
    }

    pub fn prev_category(&mut self) {
        let tabs = self.categories.len() + 1;
        self.select_category_tab((self.category_index() + tabs - 1) % tabs);
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search_term = term.to_string();
        self.selected = 0;
        self.scroll = 0;
        self.apply_filters();
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = self.filter.search_term.clone();
        term.push(c);
        self.set_search(&term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = self.filter.search_term.clone();
        term.pop();
        self.set_search(&term);
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.view.cards().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let count = self.view.len();
        if count == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, count as isize - 1) as usize;
    }

    pub fn select_card(&mut self, index: usize) {
        if index < self.view.len() {
            self.selected = index;
        }
    }

    /// Show the known fields right away and request the item's history.
    pub fn open_detail(&mut self, material: &str) {
        let Some(item) = self.items.iter().find(|i| i.material == material) else {
            return;
        };
        self.detail = Some(Detail::new(item));
        self.input_mode = InputMode::Detail;
        self.pending += 1;
        self.worker.request_history(material);
    }

    pub fn open_selected_detail(&mut self) {
        if let Some(material) = self.selected_card().map(|c| c.material.clone()) {
            self.open_detail(&material);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.input_mode = InputMode::Normal;
    }
}
