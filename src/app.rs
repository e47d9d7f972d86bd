//! Application state.
//!
//! [`App`] owns the feed currently on screen, the queries the user navigated
//! away from, list selection, and status text.  It never performs I/O: the
//! main loop feeds it finished pages through [`App::apply`] and asks it for
//! the next request through [`App::poll_sentinel`].

use std::num::NonZeroU32;

use ratatui::widgets::ListState;
use tracing::{info, warn};

use crate::api::{FeedEntry, FeedQuery, FetchError, Video};
use crate::feed::{Completion, FeedLoader, PageRequest, ScrollSentinel, Ticket};

pub type Feed = FeedLoader<FeedEntry, FeedQuery>;

/// Consecutive pages without a single new item before loading pauses.
///
/// An endpoint that ignores `page` returns the same items forever and is
/// never exhausted.
pub const IDLE_PAGE_LIMIT: u32 = 3;

pub struct App {
    /// Items of the feed on screen, in retrieval order.
    pub feed: Feed,
    /// Feeds to return to with `go_back`, most recent last.
    back: Vec<FeedQuery>,
    /// Page size applied to every feed instead of its default.
    page_size: Option<NonZeroU32>,
    sentinel: ScrollSentinel,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Rows the list showed on the last draw.
    pub viewport: usize,
    /// Set when a page failed; loading is paused until `retry`.
    pub error: Option<String>,
    /// Pages in a row that added nothing.
    idle_pages: u32,
    /// Text typed into the search prompt, while it is open.
    pub search: Option<String>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new(start: FeedQuery, page_size: Option<NonZeroU32>, sentinel: ScrollSentinel) -> Self {
        let size = page_size.unwrap_or_else(|| start.default_page_size());
        Self {
            feed: FeedLoader::new(start, size),
            back: Vec::new(),
            page_size,
            sentinel,
            list_state: ListState::default(),
            viewport: 0,
            error: None,
            idle_pages: 0,
            search: None,
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn query(&self) -> &FeedQuery {
        self.feed.query()
    }

    // -- loading -------------------------------------------------------------

    /// Next page to fetch, if the end of the list is in view.
    ///
    /// Returns `None` while a page is in flight, once the feed is exhausted,
    /// and after a failure or [`IDLE_PAGE_LIMIT`] idle pages until
    /// [`App::retry`] is called.
    pub fn poll_sentinel(&mut self) -> Option<PageRequest<FeedQuery>> {
        if self.error.is_some() || self.is_idle() {
            return None;
        }
        if !self
            .sentinel
            .is_visible(self.list_state.selected(), self.feed.len(), self.viewport)
        {
            return None;
        }

        let request = self.feed.request_next_page()?;
        self.status = format!("Loading page {}…", request.page);
        Some(request)
    }

    /// Apply a finished page to the current feed.
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<Vec<FeedEntry>, FetchError>) {
        match self.feed.complete(ticket, outcome) {
            Completion::Appended { added: 0, received } => {
                self.idle_pages += 1;
                if self.is_idle() {
                    warn!(
                        feed = %self.feed.query(),
                        next_page = self.feed.cursor(),
                        pages = self.idle_pages,
                        "no new items in consecutive pages, pausing"
                    );
                    self.status = "No new items, paused (r: load more)".into();
                } else {
                    self.status = format!("Fetched 0 new of {received} items");
                }
            }
            Completion::Appended { received, added } => {
                self.idle_pages = 0;
                self.status = if added == received {
                    format!("Fetched {added} items")
                } else {
                    format!("Fetched {added} new of {received} items")
                };
            }
            Completion::Exhausted => {
                self.status = "End of feed".into();
            }
            Completion::Failed(e) => {
                warn!(feed = %self.feed.query(), page = self.feed.cursor(), error = %e, "page failed");
                self.error = Some(e.to_string());
                self.status = "Failed to load".into();
            }
            Completion::Stale => {}
        }
    }

    /// Loading is paused because recent pages brought nothing new.
    pub fn is_idle(&self) -> bool {
        self.idle_pages >= IDLE_PAGE_LIMIT
    }

    /// Resume loading after a failure or a pause for idle pages.
    pub fn retry(&mut self) {
        if self.error.take().is_some() {
            self.status = "Retrying…".into();
        } else if self.is_idle() {
            self.idle_pages = 0;
            self.status = "Loading more…".into();
        }
    }

    /// Throw away the current feed and load it again from page 1.
    pub fn reload(&mut self) {
        let query = self.feed.query().clone();
        info!(feed = %query, "reloading feed");
        self.restart(query, "Reloading…");
    }

    /// Reset the feed on screen to page 1 of `query`.
    fn restart(&mut self, query: FeedQuery, status: &str) {
        self.feed.reset(query);
        self.list_state = ListState::default();
        self.error = None;
        self.idle_pages = 0;
        self.status = status.into();
    }

    // -- search prompt -------------------------------------------------------

    /// Open the search prompt, pre-filled with the current search if any.
    pub fn start_search(&mut self) {
        let text = match self.feed.query() {
            FeedQuery::Search { text } => text.clone(),
            _ => String::new(),
        };
        self.search = Some(text);
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn search_push(&mut self, c: char) {
        if let Some(text) = &mut self.search {
            text.push(c);
        }
    }

    pub fn search_pop(&mut self) {
        if let Some(text) = &mut self.search {
            text.pop();
        }
    }

    pub fn cancel_search(&mut self) {
        self.search = None;
    }

    /// Run the typed search.
    ///
    /// From a search feed the loader is reset with the new text, so refining
    /// a search does not grow the back stack.  Blank text closes the prompt.
    pub fn submit_search(&mut self) {
        let Some(text) = self.search.take() else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let query = FeedQuery::Search { text: text.to_string() };
        if matches!(self.feed.query(), FeedQuery::Search { .. }) {
            info!(feed = %query, "new search");
            self.restart(query, "Searching…");
        } else {
            self.open(query);
        }
    }

    // -- navigation between feeds -------------------------------------------

    /// Replace the feed on screen with a fresh one for `query`.
    ///
    /// Opening the feed already on screen does nothing.
    pub fn open(&mut self, query: FeedQuery) {
        if &query == self.feed.query() {
            return;
        }
        let previous = self.replace_feed(query);
        self.back.push(previous);
    }

    /// Return to the previous feed, starting it over.
    pub fn go_back(&mut self) {
        if let Some(query) = self.back.pop() {
            self.replace_feed(query);
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    fn replace_feed(&mut self, query: FeedQuery) -> FeedQuery {
        info!(from = %self.feed.query(), to = %query, "switching feed");
        let size = self.page_size.unwrap_or_else(|| query.default_page_size());
        let previous = std::mem::replace(&mut self.feed, FeedLoader::new(query, size));
        self.list_state = ListState::default();
        self.error = None;
        self.idle_pages = 0;
        self.status = "Loading…".into();
        previous.query().clone()
    }

    pub fn selected(&self) -> Option<&FeedEntry> {
        self.list_state.selected().and_then(|i| self.feed.items().get(i))
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.selected().and_then(FeedEntry::as_video)
    }

    fn selected_channel(&self) -> Option<String> {
        self.selected()
            .and_then(FeedEntry::channel_id)
            .map(str::to_string)
    }

    /// Open the uploads of the selected row's channel.
    pub fn open_selected_channel(&mut self) {
        match self.selected_channel() {
            Some(id) => self.open(FeedQuery::Channel { id }),
            None => self.status = "No channel for this entry".into(),
        }
    }

    /// Open the subscribers of the selected row's channel.
    pub fn open_selected_subscribers(&mut self) {
        match self.selected_channel() {
            Some(channel) => self.open(FeedQuery::Subscribers { channel }),
            None => self.status = "No channel for this entry".into(),
        }
    }

    /// Open the channels the selected row's channel subscribes to.
    pub fn open_selected_subscriptions(&mut self) {
        match self.selected_channel() {
            Some(user) => self.open(FeedQuery::Subscriptions { user }),
            None => self.status = "No channel for this entry".into(),
        }
    }

    /// Open the comments of the selected video.
    pub fn open_selected_comments(&mut self) {
        match self.selected_video().map(|v| v.id.clone()) {
            Some(video) => self.open(FeedQuery::Comments { video }),
            None => self.status = "Select a video first".into(),
        }
    }

    // -- list selection ------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.feed.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.feed.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.feed.is_empty() {
            self.list_state.select(Some(self.feed.len() - 1));
        }
    }
}
