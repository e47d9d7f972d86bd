//! Incremental page loading with de-duplication.
//!
//! A [`FeedLoader`] owns the accumulated items of one feed plus the page
//! cursor and the two flags that guard retrieval.  Retrieval itself happens
//! elsewhere: [`FeedLoader::request_next_page`] hands out a [`PageRequest`],
//! and whoever performed it reports back through [`FeedLoader::complete`].
//!
//! ## State transitions
//!
//! ```text
//!            request_next_page()            complete(Ok(non-empty))
//!   idle ───────────────────────► in flight ─────────────────────► idle (cursor + 1)
//!    ▲                               │  │
//!    │        complete(Err(_))       │  │ complete(Ok(empty))
//!    └───────────────────────────────┘  └─────────────────────► exhausted
//! ```
//!
//! `reset()` returns to `idle` from anywhere.  Every loader and every reset
//! draws a fresh generation number, and a completion whose [`Ticket`] carries
//! a different generation is reported as [`Completion::Stale`] and dropped.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use super::Identified;

/// Process-wide so that a replaced loader can never accept a ticket that was
/// issued by the loader it replaced.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Receipt for an issued page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Everything a fetcher needs to retrieve one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<Q> {
    /// Must be passed back to [`FeedLoader::complete`].
    pub ticket: Ticket,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// The loader's filter parameters, unchanged.
    pub query: Q,
}

/// What applying a finished retrieval did to the feed.
#[derive(Debug, PartialEq, Eq)]
pub enum Completion<E> {
    /// A non-empty page was consumed.  `added` may be smaller than
    /// `received` (or zero) when the page overlapped items already held.
    Appended { received: usize, added: usize },
    /// The page was empty; the feed will not request again until reset.
    Exhausted,
    /// The retrieval failed.  State is unchanged apart from clearing the
    /// in-flight flag.
    Failed(E),
    /// The ticket belongs to a discarded or reset feed; nothing was applied.
    Stale,
}

struct FeedState<T: Identified> {
    items: Vec<T>,
    seen: HashSet<T::Key>,
    cursor: u32,
    page_size: NonZeroU32,
    exhausted: bool,
    in_flight: bool,
}

impl<T: Identified> FeedState<T> {
    fn new(page_size: NonZeroU32) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: 1,
            page_size,
            exhausted: false,
            in_flight: false,
        }
    }

    /// Append the items of `page` whose keys are new, in page order.
    /// Returns how many were appended.
    fn merge(&mut self, page: Vec<T>) -> usize {
        let before = self.items.len();
        for item in page {
            if self.seen.insert(item.key()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }
}

/// Paginated, de-duplicated feed of `T` filtered by `Q`.
pub struct FeedLoader<T: Identified, Q> {
    query: Q,
    state: FeedState<T>,
    generation: u64,
}

impl<T: Identified, Q: Clone> FeedLoader<T, Q> {
    pub fn new(query: Q, page_size: NonZeroU32) -> Self {
        Self {
            query,
            state: FeedState::new(page_size),
            generation: next_generation(),
        }
    }

    /// Start retrieving the page at the cursor.
    ///
    /// Returns `None`, and changes nothing, when the feed is exhausted or a
    /// retrieval is already outstanding.  Scroll observers may therefore call
    /// this as often as they like.
    pub fn request_next_page(&mut self) -> Option<PageRequest<Q>> {
        if self.state.exhausted || self.state.in_flight {
            return None;
        }

        self.state.in_flight = true;
        debug!(
            page = self.state.cursor,
            limit = self.state.page_size.get(),
            "requesting page"
        );

        Some(PageRequest {
            ticket: Ticket {
                generation: self.generation,
            },
            page: self.state.cursor,
            limit: self.state.page_size.get(),
            query: self.query.clone(),
        })
    }

    /// Apply the outcome of the retrieval identified by `ticket`.
    pub fn complete<E>(&mut self, ticket: Ticket, outcome: Result<Vec<T>, E>) -> Completion<E> {
        if ticket.generation != self.generation || !self.state.in_flight {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale page"
            );
            return Completion::Stale;
        }

        self.state.in_flight = false;

        match outcome {
            Err(e) => Completion::Failed(e),
            Ok(page) if page.is_empty() => {
                self.state.exhausted = true;
                info!(
                    page = self.state.cursor,
                    items = self.state.items.len(),
                    "feed exhausted"
                );
                Completion::Exhausted
            }
            Ok(page) => {
                let received = page.len();
                let added = self.state.merge(page);
                // A fully overlapping page still counts as consumed.
                self.state.cursor += 1;
                debug!(received, added, next = self.state.cursor, "page merged");
                Completion::Appended { received, added }
            }
        }
    }

    /// Discard everything and start over with `query`.
    ///
    /// Any retrieval still outstanding becomes stale.
    pub fn reset(&mut self, query: Q) {
        self.query = query;
        self.state = FeedState::new(self.state.page_size);
        self.generation = next_generation();
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Next page number that will be requested.
    pub fn cursor(&self) -> u32 {
        self.state.cursor
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.state.page_size
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.in_flight
    }

    pub fn query(&self) -> &Q {
        &self.query
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
