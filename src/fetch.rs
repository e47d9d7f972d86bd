//! Background page retrieval.
//!
//! The UI thread owns every [`FeedLoader`](crate::feed::FeedLoader); it never
//! awaits anything.  Instead it hands each [`PageRequest`] to a [`Fetcher`],
//! which runs the retrieval as a task on the tokio runtime and sends a
//! [`PageResult`] back over an [`mpsc`] channel.  The main loop drains that
//! channel on every tick and applies the results.
//!
//! ## For contributors
//!
//! The fetcher never looks at results.  Whether a result is still wanted is
//! decided by the loader's ticket check when it is applied, so a page that
//! arrives after its feed was replaced is dropped there.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::feed::{PageRequest, PageSource};

/// A finished retrieval, sent from a fetch task to the UI thread.
pub struct PageResult<S: PageSource> {
    pub request: PageRequest<S::Query>,
    pub outcome: Result<Vec<S::Item>, S::Error>,
}

/// Runs page requests against one source.
pub struct Fetcher<S: PageSource> {
    runtime: Handle,
    source: Arc<S>,
    tx: mpsc::Sender<PageResult<S>>,
}

impl<S: PageSource> Fetcher<S> {
    /// Create a fetcher and the receiver its results arrive on.
    ///
    /// Once the receiver is dropped, finished tasks discard their results.
    pub fn new(runtime: Handle, source: S) -> (Self, mpsc::Receiver<PageResult<S>>) {
        let (tx, rx) = mpsc::channel();
        let fetcher = Self {
            runtime,
            source: Arc::new(source),
            tx,
        };
        (fetcher, rx)
    }

    /// Start retrieving `request` in the background.
    pub fn dispatch(&self, request: PageRequest<S::Query>) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let outcome = source
                .fetch_page(&request.query, request.page, request.limit)
                .await;
            // If the receiver is gone the view has been torn down.
            if tx.send(PageResult { request, outcome }).is_err() {
                debug!("result receiver closed; discarding page");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
