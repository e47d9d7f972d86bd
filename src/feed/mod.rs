//! Source-agnostic paginated feeds.
//!
//! This module defines the [`PageSource`] trait that every collection
//! endpoint implements, the [`Identified`] trait that gives items their
//! de-duplication key, and re-exports the [`FeedLoader`] that ties them
//! together.  Nothing in here knows about HTTP, JSON or the terminal.
//!
//! ## For contributors: adding a new collection
//!
//! 1. Give the item type an [`Identified`] impl (usually the server id).
//! 2. Implement [`PageSource`] for whatever performs the retrieval.
//! 3. Hand a [`FeedLoader`] and the source to a [`crate::fetch::Fetcher`].
//!
//! The loader, the sentinel and the fetcher are all generic, so none of them
//! needs to change.

mod loader;
mod sentinel;

pub use loader::{Completion, FeedLoader, PageRequest, Ticket};
pub use sentinel::ScrollSentinel;

use std::hash::Hash;

use async_trait::async_trait;

/// An item that carries a stable identity key.
///
/// Two items with the same key are the same item as far as a feed is
/// concerned; the one retrieved first wins.
pub trait Identified {
    /// The identity key type (e.g. a server-assigned id string).
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

/// A remote collection that can be read one page at a time.
///
/// Pages are 1-based.  An empty page means the collection has no more items
/// for this query; that is the only exhaustion signal.
///
/// ## Implementing a new source
///
/// ```ignore
/// struct MySource { /* client, base url, ... */ }
///
/// #[async_trait]
/// impl PageSource for MySource {
///     type Item = MyItem;
///     type Query = MyQuery;
///     type Error = MyError;
///
///     async fn fetch_page(&self, query: &MyQuery, page: u32, limit: u32)
///         -> Result<Vec<MyItem>, MyError>
///     {
///         // Perform the request, then convert into items.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Send + 'static;
    /// Opaque filter parameters, forwarded unchanged on every request.
    type Query: Send + Sync + 'static;
    type Error: Send + 'static;

    /// Retrieve page `page` (1-based) holding at most `limit` items.
    async fn fetch_page(
        &self,
        query: &Self::Query,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Self::Item>, Self::Error>;
}
