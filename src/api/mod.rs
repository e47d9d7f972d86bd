//! HTTP client for the video platform API.
//!
//! [`ApiClient`] implements [`PageSource`] for every [`FeedQuery`]: it builds
//! the request, checks the status, and hands the body to [`parse_page`].
//! Parsing is kept free of I/O so the decoding rules can be tested without a
//! server.
//!
//! ## For contributors: adding a new collection endpoint
//!
//! 1. Add a variant to [`FeedQuery`] with its path, extra params and page size.
//! 2. If the endpoint wraps items differently, add a branch to [`parse_page`].
//! 3. Add a key binding in `input.rs` that opens it.

mod model;
mod query;

pub use model::{
    ChannelEntry, Comment, Envelope, FeedEntry, LikedVideo, OwnerRef, Profile, SearchResults,
    Subscriber, Subscription, Video,
};
pub use query::FeedQuery;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::feed::PageSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API host `{0}`")]
    InvalidHost(String),
}

impl FetchError {
    /// Build a [`FetchError::Status`], preferring the server's own message.
    fn from_status(status: StatusCode, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        FetchError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Client for one API host.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// `token`, when present, is sent as a bearer token with every request.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|_| FetchError::InvalidHost(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidHost(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Full URL for `query`, without the query string.
    ///
    /// Each path segment is percent-encoded, so ids and search text cannot
    /// add segments, a query string or a fragment.
    pub fn url_for(&self, query: &FeedQuery) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidHost(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(query.segments());
        Ok(url)
    }
}

#[async_trait]
impl PageSource for ApiClient {
    type Item = FeedEntry;
    type Query = FeedQuery;
    type Error = FetchError;

    async fn fetch_page(
        &self,
        query: &FeedQuery,
        page: u32,
        limit: u32,
    ) -> Result<Vec<FeedEntry>, FetchError> {
        let url = self.url_for(query)?;
        debug!(%url, page, limit, "GET");

        let mut request = self
            .http
            .get(url.as_str())
            .query(&[("page", page), ("limit", limit)])
            .query(&query.params());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "page request rejected");
            return Err(FetchError::from_status(status, &body));
        }

        parse_page(query, &body)
    }
}

/// Decode one page of `query`'s endpoint.
///
/// A `null` or missing `data` field is an empty page.  Search results list
/// matching channels before matching videos.
pub fn parse_page(query: &FeedQuery, body: &str) -> Result<Vec<FeedEntry>, FetchError> {
    let entries: Vec<FeedEntry> = match query {
        FeedQuery::Home | FeedQuery::WatchHistory | FeedQuery::Channel { .. } => {
            decode::<Vec<Video>>(body)?.into_iter().map(FeedEntry::Video).collect()
        }
        FeedQuery::LikedVideos => decode::<Vec<LikedVideo>>(body)?
            .into_iter()
            .map(|liked| FeedEntry::Video(liked.liked_videos))
            .collect(),
        FeedQuery::Comments { .. } => {
            decode::<Vec<Comment>>(body)?.into_iter().map(FeedEntry::Comment).collect()
        }
        FeedQuery::Search { .. } => {
            let results = decode::<SearchResults>(body)?;
            results
                .users
                .into_iter()
                .map(|p| FeedEntry::Channel(p.into()))
                .chain(results.videos.into_iter().map(FeedEntry::Video))
                .collect()
        }
        FeedQuery::Subscribers { .. } => decode::<Vec<Subscriber>>(body)?
            .into_iter()
            .map(|s| FeedEntry::Channel(s.into()))
            .collect(),
        FeedQuery::Subscriptions { .. } => decode::<Vec<Subscription>>(body)?
            .into_iter()
            .map(|s| FeedEntry::Channel(s.into()))
            .collect(),
    };
    Ok(entries)
}

fn decode<T: DeserializeOwned + Default>(body: &str) -> Result<T, FetchError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    Ok(envelope.data.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
