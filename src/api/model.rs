//! Response types of the video platform API.
//!
//! Every endpoint wraps its payload in an [`Envelope`]; collection endpoints
//! put a JSON array in `data`.  Items are converted into [`FeedEntry`] values
//! so the feed and UI code stays endpoint-agnostic.
//!
//! ## For contributors
//!
//! The server is a MongoDB-backed service, so ids arrive as `_id` and field
//! names are camelCase.  Fields the client can live without are optional or
//! defaulted; an item that lacks its `_id` is a decode error, because
//! de-duplication depends on it.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::feed::Identified;

/// Standard response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// `null` and a missing field are both treated as "no data".
    #[serde(default)]
    pub data: Option<T>,
}

/// A channel (user) as embedded in videos, comments and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Profile {
    /// `@username`, or nothing for a profile without one.
    pub fn handle(&self) -> Option<String> {
        (!self.username.is_empty()).then(|| format!("@{}", self.username))
    }
}

/// Video owner: populated by most endpoints, a bare id by some.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Profile(Profile),
    Id(String),
}

impl OwnerRef {
    pub fn id(&self) -> &str {
        match self {
            OwnerRef::Profile(p) => &p.id,
            OwnerRef::Id(id) => id,
        }
    }

    /// `@username` when known, otherwise nothing.
    pub fn handle(&self) -> Option<String> {
        match self {
            OwnerRef::Profile(p) => p.handle(),
            OwnerRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Length in seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Liked-video pages wrap each video in one of these.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub liked_videos: Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_by: Option<Profile>,
    #[serde(default)]
    pub is_my_comment: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One subscription record of a channel's subscriber list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub subscribers: Profile,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One subscription record of a user's subscription list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub channel: Profile,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Search returns matching channels and videos side by side.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub users: Vec<Profile>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// A channel listed as a row of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub profile: Profile,
    /// When the subscription started, for subscriber and subscription lists.
    pub subscribed_at: Option<DateTime<Utc>>,
}

impl From<Profile> for ChannelEntry {
    fn from(profile: Profile) -> Self {
        Self {
            profile,
            subscribed_at: None,
        }
    }
}

impl From<Subscriber> for ChannelEntry {
    fn from(s: Subscriber) -> Self {
        Self {
            profile: s.subscribers,
            subscribed_at: s.created_at,
        }
    }
}

impl From<Subscription> for ChannelEntry {
    fn from(s: Subscription) -> Self {
        Self {
            profile: s.channel,
            subscribed_at: s.created_at,
        }
    }
}

/// A single row of any feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEntry {
    Video(Video),
    Comment(Comment),
    Channel(ChannelEntry),
}

impl FeedEntry {
    pub fn id(&self) -> &str {
        match self {
            FeedEntry::Video(v) => &v.id,
            FeedEntry::Comment(c) => &c.id,
            FeedEntry::Channel(c) => &c.profile.id,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            FeedEntry::Video(v) => v.created_at,
            FeedEntry::Comment(c) => c.created_at,
            FeedEntry::Channel(c) => c.subscribed_at,
        }
    }

    pub fn as_video(&self) -> Option<&Video> {
        match self {
            FeedEntry::Video(v) => Some(v),
            _ => None,
        }
    }

    /// The channel this row belongs to: a video's owner, a comment's author,
    /// or the listed channel itself.
    pub fn channel_id(&self) -> Option<&str> {
        let id = match self {
            FeedEntry::Video(v) => v.owner.as_ref().map(OwnerRef::id),
            FeedEntry::Comment(c) => c.created_by.as_ref().map(|p| p.id.as_str()),
            FeedEntry::Channel(c) => Some(c.profile.id.as_str()),
        };
        id.filter(|id| !id.is_empty())
    }
}

impl Identified for FeedEntry {
    type Key = String;

    fn key(&self) -> String {
        self.id().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
