//! Which collection a feed reads from.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Filter parameters for a feed.  Each variant selects one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedQuery {
    Home,
    WatchHistory,
    LikedVideos,
    /// Videos uploaded by channel `id`.
    Channel { id: String },
    /// Comments on video `video`.
    Comments { video: String },
    /// Channels and videos matching `text`.
    Search { text: String },
    /// Users subscribed to `channel`.
    Subscribers { channel: String },
    /// Channels `user` is subscribed to.
    Subscriptions { user: String },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseQueryError {
    #[error(
        "unknown feed `{0}` (expected home, history, liked, channel:<id>, comments:<video-id>, \
         search:<text>, subscribers:<id> or subscriptions:<id>)"
    )]
    Unknown(String),
    #[error("feed `{0}` needs an argument, e.g. `{0}:<id>`")]
    MissingId(&'static str),
}

impl FeedQuery {
    /// Endpoint path segments relative to the API host.
    ///
    /// Ids and search text are single segments; the client percent-encodes
    /// them.  A trailing empty segment keeps the endpoint's trailing slash.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            FeedQuery::Home => vec!["api", "video", ""],
            FeedQuery::WatchHistory => vec!["api", "user", "watch-history"],
            FeedQuery::LikedVideos => vec!["api", "like", "videos"],
            FeedQuery::Channel { .. } => vec!["api", "video", "channel"],
            FeedQuery::Comments { video } => vec!["api", "comments", video.as_str()],
            FeedQuery::Search { text } => vec!["api", "user", "search", text.as_str()],
            FeedQuery::Subscribers { channel } => vec!["api", "subscription", "u", channel.as_str(), ""],
            FeedQuery::Subscriptions { user } => vec!["api", "subscription", "c", user.as_str(), ""],
        }
    }

    /// Query-string parameters besides `page` and `limit`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            FeedQuery::Channel { id } => vec![("channelId", id.clone())],
            _ => Vec::new(),
        }
    }

    pub fn default_page_size(&self) -> NonZeroU32 {
        let n = match self {
            FeedQuery::Home | FeedQuery::LikedVideos | FeedQuery::Channel { .. } => 6,
            FeedQuery::WatchHistory
            | FeedQuery::Comments { .. }
            | FeedQuery::Search { .. }
            | FeedQuery::Subscribers { .. }
            | FeedQuery::Subscriptions { .. } => 10,
        };
        NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
    }

    /// Heading shown above the list.
    pub fn title(&self) -> String {
        match self {
            FeedQuery::Home => "Home".to_string(),
            FeedQuery::WatchHistory => "Watch history".to_string(),
            FeedQuery::LikedVideos => "Liked videos".to_string(),
            FeedQuery::Channel { id } => format!("Channel {id}"),
            FeedQuery::Comments { video } => format!("Comments on {video}"),
            FeedQuery::Search { text } => format!("Search \"{text}\""),
            FeedQuery::Subscribers { channel } => format!("Subscribers of {channel}"),
            FeedQuery::Subscriptions { user } => format!("Subscriptions of {user}"),
        }
    }
}

impl fmt::Display for FeedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedQuery::Home => f.write_str("home"),
            FeedQuery::WatchHistory => f.write_str("history"),
            FeedQuery::LikedVideos => f.write_str("liked"),
            FeedQuery::Channel { id } => write!(f, "channel:{id}"),
            FeedQuery::Comments { video } => write!(f, "comments:{video}"),
            FeedQuery::Search { text } => write!(f, "search:{text}"),
            FeedQuery::Subscribers { channel } => write!(f, "subscribers:{channel}"),
            FeedQuery::Subscriptions { user } => write!(f, "subscriptions:{user}"),
        }
    }
}

impl FromStr for FeedQuery {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg.trim()).filter(|arg| !arg.is_empty())),
            None => (s, None),
        };

        match (kind.trim(), arg.map(str::to_string)) {
            ("home", None) => Ok(FeedQuery::Home),
            ("history", None) => Ok(FeedQuery::WatchHistory),
            ("liked", None) => Ok(FeedQuery::LikedVideos),
            ("channel", Some(id)) => Ok(FeedQuery::Channel { id }),
            ("comments", Some(video)) => Ok(FeedQuery::Comments { video }),
            ("search", Some(text)) => Ok(FeedQuery::Search { text }),
            ("subscribers", Some(channel)) => Ok(FeedQuery::Subscribers { channel }),
            ("subscriptions", Some(user)) => Ok(FeedQuery::Subscriptions { user }),
            ("channel", None) => Err(ParseQueryError::MissingId("channel")),
            ("comments", None) => Err(ParseQueryError::MissingId("comments")),
            ("search", None) => Err(ParseQueryError::MissingId("search")),
            ("subscribers", None) => Err(ParseQueryError::MissingId("subscribers")),
            ("subscriptions", None) => Err(ParseQueryError::MissingId("subscriptions")),
            _ => Err(ParseQueryError::Unknown(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_line_syntax() {
        assert_eq!("home".parse::<FeedQuery>(), Ok(FeedQuery::Home));
        assert_eq!("history".parse::<FeedQuery>(), Ok(FeedQuery::WatchHistory));
        assert_eq!("liked".parse::<FeedQuery>(), Ok(FeedQuery::LikedVideos));
        assert_eq!("channel:u1".parse::<FeedQuery>(), Ok(FeedQuery::Channel { id: "u1".into() }));
        assert_eq!(
            "comments:v1".parse::<FeedQuery>(),
            Ok(FeedQuery::Comments { video: "v1".into() })
        );
        assert_eq!(
            "subscribers:u1".parse::<FeedQuery>(),
            Ok(FeedQuery::Subscribers { channel: "u1".into() })
        );
        assert_eq!(
            "subscriptions:u1".parse::<FeedQuery>(),
            Ok(FeedQuery::Subscriptions { user: "u1".into() })
        );
    }

    #[test]
    fn search_text_keeps_colons_and_inner_spaces() {
        assert_eq!(
            "search: rust: the book ".parse::<FeedQuery>(),
            Ok(FeedQuery::Search { text: "rust: the book".into() })
        );
    }

    #[test]
    fn rejects_bad_queries() {
        assert_eq!("channel".parse::<FeedQuery>(), Err(ParseQueryError::MissingId("channel")));
        assert_eq!("comments:".parse::<FeedQuery>(), Err(ParseQueryError::MissingId("comments")));
        assert_eq!("search:  ".parse::<FeedQuery>(), Err(ParseQueryError::MissingId("search")));
        assert_eq!("trending".parse::<FeedQuery>(), Err(ParseQueryError::Unknown("trending".into())));
        assert!("home:x".parse::<FeedQuery>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for q in [
            FeedQuery::Home,
            FeedQuery::WatchHistory,
            FeedQuery::LikedVideos,
            FeedQuery::Channel { id: "abc".into() },
            FeedQuery::Comments { video: "v9".into() },
            FeedQuery::Search { text: "cat videos".into() },
            FeedQuery::Subscribers { channel: "u1".into() },
            FeedQuery::Subscriptions { user: "u2".into() },
        ] {
            assert_eq!(q.to_string().parse::<FeedQuery>(), Ok(q));
        }
    }

    #[test]
    fn endpoints_and_params() {
        assert_eq!(FeedQuery::Home.segments(), ["api", "video", ""]);
        assert_eq!(FeedQuery::WatchHistory.segments(), ["api", "user", "watch-history"]);
        assert_eq!(FeedQuery::LikedVideos.segments(), ["api", "like", "videos"]);

        let channel = FeedQuery::Channel { id: "u1".into() };
        assert_eq!(channel.segments(), ["api", "video", "channel"]);
        assert_eq!(channel.params(), vec![("channelId", "u1".to_string())]);

        let comments = FeedQuery::Comments { video: "v1".into() };
        assert_eq!(comments.segments(), ["api", "comments", "v1"]);
        assert!(comments.params().is_empty());

        let search = FeedQuery::Search { text: "a/b".into() };
        assert_eq!(search.segments(), ["api", "user", "search", "a/b"]);

        let subscribers = FeedQuery::Subscribers { channel: "u1".into() };
        assert_eq!(subscribers.segments(), ["api", "subscription", "u", "u1", ""]);
        let subscriptions = FeedQuery::Subscriptions { user: "u1".into() };
        assert_eq!(subscriptions.segments(), ["api", "subscription", "c", "u1", ""]);
    }

    #[test]
    fn default_page_sizes() {
        assert_eq!(FeedQuery::Home.default_page_size().get(), 6);
        assert_eq!(FeedQuery::WatchHistory.default_page_size().get(), 10);
        assert_eq!(FeedQuery::LikedVideos.default_page_size().get(), 6);
        assert_eq!(FeedQuery::Comments { video: "v".into() }.default_page_size().get(), 10);
        assert_eq!(FeedQuery::Search { text: "x".into() }.default_page_size().get(), 10);
    }
}
