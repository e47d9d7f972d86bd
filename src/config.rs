//! Command-line configuration.
//!
//! Flags are parsed with [`clap`]; the host and token can also come from the
//! environment so they do not have to appear in shell history.  [`Args`] is
//! validated into a [`Config`] before anything else starts.

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::api::FeedQuery;

const DEFAULT_HOST: &str = "http://localhost:8000";
const LOG_FILE_NAME: &str = "livescroll-tube.log";

#[derive(Debug, Parser)]
#[command(version, about = "Browse a video platform's feeds in the terminal")]
pub struct Args {
    /// Base URL of the API server.
    #[arg(long, env = "LIVESCROLL_TUBE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Access token sent as a bearer token.
    #[arg(long, env = "LIVESCROLL_TUBE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Feed to open: home, history, liked, channel:<id>, comments:<video-id>,
    /// search:<text>, subscribers:<id> or subscriptions:<id>.
    #[arg(long, default_value = "home")]
    pub feed: FeedQuery,

    /// Items per page for every feed (defaults differ per feed).
    #[arg(long)]
    pub page_size: Option<NonZeroU32>,

    /// Load the next page when the selection is this many rows from the end.
    #[arg(long, default_value_t = 2)]
    pub prefetch: usize,

    /// Where to write logs.  The terminal itself is used by the UI.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub token: Option<String>,
    pub feed: FeedQuery,
    pub page_size: Option<NonZeroU32>,
    pub prefetch: usize,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let host = args.host.trim().to_string();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            bail!("--host must be an http:// or https:// URL, got `{host}`");
        }

        let token = args.token.filter(|t| !t.trim().is_empty());
        let log_file = args.log_file.unwrap_or_else(default_log_file);

        Ok(Self {
            host,
            token,
            feed: args.feed,
            page_size: args.page_size,
            prefetch: args.prefetch,
            log_file,
        })
    }
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("livescroll-tube").chain(argv.iter().copied()))?;
        Config::from_args(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.feed, FeedQuery::Home);
        assert_eq!(config.prefetch, 2);
        assert!(config.page_size.is_none());
        assert!(config.log_file.ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--host",
            "https://tube.example.com",
            "--token",
            "abc",
            "--feed",
            "channel:u1",
            "--page-size",
            "4",
            "--prefetch",
            "0",
            "--log-file",
            "/tmp/x.log",
        ])
        .unwrap();

        assert_eq!(config.host, "https://tube.example.com");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.feed, FeedQuery::Channel { id: "u1".into() });
        assert_eq!(config.page_size.map(NonZeroU32::get), Some(4));
        assert_eq!(config.prefetch, 0);
        assert_eq!(config.log_file, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn search_feed_from_command_line() {
        let config = parse(&["--feed", "search:lofi beats"]).unwrap();
        assert_eq!(config.feed, FeedQuery::Search { text: "lofi beats".into() });
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(parse(&["--page-size", "0"]).is_err());
    }

    #[test]
    fn malformed_feed_is_rejected() {
        assert!(parse(&["--feed", "channel"]).is_err());
        assert!(parse(&["--feed", "trending"]).is_err());
    }

    #[test]
    fn non_http_host_is_rejected() {
        let err = parse(&["--host", "localhost:8000"]).unwrap_err();
        assert!(err.to_string().contains("--host"));
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = parse(&["--token", "  "]).unwrap();
        assert!(config.token.is_none());
    }
}
