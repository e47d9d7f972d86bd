//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * The layout is a two-row split: a scrollable list on top and a one-line
//!   status bar at the bottom.
//! * Drawing records the list's visible height in [`App::viewport`]; the
//!   scroll sentinel needs it to know whether the end of the list is on
//!   screen.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::api::{ChannelEntry, Comment, FeedEntry, OwnerRef, Profile, Video};
use crate::app::App;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_feed_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable feed list.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect) {
    // Borders take one row each.
    app.viewport = area.height.saturating_sub(2) as usize;

    let now = Utc::now();
    let mut list_items: Vec<ListItem> = app
        .feed
        .items()
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, now)))
        .collect();

    if app.feed.is_in_flight() {
        list_items.push(ListItem::new(Span::styled(
            "  loading…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if app.can_go_back() {
        format!(" {} (⌫ back) ", app.query().title())
    } else {
        format!(" {} ", app.query().title())
    };

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn entry_line(entry: &FeedEntry, now: DateTime<Utc>) -> Line<'_> {
    let when = entry
        .created_at()
        .map(|t| relative_time(t, now))
        .unwrap_or_else(|| "-".into());
    let when = Span::styled(format!("{when:<14}"), Style::default().fg(Color::DarkGray));

    match entry {
        FeedEntry::Video(video) => video_line(when, video),
        FeedEntry::Comment(comment) => comment_line(when, comment),
        FeedEntry::Channel(channel) => channel_line(when, channel),
    }
}

fn video_line<'a>(when: Span<'a>, video: &'a Video) -> Line<'a> {
    let channel = video
        .owner
        .as_ref()
        .and_then(OwnerRef::handle)
        .unwrap_or_default();

    Line::from(vec![
        when,
        Span::raw(" "),
        Span::styled(
            format!("{:>8}", format_duration(video.duration)),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(" "),
        Span::styled(&video.title, Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(channel, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(format_views(video.views), Style::default().fg(Color::DarkGray)),
    ])
}

fn comment_line<'a>(when: Span<'a>, comment: &'a Comment) -> Line<'a> {
    let author = comment
        .created_by
        .as_ref()
        .map(display_name)
        .unwrap_or_else(|| "unknown".into());
    let author_style = if comment.is_my_comment {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Cyan)
    };

    Line::from(vec![
        when,
        Span::raw(" "),
        Span::styled(author, author_style),
        Span::raw(": "),
        Span::styled(&comment.content, Style::default().fg(Color::White)),
    ])
}

/// Full name if set, else `@username`, else the id.
fn display_name(profile: &Profile) -> String {
    profile
        .full_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| profile.handle())
        .unwrap_or_else(|| profile.id.clone())
}

fn channel_line<'a>(when: Span<'a>, channel: &'a ChannelEntry) -> Line<'a> {
    let profile = &channel.profile;
    let handle = profile.handle().unwrap_or_else(|| profile.id.clone());

    Line::from(vec![
        when,
        Span::raw(" "),
        Span::styled("channel ", Style::default().fg(Color::Magenta)),
        Span::styled(handle, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            profile.full_name.as_deref().unwrap_or_default(),
            Style::default().fg(Color::White),
        ),
    ])
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(text) = &app.search {
        let prompt = Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{text}▏")),
            Span::styled("  Enter: search  Esc: cancel", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);
        return;
    }

    let (message, color) = match &app.error {
        Some(e) => (format!("Error: {e} (r: retry)"), Color::Red),
        None => (app.status.clone(), Color::Yellow),
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(message, Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.feed.len()),
            Style::default().fg(Color::Green),
        ),
    ];
    if app.feed.is_exhausted() {
        spans.push(Span::styled(" · end of feed", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::raw(
        "  q: quit  ↑/↓: scroll  1/2/3: home/history/liked  /: search  o: channel  c: comments  \
         s/S: subscribers/subscriptions  R: reload",
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "just now", "5 minutes ago", "3 days ago", ...
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);

    const UNITS: [(i64, &str); 6] = [
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (7 * 24 * 3600, "week"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
    ];

    for (size, name) in UNITS {
        let n = secs / size;
        if n >= 1 {
            let plural = if n == 1 { "" } else { "s" };
            return format!("{n} {name}{plural} ago");
        }
    }
    "just now".into()
}

/// `m:ss`, or `h:mm:ss` for an hour or more.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn format_views(views: u64) -> String {
    match views {
        1 => "1 view".into(),
        n if n < 1_000 => format!("{n} views"),
        n if n < 1_000_000 => format!("{:.1}K views", n as f64 / 1_000.0),
        n => format!("{:.1}M views", n as f64 / 1_000_000.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::api::{FeedQuery, FetchError};
    use crate::app::tests::{channel, comment, video};
    use crate::feed::ScrollSentinel;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn loaded_app(entries: Vec<FeedEntry>) -> App {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        let req = app.poll_sentinel().unwrap();
        app.apply(req.ticket, Ok(entries));
        app
    }

    // -- formatting ----------------------------------------------------------

    #[test]
    fn relative_time_units() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now - Duration::seconds(59), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");
    }

    #[test]
    fn relative_time_in_future_is_just_now() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::hours(1), now), "just now");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(9.6), "0:10");
        assert_eq!(format_duration(125.0), "2:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn view_count_formatting() {
        assert_eq!(format_views(1), "1 view");
        assert_eq!(format_views(999), "999 views");
        assert_eq!(format_views(1_500), "1.5K views");
        assert_eq!(format_views(2_000_000), "2.0M views");
    }

    // -- rendering (smoke tests) ---------------------------------------------

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        let text = render(&mut app);
        assert!(text.contains("Home"));
    }

    #[test]
    fn draw_records_viewport_height() {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        render(&mut app);
        // 12 rows minus status bar minus two borders.
        assert_eq!(app.viewport, 9);
    }

    #[test]
    fn draw_shows_videos_and_count() {
        let mut app = loaded_app(vec![video("v1", "u1"), video("v2", "u1")]);
        app.select_first();

        let text = render(&mut app);
        assert!(text.contains("Video v1"));
        assert!(text.contains("@user-u1"));
        assert!(text.contains("1:15"));
        assert!(text.contains("2 items"), "status bar should show item count");
    }

    #[test]
    fn draw_shows_comments() {
        let mut app = loaded_app(vec![comment("c1")]);
        let text = render(&mut app);
        assert!(text.contains("Comment c1"));
    }

    #[test]
    fn draw_shows_channel_rows() {
        let mut app = loaded_app(vec![channel("u9")]);
        let text = render(&mut app);
        assert!(text.contains("channel @user-u9"));
    }

    #[test]
    fn draw_shows_search_prompt() {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        app.start_search();
        "rust".chars().for_each(|c| app.search_push(c));

        let text = render(&mut app);
        assert!(text.contains("Search: rust"));
        assert!(!text.contains("q: quit"));
    }

    #[test]
    fn draw_shows_idle_pause() {
        let mut app = loaded_app(vec![comment("c1")]);
        for _ in 0..crate::app::IDLE_PAGE_LIMIT {
            let req = app.poll_sentinel().unwrap();
            app.apply(req.ticket, Ok(vec![comment("c1")]));
        }
        assert!(render(&mut app).contains("No new items, paused"));
    }

    #[test]
    fn draw_shows_loading_row_while_in_flight() {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        app.poll_sentinel().unwrap();
        assert!(render(&mut app).contains("loading"));
    }

    #[test]
    fn draw_shows_error_and_end_of_feed() {
        let mut app = App::new(FeedQuery::Home, None, ScrollSentinel::default());
        let req = app.poll_sentinel().unwrap();
        app.apply(
            req.ticket,
            Err(FetchError::Status {
                status: 503,
                message: "down".into(),
            }),
        );
        assert!(render(&mut app).contains("Error: server returned 503: down"));

        app.retry();
        let req = app.poll_sentinel().unwrap();
        app.apply(req.ticket, Ok(vec![]));
        assert!(render(&mut app).contains("end of feed"));
    }
}
