//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `draw_status_bar` in [`crate::ui`].
//!
//! While the search prompt is open every key edits the prompt instead.
//!
//! Keys never start a network request themselves.  Moving the selection
//! towards the end of the list brings the scroll sentinel into view, and the
//! main loop issues the request on its next tick.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::api::FeedQuery;
use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.is_searching() {
        handle_search_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('1') => app.open(FeedQuery::Home),
        KeyCode::Char('2') => app.open(FeedQuery::WatchHistory),
        KeyCode::Char('3') => app.open(FeedQuery::LikedVideos),
        KeyCode::Char('o') => app.open_selected_channel(),
        KeyCode::Char('c') => app.open_selected_comments(),
        KeyCode::Char('s') => app.open_selected_subscribers(),
        KeyCode::Char('S') => app.open_selected_subscriptions(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Backspace => app.go_back(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('R') => app.reload(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    use crate::app::tests::{channel, video};
    use crate::api::FetchError;
    use crate::feed::ScrollSentinel;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        App::new(FeedQuery::Home, None, ScrollSentinel::default())
    }

    #[test]
    fn quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert!(a.quit);

        let mut b = app();
        press(&mut b, KeyCode::Esc);
        assert!(b.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut a = app();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut a, release);
        assert!(!a.quit);
    }

    #[test]
    fn number_keys_switch_feeds() {
        let mut a = app();
        press(&mut a, KeyCode::Char('2'));
        assert_eq!(a.query(), &FeedQuery::WatchHistory);
        press(&mut a, KeyCode::Char('3'));
        assert_eq!(a.query(), &FeedQuery::LikedVideos);
        press(&mut a, KeyCode::Backspace);
        assert_eq!(a.query(), &FeedQuery::WatchHistory);
    }

    #[test]
    fn selection_keys_and_channel() {
        let mut a = app();
        let req = a.poll_sentinel().unwrap();
        a.apply(req.ticket, Ok(vec![video("v1", "u1"), video("v2", "u2")]));

        press(&mut a, KeyCode::Char('j'));
        press(&mut a, KeyCode::Char('j'));
        assert_eq!(a.list_state.selected(), Some(1));

        press(&mut a, KeyCode::Char('o'));
        assert_eq!(a.query(), &FeedQuery::Channel { id: "u2".into() });
    }

    #[test]
    fn retry_key_clears_error() {
        let mut a = app();
        let req = a.poll_sentinel().unwrap();
        a.apply(
            req.ticket,
            Err(FetchError::Status {
                status: 500,
                message: "x".into(),
            }),
        );

        press(&mut a, KeyCode::Char('r'));
        assert!(a.error.is_none());
        assert!(a.poll_sentinel().is_some());
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    #[test]
    fn slash_searches_and_prompt_swallows_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('/'));
        assert!(a.is_searching());

        // Letters that are bindings elsewhere go into the prompt.
        type_text(&mut a, "qrs");
        press(&mut a, KeyCode::Backspace);
        assert!(!a.quit);
        assert_eq!(a.search.as_deref(), Some("qr"));

        press(&mut a, KeyCode::Enter);
        assert_eq!(a.query(), &FeedQuery::Search { text: "qr".into() });
        assert!(!a.is_searching());
    }

    #[test]
    fn escape_closes_prompt_without_quitting() {
        let mut a = app();
        press(&mut a, KeyCode::Char('/'));
        type_text(&mut a, "x");
        press(&mut a, KeyCode::Esc);

        assert!(!a.is_searching());
        assert!(!a.quit);
        assert_eq!(a.query(), &FeedQuery::Home);
    }

    #[test]
    fn subscriber_keys_use_selected_channel() {
        let mut a = app();
        let req = a.poll_sentinel().unwrap();
        a.apply(req.ticket, Ok(vec![channel("u7")]));
        press(&mut a, KeyCode::Char('j'));

        press(&mut a, KeyCode::Char('s'));
        assert_eq!(a.query(), &FeedQuery::Subscribers { channel: "u7".into() });

        press(&mut a, KeyCode::Backspace);
        let req = a.poll_sentinel().unwrap();
        a.apply(req.ticket, Ok(vec![video("v1", "u8")]));
        press(&mut a, KeyCode::Char('j'));
        press(&mut a, KeyCode::Char('S'));
        assert_eq!(a.query(), &FeedQuery::Subscriptions { user: "u8".into() });
    }
}
