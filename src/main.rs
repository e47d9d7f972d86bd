//! livescroll-tube: browse a video platform's feeds in the terminal with
//! infinite scroll.
//!
//! ## Architecture overview
//!
//! ```text
//!                 PageRequest              PageResult
//! ┌──────────┐  ─────────────► ┌──────────┐ ─────────► ┌──────────┐  draw()  ┌──────────┐
//! │  app.rs  │                 │ fetch.rs │  (channel) │  app.rs  │ ───────► │  ui.rs   │
//! │ sentinel │                 │ (tokio)  │            │ (state)  │          │ (render) │
//! └──────────┘                 └──────────┘            └──────────┘          └──────────┘
//!                                   │                       ▲
//!                              api/ (HTTP)                  │ handle_key_event()
//!                                                      ┌──────────┐
//!                                                      │ input.rs │
//!                                                      └──────────┘
//! ```
//!
//! * **`feed/`**: the generic, de-duplicating page loader, the scroll
//!   sentinel, and the `PageSource` trait.
//! * **`api/`**: `PageSource` for the platform's REST API and its models.
//! * **`fetch`**: runs page requests on the tokio runtime.
//! * **`app`**: owns all application state (current feed, selection, etc.).
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`** / **`logging`**: command line and log file setup.
//! * **`main`**: wires everything together and runs the event loop.

mod api;
mod app;
mod config;
mod feed;
mod fetch;
mod input;
mod logging;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use api::ApiClient;
use app::App;
use config::{Args, Config};
use feed::ScrollSentinel;
use fetch::Fetcher;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    logging::init(&config.log_file)?;
    info!(host = %config.host, feed = %config.feed, "starting");

    install_panic_hook();

    // -- background fetching --------------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let client = ApiClient::new(&config.host, config.token.clone()).context("building HTTP client")?;
    let (fetcher, rx) = Fetcher::new(runtime.handle().clone(), client);

    // -- terminal setup (Drop restores on exit or panic) ----------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(
        config.feed.clone(),
        config.page_size,
        ScrollSentinel::new(config.prefetch),
    );

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply finished pages.
    //   2. Request the next page if the end of the list is in view.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(result) = rx.try_recv() {
            app.apply(result.request.ticket, result.outcome);
        }

        if let Some(request) = app.poll_sentinel() {
            fetcher.dispatch(request);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("exiting");
    // Outstanding requests are abandoned; their results have nowhere to go.
    runtime.shutdown_background();
    Ok(())
}
