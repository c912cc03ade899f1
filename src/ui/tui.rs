// src/ui/tui.rs
//! Terminal lifecycle and the event loop.

use std::{
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tracing::info;

use crate::{
    app::App,
    audio::{MediaResource, RodioMedia},
    config::Config,
};

/// Open `source`, take over the terminal and run until the user quits.
pub fn run(source: PathBuf, config: &Config) -> Result<()> {
    info!("opening {}", source.display());
    let media = RodioMedia::open(
        source,
        config.time_update_interval(),
        config.initial_volume,
    );
    let mut app = App::new(media, config);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, config.time_update_interval());

    // Restore the terminal even when the loop failed
    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("bye");
    result
}

/// Raw mode plus alternate screen. A failure after raw mode is on turns it
/// back off before the error is returned.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.clear()?;
            Ok(terminal)
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
}

/// Run `step`; if it fails, run `undo` and pass the error on.
fn undo_on_error<T>(step: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    let result = step();
    if result.is_err() {
        undo();
    }
    result
}

fn event_loop<B: Backend, M: MediaResource>(
    terminal: &mut Terminal<B>,
    app: &mut App<M>,
    idle: Duration,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.process_media_events(now);
        app.on_tick(now);
        terminal.draw(|f| app.draw(f, now))?;

        // Sleep until the next equalizer tick, or the idle interval while paused
        let timeout = app.next_wakeup(Instant::now(), idle);
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if app.on_key(key) {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    #[test]
    fn failed_setup_is_undone() {
        let undone = Cell::new(false);
        let result: Result<()> = undo_on_error(|| Err(anyhow!("no tty")), || undone.set(true));
        assert!(result.is_err());
        assert!(undone.get());
    }

    #[test]
    fn successful_setup_is_kept() {
        let undone = Cell::new(false);
        let result = undo_on_error(|| Ok(7), || undone.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(!undone.get());
    }
}
