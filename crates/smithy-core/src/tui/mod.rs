//! Full-screen terminal form using ratatui
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod app;
mod ui;

pub use app::{Action, App, Focus, Notice, NoticeLevel};

use crate::form::ForgeForm;
use crate::templates::{write_output, Forge};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

/// Run the TUI application, returning the last file written (if any)
pub async fn run(forge: &Forge) -> Result<Option<PathBuf>> {
    if let Some(warning) = forge.formatter().check_version() {
        tracing::warn!("{}", warning);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ForgeForm::new());
    let result = event_loop(&mut terminal, &mut app, forge).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(app.saved().cloned())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    forge: &Forge,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Forge => perform(app, forge, false).await,
            Action::Save => perform(app, forge, true).await,
        }
    }
}

/// Forge the current form into the preview, and write it out when `save` is set
async fn perform(app: &mut App, forge: &Forge, save: bool) {
    let request = match app.request() {
        Ok(request) => request,
        Err(e) => return app.show_error(e),
    };

    let code = forge.forge(&request).await;
    if !save {
        return app.show_forged(code);
    }

    match code {
        Ok(code) => {
            let written = write_output(request.output(), &code)
                .await
                .map(|_| request.output().to_path_buf());
            app.show_forged(Ok(code));
            app.show_saved(written);
        }
        Err(e) => app.show_error(e),
    }
}
