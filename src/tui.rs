use std::{io, panic};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to enter alt screen")?;
    Terminal::new(CrosstermBackend::new(io::stdout())).context("failed to create terminal")
}

pub fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)
        .context("failed to leave alt screen")?;
    Ok(())
}

/// Puts the terminal back before the default hook prints the panic, so the
/// message is readable.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        tracing::error!(panic = %info, "panicked");
        default_hook(info);
    }));
}
