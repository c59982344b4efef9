use std::io::{Stdout, stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::error;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switches to the alternate screen in raw mode.
pub fn init() -> Result<Tui> {
    execute!(stdout(), EnterAlternateScreen).context("entering alternate screen")?;
    enable_raw_mode().context("enabling raw mode")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode().context("disabling raw mode")?;
    execute!(stdout(), LeaveAlternateScreen).context("leaving alternate screen")?;
    Ok(())
}

/// Restores the terminal before the default hook prints the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = restore() {
            error!(error = %e, "failed to restore terminal after panic");
        }
        error!(%panic_info, "panic");
        original_hook(panic_info);
    }));
}
