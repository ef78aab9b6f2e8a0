//! Terminal ownership and size queries.

use std::io::{self, Write};

use anyhow::{bail, Result};
use crossterm::{cursor, execute, terminal};
use tracing::debug;

/// Size used when the terminal cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Reports the terminal size as `(columns, rows)`.
pub trait TerminalSize {
    fn size(&self) -> (u16, u16);
}

/// Queries the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTerminal;

impl TerminalSize for SystemTerminal {
    fn size(&self) -> (u16, u16) {
        match terminal_size::terminal_size() {
            Some((terminal_size::Width(cols), terminal_size::Height(rows))) => (cols, rows),
            None => FALLBACK_SIZE,
        }
    }
}

/// A terminal that never changes size.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize(pub u16, pub u16);

#[cfg(test)]
impl TerminalSize for FixedSize {
    fn size(&self) -> (u16, u16) {
        (self.0, self.1)
    }
}

/// Fail unless stdout is an interactive terminal.
pub fn ensure_tty() -> Result<()> {
    if !atty::is(atty::Stream::Stdout) {
        bail!("stdout is not a terminal; termvid needs an interactive terminal to draw into");
    }
    Ok(())
}

/// RAII guard for the terminal during playback.
///
/// Entering switches to the alternate screen, enables raw mode and hides the
/// cursor. Dropping the guard undoes all three, including on error paths.
pub struct TerminalSession {
    active: bool,
    // Terminal state is process-global; keep the guard on one thread
    _marker: std::marker::PhantomData<*const ()>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let session = Self {
            active: true,
            _marker: std::marker::PhantomData,
        };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        debug!("terminal session started");
        Ok(session)
    }

    /// Restore the terminal now instead of on drop.
    pub fn restore(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            let mut stdout = io::stdout();
            execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            stdout.flush()?;
            debug!("terminal session restored");
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
}
