//! Keyboard input handling for the player.
//!
//! Maps key presses to playback commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::player::state::Command;

/// Map a key event to a command, or `None` for unbound keys.
///
/// Only presses are considered; release and repeat events are ignored.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }

        // === Playback controls ===
        KeyCode::Char(' ') | KeyCode::Char('k') => Some(Command::TogglePause),
        KeyCode::Char('r') => Some(Command::Redraw),

        // === Seeking ===
        KeyCode::Char('l') | KeyCode::Right => Some(Command::SeekForward),
        KeyCode::Char('j') | KeyCode::Left => Some(Command::SeekBackward),

        _ => None,
    }
}
