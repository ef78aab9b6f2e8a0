//! Input handling for the player.
//!
//! The session reads commands through [`InputSource`]: a non-blocking poll
//! once per frame, and a blocking wait while paused.

mod keyboard;

pub use keyboard::command_for_key;

#[cfg(test)]
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};

use crate::player::state::Command;

/// A source of user commands.
pub trait InputSource {
    /// Return a pending command without blocking.
    fn poll(&mut self) -> io::Result<Option<Command>>;

    /// Block until a command arrives. `None` means input is closed.
    fn wait(&mut self) -> io::Result<Option<Command>>;
}

/// Reads key presses from the terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    fn command_for_event(event: Event) -> Option<Command> {
        match event {
            Event::Key(key) => command_for_key(key),
            _ => None, // Resize is picked up from the size query each frame
        }
    }
}

impl InputSource for CrosstermInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        while event::poll(Duration::ZERO)? {
            if let Some(command) = Self::command_for_event(event::read()?) {
                return Ok(Some(command));
            }
        }
        Ok(None)
    }

    fn wait(&mut self) -> io::Result<Option<Command>> {
        loop {
            if let Some(command) = Self::command_for_event(event::read()?) {
                return Ok(Some(command));
            }
        }
    }
}

/// Replays a fixed list of commands, one per frame.
///
/// Each `poll` consumes one slot, so `None` entries let frames pass without
/// input. Once the script runs out, `poll` returns nothing and `wait` reports
/// closed input.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    script: VecDeque<Option<Command>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Command>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Queue `command` after `frames` idle polls.
    pub fn after(mut self, frames: usize, command: Command) -> Self {
        self.script.extend(std::iter::repeat(None).take(frames));
        self.script.push_back(Some(command));
        self
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        Ok(self.script.pop_front().flatten())
    }

    fn wait(&mut self) -> io::Result<Option<Command>> {
        while let Some(slot) = self.script.pop_front() {
            if slot.is_some() {
                return Ok(slot);
            }
        }
        Ok(None)
    }
}
