//! Session management
//!
//! Owns the terminal lifecycle. `start` acquires terminal modes in a fixed
//! order and rolls back what it acquired if a step fails; `stop` releases
//! every mode in reverse order, logging failures instead of returning them.
//!
//! Only one session may be running per process: the terminal is a
//! process-wide resource. `CrosstermTerminal` enforces this; other backends
//! leave it to the caller.

use crate::error::{Error, Result};
use crate::log::{Entry, Logger};
use crate::term::{Terminal, TerminalError, TerminalStep};
use crate::window::Window;

/// A terminal session
pub struct Session<T: Terminal> {
    /// Receives lifecycle progress and failures
    logger: Logger,
    /// Underlying terminal handle
    terminal: T,
    /// All acquisition steps succeeded and `stop` has not run
    running: bool,
}

impl<T: Terminal> Session<T> {
    /// Create a session reporting through a logger with no channels
    pub fn new(terminal: T) -> Self {
        Self::with_logger(Logger::default(), terminal)
    }

    /// Create a session reporting through `logger`
    pub fn with_logger(logger: Logger, terminal: T) -> Self {
        Self {
            logger,
            terminal,
            running: false,
        }
    }

    /// Whether the terminal is acquired
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Get the terminal handle
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Window over the terminal; `None` unless running
    pub fn window(&mut self) -> Option<Window<'_, T>> {
        if self.running {
            Some(Window::new(&mut self.terminal))
        } else {
            None
        }
    }

    /// Acquire the terminal.
    ///
    /// Steps run in order: init, color, no-echo, character break, keypad.
    /// When a step fails, the modes acquired so far are released (each
    /// release attempted even if another one fails) and the error is
    /// returned. A color failure tears the screen down but does not abort
    /// the remaining steps.
    pub fn start(&mut self) -> Result<&mut Self> {
        if self.running {
            return Ok(self);
        }
        self.logger.info("Starting terminal session", false);

        if let Err(e) = self.terminal.init() {
            self.fail(TerminalStep::Init, &e);
            self.release(&[TerminalStep::Teardown]);
            return Err(step_error(TerminalStep::Init, e));
        }

        if let Err(e) = self.terminal.enable_color() {
            self.fail(TerminalStep::Color, &e);
            self.release(&[TerminalStep::Teardown]);
        }

        if let Err(e) = self.terminal.set_echo(false) {
            self.fail(TerminalStep::Echo, &e);
            self.release(&[TerminalStep::Echo, TerminalStep::Teardown]);
            return Err(step_error(TerminalStep::Echo, e));
        }

        if let Err(e) = self.terminal.set_character_break(true) {
            self.fail(TerminalStep::CharacterBreak, &e);
            self.release(&[
                TerminalStep::CharacterBreak,
                TerminalStep::Echo,
                TerminalStep::Teardown,
            ]);
            return Err(step_error(TerminalStep::CharacterBreak, e));
        }

        if let Err(e) = self.terminal.set_keypad(true) {
            self.fail(TerminalStep::Keypad, &e);
            self.release(&[
                TerminalStep::Keypad,
                TerminalStep::CharacterBreak,
                TerminalStep::Echo,
                TerminalStep::Teardown,
            ]);
            return Err(step_error(TerminalStep::Keypad, e));
        }

        self.running = true;
        Ok(self)
    }

    /// Release the terminal. No-op when not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.logger.info("Stopping terminal session", false);
        self.release(&[
            TerminalStep::Keypad,
            TerminalStep::CharacterBreak,
            TerminalStep::Echo,
            TerminalStep::Teardown,
        ]);
        self.running = false;
    }

    /// Undo each step in order, logging failures and carrying on
    fn release(&mut self, steps: &[TerminalStep]) {
        let mut scoped = self.logger.indented();
        for &step in steps {
            let result = match step {
                TerminalStep::Keypad => self.terminal.set_keypad(false),
                TerminalStep::CharacterBreak => self.terminal.set_character_break(false),
                TerminalStep::Echo => self.terminal.set_echo(true),
                TerminalStep::Teardown => self.terminal.teardown(),
                TerminalStep::Init | TerminalStep::Color => Ok(()),
            };
            match result {
                Ok(()) => {
                    scoped.debug(Entry::lazy(|| format!("Reset {step}")), false);
                }
                Err(e) => {
                    let message = format!("Could not reset {step}");
                    scoped.error(Some(message.into()), Some(&e), false);
                }
            }
        }
    }

    fn fail(&mut self, step: TerminalStep, error: &TerminalError) {
        let message = format!("Could not set up {step}");
        self.logger.error(Some(message.into()), Some(error), false);
    }
}

impl<T: Terminal> Drop for Session<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn step_error(step: TerminalStep, source: TerminalError) -> Error {
    Error::Terminal { step, source }
}
