//! Logger fanning messages out to named channels

use std::error::Error as StdError;
use std::fs::File;
use std::io::BufWriter;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::time::{self, Timestamp};

use super::channel::{split_lines, LogChannel, Sink, INDENT_TEXT};
use super::entry::Entry;
use super::level::LogLevel;

/// Name of the channel registered by `add_console_channel`
pub const CONSOLE_CHANNEL: &str = "console";

/// Writes filtered status information to a set of channels.
///
/// Sink I/O failures are swallowed: a broken log file never interrupts the
/// caller. Contract violations (unknown channel, duplicate name) are errors.
#[derive(Debug)]
pub struct Logger {
    /// Channels in registration order
    channels: Vec<LogChannel>,
    /// Origin for every channel's cumulative time
    global_start_time: Timestamp,
    /// Current indentation depth, shared by all channels
    indent_count: usize,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a logger with no channels.
    ///
    /// Cumulative times are measured from this call, including on channels
    /// added later.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            global_start_time: time::now(),
            indent_count: 0,
        }
    }

    // Channels

    /// Register a new channel
    pub fn add_channel(
        &mut self,
        name: impl Into<String>,
        sink: Sink,
        level: LogLevel,
        eraseable: bool,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.has_channel(&name) {
            return Err(Error::DuplicateChannel(name));
        }

        debug!("Adding log channel {} ({:?}, level {})", name, sink, level);
        let mut channel = LogChannel::new(name, sink, level, eraseable, Some(self.global_start_time));
        channel.indent_count = self.indent_count;
        self.channels.push(channel);
        Ok(self)
    }

    /// Register an erasable channel called "console" on stdout
    pub fn add_console_channel(&mut self, level: LogLevel) -> Result<&mut Self> {
        self.add_channel(CONSOLE_CHANNEL, Sink::Stdout, level, true)
    }

    /// Register a channel writing to `path`, truncating it
    pub fn add_file_channel(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        level: LogLevel,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.has_channel(&name) {
            return Err(Error::DuplicateChannel(name));
        }
        let file = File::create(path.as_ref())?;
        self.add_channel(name, Sink::stream(BufWriter::new(file)), level, false)
    }

    /// Whether a channel called `name` is registered
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name() == name)
    }

    /// Names of all registered channels, in registration order
    pub fn list_channels(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name().to_string()).collect()
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> Option<&LogChannel> {
        self.channels.iter().find(|c| c.name() == name)
    }

    /// Close and drop a channel. No-op if it is not registered.
    pub fn remove_channel(&mut self, name: &str) -> &mut Self {
        if let Some(index) = self.channels.iter().position(|c| c.name() == name) {
            let channel = self.channels.remove(index);
            debug!("Removing log channel {}", name);
            let _ = channel.close();
        }
        self
    }

    /// Close and drop every channel
    pub fn clear_channels(&mut self) -> &mut Self {
        for channel in self.channels.drain(..) {
            let _ = channel.close();
        }
        self
    }

    /// Same as `clear_channels`
    pub fn close(&mut self) -> &mut Self {
        self.clear_channels()
    }

    /// Change the level of one channel. Fails if `name` is not registered.
    pub fn set_channel_level(&mut self, name: &str, level: LogLevel) -> Result<&mut Self> {
        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::ChannelNotFound(name.to_string()))?;
        channel.level = level;
        Ok(self)
    }

    /// Change the level of every channel at once
    pub fn set_level(&mut self, level: LogLevel) -> &mut Self {
        for channel in &mut self.channels {
            channel.level = level;
        }
        self
    }

    // Indentation

    /// Current indentation depth
    pub fn indent_count(&self) -> usize {
        self.indent_count
    }

    /// Indent subsequent messages on every channel by one level
    pub fn indent(&mut self) -> &mut Self {
        self.set_indent(self.indent_count + 1);
        self
    }

    /// Outdent by one level, never below zero
    pub fn outdent(&mut self) -> &mut Self {
        self.set_indent(self.indent_count.saturating_sub(1));
        self
    }

    /// Indent until the returned guard drops
    pub fn indented(&mut self) -> IndentGuard<'_> {
        self.indent();
        IndentGuard { logger: self }
    }

    fn set_indent(&mut self, count: usize) {
        self.indent_count = count;
        for channel in &mut self.channels {
            channel.indent_count = count;
        }
    }

    // Writing

    /// Write at TRACE level. See `write`.
    pub fn trace<'a>(&mut self, entry: impl Into<Entry<'a>>, append: bool) -> &mut Self {
        self.write(LogLevel::Trace, entry, append)
    }

    /// Write at DEBUG level
    pub fn debug<'a>(&mut self, entry: impl Into<Entry<'a>>, append: bool) -> &mut Self {
        self.write(LogLevel::Debug, entry, append)
    }

    /// Write at INFO level
    pub fn info<'a>(&mut self, entry: impl Into<Entry<'a>>, append: bool) -> &mut Self {
        self.write(LogLevel::Info, entry, append)
    }

    /// Write at WARN level
    pub fn warn<'a>(&mut self, entry: impl Into<Entry<'a>>, append: bool) -> &mut Self {
        self.write(LogLevel::Warn, entry, append)
    }

    /// Write at ERROR level.
    ///
    /// The error, if any, is rendered with its source chain, one indented
    /// line per error, after the entry text. Nothing is written when both
    /// arguments are `None`.
    pub fn error<'a>(
        &mut self,
        entry: Option<Entry<'a>>,
        error: Option<&(dyn StdError + 'static)>,
        append: bool,
    ) -> &mut Self {
        if entry.is_none() && error.is_none() {
            return self;
        }

        let message = Entry::lazy(move || {
            let mut message = entry
                .as_ref()
                .map(|e| e.resolve().into_owned())
                .unwrap_or_default();
            if let Some(error) = error {
                let trace = format_error_chain(error);
                if !message.is_empty() && !trace.is_empty() {
                    message.push('\n');
                }
                message.push_str(&trace);
            }
            message
        });
        self.write(LogLevel::Error, message, append)
    }

    /// Fan an entry out to every channel. Lazy entries are evaluated at
    /// most once, and only if some channel accepts `level`.
    pub fn write<'a>(&mut self, level: LogLevel, entry: impl Into<Entry<'a>>, append: bool) -> &mut Self {
        if !self.channels.iter().any(|c| c.accepts(level)) {
            return self;
        }

        let entry = entry.into();
        let text = entry.resolve();
        for channel in &mut self.channels {
            let _ = channel.write_text(level, &text, append);
        }
        self
    }

    /// Append erasable text on every channel that supports it
    pub fn append_eraseable(&mut self, text: &str) -> &mut Self {
        for channel in &mut self.channels {
            let _ = channel.append_eraseable(text);
        }
        self
    }

    /// Erase the last erasable text on every channel
    pub fn erase(&mut self) -> &mut Self {
        for channel in &mut self.channels {
            let _ = channel.erase();
        }
        self
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.clear_channels();
    }
}

/// Render an error and its sources, one indented line each
fn format_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut lines = Vec::new();
    let mut current = Some(error);
    let mut first = true;
    while let Some(err) = current {
        let text = if first {
            err.to_string()
        } else {
            format!("caused by: {err}")
        };
        first = false;
        for line in split_lines(&text) {
            let line = line.trim_end();
            if !line.is_empty() {
                lines.push(format!("{INDENT_TEXT}{line}"));
            }
        }
        current = err.source();
    }
    lines.join("\n")
}

/// Indentation scope on a `Logger`. Outdents exactly once on drop.
pub struct IndentGuard<'a> {
    logger: &'a mut Logger,
}

impl Deref for IndentGuard<'_> {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        self.logger
    }
}

impl DerefMut for IndentGuard<'_> {
    fn deref_mut(&mut self) -> &mut Logger {
        self.logger
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.logger.outdent();
    }
}
