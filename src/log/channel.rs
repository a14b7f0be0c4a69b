//! A single log output sink with its own filter, indentation and timing

use std::fmt;
use std::io::{self, Write};

use crate::time::{self, Timestamp};

use super::entry::Entry;
use super::level::LogLevel;

/// One indentation unit
pub const INDENT_TEXT: &str = "    ";

/// Width of the cumulative and delta time columns
pub const TIME_WIDTH: usize = 6;

/// Width of the level column
pub const LEVEL_WIDTH: usize = 5;

/// Split on every line boundary: `\n`, `\r`, `\r\n`, vertical tab, form
/// feed, file/group/record separators, NEL and the Unicode line/paragraph
/// separators. A single trailing terminator does not start an extra line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        let end = match ch {
            '\r' => match chars.peek() {
                Some(&(j, '\n')) => {
                    chars.next();
                    j + 1
                }
                _ => i + 1,
            },
            '\n' | '\u{b}' | '\u{c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}' => i + ch.len_utf8(),
            _ => continue,
        };
        lines.push(&text[start..i]);
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Where a channel writes.
///
/// Process-standard streams are flushed but never closed.
pub enum Sink {
    Stdout,
    Stderr,
    Stream(Box<dyn Write + Send>),
}

impl Sink {
    /// Wrap any writer
    pub fn stream<W: Write + Send + 'static>(writer: W) -> Self {
        Sink::Stream(Box::new(writer))
    }

    /// Whether this is stdout or stderr
    pub fn is_standard(&self) -> bool {
        matches!(self, Sink::Stdout | Sink::Stderr)
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(buf),
            Sink::Stderr => io::stderr().write(buf),
            Sink::Stream(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::Stream(writer) => writer.flush(),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A log channel
#[derive(Debug)]
pub struct LogChannel {
    /// Channel name, unique within a logger
    name: String,
    /// Output stream
    sink: Sink,
    /// Minimum level this channel emits
    pub level: LogLevel,
    /// Mirrors the owning logger's indent counter
    pub indent_count: usize,
    /// Whether erasable text is supported
    eraseable: bool,
    /// Baseline for the cumulative time column
    global_start_time: Timestamp,
    /// Time of the last prefixed message, for the delta column
    last_time: Timestamp,
    /// Erasable text currently on display
    eraseable_text: Option<String>,
}

impl LogChannel {
    /// Create a new channel.
    ///
    /// Cumulative times are measured from `global_start_time`, or from now
    /// when none is given.
    pub fn new(
        name: impl Into<String>,
        sink: Sink,
        level: LogLevel,
        eraseable: bool,
        global_start_time: Option<Timestamp>,
    ) -> Self {
        let now = time::now();
        Self {
            name: name.into(),
            sink,
            level,
            indent_count: 0,
            eraseable,
            global_start_time: global_start_time.unwrap_or(now),
            last_time: now,
            eraseable_text: None,
        }
    }

    /// Get the channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `append_eraseable`/`erase` have any effect
    pub fn is_eraseable(&self) -> bool {
        self.eraseable
    }

    /// Text currently displayed and awaiting `erase`
    pub fn eraseable_text(&self) -> Option<&str> {
        self.eraseable_text.as_deref()
    }

    /// Whether a message at `level` would be emitted
    pub fn accepts(&self, level: LogLevel) -> bool {
        self.level.admits(level)
    }

    /// Write an entry, resolving lazy entries only if the level passes
    pub fn write(&mut self, level: LogLevel, entry: &Entry<'_>, append: bool) -> io::Result<()> {
        if !self.accepts(level) {
            return Ok(());
        }
        let text = entry.resolve();
        self.write_text(level, &text, append)
    }

    /// Write already resolved text.
    ///
    /// Pending erasable text is erased first. Each line becomes its own
    /// message; only the first line honors `append`.
    pub fn write_text(&mut self, level: LogLevel, text: &str, append: bool) -> io::Result<()> {
        if !self.accepts(level) {
            return Ok(());
        }

        self.erase()?;
        let mut append = append;
        for message in split_lines(text) {
            self.write_message(level, message, append)?;
            append = false;
        }
        Ok(())
    }

    /// Write text that a later `erase` removes. No-op on non-erasable channels.
    pub fn append_eraseable(&mut self, text: &str) -> io::Result<()> {
        if !self.eraseable {
            return Ok(());
        }

        self.eraseable_text = Some(text.to_string());
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()
    }

    /// Visually remove the pending erasable text, if any
    pub fn erase(&mut self) -> io::Result<()> {
        if !self.eraseable {
            return Ok(());
        }
        let Some(text) = self.eraseable_text.take() else {
            return Ok(());
        };

        let count = text.chars().count();
        let mut sequence = String::with_capacity(count * 3);
        sequence.extend(std::iter::repeat('\u{8}').take(count));
        sequence.extend(std::iter::repeat(' ').take(count));
        sequence.extend(std::iter::repeat('\u{8}').take(count));
        self.sink.write_all(sequence.as_bytes())?;
        self.sink.flush()
    }

    /// Emit a trailing newline, flush, and release the sink.
    ///
    /// Owned streams are closed when the channel drops; the standard stream
    /// variants hold no handle, so stdout and stderr stay open.
    pub fn close(mut self) -> io::Result<()> {
        self.sink.write_all(b"\n")?;
        self.sink.flush()
    }

    fn write_message(&mut self, level: LogLevel, message: &str, append: bool) -> io::Result<()> {
        if append {
            self.sink.write_all(message.as_bytes())?;
        } else {
            let prefix = self.prefix(level);
            write!(self.sink, "{prefix}{message}")?;
        }
        self.sink.flush()
    }

    fn prefix(&mut self, level: LogLevel) -> String {
        let now = time::now();
        let cumulative = time::humanize(Some(time::seconds_between(self.global_start_time, now)))
            .unwrap_or_default();
        let delta =
            time::humanize(Some(time::seconds_between(self.last_time, now))).unwrap_or_default();
        self.last_time = now;

        let indent = INDENT_TEXT.repeat(self.indent_count);
        format!(
            "\n[{cumulative:>tw$} (+{delta:>tw$}) {level:>lw$}]{indent} ",
            tw = TIME_WIDTH,
            lw = LEVEL_WIDTH,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory sink that can be inspected after being handed to a channel
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn channel(level: LogLevel, eraseable: bool) -> (LogChannel, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let channel = LogChannel::new("test", Sink::stream(buffer.clone()), level, eraseable, None);
        (channel, buffer)
    }

    /// Strip the time columns, which vary run to run
    fn without_times(output: &str) -> String {
        output
            .split('\n')
            .map(|line| match (line.find('['), line.find(')')) {
                (Some(0), Some(end)) => format!("[{}", &line[end + 2..]),
                _ => line.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_level_filtering() {
        for (i, filter) in LogLevel::ALL.iter().enumerate() {
            for (j, message) in LogLevel::ALL.iter().enumerate() {
                let (mut ch, buf) = channel(*filter, false);
                ch.write(*message, &Entry::from("hello"), false).unwrap();
                assert_eq!(buf.contents().contains("hello"), j >= i, "{filter} vs {message}");
            }
        }
    }

    #[test]
    fn test_prefix_format() {
        let (mut ch, buf) = channel(LogLevel::Trace, false);
        ch.write(LogLevel::Info, &Entry::from("hello"), false).unwrap();

        let out = buf.contents();
        assert!(out.starts_with("\n["));
        assert!(out.ends_with("  INFO] hello"));
        // "[" + 6 + " (+" + 6 + ") "
        let header = &out[1..];
        assert_eq!(&header[7..10], " (+");
        assert_eq!(&header[16..18], ") ");
        assert_eq!(without_times(&out), "\n[ INFO] hello");
    }

    #[test]
    fn test_indentation_in_prefix() {
        let (mut ch, buf) = channel(LogLevel::Trace, false);
        ch.indent_count = 2;
        ch.write(LogLevel::Warn, &Entry::from("x"), false).unwrap();
        assert_eq!(without_times(&buf.contents()), "\n[ WARN]         x");
    }

    #[test]
    fn test_multiline_only_first_appends() {
        let (mut ch, buf) = channel(LogLevel::Trace, false);
        ch.write(LogLevel::Info, &Entry::from("start"), false).unwrap();
        ch.write(LogLevel::Info, &Entry::from(" more\nnext"), true).unwrap();
        assert_eq!(
            without_times(&buf.contents()),
            "\n[ INFO] start more\n[ INFO] next"
        );
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert_eq!(split_lines("a\rb\r\nc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("v\u{b}f\u{c}s\u{1e}n\u{85}l\u{2028}p\u{2029}end"),
            vec!["v", "f", "s", "n", "l", "p", "end"]
        );
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("trailing\n"), vec!["trailing"]);
        assert_eq!(split_lines("trailing\r\n"), vec!["trailing"]);
        assert_eq!(split_lines("two\n\n"), vec!["two", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_carriage_return_starts_new_message() {
        let (mut ch, buf) = channel(LogLevel::Trace, false);
        ch.write(LogLevel::Info, &Entry::from("first\rsecond"), false).unwrap();
        let out = buf.contents();
        assert!(!out.contains('\r'));
        assert_eq!(out.matches(" INFO] ").count(), 2);
        assert_eq!(without_times(&out), "\n[ INFO] first\n[ INFO] second");
    }

    #[test]
    fn test_lazy_entry_not_evaluated_when_filtered() {
        let (mut ch, buf) = channel(LogLevel::Error, false);
        let entry = Entry::lazy(|| panic!("must not be evaluated"));
        ch.write(LogLevel::Debug, &entry, false).unwrap();
        assert!(buf.contents().is_empty());
    }

    #[test]
    fn test_eraseable_roundtrip() {
        let (mut ch, buf) = channel(LogLevel::Info, true);
        ch.append_eraseable("50%").unwrap();
        assert_eq!(ch.eraseable_text(), Some("50%"));
        ch.erase().unwrap();
        assert_eq!(buf.contents(), "50%\u{8}\u{8}\u{8}   \u{8}\u{8}\u{8}");
        assert_eq!(ch.eraseable_text(), None);
    }

    #[test]
    fn test_erase_twice_without_text_is_noop() {
        let (mut ch, buf) = channel(LogLevel::Info, true);
        ch.erase().unwrap();
        ch.erase().unwrap();
        assert!(buf.contents().is_empty());
    }

    #[test]
    fn test_non_eraseable_channel_ignores_eraseable_text() {
        let (mut ch, buf) = channel(LogLevel::Info, false);
        ch.append_eraseable("spinner").unwrap();
        ch.erase().unwrap();
        assert!(buf.contents().is_empty());
        assert_eq!(ch.eraseable_text(), None);
    }

    #[test]
    fn test_write_erases_pending_text_first() {
        let (mut ch, buf) = channel(LogLevel::Info, true);
        ch.append_eraseable("ab").unwrap();
        ch.write(LogLevel::Info, &Entry::from("done"), false).unwrap();
        let out = buf.contents();
        assert!(out.starts_with("ab\u{8}\u{8}  \u{8}\u{8}\n["));
        assert!(out.ends_with("done"));
    }

    #[test]
    fn test_erase_counts_characters_not_bytes() {
        let (mut ch, buf) = channel(LogLevel::Info, true);
        ch.append_eraseable("é").unwrap();
        ch.erase().unwrap();
        assert_eq!(buf.contents(), "é\u{8} \u{8}");
    }

    #[test]
    fn test_close_emits_newline() {
        let (ch, buf) = channel(LogLevel::Info, false);
        ch.close().unwrap();
        assert_eq!(buf.contents(), "\n");
    }
}
