//! Log entries: eager text or a lazily evaluated producer

use std::borrow::Cow;
use std::fmt;

/// A message handed to the logger.
///
/// Lazy entries are only evaluated when some channel accepts the level.
pub enum Entry<'a> {
    Text(Cow<'a, str>),
    Lazy(Box<dyn Fn() -> String + 'a>),
}

impl<'a> Entry<'a> {
    pub fn lazy<F>(producer: F) -> Self
    where
        F: Fn() -> String + 'a,
    {
        Entry::Lazy(Box::new(producer))
    }

    /// Produce the text of this entry
    pub fn resolve(&self) -> Cow<'_, str> {
        match self {
            Entry::Text(text) => Cow::Borrowed(text.as_ref()),
            Entry::Lazy(producer) => Cow::Owned(producer()),
        }
    }
}

impl<'a> From<&'a str> for Entry<'a> {
    fn from(text: &'a str) -> Self {
        Entry::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Entry<'_> {
    fn from(text: String) -> Self {
        Entry::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a String> for Entry<'a> {
    fn from(text: &'a String) -> Self {
        Entry::Text(Cow::Borrowed(text.as_str()))
    }
}

impl<'a> From<fmt::Arguments<'a>> for Entry<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        match args.as_str() {
            Some(text) => Entry::Text(Cow::Borrowed(text)),
            None => Entry::Text(Cow::Owned(args.to_string())),
        }
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Entry::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}
