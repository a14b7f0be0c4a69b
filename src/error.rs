//! Crate error type

use std::io;
use thiserror::Error;

use crate::term::{TerminalError, TerminalStep};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid attribute value: 0x{0:X}")]
    InvalidAttribute(u32),

    #[error("{0} is already registered as a channel on this logger")]
    DuplicateChannel(String),

    #[error("{0} is not a channel on this logger")]
    ChannelNotFound(String),

    #[error("Terminal step '{step}' failed: {source}")]
    Terminal {
        step: TerminalStep,
        #[source]
        source: TerminalError,
    },

    #[error("Window I/O failed: {0}")]
    Window(#[from] TerminalError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
