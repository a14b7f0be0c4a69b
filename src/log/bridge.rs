//! Forward `tracing` events into a shared `Logger`

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, TryLockError};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::level::LogLevel;
use super::logger::Logger;

/// A logger shared between threads
pub type SharedLogger = Arc<Mutex<Logger>>;

/// `tracing_subscriber` layer writing every event to a `Logger`.
///
/// Events raised while the logger is already locked (for instance by the
/// logger's own diagnostics) are dropped rather than waited on.
#[derive(Clone)]
pub struct LoggerLayer {
    logger: SharedLogger,
    with_target: bool,
}

impl LoggerLayer {
    pub fn new(logger: SharedLogger) -> Self {
        Self {
            logger,
            with_target: false,
        }
    }

    /// Prefix each message with the event target
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut logger = match self.logger.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };

        let metadata = event.metadata();
        let level = LogLevel::from(*metadata.level());

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut message = String::new();
        if self.with_target {
            let _ = write!(message, "{}: ", metadata.target());
        }
        message.push_str(&visitor.message);
        message.push_str(&visitor.fields);

        logger.write(level, message, false);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
