//! Monotonic clock and short duration formatting

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic timestamp. Not comparable across process restarts.
pub type Timestamp = Instant;

/// Current monotonic time
pub fn now() -> Timestamp {
    Instant::now()
}

/// Seconds elapsed between two timestamps
pub fn seconds_between(earlier: Timestamp, later: Timestamp) -> f64 {
    later.saturating_duration_since(earlier).as_secs_f64()
}

/// Render a number of seconds for display.
///
/// - under one second: truncated whole milliseconds (`"123ms"`)
/// - over sixty seconds: minutes with one decimal (`"2.1m"`)
/// - otherwise: seconds with one decimal (`"4.5s"`)
pub fn humanize(seconds: Option<f64>) -> Option<String> {
    let seconds = seconds?;
    let text = if seconds < 1.0 {
        format!("{}ms", (seconds * 1000.0).trunc() as i64)
    } else if seconds > 60.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{:.1}s", seconds)
    };
    Some(text)
}

/// Humanize a `Duration`
pub fn humanize_duration(duration: Duration) -> String {
    humanize(Some(duration.as_secs_f64())).unwrap_or_default()
}

/// Block the calling thread for the given number of seconds.
/// Negative or non-finite values do not sleep.
pub fn sleep(seconds: f64) {
    if seconds.is_finite() && seconds > 0.0 {
        thread::sleep(Duration::from_secs_f64(seconds));
    }
}
