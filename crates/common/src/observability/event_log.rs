//! Bounded event log
//!
//! A process-wide ring buffer of [`Event`]s shared by every client call.
//! All mutation happens inside one `parking_lot` critical section; queries
//! copy the matching window out before returning, so readers never observe
//! a partially written event.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::collections::RingBuffer;
use crate::time::{Clock, SystemClock};

/// Severity of an [`Event`]. `Success` marks a completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl EventLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event level '{0}'")]
pub struct ParseEventLevelError(String);

impl FromStr for EventLevel {
    type Err = ParseEventLevelError;

    /// Case-insensitive; accepts `warn` as an alias of `warning`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            _ => Err(ParseEventLevelError(s.to_string())),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: EventLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Filter for [`EventLog::query`]. All fields are optional; an empty query
/// returns every buffered event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub session_id: Option<String>,
    pub level: Option<EventLevel>,
    /// Keep only the most recent `limit` matches. `None` or `0` means no
    /// limit.
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn level(mut self, level: EventLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, event: &Event) -> bool {
        let session_ok = match &self.session_id {
            Some(wanted) => event.session_id.as_deref() == Some(wanted.as_str()),
            None => true,
        };
        let level_ok = self.level.map_or(true, |wanted| event.level == wanted);
        session_ok && level_ok
    }
}

/// Thread-safe bounded event log.
///
/// # Examples
///
/// ```
/// use studylens_common::{EventLevel, EventLog, EventQuery};
///
/// let log = EventLog::new(2);
/// log.info("first", Some("s1"));
/// log.warning("second", Some("s2"));
/// log.success("third", Some("s1"));
///
/// let s1 = log.query(&EventQuery::new().session("s1"));
/// assert_eq!(s1.len(), 1);
/// assert_eq!(s1[0].level, EventLevel::Success);
/// ```
pub struct EventLog {
    buffer: Mutex<RingBuffer<Event>>,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    /// Creates a log holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self { buffer: Mutex::new(RingBuffer::new(capacity)), clock: Arc::new(SystemClock) }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Appends an event, evicting the oldest one when full. Never fails.
    pub fn record(&self, message: impl Into<String>, level: EventLevel, session_id: Option<&str>) {
        let event = Event {
            timestamp: self.clock.now(),
            message: message.into(),
            level,
            session_id: session_id.map(str::to_owned),
        };
        mirror_to_tracing(&event);
        self.buffer.lock().push(event);
    }

    pub fn info(&self, message: impl Into<String>, session_id: Option<&str>) {
        self.record(message, EventLevel::Info, session_id);
    }

    pub fn warning(&self, message: impl Into<String>, session_id: Option<&str>) {
        self.record(message, EventLevel::Warning, session_id);
    }

    pub fn error(&self, message: impl Into<String>, session_id: Option<&str>) {
        self.record(message, EventLevel::Error, session_id);
    }

    pub fn success(&self, message: impl Into<String>, session_id: Option<&str>) {
        self.record(message, EventLevel::Success, session_id);
    }

    /// Most recent matching events, oldest first.
    pub fn query(&self, query: &EventQuery) -> Vec<Event> {
        let mut selected: Vec<Event> = {
            let buffer = self.buffer.lock();
            buffer.iter().filter(|event| query.matches(event)).cloned().collect()
        };
        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            if selected.len() > limit {
                selected.drain(..selected.len() - limit);
            }
        }
        selected
    }

    /// Removes events of `session_id`, or everything when `None`. Returns the
    /// number of removed events.
    pub fn clear(&self, session_id: Option<&str>) -> usize {
        let mut buffer = self.buffer.lock();
        match session_id {
            Some(session) => buffer.retain(|event| event.session_id.as_deref() != Some(session)),
            None => {
                let removed = buffer.len();
                buffer.clear();
                removed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity()
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.buffer.lock();
        f.debug_struct("EventLog")
            .field("len", &buffer.len())
            .field("capacity", &buffer.capacity())
            .finish()
    }
}

fn mirror_to_tracing(event: &Event) {
    let session = event.session_id.as_deref().unwrap_or("-");
    match event.level {
        EventLevel::Info => info!(session_id = session, "{}", event.message),
        EventLevel::Warning => warn!(session_id = session, "{}", event.message),
        EventLevel::Error => error!(session_id = session, "{}", event.message),
        EventLevel::Success => {
            info!(session_id = session, outcome = "success", "{}", event.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!("success".parse::<EventLevel>(), Ok(EventLevel::Success));
        assert_eq!("Warning".parse::<EventLevel>(), Ok(EventLevel::Warning));
        assert_eq!(" ERROR ".parse::<EventLevel>(), Ok(EventLevel::Error));
        assert!("debug".parse::<EventLevel>().is_err());
    }

    #[test]
    fn event_serializes_with_uppercase_level_and_camel_case_keys() {
        let clock = MockClock::new();
        let event = Event {
            timestamp: clock.now(),
            message: "Text extracted".into(),
            level: EventLevel::Success,
            session_id: Some("abc".into()),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "SUCCESS");
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn query_applies_filters_before_limit() {
        let log = EventLog::new(10);
        log.info("a1", Some("a"));
        log.error("b1", Some("b"));
        log.error("a2", Some("a"));
        log.info("a3", Some("a"));
        log.error("a4", Some("a"));

        let errors_a = log.query(&EventQuery::new().session("a").level(EventLevel::Error));
        let messages: Vec<_> = errors_a.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a2", "a4"]);

        let last_two = log.query(&EventQuery::new().session("a").limit(2));
        let messages: Vec<_> = last_two.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a3", "a4"]);

        assert_eq!(log.query(&EventQuery::new().limit(0)).len(), 5);
    }

    #[test]
    fn timestamps_come_from_injected_clock() {
        let clock = Arc::new(MockClock::new());
        let log = EventLog::new(4).with_clock(clock.clone());

        log.info("first", None);
        clock.advance(std::time::Duration::from_secs(30));
        log.info("second", None);

        let events = log.query(&EventQuery::new());
        assert_eq!((events[1].timestamp - events[0].timestamp).num_seconds(), 30);
        assert_eq!(events[0].session_id, None);
    }

    #[test]
    fn clear_without_session_empties_everything() {
        let log = EventLog::new(3);
        log.info("x", Some("a"));
        log.info("y", None);

        assert_eq!(log.clear(None), 2);
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 3);
    }
}
