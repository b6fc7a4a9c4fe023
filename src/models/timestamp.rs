//! Message keys carrying the event timestamp.

use transit_schema::{EventRecord, Record};

/// Millisecond-precision timestamp used as the message key for ordering and
/// partitioning. Created fresh for every publish and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampKey {
    timestamp: i64,
}

impl TimestampKey {
    /// Key for the current instant.
    pub fn now() -> Self {
        TimestampKey {
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl EventRecord for TimestampKey {
    fn to_record(&self) -> Record {
        Record::new("TimestampKey").field("timestamp", self.timestamp)
    }
}
