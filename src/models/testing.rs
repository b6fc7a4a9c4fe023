//! In-memory channel used by model tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use transit_channel::{ChannelError, EventChannel, Result};
use transit_schema::Record;

/// Records every publish and close instead of talking to a broker.
pub struct MockChannel {
    label: &'static str,
    pub published: Arc<Mutex<Vec<(Record, Record)>>>,
    close_log: Arc<Mutex<Vec<&'static str>>>,
    fail_close: bool,
    closed: AtomicBool,
}

impl MockChannel {
    pub fn new(label: &'static str, close_log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        MockChannel {
            label,
            published: Arc::new(Mutex::new(Vec::new())),
            close_log,
            fail_close: false,
            closed: AtomicBool::new(false),
        }
    }

    /// A channel whose first close fails after being recorded.
    pub fn failing(label: &'static str, close_log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        MockChannel {
            fail_close: true,
            ..Self::new(label, close_log)
        }
    }
}

#[async_trait]
impl EventChannel for MockChannel {
    async fn ensure_exists(&self) -> Result<()> {
        Ok(())
    }

    async fn publish(&self, key: Record, value: Record) -> Result<()> {
        self.published.lock().unwrap().push((key, value));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.close_log.lock().unwrap().push(self.label);
        if self.fail_close {
            return Err(ChannelError::Close("mock close failure".to_string()));
        }
        Ok(())
    }
}
