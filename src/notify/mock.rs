use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{RcPublishError, Result};
use crate::notify::Notifier;

/// Mock chat sink recording every posted message
pub struct MockNotifier {
    pub posted: Mutex<Vec<Value>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        MockNotifier {
            posted: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Make every `post` call fail
    pub fn fail_posts(&mut self) {
        self.fail = true;
    }

    /// Messages posted so far, in order
    pub fn posted_messages(&self) -> Vec<Value> {
        self.posted.lock().expect("mock post log poisoned").clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn post(&self, message: &Value) -> Result<()> {
        if self.fail {
            return Err(RcPublishError::notify("mock webhook failure"));
        }
        self.posted
            .lock()
            .expect("mock post log poisoned")
            .push(message.clone());
        Ok(())
    }
}
