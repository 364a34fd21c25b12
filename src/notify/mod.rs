//! Chat notification sink
//!
//! Slack Block Kit messages posted over an incoming webhook. The sink is
//! fire-and-forget from the core's perspective; HTTP success is the only
//! acknowledgment.

pub mod mock;
pub mod slack;

pub use mock::MockNotifier;
pub use slack::SlackWebhook;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::error::Result;

/// Chat sink trait for abstraction
///
/// Implementations: [SlackWebhook](slack::SlackWebhook) for real delivery,
/// [MockNotifier](mock::MockNotifier) for tests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a structured message to the channel
    async fn post(&self, message: &Value) -> Result<()>;
}

/// Block Kit message announcing a freshly cut release candidate
pub fn rc_created_message(tag_name: &str, issue_url: &str) -> Value {
    json!({
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("[{}] Release Candidate created 🧪", tag_name)
                }
            },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("`{}` is ready for testing.", tag_name)
                },
                "accessory": {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "Go" },
                    "url": issue_url,
                    "action_id": "button-action"
                }
            }
        ]
    })
}

/// Block Kit reminder for a release candidate that has gone stale
pub fn stale_reminder_message(created_at: DateTime<Utc>, issue_url: &str) -> Value {
    json!({
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!(
                        "Release Candidate has been open since {}",
                        created_at.format("%Y-%m-%d")
                    )
                }
            },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": "<!channel> take a look into your RC to determine what is delaying"
                },
                "accessory": {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "Go" },
                    "url": issue_url,
                    "action_id": "button-action"
                }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rc_created_message_shape() {
        let message = rc_created_message("v20240602.1", "https://example.com/issues/1");
        let blocks = message["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0]["text"]["text"]
            .as_str()
            .unwrap()
            .contains("v20240602.1"));
        assert!(blocks[1]["text"]["text"]
            .as_str()
            .unwrap()
            .contains("`v20240602.1`"));
        assert_eq!(
            blocks[1]["accessory"]["url"].as_str().unwrap(),
            "https://example.com/issues/1"
        );
    }

    #[test]
    fn test_stale_reminder_message_shape() {
        let created = Utc.with_ymd_and_hms(2024, 5, 27, 17, 7, 37).unwrap();
        let message = stale_reminder_message(created, "https://example.com/issues/9");
        let blocks = message["blocks"].as_array().unwrap();
        assert!(blocks[0]["text"]["text"]
            .as_str()
            .unwrap()
            .contains("2024-05-27"));
        assert!(blocks[1]["text"]["text"]
            .as_str()
            .unwrap()
            .contains("<!channel>"));
        assert_eq!(
            blocks[1]["accessory"]["url"].as_str().unwrap(),
            "https://example.com/issues/9"
        );
    }
}
