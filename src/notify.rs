//! Completion notifications.
//!
//! A sync run reports its outcome with one short push message. Delivery
//! failures are the caller's to log; they never fail a sync.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::json;

const PUSHBULLET_API_BASE: &str = "https://api.pushbullet.com";

/// Delivers a short user-facing message when a sync run finishes.
#[allow(async_fn_in_trait)]
pub trait NotificationService {
    async fn send(&self, message: &str, title: &str) -> Result<()>;
}

/// Sends Pushbullet "note" pushes.
pub struct PushbulletNotifier {
    http: Client,
    api_key: String,
    api_base: String,
}

impl PushbulletNotifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base(api_key, PUSHBULLET_API_BASE)
    }

    /// Test hook: point the notifier at a local server.
    pub fn with_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }
}

impl NotificationService for PushbulletNotifier {
    async fn send(&self, message: &str, title: &str) -> Result<()> {
        log::info!("Sending push notification: {title}");
        let response = self
            .http
            .post(format!("{}/v2/pushes", self.api_base))
            .header("Access-Token", &self.api_key)
            .json(&json!({ "type": "note", "title": title, "body": message }))
            .send()
            .await
            .context("Pushbullet request failed")?;

        if !response.status().is_success() {
            bail!("Pushbullet returned {}", response.status());
        }
        log::info!("Push notification delivered");
        Ok(())
    }
}

/// Stands in when no Pushbullet API key is configured.
pub struct NoopNotifier;

impl NotificationService for NoopNotifier {
    async fn send(&self, message: &str, title: &str) -> Result<()> {
        log::debug!("notifications disabled; would send {title}: {message}");
        Ok(())
    }
}
