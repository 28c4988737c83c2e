use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{Level, warn};
use url::Url;

#[derive(Clone, Debug)]
pub(crate) struct NotificationEvent {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
    pub(crate) target: String,
    pub(crate) file: Option<String>,
    pub(crate) line: Option<u32>,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
}

/// Hands events to a background task so the tracing hot path never blocks
/// on the webhook.
#[derive(Clone)]
pub(crate) struct DiscordNotifier {
    tx: mpsc::Sender<NotificationEvent>,
}

impl DiscordNotifier {
    pub(crate) fn spawn(webhook_url: Url) -> Self {
        let (tx, mut rx) = mpsc::channel::<NotificationEvent>(256);

        tokio::spawn(async move {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(3))
                .build();
            let Ok(client) = client else {
                warn!("Failed to build alert HTTP client; Discord alerts disabled");
                return;
            };

            while let Some(event) = rx.recv().await {
                if let Err(error) = post_event(&client, &webhook_url, &event).await {
                    warn!(error = %error, "Discord alert delivery failed");
                }
            }
        });

        Self { tx }
    }

    pub(crate) fn try_notify(&self, event: NotificationEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Alert queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Alert queue closed; dropping event");
            }
        }
    }
}

async fn post_event(
    client: &reqwest::Client,
    webhook_url: &Url,
    event: &NotificationEvent,
) -> Result<()> {
    let content = format_content(event);

    let response = client
        .post(webhook_url.clone())
        .json(&json!({ "content": content }))
        .send()
        .await
        .map_err(sanitize_reqwest_error)?;

    if response.status().is_success() {
        return Ok(());
    }

    Err(anyhow!(
        "discord webhook returned non-success status: {}",
        response.status()
    ))
}

fn format_content(event: &NotificationEvent) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "**{}** `{}` `{}` `{}`",
        event.service_name,
        event.environment,
        event.component,
        event.level.as_str()
    ));

    lines.push(format!(
        "`{}` `{}`{}",
        event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        event.target,
        match (&event.file, event.line) {
            (Some(file), Some(line)) => format!(" `{}:{}`", file, line),
            _ => String::new(),
        }
    ));

    if let Some(message) = event.message.as_ref().filter(|m| !m.trim().is_empty()) {
        lines.push(format!("> {}", message.trim()));
    }

    if !event.fields.is_empty() {
        lines.push("fields:".to_string());
        for (k, v) in &event.fields {
            lines.push(format!("- `{}` = `{}`", k, v));
        }
    }

    truncate_for_discord(lines.join("\n"))
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("discord webhook request timed out");
    }
    if error.is_connect() {
        return anyhow!("discord webhook connection failed");
    }
    anyhow!("discord webhook request failed")
}

fn truncate_for_discord(mut content: String) -> String {
    const LIMIT: usize = 2000;
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= LIMIT {
        return content;
    }

    let allowed = LIMIT.saturating_sub(SUFFIX.chars().count());
    let truncated: String = content.chars().take(allowed).collect();
    content.clear();
    content.push_str(&truncated);
    content.push_str(SUFFIX);
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_discord_caps_at_limit() {
        let long = "x".repeat(5000);
        let truncated = truncate_for_discord(long);
        assert!(truncated.chars().count() <= 2000);
        assert!(truncated.ends_with("… (truncated)"));
    }

    #[test]
    fn test_truncate_for_discord_leaves_short_content_alone() {
        let short = "all good".to_string();
        assert_eq!(truncate_for_discord(short.clone()), short);
    }
}
