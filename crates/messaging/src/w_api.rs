use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{ConnectionState, InstanceCredentials, WhatsAppGateway};

/// W-API client built on reqwest. Instance provisioning uses the account
/// admin token; everything else authenticates with the instance token.
pub struct WApiClient {
    http: reqwest::Client,
    base_url: String,
    admin_token: String,
}

#[derive(Debug, Deserialize)]
struct CreateInstanceResponse {
    #[serde(rename = "instanceId")]
    instance_id: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct QrCodeResponse {
    #[serde(rename = "qrcode")]
    qr_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    connected: Option<bool>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendTextResponse {
    #[serde(rename = "messageId")]
    message_id: Option<String>,
}

impl WApiClient {
    pub fn new(base_url: String, admin_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            admin_token,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "w-api request failed"
        );

        anyhow::bail!("W-API request failed: {} (status {})", context, status);
    }
}

fn map_state(resp: &StatusResponse) -> ConnectionState {
    if resp.connected == Some(true) {
        return ConnectionState::Connected;
    }

    match resp.status.as_deref() {
        Some("connected") => ConnectionState::Connected,
        Some("connecting") | Some("qrcode") => ConnectionState::Connecting,
        _ => ConnectionState::Disconnected,
    }
}

#[async_trait]
impl WhatsAppGateway for WApiClient {
    async fn create_instance(&self, instance_name: &str) -> Result<InstanceCredentials> {
        let body = json!({ "instanceName": instance_name });

        let resp = self
            .http
            .post(format!("{}/instance/create", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.admin_token))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create instance").await?;

        let parsed: CreateInstanceResponse = resp.json().await?;
        Ok(InstanceCredentials {
            instance_id: parsed.instance_id,
            instance_token: parsed.token,
        })
    }

    async fn fetch_qr_code(&self, credentials: &InstanceCredentials) -> Result<Option<String>> {
        let resp = self
            .http
            .get(format!("{}/instance/qr-code", self.base_url))
            .query(&[("instanceId", credentials.instance_id.as_str())])
            .header(
                AUTHORIZATION,
                format!("Bearer {}", credentials.instance_token),
            )
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "fetch qr code").await?;

        let parsed: QrCodeResponse = resp.json().await?;
        Ok(parsed.qr_code)
    }

    async fn fetch_status(&self, credentials: &InstanceCredentials) -> Result<ConnectionState> {
        let resp = self
            .http
            .get(format!("{}/instance/status-instance", self.base_url))
            .query(&[("instanceId", credentials.instance_id.as_str())])
            .header(
                AUTHORIZATION,
                format!("Bearer {}", credentials.instance_token),
            )
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "fetch status").await?;

        let parsed: StatusResponse = resp.json().await?;
        Ok(map_state(&parsed))
    }

    async fn disconnect(&self, credentials: &InstanceCredentials) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/instance/logout", self.base_url))
            .query(&[("instanceId", credentials.instance_id.as_str())])
            .header(
                AUTHORIZATION,
                format!("Bearer {}", credentials.instance_token),
            )
            .send()
            .await?;
        Self::ensure_success(resp, "disconnect instance").await?;

        Ok(())
    }

    async fn send_text(
        &self,
        credentials: &InstanceCredentials,
        phone: &str,
        message: &str,
    ) -> Result<String> {
        let body = json!({
            "phone": phone,
            "message": message,
        });

        let resp = self
            .http
            .post(format!("{}/message/send-text", self.base_url))
            .query(&[("instanceId", credentials.instance_id.as_str())])
            .header(
                AUTHORIZATION,
                format!("Bearer {}", credentials.instance_token),
            )
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "send text").await?;

        let parsed: SendTextResponse = resp.json().await?;
        parsed
            .message_id
            .ok_or_else(|| anyhow::anyhow!("W-API message id is missing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_state_prefers_connected_flag() {
        let resp = StatusResponse {
            connected: Some(true),
            status: Some("qrcode".to_string()),
        };
        assert_eq!(map_state(&resp), ConnectionState::Connected);
    }

    #[test]
    fn test_map_state_falls_back_to_status_string() {
        let resp = StatusResponse {
            connected: None,
            status: Some("connecting".to_string()),
        };
        assert_eq!(map_state(&resp), ConnectionState::Connecting);

        let resp = StatusResponse {
            connected: Some(false),
            status: Some("disconnected".to_string()),
        };
        assert_eq!(map_state(&resp), ConnectionState::Disconnected);
    }
}
