use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use domain::value_objects::enums::payment_providers::PaymentProvider;

use crate::{
    CheckoutSession, CreateChargeRequest, PaymentDetails, PaymentGateway, PaymentStatus,
};

const API_BASE: &str = "https://api.paghiper.com";

/// Minimal PagHiper client built on reqwest. PagHiper only issues boletos,
/// so the billing method on the request is ignored.
pub struct PagHiperClient {
    http: reqwest::Client,
    api_key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    create_request: CreateRequestResponse,
}

#[derive(Debug, Deserialize)]
struct CreateRequestResponse {
    result: String,
    transaction_id: Option<String>,
    bank_slip: Option<BankSlip>,
    response_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BankSlip {
    url_slip: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status_request: StatusRequestResponse,
}

#[derive(Debug, Deserialize)]
struct StatusRequestResponse {
    transaction_id: Option<String>,
    status: Option<String>,
    order_id: Option<String>,
    value_cents: Option<String>,
}

fn map_status(status: Option<&str>) -> PaymentStatus {
    match status {
        Some("paid") | Some("completed") => PaymentStatus::Approved,
        Some("pending") | Some("reserved") => PaymentStatus::Pending,
        Some("refused") => PaymentStatus::Rejected,
        Some("canceled") | Some("refunded") => PaymentStatus::Cancelled,
        _ => PaymentStatus::Unknown,
    }
}

impl PagHiperClient {
    pub fn new(api_key: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            token,
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
            "paghiper api request failed"
        );

        anyhow::bail!(
            "PagHiper API request failed: {} (status {})",
            context,
            status
        );
    }
}

#[async_trait]
impl PaymentGateway for PagHiperClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::PagHiper
    }

    async fn create_charge(&self, request: CreateChargeRequest) -> Result<CheckoutSession> {
        let days_until_due = (request.due_date - Utc::now().date_naive()).num_days().max(0);

        // https://dev.paghiper.com/reference/gerar-boletos
        let body = json!({
            "apiKey": self.api_key,
            "order_id": request.charge_id.to_string(),
            "payer_name": request.customer_name,
            "payer_cpf_cnpj": request.customer_document,
            "days_due_date": days_until_due.to_string(),
            "items": [{
                "item_id": "1",
                "description": request.description,
                "quantity": "1",
                "price_cents": request.amount_minor.to_string(),
            }],
        });

        let resp = self
            .http
            .post(format!("{API_BASE}/transaction/create/"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create bank slip").await?;

        let parsed: CreateEnvelope = resp.json().await?;
        if parsed.create_request.result != "success" {
            anyhow::bail!(
                "PagHiper refused the bank slip: {}",
                parsed
                    .create_request
                    .response_message
                    .unwrap_or_else(|| "<no message>".to_string())
            );
        }

        let transaction_id = parsed
            .create_request
            .transaction_id
            .ok_or_else(|| anyhow::anyhow!("PagHiper transaction id is missing"))?;
        let payment_link = parsed
            .create_request
            .bank_slip
            .and_then(|slip| slip.url_slip)
            .ok_or_else(|| anyhow::anyhow!("PagHiper bank slip URL is missing"))?;

        Ok(CheckoutSession {
            provider_charge_id: transaction_id,
            payment_link,
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        // https://dev.paghiper.com/reference/status-do-boleto
        let body = json!({
            "apiKey": self.api_key,
            "token": self.token,
            "transaction_id": payment_id,
        });

        let resp = self
            .http
            .post(format!("{API_BASE}/transaction/status/"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "transaction status").await?;

        let parsed: StatusEnvelope = resp.json().await?;
        let status = parsed.status_request;

        Ok(PaymentDetails {
            payment_id: status
                .transaction_id
                .unwrap_or_else(|| payment_id.to_string()),
            status: map_status(status.status.as_deref()),
            external_reference: status.order_id,
            amount_minor: status.value_cents.and_then(|cents| cents.parse().ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert_eq!(map_status(Some("paid")), PaymentStatus::Approved);
        assert_eq!(map_status(Some("completed")), PaymentStatus::Approved);
        assert_eq!(map_status(Some("pending")), PaymentStatus::Pending);
        assert_eq!(map_status(Some("refused")), PaymentStatus::Rejected);
        assert_eq!(map_status(Some("canceled")), PaymentStatus::Cancelled);
        assert_eq!(map_status(Some("something")), PaymentStatus::Unknown);
    }
}
