use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use domain::value_objects::enums::{
    billing_methods::BillingMethod, payment_providers::PaymentProvider,
};

use crate::{
    CheckoutSession, CreateChargeRequest, PaymentDetails, PaymentGateway, PaymentStatus,
    minor_to_reais, reais_to_minor,
};

const API_BASE: &str = "https://api.asaas.com/v3";

/// Minimal Asaas client built on reqwest. Auth goes through the
/// `access_token` header rather than a bearer token.
pub struct AsaasClient {
    http: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: String,
    status: Option<String>,
    #[serde(rename = "externalReference")]
    external_reference: Option<String>,
    value: Option<f64>,
    #[serde(rename = "invoiceUrl")]
    invoice_url: Option<String>,
    #[serde(rename = "bankSlipUrl")]
    bank_slip_url: Option<String>,
}

fn map_status(status: Option<&str>) -> PaymentStatus {
    match status {
        Some("RECEIVED") | Some("CONFIRMED") | Some("RECEIVED_IN_CASH") => PaymentStatus::Approved,
        Some("PENDING") | Some("OVERDUE") | Some("AWAITING_RISK_ANALYSIS") => {
            PaymentStatus::Pending
        }
        Some("REFUNDED") | Some("REFUND_REQUESTED") | Some("CHARGEBACK_REQUESTED") => {
            PaymentStatus::Cancelled
        }
        _ => PaymentStatus::Unknown,
    }
}

fn billing_type(billing_method: BillingMethod) -> &'static str {
    match billing_method {
        BillingMethod::Pix => "PIX",
        BillingMethod::Boleto => "BOLETO",
        BillingMethod::CreditCard => "CREDIT_CARD",
    }
}

impl From<PaymentResponse> for PaymentDetails {
    fn from(resp: PaymentResponse) -> Self {
        Self {
            payment_id: resp.id,
            status: map_status(resp.status.as_deref()),
            external_reference: resp.external_reference,
            amount_minor: resp.value.map(reais_to_minor),
        }
    }
}

impl AsaasClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
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
            "asaas api request failed"
        );

        anyhow::bail!("Asaas API request failed: {} (status {})", context, status);
    }

    /// Asaas requires a customer record before a payment can reference it.
    /// https://docs.asaas.com/reference/create-new-customer
    async fn create_customer(&self, name: &str, cpf_cnpj: &str) -> Result<String> {
        let body = json!({
            "name": name,
            "cpfCnpj": cpf_cnpj,
        });

        let resp = self
            .http
            .post(format!("{API_BASE}/customers"))
            .header("access_token", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create customer").await?;

        let parsed: CustomerResponse = resp.json().await?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl PaymentGateway for AsaasClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Asaas
    }

    async fn create_charge(&self, request: CreateChargeRequest) -> Result<CheckoutSession> {
        let customer_id = self
            .create_customer(&request.customer_name, &request.customer_document)
            .await?;

        // https://docs.asaas.com/reference/create-new-payment
        let body = json!({
            "customer": customer_id,
            "billingType": billing_type(request.billing_method),
            "value": minor_to_reais(request.amount_minor),
            "dueDate": request.due_date.format("%Y-%m-%d").to_string(),
            "description": request.description,
            "externalReference": request.charge_id.to_string(),
        });

        let resp = self
            .http
            .post(format!("{API_BASE}/payments"))
            .header("access_token", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create payment").await?;

        let parsed: PaymentResponse = resp.json().await?;
        let payment_link = parsed
            .invoice_url
            .clone()
            .or(parsed.bank_slip_url.clone())
            .ok_or_else(|| anyhow::anyhow!("Asaas payment link is missing"))?;

        Ok(CheckoutSession {
            provider_charge_id: parsed.id,
            payment_link,
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        // https://docs.asaas.com/reference/retrieve-a-single-payment
        let resp = self
            .http
            .get(format!("{API_BASE}/payments/{payment_id}"))
            .header("access_token", &self.api_key)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "retrieve payment").await?;

        let parsed: PaymentResponse = resp.json().await?;
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert_eq!(map_status(Some("RECEIVED")), PaymentStatus::Approved);
        assert_eq!(map_status(Some("CONFIRMED")), PaymentStatus::Approved);
        assert_eq!(map_status(Some("PENDING")), PaymentStatus::Pending);
        assert_eq!(map_status(Some("OVERDUE")), PaymentStatus::Pending);
        assert_eq!(map_status(Some("REFUNDED")), PaymentStatus::Cancelled);
        assert_eq!(map_status(None), PaymentStatus::Unknown);
    }

    #[test]
    fn test_billing_type() {
        assert_eq!(billing_type(BillingMethod::Pix), "PIX");
        assert_eq!(billing_type(BillingMethod::Boleto), "BOLETO");
        assert_eq!(billing_type(BillingMethod::CreditCard), "CREDIT_CARD");
    }
}
