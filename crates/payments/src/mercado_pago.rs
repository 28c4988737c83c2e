use anyhow::Result;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::error;

use domain::value_objects::enums::{
    billing_methods::BillingMethod, payment_providers::PaymentProvider,
};

use crate::{
    CheckoutSession, CreateChargeRequest, MercadoPagoGateway, PaymentDetails, PaymentGateway,
    PaymentStatus, minor_to_reais, reais_to_minor,
};

type HmacSha256 = Hmac<Sha256>;

const API_BASE: &str = "https://api.mercadopago.com";

/// Minimal Mercado Pago client built on reqwest.
pub struct MercadoPagoClient {
    http: reqwest::Client,
    access_token: String,
    webhook_secret: String,
    notification_base_url: String,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: i64,
    status: Option<String>,
    external_reference: Option<String>,
    transaction_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PaymentSearchResponse {
    #[serde(default)]
    results: Vec<PaymentResponse>,
}

impl From<PaymentResponse> for PaymentDetails {
    fn from(resp: PaymentResponse) -> Self {
        Self {
            payment_id: resp.id.to_string(),
            status: map_status(resp.status.as_deref()),
            external_reference: resp.external_reference,
            amount_minor: resp.transaction_amount.map(reais_to_minor),
        }
    }
}

fn map_status(status: Option<&str>) -> PaymentStatus {
    match status {
        Some("approved") => PaymentStatus::Approved,
        Some("pending") | Some("in_process") | Some("authorized") => PaymentStatus::Pending,
        Some("rejected") => PaymentStatus::Rejected,
        Some("cancelled") | Some("refunded") | Some("charged_back") => PaymentStatus::Cancelled,
        _ => PaymentStatus::Unknown,
    }
}

/// Payment types to exclude so the checkout only offers the chosen method.
/// Pix shows up as `bank_transfer` in the preferences API.
fn excluded_payment_types(billing_method: BillingMethod) -> Vec<&'static str> {
    match billing_method {
        BillingMethod::Pix => vec!["ticket", "credit_card", "debit_card"],
        BillingMethod::Boleto => vec!["credit_card", "debit_card", "bank_transfer"],
        BillingMethod::CreditCard => vec!["ticket", "bank_transfer"],
    }
}

impl MercadoPagoClient {
    pub fn new(
        access_token: String,
        webhook_secret: String,
        notification_base_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            webhook_secret,
            notification_base_url,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            mp_request_id = ?request_id,
            response_body = %body,
            context = %context,
            "mercado pago api request failed"
        );

        anyhow::bail!(
            "Mercado Pago API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Creates a checkout preference and returns its id plus the payment link.
    /// https://www.mercadopago.com.br/developers/en/reference/preferences/_checkout_preferences/post
    pub async fn create_preference(&self, request: &CreateChargeRequest) -> Result<CheckoutSession> {
        let identification_type = if request.customer_document.len() == 11 {
            "CPF"
        } else {
            "CNPJ"
        };

        let notification_url = format!(
            "{}/webhooks/mercado-pago?company_id={}",
            self.notification_base_url, request.company_id
        );

        let body = json!({
            "items": [{
                "title": request.description,
                "quantity": 1,
                "unit_price": minor_to_reais(request.amount_minor),
                "currency_id": "BRL",
            }],
            "payer": {
                "name": request.customer_name,
                "identification": {
                    "type": identification_type,
                    "number": request.customer_document,
                },
            },
            "external_reference": request.charge_id.to_string(),
            "notification_url": notification_url,
            "date_of_expiration": request
                .due_date
                .and_hms_opt(23, 59, 59)
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S.000-03:00").to_string()),
            "payment_methods": {
                "excluded_payment_types": excluded_payment_types(request.billing_method)
                    .into_iter()
                    .map(|id| json!({"id": id}))
                    .collect::<Vec<_>>(),
                "installments": 1,
            },
        });

        let resp = self
            .http
            .post(format!("{API_BASE}/checkout/preferences"))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create preference").await?;

        let parsed: PreferenceResponse = resp.json().await?;
        Ok(CheckoutSession {
            provider_charge_id: parsed.id,
            payment_link: parsed.init_point,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        // https://www.mercadopago.com.br/developers/en/reference/payments/_payments_id/get
        let resp = self
            .http
            .get(format!("{API_BASE}/v1/payments/{payment_id}"))
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "get payment").await?;

        let parsed: PaymentResponse = resp.json().await?;
        Ok(parsed.into())
    }

    /// Verifies the x-signature header of a webhook notification.
    /// https://www.mercadopago.com.br/developers/en/docs/your-integrations/notifications/webhooks
    fn verify_signature(
        &self,
        data_id: &str,
        request_id: &str,
        signature_header: &str,
    ) -> Result<()> {
        let mut timestamp: Option<&str> = None;
        let mut signature: Option<&str> = None;

        for part in signature_header.split(',') {
            let part = part.trim();
            if let Some(rest) = part.strip_prefix("ts=") {
                timestamp = Some(rest);
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest);
            }
        }

        let timestamp = timestamp.ok_or_else(|| anyhow::anyhow!("missing ts in x-signature"))?;
        let signature = signature.ok_or_else(|| anyhow::anyhow!("missing v1 in x-signature"))?;

        // Alphanumeric ids are lowercased in the signed manifest.
        let manifest = format!(
            "id:{};request-id:{};ts:{};",
            data_id.to_lowercase(),
            request_id,
            timestamp
        );

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(manifest.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("invalid webhook signature");
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::MercadoPago
    }

    async fn create_charge(&self, request: CreateChargeRequest) -> Result<CheckoutSession> {
        self.create_preference(&request).await
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        self.get_payment(payment_id).await
    }
}

#[async_trait]
impl MercadoPagoGateway for MercadoPagoClient {
    fn verify_webhook_signature(
        &self,
        data_id: &str,
        request_id: &str,
        signature_header: &str,
    ) -> Result<()> {
        self.verify_signature(data_id, request_id, signature_header)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails> {
        self.get_payment(payment_id).await
    }

    async fn search_payments_by_preference(
        &self,
        preference_id: &str,
    ) -> Result<Vec<PaymentDetails>> {
        // https://www.mercadopago.com.br/developers/en/reference/payments/_payments_search/get
        let resp = self
            .http
            .get(format!("{API_BASE}/v1/payments/search"))
            .query(&[("preference_id", preference_id)])
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "search payments").await?;

        let parsed: PaymentSearchResponse = resp.json().await?;
        Ok(parsed.results.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_secret(secret: &str) -> MercadoPagoClient {
        MercadoPagoClient::new(
            "test-token".to_string(),
            secret.to_string(),
            "https://api.example.com".to_string(),
        )
    }

    fn sign_manifest(secret: &str, manifest: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(manifest.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_accepts_valid_header() {
        let client = client_with_secret("whsec");
        let manifest = "id:12345;request-id:req-1;ts:1700000000;";
        let v1 = sign_manifest("whsec", manifest);
        let header = format!("ts=1700000000,v1={v1}");

        assert!(client.verify_signature("12345", "req-1", &header).is_ok());
    }

    #[test]
    fn test_verify_signature_lowercases_data_id() {
        let client = client_with_secret("whsec");
        let manifest = "id:abc123;request-id:req-1;ts:1700000000;";
        let v1 = sign_manifest("whsec", manifest);
        let header = format!("ts=1700000000,v1={v1}");

        assert!(client.verify_signature("ABC123", "req-1", &header).is_ok());
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payload() {
        let client = client_with_secret("whsec");
        let manifest = "id:12345;request-id:req-1;ts:1700000000;";
        let v1 = sign_manifest("whsec", manifest);
        let header = format!("ts=1700000000,v1={v1}");

        assert!(client.verify_signature("99999", "req-1", &header).is_err());
    }

    #[test]
    fn test_verify_signature_rejects_missing_parts() {
        let client = client_with_secret("whsec");

        assert!(client.verify_signature("12345", "req-1", "v1=abc").is_err());
        assert!(
            client
                .verify_signature("12345", "req-1", "ts=1700000000")
                .is_err()
        );
    }

    #[test]
    fn test_map_status() {
        assert_eq!(map_status(Some("approved")), PaymentStatus::Approved);
        assert_eq!(map_status(Some("in_process")), PaymentStatus::Pending);
        assert_eq!(map_status(Some("rejected")), PaymentStatus::Rejected);
        assert_eq!(map_status(Some("refunded")), PaymentStatus::Cancelled);
        assert_eq!(map_status(None), PaymentStatus::Unknown);
    }

    #[test]
    fn test_excluded_payment_types_keeps_chosen_method() {
        assert!(!excluded_payment_types(BillingMethod::Pix).contains(&"bank_transfer"));
        assert!(!excluded_payment_types(BillingMethod::Boleto).contains(&"ticket"));
        assert!(!excluded_payment_types(BillingMethod::CreditCard).contains(&"credit_card"));
    }
}
