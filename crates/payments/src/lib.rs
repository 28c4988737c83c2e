use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use domain::value_objects::enums::{
    billing_methods::BillingMethod, payment_providers::PaymentProvider,
};

pub mod asaas;
pub mod mercado_pago;
pub mod paghiper;

/// Everything a provider needs to issue a charge and hand back a payment link.
#[derive(Debug, Clone)]
pub struct CreateChargeRequest {
    pub charge_id: Uuid,
    pub company_id: Uuid,
    pub customer_name: String,
    pub customer_document: String,
    pub description: String,
    pub amount_minor: i64,
    pub due_date: NaiveDate,
    pub billing_method: BillingMethod,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub provider_charge_id: String,
    pub payment_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Approved,
    Pending,
    Rejected,
    Cancelled,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub external_reference: Option<String>,
    pub amount_minor: Option<i64>,
}

#[async_trait]
#[automock]
pub trait PaymentGateway: Send + Sync {
    fn provider(&self) -> PaymentProvider;
    async fn create_charge(&self, request: CreateChargeRequest) -> Result<CheckoutSession>;
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails>;
}

/// Mercado Pago carries webhook-specific operations on top of the common
/// gateway surface, so reconciliation gets its own trait.
#[async_trait]
#[automock]
pub trait MercadoPagoGateway: Send + Sync {
    fn verify_webhook_signature(
        &self,
        data_id: &str,
        request_id: &str,
        signature_header: &str,
    ) -> Result<()>;
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails>;
    async fn search_payments_by_preference(
        &self,
        preference_id: &str,
    ) -> Result<Vec<PaymentDetails>>;
}

/// Providers quote amounts in reais with cent precision; the ledger keeps
/// integer centavos.
pub(crate) fn reais_to_minor(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub(crate) fn minor_to_reais(amount_minor: i64) -> f64 {
    amount_minor as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reais_to_minor_rounds_cents() {
        assert_eq!(reais_to_minor(100.50), 10050);
        assert_eq!(reais_to_minor(0.1 + 0.2), 30);
        assert_eq!(reais_to_minor(1234.56), 123456);
    }

    #[test]
    fn test_minor_to_reais() {
        assert_eq!(minor_to_reais(10050), 100.50);
        assert_eq!(minor_to_reais(0), 0.0);
    }
}
