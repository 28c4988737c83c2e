use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    entities::wallet_transactions::InsertWalletTransactionEntity,
    repositories::{
        charges::ChargeRepository, payment_gateway_settings::PaymentGatewaySettingRepository,
        wallet_transactions::WalletTransactionRepository,
    },
    value_objects::enums::{
        charge_statuses::ChargeStatus, payment_providers::PaymentProvider,
    },
};
use payments::{PaymentDetails, PaymentStatus};

use crate::gateways::GatewayRegistry;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("mercado pago is not configured for this company")]
    GatewayNotConfigured,
    #[error("webhook signature verification failed")]
    InvalidSignature,
    #[error("payment carries an invalid charge reference: {0}")]
    InvalidReference(String),
    #[error("charge not found")]
    ChargeNotFound,
    #[error("charge has no provider attached")]
    NoProviderCharge,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReconcileError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReconcileError::GatewayNotConfigured | ReconcileError::ChargeNotFound => {
                StatusCode::NOT_FOUND
            }
            ReconcileError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ReconcileError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ReconcileError::NoProviderCharge => StatusCode::CONFLICT,
            ReconcileError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// What a reconciliation attempt concluded. Webhook retries and manual
/// checks both funnel through here, so "already paid" is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Settled,
    AlreadyPaid,
    NotApproved,
    StillPending,
}

pub struct ReconciliationUseCase<C, S, W, G>
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    W: WalletTransactionRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    charge_repo: Arc<C>,
    setting_repo: Arc<S>,
    wallet_repo: Arc<W>,
    gateway_registry: Arc<G>,
}

impl<C, S, W, G> ReconciliationUseCase<C, S, W, G>
where
    C: ChargeRepository + Send + Sync + 'static,
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
    W: WalletTransactionRepository + Send + Sync + 'static,
    G: GatewayRegistry + 'static,
{
    pub fn new(
        charge_repo: Arc<C>,
        setting_repo: Arc<S>,
        wallet_repo: Arc<W>,
        gateway_registry: Arc<G>,
    ) -> Self {
        Self {
            charge_repo,
            setting_repo,
            wallet_repo,
            gateway_registry,
        }
    }

    /// Handles a `payment` webhook notification. The payload is never
    /// trusted: after the signature check the payment is re-fetched from
    /// the API and only that response drives the settlement.
    pub async fn handle_mercado_pago_webhook(
        &self,
        company_id: Uuid,
        data_id: &str,
        request_id: &str,
        signature_header: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        info!(%company_id, data_id, "reconciliation: mercado pago webhook received");

        let setting = self
            .setting_repo
            .find_by_provider(company_id, PaymentProvider::MercadoPago)
            .await
            .map_err(ReconcileError::Internal)?
            .ok_or(ReconcileError::GatewayNotConfigured)?;

        let gateway = self
            .gateway_registry
            .mercado_pago(&setting)
            .map_err(ReconcileError::Internal)?;

        if let Err(err) = gateway.verify_webhook_signature(data_id, request_id, signature_header) {
            warn!(
                %company_id,
                data_id,
                error = ?err,
                "reconciliation: webhook signature rejected"
            );
            return Err(ReconcileError::InvalidSignature);
        }

        let details = gateway.fetch_payment(data_id).await.map_err(|err| {
            error!(%company_id, data_id, error = ?err, "reconciliation: payment fetch failed");
            ReconcileError::Internal(err)
        })?;

        if details.status != PaymentStatus::Approved {
            info!(
                %company_id,
                data_id,
                status = ?details.status,
                "reconciliation: payment not approved, nothing to settle"
            );
            return Ok(ReconcileOutcome::NotApproved);
        }

        let charge_id = self.charge_id_from(&details)?;
        self.settle(company_id, charge_id, &details).await
    }

    /// Manual re-check for a charge whose webhook may have been missed.
    pub async fn check_payment(
        &self,
        company_id: Uuid,
        charge_id: Uuid,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let charge = self
            .charge_repo
            .find_by_id_and_company(charge_id, company_id)
            .await
            .map_err(ReconcileError::Internal)?
            .ok_or(ReconcileError::ChargeNotFound)?;

        if ChargeStatus::from_str(&charge.status) == Some(ChargeStatus::Paid) {
            return Ok(ReconcileOutcome::AlreadyPaid);
        }

        let (provider, provider_charge_id) = match (&charge.provider, &charge.provider_charge_id) {
            (Some(provider), Some(provider_charge_id)) => {
                (provider.clone(), provider_charge_id.clone())
            }
            _ => return Err(ReconcileError::NoProviderCharge),
        };
        let provider = PaymentProvider::from_str(&provider)
            .ok_or_else(|| ReconcileError::InvalidReference(provider))?;

        let setting = self
            .setting_repo
            .find_by_provider(company_id, provider)
            .await
            .map_err(ReconcileError::Internal)?
            .ok_or(ReconcileError::GatewayNotConfigured)?;

        let approved = match provider {
            PaymentProvider::MercadoPago => {
                // A preference does not settle itself; the payments created
                // from it do.
                let gateway = self
                    .gateway_registry
                    .mercado_pago(&setting)
                    .map_err(ReconcileError::Internal)?;
                let payments = gateway
                    .search_payments_by_preference(&provider_charge_id)
                    .await
                    .map_err(ReconcileError::Internal)?;
                payments
                    .into_iter()
                    .find(|details| details.status == PaymentStatus::Approved)
            }
            PaymentProvider::Asaas | PaymentProvider::PagHiper => {
                let gateway = self
                    .gateway_registry
                    .payment_gateway(&setting)
                    .map_err(ReconcileError::Internal)?;
                let details = gateway
                    .fetch_payment(&provider_charge_id)
                    .await
                    .map_err(ReconcileError::Internal)?;
                (details.status == PaymentStatus::Approved).then_some(details)
            }
        };

        match approved {
            Some(details) => self.settle(company_id, charge_id, &details).await,
            None => {
                info!(%company_id, %charge_id, "reconciliation: no approved payment yet");
                Ok(ReconcileOutcome::StillPending)
            }
        }
    }

    fn charge_id_from(&self, details: &PaymentDetails) -> Result<Uuid, ReconcileError> {
        let reference = details
            .external_reference
            .clone()
            .ok_or_else(|| ReconcileError::InvalidReference("<missing>".to_string()))?;
        reference
            .parse::<Uuid>()
            .map_err(|_| ReconcileError::InvalidReference(reference))
    }

    /// Flips the charge to paid and credits the wallet exactly once, no
    /// matter how many times the same approval arrives.
    async fn settle(
        &self,
        company_id: Uuid,
        charge_id: Uuid,
        details: &PaymentDetails,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let charge = self
            .charge_repo
            .find_by_id_and_company(charge_id, company_id)
            .await
            .map_err(ReconcileError::Internal)?
            .ok_or(ReconcileError::ChargeNotFound)?;

        let updated = self.charge_repo.mark_paid(charge_id).await.map_err(|err| {
            error!(%company_id, %charge_id, db_error = ?err, "reconciliation: mark paid failed");
            ReconcileError::Internal(err)
        })?;

        let credited = self
            .wallet_repo
            .credit_once(InsertWalletTransactionEntity {
                company_id,
                charge_id,
                amount_minor: charge.amount_minor,
                description: format!("Recebimento da cobranca de {}", charge.customer_name),
                provider_payment_id: Some(details.payment_id.clone()),
            })
            .await
            .map_err(|err| {
                error!(%company_id, %charge_id, db_error = ?err, "reconciliation: wallet credit failed");
                ReconcileError::Internal(err)
            })?;

        if updated == 0 && !credited {
            info!(%company_id, %charge_id, "reconciliation: duplicate settlement ignored");
            return Ok(ReconcileOutcome::AlreadyPaid);
        }

        info!(
            %company_id,
            %charge_id,
            payment_id = %details.payment_id,
            amount_minor = charge.amount_minor,
            "reconciliation: charge settled"
        );
        Ok(ReconcileOutcome::Settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domain::{
        entities::{
            charges::ChargeEntity, payment_gateway_settings::PaymentGatewaySettingEntity,
        },
        repositories::{
            charges::MockChargeRepository,
            payment_gateway_settings::MockPaymentGatewaySettingRepository,
            wallet_transactions::MockWalletTransactionRepository,
        },
    };
    use payments::MockMercadoPagoGateway;

    use crate::gateways::MockGatewayRegistry;

    fn sample_charge(charge_id: Uuid, company_id: Uuid, status: ChargeStatus) -> ChargeEntity {
        let now = Utc::now();
        ChargeEntity {
            id: charge_id,
            company_id,
            client_id: None,
            customer_name: "Maria Silva".to_string(),
            customer_document: "11144477735".to_string(),
            customer_phone: "5511999990000".to_string(),
            description: None,
            amount_minor: 10050,
            due_date: Utc::now().date_naive() + Duration::days(3),
            status: status.to_string(),
            provider: Some("mercadopago".to_string()),
            provider_charge_id: Some("pref-1".to_string()),
            payment_link: Some("https://mp.example/checkout".to_string()),
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_setting(company_id: Uuid) -> PaymentGatewaySettingEntity {
        let now = Utc::now();
        PaymentGatewaySettingEntity {
            id: Uuid::new_v4(),
            company_id,
            provider: "mercadopago".to_string(),
            api_key: "APP_USR-123".to_string(),
            api_token: Some("whsec".to_string()),
            is_enabled: true,
            is_default: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn approved_payment(charge_id: Uuid) -> PaymentDetails {
        PaymentDetails {
            payment_id: "pay-1".to_string(),
            status: PaymentStatus::Approved,
            external_reference: Some(charge_id.to_string()),
            amount_minor: Some(10050),
        }
    }

    fn registry_with_gateway<F>(build: F) -> MockGatewayRegistry
    where
        F: Fn() -> MockMercadoPagoGateway + Send + Sync + 'static,
    {
        let mut registry = MockGatewayRegistry::new();
        registry.expect_mercado_pago().returning(move |_| {
            let gateway: Arc<dyn payments::MercadoPagoGateway> = Arc::new(build());
            Ok(gateway)
        });
        registry
    }

    #[tokio::test]
    async fn webhook_settles_approved_payment() {
        let company_id = Uuid::new_v4();
        let charge_id = Uuid::new_v4();

        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        let setting = sample_setting(company_id);
        setting_repo.expect_find_by_provider().returning(move |_, _| {
            let setting = setting.clone();
            Box::pin(async move { Ok(Some(setting)) })
        });

        let registry = registry_with_gateway(move || {
            let mut gateway = MockMercadoPagoGateway::new();
            gateway
                .expect_verify_webhook_signature()
                .returning(|_, _, _| Ok(()));
            gateway.expect_fetch_payment().returning(move |_| {
                Box::pin(async move { Ok(approved_payment(charge_id)) })
            });
            gateway
        });

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_find_by_id_and_company()
            .returning(move |id, cid| {
                Box::pin(async move { Ok(Some(sample_charge(id, cid, ChargeStatus::Pending))) })
            });
        charge_repo
            .expect_mark_paid()
            .returning(|_| Box::pin(async { Ok(1) }));

        let mut wallet_repo = MockWalletTransactionRepository::new();
        wallet_repo
            .expect_credit_once()
            .withf(move |entity| entity.charge_id == charge_id && entity.amount_minor == 10050)
            .returning(|_| Box::pin(async { Ok(true) }));

        let usecase = ReconciliationUseCase::new(
            Arc::new(charge_repo),
            Arc::new(setting_repo),
            Arc::new(wallet_repo),
            Arc::new(registry),
        );

        let outcome = usecase
            .handle_mercado_pago_webhook(company_id, "123", "req-1", "ts=1,v1=aa")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Settled);
    }

    #[tokio::test]
    async fn webhook_replay_does_not_credit_twice() {
        let company_id = Uuid::new_v4();
        let charge_id = Uuid::new_v4();

        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        let setting = sample_setting(company_id);
        setting_repo.expect_find_by_provider().returning(move |_, _| {
            let setting = setting.clone();
            Box::pin(async move { Ok(Some(setting)) })
        });

        let registry = registry_with_gateway(move || {
            let mut gateway = MockMercadoPagoGateway::new();
            gateway
                .expect_verify_webhook_signature()
                .returning(|_, _, _| Ok(()));
            gateway.expect_fetch_payment().returning(move |_| {
                Box::pin(async move { Ok(approved_payment(charge_id)) })
            });
            gateway
        });

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_find_by_id_and_company()
            .returning(move |id, cid| {
                Box::pin(async move { Ok(Some(sample_charge(id, cid, ChargeStatus::Paid))) })
            });
        // Replay: the status guard finds nothing to update.
        charge_repo
            .expect_mark_paid()
            .returning(|_| Box::pin(async { Ok(0) }));

        let mut wallet_repo = MockWalletTransactionRepository::new();
        wallet_repo
            .expect_credit_once()
            .returning(|_| Box::pin(async { Ok(false) }));

        let usecase = ReconciliationUseCase::new(
            Arc::new(charge_repo),
            Arc::new(setting_repo),
            Arc::new(wallet_repo),
            Arc::new(registry),
        );

        let outcome = usecase
            .handle_mercado_pago_webhook(company_id, "123", "req-1", "ts=1,v1=aa")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::AlreadyPaid);
    }

    #[tokio::test]
    async fn webhook_rejects_bad_signature() {
        let company_id = Uuid::new_v4();

        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        let setting = sample_setting(company_id);
        setting_repo.expect_find_by_provider().returning(move |_, _| {
            let setting = setting.clone();
            Box::pin(async move { Ok(Some(setting)) })
        });

        let registry = registry_with_gateway(|| {
            let mut gateway = MockMercadoPagoGateway::new();
            gateway
                .expect_verify_webhook_signature()
                .returning(|_, _, _| Err(anyhow::anyhow!("invalid webhook signature")));
            gateway
        });

        let usecase = ReconciliationUseCase::new(
            Arc::new(MockChargeRepository::new()),
            Arc::new(setting_repo),
            Arc::new(MockWalletTransactionRepository::new()),
            Arc::new(registry),
        );

        let result = usecase
            .handle_mercado_pago_webhook(company_id, "123", "req-1", "ts=1,v1=bad")
            .await;
        assert!(matches!(result, Err(ReconcileError::InvalidSignature)));
    }

    #[tokio::test]
    async fn webhook_ignores_pending_payment() {
        let company_id = Uuid::new_v4();
        let charge_id = Uuid::new_v4();

        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        let setting = sample_setting(company_id);
        setting_repo.expect_find_by_provider().returning(move |_, _| {
            let setting = setting.clone();
            Box::pin(async move { Ok(Some(setting)) })
        });

        let registry = registry_with_gateway(move || {
            let mut gateway = MockMercadoPagoGateway::new();
            gateway
                .expect_verify_webhook_signature()
                .returning(|_, _, _| Ok(()));
            gateway.expect_fetch_payment().returning(move |_| {
                Box::pin(async move {
                    Ok(PaymentDetails {
                        payment_id: "pay-1".to_string(),
                        status: PaymentStatus::Pending,
                        external_reference: Some(charge_id.to_string()),
                        amount_minor: Some(10050),
                    })
                })
            });
            gateway
        });

        let usecase = ReconciliationUseCase::new(
            Arc::new(MockChargeRepository::new()),
            Arc::new(setting_repo),
            Arc::new(MockWalletTransactionRepository::new()),
            Arc::new(registry),
        );

        let outcome = usecase
            .handle_mercado_pago_webhook(company_id, "123", "req-1", "ts=1,v1=aa")
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::NotApproved);
    }

    #[tokio::test]
    async fn check_payment_settles_from_preference_search() {
        let company_id = Uuid::new_v4();
        let charge_id = Uuid::new_v4();

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_find_by_id_and_company()
            .returning(move |id, cid| {
                Box::pin(async move { Ok(Some(sample_charge(id, cid, ChargeStatus::Pending))) })
            });
        charge_repo
            .expect_mark_paid()
            .returning(|_| Box::pin(async { Ok(1) }));

        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        let setting = sample_setting(company_id);
        setting_repo.expect_find_by_provider().returning(move |_, _| {
            let setting = setting.clone();
            Box::pin(async move { Ok(Some(setting)) })
        });

        let registry = registry_with_gateway(move || {
            let mut gateway = MockMercadoPagoGateway::new();
            gateway
                .expect_search_payments_by_preference()
                .returning(move |_| {
                    Box::pin(async move { Ok(vec![approved_payment(charge_id)]) })
                });
            gateway
        });

        let mut wallet_repo = MockWalletTransactionRepository::new();
        wallet_repo
            .expect_credit_once()
            .returning(|_| Box::pin(async { Ok(true) }));

        let usecase = ReconciliationUseCase::new(
            Arc::new(charge_repo),
            Arc::new(setting_repo),
            Arc::new(wallet_repo),
            Arc::new(registry),
        );

        let outcome = usecase.check_payment(company_id, charge_id).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Settled);
    }

    #[tokio::test]
    async fn check_payment_short_circuits_paid_charge() {
        let company_id = Uuid::new_v4();
        let charge_id = Uuid::new_v4();

        let mut charge_repo = MockChargeRepository::new();
        charge_repo
            .expect_find_by_id_and_company()
            .returning(move |id, cid| {
                Box::pin(async move { Ok(Some(sample_charge(id, cid, ChargeStatus::Paid))) })
            });

        let usecase = ReconciliationUseCase::new(
            Arc::new(charge_repo),
            Arc::new(MockPaymentGatewaySettingRepository::new()),
            Arc::new(MockWalletTransactionRepository::new()),
            Arc::new(MockGatewayRegistry::new()),
        );

        let outcome = usecase.check_payment(company_id, charge_id).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::AlreadyPaid);
    }
}
