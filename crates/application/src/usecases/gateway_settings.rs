use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::{
    entities::payment_gateway_settings::InsertPaymentGatewaySettingEntity,
    repositories::payment_gateway_settings::PaymentGatewaySettingRepository,
    value_objects::{
        enums::payment_providers::PaymentProvider,
        gateway_settings::{GatewaySettingDto, UpsertGatewaySettingModel},
    },
};

#[derive(Debug, Error)]
pub enum GatewaySettingError {
    #[error("gateway credentials cannot be empty")]
    MissingCredentials,
    #[error("gateway is not configured for this company")]
    NotConfigured,
    #[error("gateway is disabled and cannot be the default")]
    Disabled,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GatewaySettingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            GatewaySettingError::MissingCredentials => StatusCode::BAD_REQUEST,
            GatewaySettingError::NotConfigured => StatusCode::NOT_FOUND,
            GatewaySettingError::Disabled => StatusCode::CONFLICT,
            GatewaySettingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct GatewaySettingUseCase<S>
where
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
{
    setting_repo: Arc<S>,
}

impl<S> GatewaySettingUseCase<S>
where
    S: PaymentGatewaySettingRepository + Send + Sync + 'static,
{
    pub fn new(setting_repo: Arc<S>) -> Self {
        Self { setting_repo }
    }

    pub async fn upsert_setting(
        &self,
        company_id: Uuid,
        model: UpsertGatewaySettingModel,
    ) -> Result<Uuid, GatewaySettingError> {
        if model.api_key.trim().is_empty() {
            warn!(%company_id, provider = %model.provider, "gateway_settings: empty api key");
            return Err(GatewaySettingError::MissingCredentials);
        }

        let setting_id = self
            .setting_repo
            .upsert(InsertPaymentGatewaySettingEntity {
                company_id,
                provider: model.provider.to_string(),
                api_key: model.api_key,
                api_token: model.api_token,
                is_enabled: model.is_enabled,
            })
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    provider = %model.provider,
                    db_error = ?err,
                    "gateway_settings: failed to upsert setting"
                );
                GatewaySettingError::Internal(err)
            })?;

        info!(
            %company_id,
            provider = %model.provider,
            %setting_id,
            "gateway_settings: credentials saved"
        );
        Ok(setting_id)
    }

    pub async fn list_settings(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<GatewaySettingDto>, GatewaySettingError> {
        let settings = self
            .setting_repo
            .list_by_company(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "gateway_settings: failed to list settings");
                GatewaySettingError::Internal(err)
            })?;

        Ok(settings.into_iter().map(GatewaySettingDto::from).collect())
    }

    pub async fn set_default(
        &self,
        company_id: Uuid,
        provider: PaymentProvider,
    ) -> Result<(), GatewaySettingError> {
        let setting = self
            .setting_repo
            .find_by_provider(company_id, provider)
            .await
            .map_err(GatewaySettingError::Internal)?
            .ok_or(GatewaySettingError::NotConfigured)?;

        if !setting.is_enabled {
            warn!(
                %company_id,
                provider = %provider,
                "gateway_settings: refusing to default to a disabled gateway"
            );
            return Err(GatewaySettingError::Disabled);
        }

        self.setting_repo
            .set_default(company_id, provider)
            .await
            .map_err(|err| {
                error!(
                    %company_id,
                    provider = %provider,
                    db_error = ?err,
                    "gateway_settings: failed to set default"
                );
                GatewaySettingError::Internal(err)
            })?;

        info!(%company_id, provider = %provider, "gateway_settings: default gateway changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{
        entities::payment_gateway_settings::PaymentGatewaySettingEntity,
        repositories::payment_gateway_settings::MockPaymentGatewaySettingRepository,
    };
    use mockall::predicate::eq;

    fn sample_setting(company_id: Uuid, is_enabled: bool) -> PaymentGatewaySettingEntity {
        let now = Utc::now();
        PaymentGatewaySettingEntity {
            id: Uuid::new_v4(),
            company_id,
            provider: "asaas".to_string(),
            api_key: "key-123456".to_string(),
            api_token: None,
            is_enabled,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn upsert_rejects_empty_api_key() {
        let usecase =
            GatewaySettingUseCase::new(Arc::new(MockPaymentGatewaySettingRepository::new()));

        let result = usecase
            .upsert_setting(
                Uuid::new_v4(),
                UpsertGatewaySettingModel {
                    provider: PaymentProvider::Asaas,
                    api_key: "   ".to_string(),
                    api_token: None,
                    is_enabled: true,
                },
            )
            .await;
        assert!(matches!(result, Err(GatewaySettingError::MissingCredentials)));
    }

    #[tokio::test]
    async fn set_default_requires_existing_setting() {
        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        setting_repo
            .expect_find_by_provider()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = GatewaySettingUseCase::new(Arc::new(setting_repo));
        let result = usecase
            .set_default(Uuid::new_v4(), PaymentProvider::Asaas)
            .await;
        assert!(matches!(result, Err(GatewaySettingError::NotConfigured)));
    }

    #[tokio::test]
    async fn set_default_rejects_disabled_gateway() {
        let company_id = Uuid::new_v4();
        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        setting_repo
            .expect_find_by_provider()
            .returning(move |cid, _| {
                Box::pin(async move { Ok(Some(sample_setting(cid, false))) })
            });

        let usecase = GatewaySettingUseCase::new(Arc::new(setting_repo));
        let result = usecase.set_default(company_id, PaymentProvider::Asaas).await;
        assert!(matches!(result, Err(GatewaySettingError::Disabled)));
    }

    #[tokio::test]
    async fn set_default_flips_enabled_gateway() {
        let company_id = Uuid::new_v4();
        let mut setting_repo = MockPaymentGatewaySettingRepository::new();
        setting_repo
            .expect_find_by_provider()
            .returning(move |cid, _| {
                Box::pin(async move { Ok(Some(sample_setting(cid, true))) })
            });
        setting_repo
            .expect_set_default()
            .with(eq(company_id), eq(PaymentProvider::Asaas))
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = GatewaySettingUseCase::new(Arc::new(setting_repo));
        usecase
            .set_default(company_id, PaymentProvider::Asaas)
            .await
            .unwrap();
    }
}
