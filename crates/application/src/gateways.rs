use anyhow::Result;
use mockall::automock;
use std::sync::Arc;

use domain::{
    entities::payment_gateway_settings::PaymentGatewaySettingEntity,
    value_objects::enums::payment_providers::PaymentProvider,
};
use payments::{
    MercadoPagoGateway, PaymentGateway, asaas::AsaasClient, mercado_pago::MercadoPagoClient,
    paghiper::PagHiperClient,
};

/// Builds provider clients from a tenant's stored credentials. Credentials
/// live in the database per company, so clients cannot be constructed once
/// at startup.
#[automock]
pub trait GatewayRegistry: Send + Sync {
    fn payment_gateway(
        &self,
        setting: &PaymentGatewaySettingEntity,
    ) -> Result<Arc<dyn PaymentGateway>>;
    fn mercado_pago(
        &self,
        setting: &PaymentGatewaySettingEntity,
    ) -> Result<Arc<dyn MercadoPagoGateway>>;
}

pub struct DefaultGatewayRegistry {
    notification_base_url: String,
}

impl DefaultGatewayRegistry {
    pub fn new(notification_base_url: String) -> Self {
        Self {
            notification_base_url,
        }
    }

    fn provider_of(setting: &PaymentGatewaySettingEntity) -> Result<PaymentProvider> {
        PaymentProvider::from_str(&setting.provider)
            .ok_or_else(|| anyhow::anyhow!("unknown payment provider: {}", setting.provider))
    }

    fn mercado_pago_client(
        &self,
        setting: &PaymentGatewaySettingEntity,
    ) -> Result<MercadoPagoClient> {
        // api_key holds the access token, api_token the webhook secret.
        let webhook_secret = setting
            .api_token
            .clone()
            .ok_or_else(|| anyhow::anyhow!("mercado pago setting is missing the webhook secret"))?;

        Ok(MercadoPagoClient::new(
            setting.api_key.clone(),
            webhook_secret,
            self.notification_base_url.clone(),
        ))
    }
}

impl GatewayRegistry for DefaultGatewayRegistry {
    fn payment_gateway(
        &self,
        setting: &PaymentGatewaySettingEntity,
    ) -> Result<Arc<dyn PaymentGateway>> {
        match Self::provider_of(setting)? {
            PaymentProvider::MercadoPago => Ok(Arc::new(self.mercado_pago_client(setting)?)),
            PaymentProvider::Asaas => Ok(Arc::new(AsaasClient::new(setting.api_key.clone()))),
            PaymentProvider::PagHiper => {
                let token = setting.api_token.clone().ok_or_else(|| {
                    anyhow::anyhow!("paghiper setting is missing the account token")
                })?;
                Ok(Arc::new(PagHiperClient::new(setting.api_key.clone(), token)))
            }
        }
    }

    fn mercado_pago(
        &self,
        setting: &PaymentGatewaySettingEntity,
    ) -> Result<Arc<dyn MercadoPagoGateway>> {
        match Self::provider_of(setting)? {
            PaymentProvider::MercadoPago => Ok(Arc::new(self.mercado_pago_client(setting)?)),
            other => Err(anyhow::anyhow!(
                "webhook reconciliation is only available for mercado pago, got {}",
                other
            )),
        }
    }
}
