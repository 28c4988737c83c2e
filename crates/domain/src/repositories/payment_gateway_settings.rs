use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    entities::payment_gateway_settings::{
        InsertPaymentGatewaySettingEntity, PaymentGatewaySettingEntity,
    },
    value_objects::enums::payment_providers::PaymentProvider,
};

#[async_trait]
#[automock]
pub trait PaymentGatewaySettingRepository {
    async fn upsert(&self, insert_setting_entity: InsertPaymentGatewaySettingEntity)
    -> Result<Uuid>;
    async fn list_by_company(&self, company_id: Uuid)
    -> Result<Vec<PaymentGatewaySettingEntity>>;
    async fn find_default(&self, company_id: Uuid) -> Result<Option<PaymentGatewaySettingEntity>>;
    async fn find_by_provider(
        &self,
        company_id: Uuid,
        provider: PaymentProvider,
    ) -> Result<Option<PaymentGatewaySettingEntity>>;
    /// Clears the previous default and sets the new one in a single transaction.
    async fn set_default(&self, company_id: Uuid, provider: PaymentProvider) -> Result<()>;
}
