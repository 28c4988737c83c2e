use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    entities::whatsapp_instances::{InsertWhatsAppInstanceEntity, WhatsAppInstanceEntity},
    value_objects::enums::whatsapp_statuses::WhatsAppStatus,
};

#[async_trait]
#[automock]
pub trait WhatsAppInstanceRepository {
    async fn upsert(&self, insert_instance_entity: InsertWhatsAppInstanceEntity) -> Result<Uuid>;
    async fn find_by_company(&self, company_id: Uuid) -> Result<Option<WhatsAppInstanceEntity>>;
    async fn update_status(
        &self,
        company_id: Uuid,
        status: WhatsAppStatus,
        qr_code: Option<String>,
    ) -> Result<()>;
}
