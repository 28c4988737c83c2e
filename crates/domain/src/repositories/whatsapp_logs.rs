use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::whatsapp_logs::{InsertWhatsAppLogEntity, WhatsAppLogEntity};

#[async_trait]
#[automock]
pub trait WhatsAppLogRepository {
    async fn record(&self, insert_log_entity: InsertWhatsAppLogEntity) -> Result<Uuid>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<WhatsAppLogEntity>>;
}
