use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::message_templates::{InsertMessageTemplateEntity, MessageTemplateEntity};

#[async_trait]
#[automock]
pub trait MessageTemplateRepository {
    async fn create(&self, insert_template_entity: InsertMessageTemplateEntity) -> Result<Uuid>;
    async fn find_by_id(&self, template_id: Uuid) -> Result<Option<MessageTemplateEntity>>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<MessageTemplateEntity>>;
}
