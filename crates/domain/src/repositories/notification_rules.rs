use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::notification_rules::{InsertNotificationRuleEntity, NotificationRuleEntity};

#[async_trait]
#[automock]
pub trait NotificationRuleRepository {
    async fn create(&self, insert_rule_entity: InsertNotificationRuleEntity) -> Result<Uuid>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<NotificationRuleEntity>>;
    /// Active rules across all tenants; the worker iterates this every tick.
    async fn list_active(&self) -> Result<Vec<NotificationRuleEntity>>;
    async fn set_active(&self, rule_id: Uuid, company_id: Uuid, is_active: bool) -> Result<()>;
}
