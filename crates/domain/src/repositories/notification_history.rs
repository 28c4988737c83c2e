use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::notification_history::{
    InsertNotificationHistoryEntity, NotificationHistoryEntity,
};

#[async_trait]
#[automock]
pub trait NotificationHistoryRepository {
    async fn record(&self, insert_history_entity: InsertNotificationHistoryEntity) -> Result<Uuid>;
    /// Dedupe key for the engine: has this rule already fired for this charge?
    async fn exists(&self, rule_id: Uuid, charge_id: Uuid) -> Result<bool>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<NotificationHistoryEntity>>;
}
