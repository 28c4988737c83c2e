use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    message_templates::MessageTemplateEntity, notification_history::NotificationHistoryEntity,
    notification_rules::NotificationRuleEntity,
};

#[derive(Debug, Clone, Serialize)]
pub struct MessageTemplateDto {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageTemplateEntity> for MessageTemplateDto {
    fn from(entity: MessageTemplateEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            body: entity.body,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertNotificationRuleModel {
    pub template_id: Uuid,
    pub days_before: Option<i32>,
    pub days_after: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRuleDto {
    pub id: Uuid,
    pub template_id: Uuid,
    pub days_before: Option<i32>,
    pub days_after: Option<i32>,
    pub is_active: bool,
}

impl From<NotificationRuleEntity> for NotificationRuleDto {
    fn from(entity: NotificationRuleEntity) -> Self {
        Self {
            id: entity.id,
            template_id: entity.template_id,
            days_before: entity.days_before,
            days_after: entity.days_after,
            is_active: entity.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationHistoryDto {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub charge_id: Uuid,
    pub phone: String,
    pub status: String,
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl From<NotificationHistoryEntity> for NotificationHistoryDto {
    fn from(entity: NotificationHistoryEntity) -> Self {
        Self {
            id: entity.id,
            rule_id: entity.rule_id,
            charge_id: entity.charge_id,
            phone: entity.phone,
            status: entity.status,
            error: entity.error,
            sent_at: entity.sent_at,
        }
    }
}
