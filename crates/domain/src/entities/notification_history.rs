use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::notification_history;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = notification_history)]
pub struct NotificationHistoryEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub rule_id: Uuid,
    pub charge_id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_history)]
pub struct InsertNotificationHistoryEntity {
    pub company_id: Uuid,
    pub rule_id: Uuid,
    pub charge_id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
}
