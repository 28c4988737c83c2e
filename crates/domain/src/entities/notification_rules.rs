use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::notification_rules;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = notification_rules)]
pub struct NotificationRuleEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub template_id: Uuid,
    pub days_before: Option<i32>,
    pub days_after: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_rules)]
pub struct InsertNotificationRuleEntity {
    pub company_id: Uuid,
    pub template_id: Uuid,
    pub days_before: Option<i32>,
    pub days_after: Option<i32>,
    pub is_active: bool,
}
