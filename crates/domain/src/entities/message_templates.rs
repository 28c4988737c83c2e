use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::message_templates;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = message_templates)]
pub struct MessageTemplateEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_templates)]
pub struct InsertMessageTemplateEntity {
    pub company_id: Uuid,
    pub name: String,
    pub body: String,
}
