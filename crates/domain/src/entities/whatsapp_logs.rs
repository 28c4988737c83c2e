use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::whatsapp_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = whatsapp_logs)]
pub struct WhatsAppLogEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = whatsapp_logs)]
pub struct InsertWhatsAppLogEntity {
    pub company_id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
}
