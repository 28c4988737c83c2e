use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::whatsapp_instances;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = whatsapp_instances)]
pub struct WhatsAppInstanceEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub instance_id: String,
    pub instance_token: String,
    pub status: String,
    pub qr_code: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = whatsapp_instances)]
pub struct InsertWhatsAppInstanceEntity {
    pub company_id: Uuid,
    pub instance_id: String,
    pub instance_token: String,
    pub status: String,
    pub qr_code: Option<String>,
}
