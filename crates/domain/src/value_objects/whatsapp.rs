use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    entities::whatsapp_instances::WhatsAppInstanceEntity,
    value_objects::enums::whatsapp_statuses::WhatsAppStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageModel {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhatsAppInstanceDto {
    pub status: WhatsAppStatus,
    pub qr_code: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
}

impl From<WhatsAppInstanceEntity> for WhatsAppInstanceDto {
    fn from(entity: WhatsAppInstanceEntity) -> Self {
        Self {
            status: WhatsAppStatus::from_str(&entity.status).unwrap_or_default(),
            qr_code: entity.qr_code,
            connected_at: entity.connected_at,
        }
    }
}
