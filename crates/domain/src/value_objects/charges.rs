use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::charges::ChargeEntity,
    value_objects::enums::{billing_methods::BillingMethod, charge_statuses::ChargeStatus},
};

#[derive(Debug, Clone, Deserialize)]
pub struct InsertChargeModel {
    pub client_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_document: String,
    pub customer_phone: String,
    pub description: Option<String>,
    pub amount_minor: i32,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub billing_method: BillingMethod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListChargesFilter {
    pub status: Option<ChargeStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeDto {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_document: String,
    pub customer_phone: String,
    pub description: Option<String>,
    pub amount_minor: i32,
    pub due_date: NaiveDate,
    pub status: ChargeStatus,
    pub provider: Option<String>,
    pub payment_link: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ChargeEntity> for ChargeDto {
    fn from(entity: ChargeEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            customer_name: entity.customer_name,
            customer_document: entity.customer_document,
            customer_phone: entity.customer_phone,
            description: entity.description,
            amount_minor: entity.amount_minor,
            due_date: entity.due_date,
            status: ChargeStatus::from_str(&entity.status).unwrap_or_default(),
            provider: entity.provider,
            payment_link: entity.payment_link,
            paid_at: entity.paid_at,
            created_at: entity.created_at,
        }
    }
}
