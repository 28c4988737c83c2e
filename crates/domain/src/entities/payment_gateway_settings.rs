use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::payment_gateway_settings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_gateway_settings)]
pub struct PaymentGatewaySettingEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub provider: String,
    pub api_key: String,
    pub api_token: Option<String>,
    pub is_enabled: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_gateway_settings)]
pub struct InsertPaymentGatewaySettingEntity {
    pub company_id: Uuid,
    pub provider: String,
    pub api_key: String,
    pub api_token: Option<String>,
    pub is_enabled: bool,
}
