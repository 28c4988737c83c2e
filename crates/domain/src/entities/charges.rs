use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::charges;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = charges)]
pub struct ChargeEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub client_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_document: String,
    pub customer_phone: String,
    pub description: Option<String>,
    pub amount_minor: i32,
    pub due_date: NaiveDate,
    pub status: String,
    pub provider: Option<String>,
    pub provider_charge_id: Option<String>,
    pub payment_link: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = charges)]
pub struct InsertChargeEntity {
    pub company_id: Uuid,
    pub client_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_document: String,
    pub customer_phone: String,
    pub description: Option<String>,
    pub amount_minor: i32,
    pub due_date: NaiveDate,
    pub status: String,
}
