use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::wallet_transactions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = wallet_transactions)]
pub struct WalletTransactionEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub charge_id: Uuid,
    pub amount_minor: i32,
    pub description: String,
    pub provider_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wallet_transactions)]
pub struct InsertWalletTransactionEntity {
    pub company_id: Uuid,
    pub charge_id: Uuid,
    pub amount_minor: i32,
    pub description: String,
    pub provider_payment_id: Option<String>,
}
