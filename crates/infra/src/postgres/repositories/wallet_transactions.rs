use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::wallet_transactions::{InsertWalletTransactionEntity, WalletTransactionEntity},
    repositories::wallet_transactions::WalletTransactionRepository,
    schema::wallet_transactions,
};

pub struct WalletTransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WalletTransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WalletTransactionRepository for WalletTransactionPostgres {
    async fn credit_once(
        &self,
        insert_transaction_entity: InsertWalletTransactionEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Relies on the unique index on charge_id; replays become no-ops
        // instead of duplicate ledger rows.
        let inserted = insert_into(wallet_transactions::table)
            .values(&insert_transaction_entity)
            .on_conflict(wallet_transactions::charge_id)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<WalletTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = wallet_transactions::table
            .filter(wallet_transactions::company_id.eq(company_id))
            .order(wallet_transactions::created_at.desc())
            .load::<WalletTransactionEntity>(&mut conn)?;

        Ok(results)
    }
}
